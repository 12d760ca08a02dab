//! Placement policies: where label candidates go and which are kept.

use contour_common::Point;
use serde::{Deserialize, Serialize};

use super::arclength::ArcLengths;
use super::config::{LabelConfig, Nudge};
use super::text;
use super::{angle, Label, PathInfo};
use crate::crossover::find_crossings;

/// A possible label position on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub position: Point,
    /// Placement distance from the path start
    pub distance: f64,
    /// Path segment holding the candidate (between vertex i and i + 1)
    pub segment: usize,
    /// Position within the segment, 0 at vertex i
    pub fraction: f64,
    /// Index of the crossing line or fixed point that produced it
    pub source: Option<usize>,
}

/// State shared by every acceptance check on one path.
pub(crate) struct Acceptance<'a> {
    pub config: &'a LabelConfig,
    pub path: &'a [Point],
    pub arcs: &'a ArcLengths,
    pub info: &'a PathInfo<'a>,
    /// Labels kept on earlier paths
    pub placed: &'a [Point],
    /// Labels kept on this path so far
    pub accepted: &'a [Label],
    pub half_width: usize,
}

impl Acceptance<'_> {
    fn isolated(&self, p: Point) -> bool {
        let Some(radius) = self.config.isolation else {
            return true;
        };
        let near = |q: &Point| q.distance(&p) < radius;
        !self.placed.iter().any(near) && !self.accepted.iter().any(|l| near(&l.position))
    }

    /// Checks shared by all policies: isolation, text, then angle and nudge.
    pub fn build_label(&self, c: &Candidate) -> Option<Label> {
        if !self.isolated(c.position) {
            return None;
        }
        let text = text::label_text(self, c)?;
        let line_angle = angle::line_angle(self.path, c, self.half_width);
        let angle = angle::annotation_angle(self.config.angle, line_angle);
        Some(Label {
            position: c.position,
            distance: c.distance,
            line_angle,
            angle,
            node: c.segment,
            text,
            nudge: self.config.nudge.map(|n| resolve_nudge(n, angle)),
        })
    }
}

fn resolve_nudge(nudge: Nudge, angle: f64) -> Point {
    if !nudge.along_line {
        return Point::new(nudge.dx, nudge.dy);
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    Point::new(nudge.dx * cos - nudge.dy * sin, nudge.dx * sin + nudge.dy * cos)
}

/// One way of choosing labels along a path.
pub(crate) trait LabelPolicy {
    /// Candidate positions in path order.
    fn candidates(&self, path: &[Point], arcs: &ArcLengths, closed: bool) -> Vec<Candidate>;

    /// Turn a candidate into a label, or reject it.
    fn accept(&self, candidate: &Candidate, ctx: &Acceptance<'_>) -> Option<Label> {
        ctx.build_label(candidate)
    }
}

/// Candidate at placement distance `d`, interpolated within its segment.
fn candidate_at(path: &[Point], track: &[f64], d: f64, source: Option<usize>) -> Candidate {
    let n = track.len();
    let j = track.partition_point(|&t| t < d).clamp(1, n - 1);
    let step = track[j] - track[j - 1];
    let fraction = if step > 0.0 {
        ((d - track[j - 1]) / step).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Candidate {
        position: path[j - 1].lerp(&path[j], fraction),
        distance: d,
        segment: j - 1,
        fraction,
        source,
    }
}

/// A label every `spacing` units of distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingPolicy {
    pub spacing: f64,
    /// The first label on a closed contour sits this fraction of a spacing
    /// from its start.
    #[serde(default = "default_closed_fraction")]
    pub closed_fraction: f64,
}

fn default_closed_fraction() -> f64 {
    0.25
}

impl Default for SpacingPolicy {
    fn default() -> Self {
        Self {
            spacing: 150.0,
            closed_fraction: default_closed_fraction(),
        }
    }
}

impl LabelPolicy for SpacingPolicy {
    fn candidates(&self, path: &[Point], arcs: &ArcLengths, closed: bool) -> Vec<Candidate> {
        let mut out = Vec::new();
        if !(self.spacing > 0.0) {
            tracing::debug!(spacing = self.spacing, "label spacing is not positive");
            return out;
        }
        let track = &arcs.track;
        let mut offset = if closed {
            (1.0 - self.closed_fraction) * self.spacing
        } else {
            0.0
        };
        let mut last = 0.0;
        let mut i = 1;
        while i < track.len() {
            let step = track[i] - track[i - 1];
            let gap = track[i] + offset - last;
            if gap > self.spacing && step > 0.0 {
                let back = ((gap - self.spacing) / step).min(1.0);
                let distance = track[i] - back * step;
                out.push(Candidate {
                    position: path[i].lerp(&path[i - 1], back),
                    distance,
                    segment: i - 1,
                    fraction: 1.0 - back,
                    source: None,
                });
                offset = 0.0;
                last = distance;
            } else {
                i += 1;
            }
        }
        out
    }
}

/// A fixed number of labels spread evenly along the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPolicy {
    pub count: usize,
    /// Candidates closer than this to the previous label are dropped.
    #[serde(default)]
    pub min_separation: f64,
    /// Put the first and last label of an open path on its ends.
    #[serde(default)]
    pub anchor_ends: bool,
}

impl CountPolicy {
    /// Placement distances along a path of length `total`.
    pub fn distances(&self, total: f64, closed: bool) -> Vec<f64> {
        let n = self.count;
        (0..n)
            .map(|i| {
                let i = i as f64;
                if closed {
                    (i + 0.5) * total / n as f64
                } else if self.anchor_ends {
                    if n == 1 {
                        0.5 * total
                    } else {
                        i * total / (n - 1) as f64
                    }
                } else {
                    (i + 1.0) * total / (n + 1) as f64
                }
            })
            .collect()
    }
}

impl LabelPolicy for CountPolicy {
    fn candidates(&self, path: &[Point], arcs: &ArcLengths, closed: bool) -> Vec<Candidate> {
        let total = arcs.total();
        if self.count == 0 || !(total > 0.0) {
            tracing::debug!(count = self.count, total, "no room for counted labels");
            return Vec::new();
        }
        self.distances(total, closed)
            .into_iter()
            .map(|d| candidate_at(path, &arcs.track, d, None))
            .collect()
    }

    fn accept(&self, candidate: &Candidate, ctx: &Acceptance<'_>) -> Option<Label> {
        if let Some(previous) = ctx.accepted.last() {
            if candidate.distance - previous.distance < self.min_separation {
                return None;
            }
        }
        ctx.build_label(candidate)
    }
}

/// An externally supplied line; labels go where contours cross it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingLine {
    pub points: Vec<Point>,
    #[serde(default)]
    pub label: Option<String>,
}

/// One label per crossing with any of the lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingPolicy {
    pub lines: Vec<CrossingLine>,
}

impl LabelPolicy for CrossingPolicy {
    fn candidates(&self, path: &[Point], arcs: &ArcLengths, _closed: bool) -> Vec<Candidate> {
        if self.lines.is_empty() {
            tracing::debug!("no crossing lines for label placement");
            return Vec::new();
        }
        let track = &arcs.track;
        let mut out: Vec<Candidate> = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            for crossing in find_crossings(&line.points, path) {
                let segment = (crossing.node_b.floor() as usize).min(path.len() - 2);
                let fraction = crossing.node_b - segment as f64;
                let distance = track[segment] + fraction * (track[segment + 1] - track[segment]);
                out.push(Candidate {
                    position: crossing.point,
                    distance,
                    segment,
                    fraction,
                    source: Some(index),
                });
            }
        }
        out.sort_by(|a, b| {
            a.segment
                .cmp(&b.segment)
                .then(a.fraction.total_cmp(&b.fraction))
        });
        out
    }
}

/// A point that should carry a label if a contour passes close by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    pub position: Point,
    #[serde(default)]
    pub label: Option<String>,
}

/// Labels at the path vertices nearest to given points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPolicy {
    pub points: Vec<FixedPoint>,
    /// Largest distance between a fixed point and its matching vertex
    pub tolerance: f64,
}

impl LabelPolicy for FixedPolicy {
    fn candidates(&self, path: &[Point], arcs: &ArcLengths, _closed: bool) -> Vec<Candidate> {
        if self.points.is_empty() || !(self.tolerance > 0.0) {
            tracing::debug!(
                points = self.points.len(),
                tolerance = self.tolerance,
                "no fixed label points to match"
            );
            return Vec::new();
        }
        let mut out = Vec::new();
        for (index, fixed) in self.points.iter().enumerate() {
            let nearest = path
                .iter()
                .enumerate()
                .map(|(i, p)| (i, p.distance(&fixed.position)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((i, d)) = nearest {
                if d < self.tolerance {
                    out.push(Candidate {
                        position: path[i],
                        distance: arcs.track[i],
                        segment: i,
                        fraction: 0.0,
                        source: Some(index),
                    });
                }
            }
        }
        out.sort_by_key(|c| c.segment);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(n: usize) -> (Vec<Point>, ArcLengths) {
        let path: Vec<Point> = (0..n).map(|i| Point::new(i as f64, 0.0)).collect();
        let arcs = ArcLengths::plot_only(&path, 0.0);
        (path, arcs)
    }

    #[test]
    fn test_spacing_on_open_path() {
        let (path, arcs) = straight(11);
        let policy = SpacingPolicy {
            spacing: 3.0,
            closed_fraction: 0.25,
        };
        let c = policy.candidates(&path, &arcs, false);
        let distances: Vec<f64> = c.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![3.0, 6.0, 9.0]);
        assert_eq!(c[0].position, Point::new(3.0, 0.0));
    }

    #[test]
    fn test_spacing_offset_on_closed_path() {
        let (path, arcs) = straight(11);
        let policy = SpacingPolicy {
            spacing: 4.0,
            closed_fraction: 0.25,
        };
        let c = policy.candidates(&path, &arcs, true);
        assert_eq!(c[0].distance, 1.0);
        assert_eq!(c[1].distance, 5.0);
    }

    #[test]
    fn test_spacing_several_labels_in_one_segment() {
        let path = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let arcs = ArcLengths::plot_only(&path, 0.0);
        let policy = SpacingPolicy {
            spacing: 2.5,
            closed_fraction: 0.0,
        };
        let c = policy.candidates(&path, &arcs, false);
        assert_eq!(c.len(), 3);
        assert!(c.iter().all(|c| c.segment == 0));
    }

    #[test]
    fn test_zero_spacing_gives_nothing() {
        let (path, arcs) = straight(5);
        let policy = SpacingPolicy {
            spacing: 0.0,
            closed_fraction: 0.25,
        };
        assert!(policy.candidates(&path, &arcs, false).is_empty());
    }

    #[test]
    fn test_count_distances() {
        let policy = CountPolicy {
            count: 3,
            min_separation: 0.0,
            anchor_ends: false,
        };
        assert_eq!(policy.distances(8.0, false), vec![2.0, 4.0, 6.0]);
        assert_eq!(policy.distances(6.0, true), vec![1.0, 3.0, 5.0]);

        let anchored = CountPolicy {
            anchor_ends: true,
            ..policy
        };
        assert_eq!(anchored.distances(8.0, false), vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_count_candidates_interpolate() {
        let (path, arcs) = straight(5);
        let policy = CountPolicy {
            count: 1,
            min_separation: 0.0,
            anchor_ends: false,
        };
        let c = policy.candidates(&path, &arcs, false);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].position, Point::new(2.0, 0.0));
    }

    #[test]
    fn test_crossing_candidates() {
        let (path, arcs) = straight(6);
        let policy = CrossingPolicy {
            lines: vec![
                CrossingLine {
                    points: vec![Point::new(3.5, -1.0), Point::new(3.5, 1.0)],
                    label: Some("B".into()),
                },
                CrossingLine {
                    points: vec![Point::new(1.25, -1.0), Point::new(1.25, 1.0)],
                    label: Some("A".into()),
                },
            ],
        };
        let c = policy.candidates(&path, &arcs, false);
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].source, Some(1));
        assert_eq!(c[0].segment, 1);
        assert!((c[0].distance - 1.25).abs() < 1e-12);
        assert!((c[1].distance - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_matches_nearest_vertex() {
        let (path, arcs) = straight(6);
        let policy = FixedPolicy {
            points: vec![
                FixedPoint {
                    position: Point::new(4.1, 0.2),
                    label: None,
                },
                FixedPoint {
                    position: Point::new(2.0, 5.0),
                    label: None,
                },
            ],
            tolerance: 0.5,
        };
        let c = policy.candidates(&path, &arcs, false);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].position, Point::new(4.0, 0.0));
        assert_eq!(c[0].distance, 4.0);
        assert_eq!(c[0].source, Some(0));
    }

    #[test]
    fn test_nudge_rotates_with_label() {
        let nudge = Nudge {
            dx: 1.0,
            dy: 0.0,
            along_line: true,
        };
        let p = resolve_nudge(nudge, 90.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);

        let plain = Nudge {
            along_line: false,
            ..nudge
        };
        assert_eq!(resolve_nudge(plain, 90.0), Point::new(1.0, 0.0));
    }
}
