//! Cumulative distances along a path.

use contour_common::{ContourError, Point, Result};
use geodesy::{distance, PlotTransform};

use super::config::{LabelConfig, MapDistance, Measure};

/// Cumulative distance arrays, one entry per path vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengths {
    /// Plot distance
    pub plot: Vec<f64>,
    /// Map distance in the configured unit, when requested
    pub map: Option<Vec<f64>>,
    /// Distance used for placement, with tight curls not counted
    pub track: Vec<f64>,
}

/// Radius of the circle through three points; infinite when collinear.
pub fn radius_of_curvature(a: Point, b: Point, c: Point) -> f64 {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if cross == 0.0 {
        return f64::INFINITY;
    }
    a.distance(&b) * b.distance(&c) * c.distance(&a) / (2.0 * cross.abs())
}

/// Increments to vertex i that count towards placement.
fn gate(path: &[Point], min_radius: f64) -> Vec<bool> {
    let n = path.len();
    let mut keep = vec![true; n];
    if min_radius > 0.0 {
        for i in 1..n.saturating_sub(1) {
            keep[i] = radius_of_curvature(path[i - 1], path[i], path[i + 1]) >= min_radius;
        }
    }
    keep
}

fn cumulate(steps: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut total = 0.0;
    std::iter::once(0.0)
        .chain(steps.map(|s| {
            total += s;
            total
        }))
        .collect()
}

impl ArcLengths {
    /// Plot distances only; `track` uses plot distance.
    pub fn plot_only(path: &[Point], min_radius: f64) -> Self {
        let keep = gate(path, min_radius);
        let plot = cumulate(path.windows(2).map(|w| w[0].distance(&w[1])));
        let track = cumulate(
            path.windows(2)
                .enumerate()
                .map(|(i, w)| if keep[i + 1] { w[0].distance(&w[1]) } else { 0.0 }),
        );
        Self {
            plot,
            map: None,
            track,
        }
    }

    /// Distances needed by `config`.
    pub fn compute(
        path: &[Point],
        config: &LabelConfig,
        transform: Option<&dyn PlotTransform>,
    ) -> Result<Self> {
        let mut arcs = Self::plot_only(path, config.min_radius);
        if !config.needs_map_distance() {
            return Ok(arcs);
        }
        let (Some(map), Some(transform)) = (config.map_distance, transform) else {
            return Err(ContourError::misconfigured(
                "map distances need map_distance settings and a plot transform",
            ));
        };
        let steps = map_steps(path, &map, transform);
        if config.measure == Measure::Map {
            let keep = gate(path, config.min_radius);
            arcs.track = cumulate(
                steps
                    .iter()
                    .enumerate()
                    .map(|(i, s)| if keep[i + 1] { *s } else { 0.0 }),
            );
        }
        arcs.map = Some(cumulate(steps.into_iter()));
        Ok(arcs)
    }

    /// Total placement length.
    pub fn total(&self) -> f64 {
        self.track.last().copied().unwrap_or(0.0)
    }

    /// Plot distance at a point within a segment.
    pub fn plot_at(&self, segment: usize, fraction: f64) -> f64 {
        interpolate(&self.plot, segment, fraction)
    }

    /// Map distance at a point within a segment.
    pub fn map_at(&self, segment: usize, fraction: f64) -> Option<f64> {
        self.map
            .as_ref()
            .map(|map| interpolate(map, segment, fraction))
    }
}

fn interpolate(cumulative: &[f64], segment: usize, fraction: f64) -> f64 {
    let a = cumulative[segment];
    let b = cumulative.get(segment + 1).copied().unwrap_or(a);
    a + fraction * (b - a)
}

fn map_steps(path: &[Point], map: &MapDistance, transform: &dyn PlotTransform) -> Vec<f64> {
    let data: Vec<Point> = path.iter().map(|p| transform.to_data(*p)).collect();
    data.windows(2)
        .map(|w| {
            let d = distance(map.kind, w[0], w[1]);
            if map.kind.is_geographic() {
                map.unit.from_meters(d)
            } else {
                d
            }
        })
        .collect()
}
