use std::sync::Arc;

use contour_common::{ContourError, Point, Result};
use geodesy::PlotTransform;

use super::angle::auto_half_width;
use super::arclength::ArcLengths;
use super::config::LabelConfig;
use super::policy::Acceptance;
use super::{Label, PathInfo};

/// Places labels on a sequence of paths under one configuration.
pub struct LabelEngine {
    config: LabelConfig,
    transform: Option<Arc<dyn PlotTransform>>,
    /// Positions of every label accepted so far
    placed: Vec<Point>,
}

impl LabelEngine {
    pub fn new(config: LabelConfig) -> Result<Self> {
        config.validate().map_err(ContourError::misconfigured)?;
        Ok(Self {
            config,
            transform: None,
            placed: Vec::new(),
        })
    }

    /// Plot transform used for map distances.
    pub fn with_transform(mut self, transform: Arc<dyn PlotTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Positions of the labels accepted on every path so far.
    pub fn placed(&self) -> &[Point] {
        &self.placed
    }

    /// Forget earlier labels before a new, unrelated set of paths.
    pub fn reset(&mut self) {
        self.placed.clear();
    }

    /// Choose labels on `path` and insert their positions as vertices.
    ///
    /// The returned labels are in path order and their `node` indexes the
    /// updated path.
    pub fn place(&mut self, path: &mut Vec<Point>, info: &PathInfo<'_>) -> Result<Vec<Label>> {
        if path.len() < 2 {
            tracing::debug!(points = path.len(), "path too short for labels");
            return Ok(Vec::new());
        }

        let arcs = ArcLengths::compute(path, &self.config, self.transform.as_deref())?;
        let policy = self.config.placement.as_policy();
        let candidates = policy.candidates(path, &arcs, info.closed);
        let half_width = self
            .config
            .half_width
            .unwrap_or_else(|| auto_half_width(path.len()));

        let mut labels: Vec<Label> = Vec::new();
        let mut keys: Vec<(usize, f64)> = Vec::new();
        for candidate in &candidates {
            let ctx = Acceptance {
                config: &self.config,
                path: path.as_slice(),
                arcs: &arcs,
                info,
                placed: &self.placed,
                accepted: &labels,
                half_width,
            };
            if let Some(label) = policy.accept(candidate, &ctx) {
                labels.push(label);
                keys.push((candidate.segment, candidate.fraction));
            }
        }

        if labels.is_empty() {
            tracing::debug!(
                text = info.text,
                candidates = candidates.len(),
                length = arcs.total(),
                "no labels accepted on path"
            );
            return Ok(labels);
        }

        insert_labels(path, &mut labels, &keys)?;
        self.placed.try_reserve(labels.len())?;
        self.placed.extend(labels.iter().map(|l| l.position));
        Ok(labels)
    }
}

/// Insert label positions into `path` and point each label's `node` at
/// its vertex. A label on an existing vertex reuses it.
fn insert_labels(path: &mut Vec<Point>, labels: &mut [Label], keys: &[(usize, f64)]) -> Result<()> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        keys[a]
            .0
            .cmp(&keys[b].0)
            .then(keys[a].1.total_cmp(&keys[b].1))
    });

    let mut out = Vec::new();
    out.try_reserve_exact(path.len() + labels.len())?;
    let mut next = 0;
    for i in order {
        let (segment, _) = keys[i];
        while next <= segment && next < path.len() {
            out.push(path[next]);
            next += 1;
        }
        let p = labels[i].position;
        if out.last().is_some_and(|q: &Point| q.bits_eq(&p)) {
            labels[i].node = out.len() - 1;
        } else if path.get(next).is_some_and(|q| q.bits_eq(&p)) {
            labels[i].node = out.len();
        } else {
            out.push(p);
            labels[i].node = out.len() - 1;
        }
    }
    out.extend_from_slice(&path[next..]);

    labels.sort_by_key(|l| l.node);
    *path = out;
    Ok(())
}

/// Label a single path with a throwaway engine.
pub fn place_labels(path: &mut Vec<Point>, config: &LabelConfig, info: &PathInfo<'_>) -> Result<Vec<Label>> {
    LabelEngine::new(config.clone())?.place(path, info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::config::{LabelText, Placement};
    use crate::label::policy::{CountPolicy, FixedPoint, FixedPolicy, SpacingPolicy};

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_labels_become_vertices() {
        let mut path = line(5);
        let config = LabelConfig::spacing(1.5);
        let info = PathInfo {
            text: "10",
            ..PathInfo::default()
        };
        let labels = place_labels(&mut path, &config, &info).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(path.len(), 6);
        for label in &labels {
            assert_eq!(path[label.node], label.position);
            assert_eq!(label.text, "10");
        }
        assert_eq!(labels[0].position, Point::new(1.5, 0.0));
        assert_eq!(labels[1].node, 4);
    }

    #[test]
    fn test_label_on_vertex_reuses_it() {
        let mut path = line(5);
        let config = LabelConfig {
            placement: Placement::Fixed(FixedPolicy {
                points: vec![FixedPoint {
                    position: Point::new(2.0, 0.1),
                    label: Some("X".into()),
                }],
                tolerance: 0.5,
            }),
            text: LabelText::FixedPoint,
            ..LabelConfig::default()
        };
        let labels = place_labels(&mut path, &config, &PathInfo::default()).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(path.len(), 5);
        assert_eq!(labels[0].node, 2);
        assert_eq!(labels[0].text, "X");
    }

    #[test]
    fn test_two_labels_in_one_segment() {
        let mut path = vec![Point::new(0.0, 0.0), Point::new(9.0, 0.0)];
        let config = LabelConfig {
            placement: Placement::Count(CountPolicy {
                count: 2,
                min_separation: 0.0,
                anchor_ends: false,
            }),
            ..LabelConfig::default()
        };
        let labels = place_labels(&mut path, &config, &PathInfo::default()).unwrap();
        // Contour text is empty, so nothing is accepted.
        assert!(labels.is_empty());

        let info = PathInfo {
            text: "5",
            ..PathInfo::default()
        };
        let labels = place_labels(&mut path, &config, &info).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(path.len(), 4);
        assert!((path[1].x - 3.0).abs() < 1e-12);
        assert!((path[2].x - 6.0).abs() < 1e-12);
        assert_eq!((labels[0].node, labels[1].node), (1, 2));
    }

    #[test]
    fn test_isolation_across_paths() {
        let config = LabelConfig {
            isolation: Some(1.0),
            ..LabelConfig::spacing(2.0)
        };
        let mut engine = LabelEngine::new(config).unwrap();
        let info = PathInfo {
            text: "1",
            ..PathInfo::default()
        };

        let mut first = line(6);
        let a = engine.place(&mut first, &info).unwrap();
        assert_eq!(a.len(), 2);

        // A parallel path half a unit away gets nothing.
        let mut second: Vec<Point> = line(6).into_iter().map(|p| Point::new(p.x, 0.5)).collect();
        assert!(engine.place(&mut second, &info).unwrap().is_empty());
        assert_eq!(second.len(), 6);

        engine.reset();
        assert_eq!(engine.place(&mut second, &info).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = LabelConfig {
            placement: Placement::Spacing(SpacingPolicy {
                spacing: 1.0,
                closed_fraction: 2.0,
            }),
            ..LabelConfig::default()
        };
        let err = LabelEngine::new(config).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_short_path() {
        let mut path = vec![Point::new(0.0, 0.0)];
        let labels = place_labels(&mut path, &LabelConfig::default(), &PathInfo::default()).unwrap();
        assert!(labels.is_empty());
    }
}
