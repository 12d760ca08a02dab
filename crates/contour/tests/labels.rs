//! Label placement on traced contours.

use std::sync::Arc;

use contour::label::{
    CountPolicy, CrossingLine, CrossingPolicy, FixedPoint, FixedPolicy, LabelText, MapDistance,
    Placement,
};
use contour::{
    extract_levels, place_labels, ContourConfig, ContourScanner, LabelConfig, LabelEngine,
    PathInfo, Point, TraceConfig,
};
use geodesy::{DistanceKind, DistanceUnit, LinearTransform, PlotTransform};
use test_utils::{assert_approx_eq, assert_points_approx_eq, peak_grid, ramp_grid};

/// The level 2.5 line of a 6 x 9 ramp: x = 2.5, y = 0..=8 going north.
fn vertical_line() -> Vec<Point> {
    let grid = ramp_grid(6, 9);
    let mut scanner = ContourScanner::new(&grid, 2.5, &TraceConfig::default()).unwrap();
    let path = scanner.next_contour().unwrap().unwrap();
    assert!(scanner.next_contour().unwrap().is_none());
    path.points
}

fn info(text: &str) -> PathInfo<'_> {
    PathInfo {
        text,
        ..Default::default()
    }
}

fn assert_nodes_hold_labels(path: &[Point], labels: &[contour::Label]) {
    for label in labels {
        assert!(path[label.node].bits_eq(&label.position));
    }
}

#[test]
fn count_policy_spreads_labels_evenly() {
    let mut path = vertical_line();
    assert_eq!(path.len(), 9);
    let config = LabelConfig {
        placement: Placement::Count(CountPolicy {
            count: 3,
            min_separation: 0.0,
            anchor_ends: false,
        }),
        ..Default::default()
    };

    let labels = place_labels(&mut path, &config, &info("2.5")).unwrap();
    assert_eq!(labels.len(), 3);
    // Quarter points of the line fall on existing vertices.
    assert_eq!(path.len(), 9);
    let nodes: Vec<usize> = labels.iter().map(|l| l.node).collect();
    assert_eq!(nodes, vec![2, 4, 6]);
    for label in &labels {
        assert_eq!(label.text, "2.5");
        assert_approx_eq!(label.line_angle, 90.0, 1e-9);
    }
    assert_nodes_hold_labels(&path, &labels);
}

#[test]
fn count_policy_drops_labels_closer_than_min_separation() {
    let mut path = vertical_line();
    let config = LabelConfig {
        placement: Placement::Count(CountPolicy {
            count: 3,
            min_separation: 3.0,
            anchor_ends: false,
        }),
        ..Default::default()
    };

    // Candidates at 2, 4 and 6: the middle one is only 2 past the first,
    // the last is 4 past the first kept label.
    let labels = place_labels(&mut path, &config, &info("2.5")).unwrap();
    let distances: Vec<f64> = labels.iter().map(|l| l.distance).collect();
    assert_eq!(distances, vec![2.0, 6.0]);
    let nodes: Vec<usize> = labels.iter().map(|l| l.node).collect();
    assert_eq!(nodes, vec![2, 6]);
    assert_nodes_hold_labels(&path, &labels);
}

#[test]
fn crossing_policy_labels_where_lines_meet() {
    let mut path = vertical_line();
    let config = LabelConfig {
        placement: Placement::Crossing(CrossingPolicy {
            lines: vec![CrossingLine {
                points: vec![Point::new(0.0, 3.5), Point::new(6.0, 3.5)],
                label: Some("A".to_string()),
            }],
        }),
        text: LabelText::CrossingLine,
        ..Default::default()
    };

    let labels = place_labels(&mut path, &config, &info("2.5")).unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].text, "A");
    assert_points_approx_eq!(labels[0].position, Point::new(2.5, 3.5), 1e-12);
    assert_approx_eq!(labels[0].distance, 3.5, 1e-12);

    // The crossing becomes a new vertex between y = 3 and y = 4.
    assert_eq!(path.len(), 10);
    assert_eq!(labels[0].node, 4);
    assert_nodes_hold_labels(&path, &labels);
}

#[test]
fn fixed_policy_snaps_to_the_nearest_vertex() {
    let mut path = vertical_line();
    let config = LabelConfig {
        placement: Placement::Fixed(FixedPolicy {
            points: vec![
                FixedPoint {
                    position: Point::new(2.4, 6.1),
                    label: Some("F".to_string()),
                },
                FixedPoint {
                    position: Point::new(5.0, 1.0),
                    label: Some("far".to_string()),
                },
            ],
            tolerance: 0.5,
        }),
        text: LabelText::FixedPoint,
        ..Default::default()
    };

    let labels = place_labels(&mut path, &config, &info("2.5")).unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].text, "F");
    assert_eq!(labels[0].node, 6);
    assert_eq!(labels[0].position, Point::new(2.5, 6.0));
    assert_eq!(path.len(), 9);
}

#[test]
fn map_distance_text_uses_data_coordinates() {
    // Plot coordinates are twice the data coordinates.
    let transform: Arc<dyn PlotTransform> = Arc::new(LinearTransform::new(2.0, 2.0, 0.0, 0.0));
    let mut path = transform.path_to_plot(&vertical_line());
    let config = LabelConfig {
        placement: Placement::Count(CountPolicy {
            count: 1,
            min_separation: 0.0,
            anchor_ends: false,
        }),
        text: LabelText::MapDistance,
        unit: Some("-u".to_string()),
        map_distance: Some(MapDistance {
            kind: DistanceKind::Cartesian,
            unit: DistanceUnit::Meter,
        }),
        ..Default::default()
    };

    let mut engine = LabelEngine::new(config.clone()).unwrap().with_transform(transform);
    let labels = engine.place(&mut path, &info("2.5")).unwrap();
    assert_eq!(labels.len(), 1);
    // Halfway along 16 plot units is 4 data units from the start.
    assert_eq!(labels[0].position, Point::new(5.0, 8.0));
    assert_eq!(labels[0].text, "4u");

    // Without a transform there is nothing to measure map distances with.
    let mut plain = vertical_line();
    assert!(place_labels(&mut plain, &config, &info("2.5")).is_err());
}

#[test]
fn extracted_labels_respect_isolation_across_levels() {
    let grid = peak_grid(21, 21, 10.0);
    let isolation = 2.0;
    let config = ContourConfig {
        levels: vec![2.0, 4.0, 6.0],
        labels: Some(LabelConfig {
            isolation: Some(isolation),
            ..LabelConfig::spacing(3.0)
        }),
        ..Default::default()
    };

    let segments = extract_levels(&grid, &config, None).unwrap();
    assert_eq!(segments.len(), 3);

    let mut all: Vec<Point> = Vec::new();
    for segment in &segments {
        assert!(!segment.labels.is_empty(), "level {}", segment.level);
        assert_nodes_hold_labels(&segment.points, &segment.labels);
        for label in &segment.labels {
            assert_eq!(label.text, segment.text);
        }
        all.extend(segment.labels.iter().map(|l| l.position));
    }
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert!(a.distance(b) >= isolation);
        }
    }
}

#[test]
fn annotation_interval_limits_labels_to_its_multiples() {
    let grid = peak_grid(21, 21, 10.0);
    let config = ContourConfig {
        levels: vec![2.0, 4.0, 6.0],
        annotation_interval: Some(4.0),
        labels: Some(LabelConfig::spacing(3.0)),
        ..Default::default()
    };
    let segments = extract_levels(&grid, &config, None).unwrap();
    assert_eq!(segments.len(), 3);
    for segment in &segments {
        let labeled = !segment.labels.is_empty();
        assert_eq!(labeled, segment.level == 4.0, "level {}", segment.level);
    }
}

#[test]
fn spacing_keeps_labels_at_least_one_spacing_apart() {
    let grid = peak_grid(21, 21, 10.0);
    let config = ContourConfig {
        levels: vec![2.0],
        labels: Some(LabelConfig::spacing(3.0)),
        ..Default::default()
    };
    let segments = extract_levels(&grid, &config, None).unwrap();
    let labels = &segments[0].labels;
    // A ring of radius 8 has room for well over ten labels.
    assert!(labels.len() > 10);
    for w in labels.windows(2) {
        assert!(w[1].distance - w[0].distance >= 3.0 * 0.999);
    }
}

#[test]
fn plot_transform_moves_paths_before_labeling() {
    let grid = peak_grid(21, 21, 10.0);
    let config = ContourConfig {
        levels: vec![6.0],
        labels: Some(LabelConfig::spacing(10.0)),
        ..Default::default()
    };
    let transform: Arc<dyn PlotTransform> = Arc::new(LinearTransform::new(2.0, 2.0, 0.0, 0.0));
    let segments = extract_levels(&grid, &config, Some(transform)).unwrap();
    assert_eq!(segments.len(), 1);

    // Radius 4 around (10, 10) in data is radius 8 around (20, 20) on the plot.
    let segment = &segments[0];
    for p in &segment.points {
        let r = (p.x - 20.0).hypot(p.y - 20.0);
        assert!((r - 8.0).abs() < 0.5, "r = {r}");
    }
    // About 50 plot units of ring at a spacing of 10.
    assert!((4..=6).contains(&segment.labels.len()));
}
