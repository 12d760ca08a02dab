//! End-to-end tracing on small grids with hand-checked contours.

use contour::walker::{CellState, FragmentEnd};
use contour::{
    classify_closure, trace, Closure, ContourPath, ContourScanner, Cursor, EdgeBitmap,
    LevelField, Method, Point, Side, SmoothingConfig, TraceConfig,
};
use test_utils::{fixtures, load_grid, periodic_grid, ramp_grid, require_test_file, with_nan_hole};

fn scan(grid: &contour::Grid, level: f64) -> Vec<ContourPath> {
    ContourScanner::new(grid, level, &TraceConfig::default())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn single_peak_gives_one_closed_diamond() {
    let grid = fixtures::single_peak();
    let paths = scan(&grid, 0.0);
    assert_eq!(paths.len(), 1);

    let path = &paths[0];
    assert!(path.closed);
    assert_eq!(path.points.len(), 5);
    assert!(path.points[0].bits_eq(&path.points[4]));

    // One crossing at the midpoint of each side around the centre node.
    let mut corners: Vec<(f64, f64)> = path.points[..4].iter().map(|p| (p.x, p.y)).collect();
    corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(corners, vec![(0.5, 1.0), (1.0, 0.5), (1.0, 1.5), (1.5, 1.0)]);
}

#[test]
fn nan_centre_stops_the_walker() {
    let grid = fixtures::single_peak();
    let mut data = grid.data.clone();
    data[4] = f32::NAN;
    let grid = contour::Grid::new(grid.spec.clone(), data).unwrap();

    let field = LevelField::new(&grid, 0.0).unwrap();
    let cursor = Cursor::new(0, 0, Side::South);
    assert!(field.exits(cursor).is_empty());
    assert_eq!(field.classify(cursor), CellState::NanWall);

    let mut bitmap = EdgeBitmap::new(3, 3, false).unwrap();
    bitmap.test_and_set(0, 0, Side::South);
    let fragment = trace(&field, &mut bitmap, cursor, Point::new(0.5, 1.0)).unwrap();
    assert_eq!(fragment.end, FragmentEnd::NanWall);
    assert!(!fragment.is_closed());

    assert!(scan(&grid, 0.0).is_empty());
}

#[test]
fn stubs_next_to_missing_data_are_dropped() {
    // Each crossing at 0.5 runs straight into the missing centre.
    assert!(scan(&fixtures::nan_centre(), 0.5).is_empty());
}

#[test]
fn nan_hole_splits_a_line_in_two() {
    let grid = with_nan_hole(ramp_grid(6, 6), 2, 2, 0.0);
    let paths = scan(&grid, 2.5);
    assert_eq!(paths.len(), 2);

    let ys: Vec<Vec<f64>> = paths
        .iter()
        .map(|p| p.points.iter().map(|q| q.y).collect())
        .collect();
    assert_eq!(ys[0], vec![0.0, 1.0, 2.0]);
    assert_eq!(ys[1], vec![5.0, 4.0]);
    for path in &paths {
        assert!(!path.closed);
        assert!(path.points.iter().all(|p| p.x == 2.5));
    }
}

#[test]
fn saddle_pairs_by_crossing_sums() {
    // South + North fractions (0.5) are below East + West (1.5), so the
    // low corners are cut off: South joins West and East joins North.
    let paths = scan(&fixtures::saddle_cell(), 0.0);
    assert_eq!(paths.len(), 2);
    assert_eq!(
        paths[0].points,
        vec![Point::new(0.25, 0.0), Point::new(0.0, 0.25)]
    );
    assert_eq!(
        paths[1].points,
        vec![Point::new(1.0, 0.75), Point::new(0.75, 1.0)]
    );
}

#[test]
fn tied_saddle_joins_south_with_west() {
    let paths = scan(&fixtures::tied_saddle(), 0.0);
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].points, vec![Point::new(0.5, 0.0), Point::new(0.0, 0.5)]);
    assert_eq!(paths[1].points, vec![Point::new(1.0, 0.5), Point::new(0.5, 1.0)]);
}

#[test]
fn nodes_on_the_level_are_nudged() {
    // The middle column equals the level and counts as just above it, so
    // only the cells west of it are crossed and the line runs through it.
    let paths = scan(&fixtures::on_level_column(), 1.0);
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.points.len(), 3);
    assert!(!path.closed);
    assert!(path.points.iter().all(|p| p.x == 1.0));
}

#[test]
fn flat_field_has_no_contours() {
    assert!(scan(&fixtures::flat(), 5.0).is_empty());
    assert!(scan(&fixtures::flat(), 4.0).is_empty());
}

#[test]
fn periodic_seam_duplicates_differ_by_360() {
    let grid = periodic_grid(13, 7, 20.0);
    let mut paths = scan(&grid, 0.0);
    assert_eq!(paths.len(), 1);
    let path = &mut paths[0];
    assert!(path.closed);

    let jumps: Vec<usize> = (1..path.points.len())
        .filter(|&i| (path.points[i].x - path.points[i - 1].x).abs() > 180.0)
        .collect();
    assert_eq!(jumps.len(), 1);
    let (a, b) = (path.points[jumps[0] - 1], path.points[jumps[0]]);
    assert_eq!((a.x - b.x).abs(), 360.0);
    assert_eq!(a.y, b.y);

    // Everywhere else longitude moves by at most one cell.
    for i in 1..path.points.len() {
        if i != jumps[0] {
            assert!((path.points[i].x - path.points[i - 1].x).abs() <= 30.0 + 1e-9);
        }
    }

    let closure = classify_closure(&mut path.points, &grid.spec);
    assert!(matches!(closure, Closure::PolarCap { north: true }));
}

#[test]
fn seam_jump_survives_akima_smoothing() {
    // 39 columns of 360/39 degrees do not add back up to exactly 360.
    let grid = periodic_grid(40, 7, 20.0);
    let dx = grid.spec.dx;
    let config = TraceConfig {
        smoothing: SmoothingConfig::new(3, Method::Akima),
        ..TraceConfig::default()
    };
    let paths: Vec<ContourPath> = ContourScanner::new(&grid, 0.0, &config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(paths.len(), 1);
    let points = &paths[0].points;

    let jumps: Vec<(Point, Point)> = points
        .windows(2)
        .filter(|w| (w[1].x - w[0].x).abs() > 180.0)
        .map(|w| (w[0], w[1]))
        .collect();
    assert_eq!(jumps.len(), 1);
    let (a, b) = jumps[0];
    assert_eq!((a.x - b.x).abs(), 360.0);
    assert_eq!(a.y, b.y);

    // Smoothed points stay within one cell of their neighbours.
    for w in points.windows(2) {
        let step = (w[1].x - w[0].x).abs();
        assert!(step == 360.0 || step <= dx + 1e-9, "step {step}");
    }
}

#[test]
fn ridge_fixture_from_json() {
    let path = require_test_file!("ridge_6x5.json");
    let grid = load_grid(&path);

    // The inner level circles the ridge crest.
    let inner = scan(&grid, 3.5);
    assert_eq!(inner.len(), 1);
    assert!(inner[0].closed);

    // Lower levels reach the east and west borders on both flanks.
    let flanks = scan(&grid, 1.5);
    assert_eq!(flanks.len(), 2);
    for path in &flanks {
        assert!(!path.closed);
        let xs: Vec<f64> = path.points.iter().map(|p| p.x).collect();
        assert!(xs.contains(&0.0) && xs.contains(&5.0));
    }
}
