//! Small grids with contours known by hand.
//!
//! Row 0 is the top (north) row; the unit spec puts it at y = ny - 1.

use contour_common::Grid;

fn grid(rows: &[[f32; 3]; 3]) -> Grid {
    let rows: Vec<Vec<f32>> = rows.iter().map(|r| r.to_vec()).collect();
    Grid::from_rows(&rows).expect("fixture grid is valid")
}

/// One high node in the centre; the level 0 contour is a diamond through
/// the four edge midpoints.
pub fn single_peak() -> Grid {
    grid(&[[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]])
}

/// The centre node is missing; no contour can enter its four cells.
pub fn nan_centre() -> Grid {
    grid(&[[0.0, 1.0, 2.0], [0.0, f32::NAN, 2.0], [0.0, 1.0, 2.0]])
}

/// Ramp in x with every node in the middle column exactly on level 1.
pub fn on_level_column() -> Grid {
    grid(&[[0.0, 1.0, 2.0], [0.0, 1.0, 2.0], [0.0, 1.0, 2.0]])
}

/// A cell whose diagonal corners are both high; crossings of level 0 sit
/// closer to the high corners on the south and north sides.
pub fn saddle_cell() -> Grid {
    Grid::from_rows(&[vec![3.0, -1.0], vec![-1.0, 3.0]]).expect("fixture grid is valid")
}

/// A symmetric saddle where both pairings are equally likely.
pub fn tied_saddle() -> Grid {
    Grid::from_rows(&[vec![1.0, -1.0], vec![-1.0, 1.0]]).expect("fixture grid is valid")
}

/// Constant field; no level produces a contour.
pub fn flat() -> Grid {
    grid(&[[5.0; 3]; 3])
}
