//! Synthetic grid generators.
//!
//! These generators create predictable fields whose contours are known in
//! closed form, so tests can check traced paths against them.

use contour_common::{Grid, GridSpec};

fn build(spec: GridSpec, f: impl Fn(f64, f64) -> f64) -> Grid {
    let mut data = Vec::with_capacity(spec.len());
    for row in 0..spec.ny {
        for col in 0..spec.nx {
            let x = spec.col_to_x(col as f64);
            let y = spec.row_to_y(row as f64);
            data.push(f(x, y) as f32);
        }
    }
    Grid::new(spec, data).expect("generator produced an invalid grid")
}

/// Creates a unit-spaced grid whose value is its x coordinate.
///
/// Every contour of level `c` is the straight vertical line x = c.
///
/// # Example
///
/// ```
/// use test_utils::ramp_grid;
///
/// let grid = ramp_grid(5, 3);
/// assert_eq!(grid.value(0, 4), 4.0);
/// assert_eq!(grid.value(2, 1), 1.0);
/// ```
pub fn ramp_grid(nx: usize, ny: usize) -> Grid {
    build(GridSpec::unit(nx, ny), |x, _| x)
}

/// Creates a unit-spaced cone peaking at the grid centre.
///
/// The value is `height` minus the distance to the centre, so contours
/// are circles around the centre and every interior level is closed.
pub fn peak_grid(nx: usize, ny: usize, height: f64) -> Grid {
    let cx = (nx - 1) as f64 / 2.0;
    let cy = (ny - 1) as f64 / 2.0;
    build(GridSpec::unit(nx, ny), |x, y| height - (x - cx).hypot(y - cy))
}

/// Creates a bowl: distance to the grid centre (low in the middle).
pub fn bowl_grid(nx: usize, ny: usize) -> Grid {
    let cx = (nx - 1) as f64 / 2.0;
    let cy = (ny - 1) as f64 / 2.0;
    build(GridSpec::unit(nx, ny), |x, y| (x - cx).hypot(y - cy))
}

/// Creates a global 0..360 grid with value `lat + amplitude * cos(lon)`.
///
/// The last column repeats the first, so every contour with level
/// between -90 and 90 circles the globe across the seam.
pub fn periodic_grid(nx: usize, ny: usize, amplitude: f64) -> Grid {
    let spec = GridSpec::global(nx, ny);
    let mut grid = build(spec, |lon, lat| lat + amplitude * lon.to_radians().cos());
    for row in 0..ny {
        let first = grid.data[row * nx];
        grid.data[row * nx + nx - 1] = first;
    }
    grid
}

/// Creates a unit-spaced field `sin(x / wavelength) * cos(y / wavelength)`.
///
/// Produces a checkerboard of closed highs and lows with saddles between
/// them; useful for benchmarks.
pub fn sinusoid_grid(nx: usize, ny: usize, wavelength: f64) -> Grid {
    build(GridSpec::unit(nx, ny), |x, y| {
        (x / wavelength).sin() * (y / wavelength).cos()
    })
}

/// Sets every node within `radius` of (row, col) to NaN.
pub fn with_nan_hole(mut grid: Grid, row: usize, col: usize, radius: f64) -> Grid {
    let nx = grid.nx();
    for r in 0..grid.ny() {
        for c in 0..nx {
            let d = (r as f64 - row as f64).hypot(c as f64 - col as f64);
            if d <= radius {
                grid.data[r * nx + c] = f32::NAN;
            }
        }
    }
    grid
}
