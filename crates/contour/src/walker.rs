//! Cell walker: follows one contour from cell to cell.
//!
//! The walker works on a [`LevelField`], the grid shifted by the contour
//! level so the contour is the zero crossing. Cells are addressed by their
//! north-west node (row, col); corners are read counterclockwise from the
//! south-west one, with the first repeated as a fifth entry so side `k`
//! always runs from corner `k` to corner `k + 1`.

use contour_common::{Grid, GridSpec, Point, Result};

use crate::bitmap::{EdgeBitmap, Side};

/// Longitude span of a periodic grid; seam duplicates differ by exactly this.
pub const SEAM_SPAN: f64 = 360.0;

/// Corner offsets (row, col) relative to the north-west node: SW, SE, NE, NW, SW.
const CORNERS: [(usize, usize); 5] = [(1, 0), (1, 1), (0, 1), (0, 0), (1, 0)];

/// Position of the walker: a cell and the side it was entered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    pub entry: Side,
}

impl Cursor {
    pub fn new(row: usize, col: usize, entry: Side) -> Self {
        Self { row, col, entry }
    }
}

/// Transition out of the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// One exit leading to a neighbouring cell.
    Interior(Side),
    /// Three exits; the saddle rule picked this one.
    SaddleAmbiguous(Side),
    /// The exit lies on a non-periodic grid boundary.
    BorderExit(Side),
    /// The exit crosses the 360° seam of a periodic grid.
    PeriodicWrap(Side),
    /// No valid exit: missing data blocks the way.
    NanWall,
}

impl CellState {
    pub fn exit(&self) -> Option<Side> {
        match *self {
            CellState::Interior(s)
            | CellState::SaddleAmbiguous(s)
            | CellState::BorderExit(s)
            | CellState::PeriodicWrap(s) => Some(s),
            CellState::NanWall => None,
        }
    }
}

/// Sides of a cell (other than the entry) where the field changes sign.
#[derive(Debug, Clone, Copy)]
pub struct Exits {
    sides: [Side; 4],
    len: usize,
}

impl Exits {
    pub fn as_slice(&self) -> &[Side] {
        &self.sides[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A grid shifted so that the requested level becomes zero.
///
/// Samples exactly on the level are nudged to the smallest positive value,
/// so no node lies on the contour and every crossing has a definite sign.
#[derive(Debug, Clone)]
pub struct LevelField<'g> {
    grid: &'g Grid,
    level: f64,
    values: Vec<f64>,
}

impl<'g> LevelField<'g> {
    pub fn new(grid: &'g Grid, level: f64) -> Result<Self> {
        let (nx, ny) = (grid.nx(), grid.ny());
        let mut values = Vec::new();
        values.try_reserve_exact(nx * ny)?;
        for row in 0..ny {
            for col in 0..nx {
                let z = grid.value(row, col) as f64 - level;
                values.push(if z == 0.0 { f64::MIN_POSITIVE } else { z });
            }
        }
        Ok(Self {
            grid,
            level,
            values,
        })
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    pub fn spec(&self) -> &'g GridSpec {
        &self.grid.spec
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Shifted sample at a node.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.grid.nx() + col]
    }

    /// Corner values SW, SE, NE, NW, SW of a cell.
    ///
    /// Angular fields are unwrapped into one ±180° window first.
    pub fn corners(&self, row: usize, col: usize) -> [f64; 5] {
        let mut z = CORNERS.map(|(dr, dc)| self.value(row + dr, col + dc));
        if self.grid.spec.topology.cyclic_values {
            unwrap_cyclic(&mut z);
        }
        z
    }

    /// Whether side `side` of the cell holds an unused zero crossing.
    pub fn starts_trace(&self, bitmap: &EdgeBitmap, cursor: Cursor) -> bool {
        if bitmap.is_set(cursor.row, cursor.col, cursor.entry) {
            return false;
        }
        let z = self.corners(cursor.row, cursor.col);
        crosses(&z, cursor.entry)
    }

    /// Sides other than the entry side that carry a crossing.
    pub fn exits(&self, cursor: Cursor) -> Exits {
        let z = self.corners(cursor.row, cursor.col);
        exits_of(&z, cursor.entry)
    }

    /// Decide where the walker leaves the cell at `cursor`.
    pub fn classify(&self, cursor: Cursor) -> CellState {
        let z = self.corners(cursor.row, cursor.col);
        let exits = exits_of(&z, cursor.entry);
        let (exit, saddle) = match exits.as_slice() {
            [] => return CellState::NanWall,
            [only] => (*only, false),
            [first, _] => {
                // Only reachable when cyclic unwrapping disagrees between
                // neighbouring cells.
                tracing::debug!(
                    row = cursor.row,
                    col = cursor.col,
                    "two exits in one cell, taking the first"
                );
                (*first, false)
            }
            _ => (saddle_partner(&z, cursor.entry), true),
        };
        let spec = self.spec();
        let leaves = match exit {
            Side::South => cursor.row + 2 == spec.ny,
            Side::North => cursor.row == 0,
            Side::East => cursor.col + 2 == spec.nx,
            Side::West => cursor.col == 0,
        };
        if leaves {
            if spec.is_periodic() && matches!(exit, Side::East | Side::West) {
                CellState::PeriodicWrap(exit)
            } else {
                CellState::BorderExit(exit)
            }
        } else if saddle {
            CellState::SaddleAmbiguous(exit)
        } else {
            CellState::Interior(exit)
        }
    }

    /// Crossing point on `side` of the cell, in grid coordinates.
    pub fn crossing(&self, row: usize, col: usize, side: Side) -> Point {
        let z = self.corners(row, col);
        self.crossing_from(&z, row, col, side)
    }

    fn crossing_from(&self, z: &[f64; 5], row: usize, col: usize, side: Side) -> Point {
        let k = side.index();
        let t = z[k] / (z[k] - z[k + 1]);
        let (r0, c0) = CORNERS[k];
        let (r1, c1) = CORNERS[k + 1];
        let frac_row = row as f64 + r0 as f64 + t * (r1 as f64 - r0 as f64);
        let frac_col = col as f64 + c0 as f64 + t * (c1 as f64 - c0 as f64);
        let spec = self.spec();
        // The seam column sits exactly one turn east of the first column.
        let x = if spec.is_periodic() && frac_col == (spec.nx - 1) as f64 {
            spec.x_min() + SEAM_SPAN
        } else {
            spec.col_to_x(frac_col)
        };
        Point::new(x, spec.row_to_y(frac_row))
    }

    /// The cell across `side`, entered through the opposite side.
    ///
    /// Returns None past a non-periodic boundary.
    pub fn neighbor(&self, row: usize, col: usize, side: Side) -> Option<Cursor> {
        let spec = self.spec();
        let (last_row, last_col) = (spec.ny - 2, spec.nx - 2);
        let entry = side.opposite();
        match side {
            Side::South if row < last_row => Some(Cursor::new(row + 1, col, entry)),
            Side::North if row > 0 => Some(Cursor::new(row - 1, col, entry)),
            Side::East if col < last_col => Some(Cursor::new(row, col + 1, entry)),
            Side::East if spec.is_periodic() => Some(Cursor::new(row, 0, entry)),
            Side::West if col > 0 => Some(Cursor::new(row, col - 1, entry)),
            Side::West if spec.is_periodic() => Some(Cursor::new(row, last_col, entry)),
            _ => None,
        }
    }
}

/// Whether `a` to `b` is the jump between a seam crossing and its duplicate.
pub fn is_seam_jump(a: &Point, b: &Point) -> bool {
    ((b.x - a.x).abs() - SEAM_SPAN).abs() < 1.0e-9 && b.y == a.y
}

fn crosses(z: &[f64; 5], side: Side) -> bool {
    let (a, b) = (z[side.index()], z[side.index() + 1]);
    !a.is_nan() && !b.is_nan() && a * b < 0.0
}

fn exits_of(z: &[f64; 5], entry: Side) -> Exits {
    let mut exits = Exits {
        sides: [Side::South; 4],
        len: 0,
    };
    for side in Side::ALL {
        if side != entry && crosses(z, side) {
            exits.sides[exits.len] = side;
            exits.len += 1;
        }
    }
    exits
}

/// Pick the exit of a saddle cell entered through `entry`.
///
/// The crossing fractions of opposite sides are summed. A larger
/// South+North sum pairs South with East and North with West; otherwise,
/// ties included, South pairs with West and East with North.
fn saddle_partner(z: &[f64; 5], entry: Side) -> Side {
    let t = |side: Side| {
        let k = side.index();
        z[k] / (z[k] - z[k + 1])
    };
    let south_north = t(Side::South) + t(Side::North);
    let east_west = t(Side::East) + t(Side::West);
    if south_north > east_west {
        match entry {
            Side::South => Side::East,
            Side::East => Side::South,
            Side::North => Side::West,
            Side::West => Side::North,
        }
    } else {
        match entry {
            Side::South => Side::West,
            Side::West => Side::South,
            Side::East => Side::North,
            Side::North => Side::East,
        }
    }
}

/// Shift angular corner values into one ±180° window around the first.
fn unwrap_cyclic(z: &mut [f64; 5]) {
    if !z[1..].iter().any(|v| (v - z[0]).abs() > 180.0) {
        return;
    }
    let wrap = |v: f64| {
        let v = v % 360.0;
        if v > 180.0 {
            v - 360.0
        } else if v < -180.0 {
            v + 360.0
        } else {
            v
        }
    };
    z[0] = wrap(z[0]);
    for i in 1..z.len() {
        let mut v = wrap(z[i]);
        let dz = v - z[0];
        if dz > 180.0 {
            v -= 360.0;
        } else if dz < -180.0 {
            v += 360.0;
        }
        z[i] = v;
    }
}

/// How a traced fragment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentEnd {
    /// Returned to the seed edge; first and last points are identical.
    Closed,
    /// Left the grid through a non-periodic boundary.
    Border,
    /// Ran into missing data.
    NanWall,
}

/// Points visited by one walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub points: Vec<Point>,
    pub end: FragmentEnd,
}

impl Fragment {
    pub fn is_closed(&self) -> bool {
        self.end == FragmentEnd::Closed
    }
}

/// Walk from `start`, whose entry edge holds `seed`, until the contour
/// closes, leaves the grid, or hits a NaN wall.
///
/// The seed edge must already be marked by the caller; every edge used
/// afterwards is marked here.
pub fn trace(
    field: &LevelField<'_>,
    bitmap: &mut EdgeBitmap,
    start: Cursor,
    seed: Point,
) -> Result<Fragment> {
    let seed_edge = bitmap.edge(start.row, start.col, start.entry);
    let mut points = Vec::new();
    push_point(&mut points, seed)?;

    let mut cursor = start;
    let end = loop {
        let state = field.classify(cursor);
        let Some(exit) = state.exit() else {
            break FragmentEnd::NanWall;
        };
        let edge = bitmap.edge(cursor.row, cursor.col, exit);
        let crossing = field.crossing(cursor.row, cursor.col, exit);

        if edge == seed_edge {
            if let CellState::PeriodicWrap(_) = state {
                push_point(&mut points, crossing)?;
            }
            push_point(&mut points, seed)?;
            break FragmentEnd::Closed;
        }
        if bitmap.test_and_set_edge(edge) {
            tracing::debug!(
                row = cursor.row,
                col = cursor.col,
                "walked into a used edge"
            );
            break FragmentEnd::Border;
        }
        push_point(&mut points, crossing)?;

        match state {
            CellState::BorderExit(_) => break FragmentEnd::Border,
            CellState::PeriodicWrap(side) => {
                let shift = if side == Side::East {
                    -SEAM_SPAN
                } else {
                    SEAM_SPAN
                };
                push_point(&mut points, Point::new(crossing.x + shift, crossing.y))?;
            }
            _ => {}
        }
        match field.neighbor(cursor.row, cursor.col, exit) {
            Some(next) => cursor = next,
            None => break FragmentEnd::Border,
        }
    };

    Ok(Fragment { points, end })
}

/// Append with a fallible doubling reservation.
pub(crate) fn push_point(points: &mut Vec<Point>, p: Point) -> Result<()> {
    if points.len() == points.capacity() {
        points.try_reserve(points.len().max(16))?;
    }
    points.push(p);
    Ok(())
}
