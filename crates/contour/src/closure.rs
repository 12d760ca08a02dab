//! Classifying how a traced contour closes.

use contour_common::{GridSpec, Point};
use serde::{Deserialize, Serialize};

/// Closure of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Closure {
    Open,
    /// Interior loop; first and last points are identical
    Closed,
    /// Starts and ends on the west boundary of a global grid
    PeriodicLeft,
    /// Starts and ends on the east boundary of a global grid
    PeriodicRight,
    /// Spans all longitudes around a pole; not forced closed
    PolarCap { north: bool },
}

impl Closure {
    /// Whether the contour encloses an area.
    pub fn is_closed(&self) -> bool {
        !matches!(self, Closure::Open)
    }
}

fn spans_360(a: f64, b: f64) -> bool {
    ((a - b).abs() - 360.0).abs() < 1.0e-8
}

/// Classify the closure of `points`, snapping near-closed ends together.
///
/// Ends within 1% of a grid increment are treated as touching.
pub fn classify_closure(points: &mut [Point], spec: &GridSpec) -> Closure {
    let n = points.len();
    if n < 2 {
        return Closure::Open;
    }
    let small_x = 0.01 * spec.dx;
    let small_y = 0.01 * spec.dy;
    let (first, last) = (points[0], points[n - 1]);

    if (first.x - last.x).abs() < small_x && (first.y - last.y).abs() < small_y {
        points[n - 1] = first;
        // A loop that crosses the seam an odd number of times circles a pole.
        let seam_jumps = points
            .windows(2)
            .filter(|w| spans_360(w[0].x, w[1].x))
            .count();
        if seam_jumps % 2 == 1 {
            return Closure::PolarCap {
                north: first.y > 0.0,
            };
        }
        return Closure::Closed;
    }
    let (west, east) = (spec.x_min(), spec.x_max());
    if !spec.topology.geographic || !spans_360(west, east) {
        return Closure::Open;
    }
    if (first.x - west).abs() < small_x && (last.x - west).abs() < small_x {
        points[0].x = west;
        points[n - 1].x = west;
        Closure::PeriodicLeft
    } else if (first.x - east).abs() < small_x && (last.x - east).abs() < small_x {
        points[0].x = east;
        points[n - 1].x = east;
        Closure::PeriodicRight
    } else if spans_360(first.x, last.x) {
        Closure::PolarCap {
            north: first.y > 0.0,
        }
    } else {
        Closure::Open
    }
}
