//! Orienting contours relative to the field gradient.

use contour_common::Point;
use serde::{Deserialize, Serialize};

use crate::bitmap::Side;
use crate::walker::{is_seam_jump, LevelField};

/// Requested direction of travel along a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Keep the traced order
    #[default]
    None,
    /// Higher values to the right of the direction of travel
    HighRight,
    /// Higher values to the left of the direction of travel
    HighLeft,
}

impl Orientation {
    pub fn sign(&self) -> i8 {
        match self {
            Orientation::None => 0,
            Orientation::HighRight => 1,
            Orientation::HighLeft => -1,
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "0" => Some(Orientation::None),
            "high_right" | "right" | "+1" | "1" => Some(Orientation::HighRight),
            "high_left" | "left" | "-1" => Some(Orientation::HighLeft),
            _ => None,
        }
    }
}

/// Reverse `points` in place if they do not follow `orientation`.
///
/// The sense is read from the first cell the path enters: the two corners
/// of the entry side straddle the contour, so their difference says which
/// side of the travel direction is higher. Returns whether the path was
/// reversed.
pub fn orient(points: &mut [Point], field: &LevelField<'_>, orientation: Orientation) -> bool {
    let want = orientation.sign();
    if want == 0 {
        return false;
    }
    let Some((p0, p1)) = first_edge(points) else {
        tracing::debug!(points = points.len(), "no usable first edge to orient");
        return false;
    };

    let spec = field.spec();
    let (c0, r0) = (spec.x_to_col(p0.x), spec.y_to_row(p0.y));
    let (c1, r1) = (spec.x_to_col(p1.x), spec.y_to_row(p1.y));
    let col = (0.5 * (c0 + c1)).floor().clamp(0.0, (spec.nx - 2) as f64) as usize;
    let row = (0.5 * (r0 + r1)).floor().clamp(0.0, (spec.ny - 2) as f64) as usize;

    let side = if (c0 - c0.round()).abs() <= (r0 - r0.round()).abs() {
        if c0.round() <= col as f64 {
            Side::West
        } else {
            Side::East
        }
    } else if r0.round() <= row as f64 {
        Side::North
    } else {
        Side::South
    };

    let z = field.corners(row, col);
    let rise = match side {
        Side::South => z[1] - z[0],
        Side::East => z[2] - z[1],
        Side::North => z[3] - z[2],
        Side::West => z[0] - z[3],
    };
    let have = if rise > 0.0 {
        1
    } else if rise < 0.0 {
        -1
    } else {
        tracing::debug!(row, col, "flat entry side, orientation undecided");
        return false;
    };

    if have != want {
        points.reverse();
        true
    } else {
        false
    }
}

/// First segment with distinct ends that does not jump across the seam.
fn first_edge(points: &[Point]) -> Option<(Point, Point)> {
    points.windows(2).find_map(|w| {
        (w[0].distance(&w[1]) > 0.0 && !is_seam_jump(&w[0], &w[1])).then_some((w[0], w[1]))
    })
}
