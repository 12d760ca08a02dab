//! Label placement along contour paths.
//!
//! One [`LabelEngine`] serves a whole set of contours: labels accepted on
//! earlier paths count for the isolation check on later ones. Each path
//! goes through the same stages:
//!
//! 1. cumulative distances ([`arclength`]), with tight curls gated out
//! 2. candidates from the configured policy ([`policy`])
//! 3. acceptance (isolation, text, angle, nudge)
//! 4. insertion of accepted label positions into the path as vertices

pub mod angle;
pub mod arclength;
pub mod config;
mod engine;
pub mod policy;
pub mod text;

use contour_common::Point;
use serde::Serialize;

pub use arclength::ArcLengths;
pub use config::{AngleMode, LabelConfig, LabelText, MapDistance, Measure, Nudge, Placement};
pub use engine::{place_labels, LabelEngine};
pub use policy::{CountPolicy, CrossingLine, CrossingPolicy, FixedPoint, FixedPolicy, SpacingPolicy};

/// A label accepted on a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub position: Point,
    /// Placement distance from the path start
    pub distance: f64,
    /// Direction of the path at the label, degrees
    pub line_angle: f64,
    /// Direction the text is drawn at, degrees
    pub angle: f64,
    /// Index of the label's vertex in the path
    pub node: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nudge: Option<Point>,
}

impl Label {
    /// Where the text is anchored once the nudge is applied.
    pub fn anchor(&self) -> Point {
        match self.nudge {
            Some(n) => Point::new(self.position.x + n.x, self.position.y + n.y),
            None => self.position,
        }
    }
}

/// Caller-supplied facts about the path being labeled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathInfo<'a> {
    /// The contour's own text, usually its formatted level
    pub text: &'a str,
    pub header: Option<&'a str>,
    pub closed: bool,
    /// Segment number within its table
    pub segment: usize,
    pub table: usize,
}
