//! Common types shared by the contour engine crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod point;

pub use bbox::BoundingBox;
pub use error::{ContourError, Result};
pub use grid::{Grid, GridSpec, GridTopology, Registration};
pub use point::Point;
