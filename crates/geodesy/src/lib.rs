//! Coordinate conversion and distance collaborators.
//!
//! The contour engine never projects data itself. It consumes a
//! [`PlotTransform`] to move between geographic and plot coordinates and a
//! [`DistanceKind`] to measure along-path distance on the Earth.

pub mod distance;
pub mod transform;

pub use distance::{distance, wrap_degrees, DistanceKind, DistanceUnit, EARTH_RADIUS_M};
pub use transform::{Identity, LinearTransform, PlotTransform};
