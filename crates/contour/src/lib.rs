//! Contour extraction and labeling for regular 2-D grids.
//!
//! A level is scanned cell by cell: [`ContourScanner`] seeds on unused
//! edges (borders first), the walker follows the contour through cells
//! while an [`EdgeBitmap`] marks each crossed edge, and open halves are
//! spliced at their seed. Paths can then be smoothed, oriented, classified
//! for closure, labeled by a [`LabelEngine`] and, when innermost around a
//! high or low, ticked.
//!
//! ```
//! use contour::{ContourScanner, TraceConfig};
//! use contour_common::Grid;
//!
//! let grid = Grid::from_rows(&[
//!     vec![-1.0, -1.0, -1.0],
//!     vec![-1.0, 1.0, -1.0],
//!     vec![-1.0, -1.0, -1.0],
//! ])
//! .unwrap();
//! let mut scanner = ContourScanner::new(&grid, 0.0, &TraceConfig::default()).unwrap();
//! let path = scanner.next_contour().unwrap().unwrap();
//! assert!(path.closed);
//! assert_eq!(path.points.len(), 5);
//! ```

pub mod bitmap;
pub mod closure;
pub mod config;
pub mod contour;
pub mod crossover;
pub mod interp;
pub mod label;
pub mod orient;
pub mod scanner;
pub mod smooth;
pub mod splice;
pub mod ticks;
pub mod walker;

pub use bitmap::{EdgeBitmap, Side};
pub use closure::{classify_closure, Closure};
pub use config::TraceConfig;
pub use contour::{
    extract_level, extract_levels, generate_contour_levels, trace_level, ContourConfig,
    ContourPath, ContourSegment, LevelStyle, SpecialLevelConfig,
};
pub use crossover::{find_crossings, Crossing};
pub use interp::Method;
pub use label::{place_labels, Label, LabelConfig, LabelEngine, PathInfo};
pub use orient::{orient, Orientation};
pub use scanner::{ContourScanner, ScanPhase, ScanStep};
pub use smooth::{smooth_path, SmoothingConfig};
pub use splice::splice;
pub use ticks::{Extremum, Tick, TickConfig};
pub use walker::{trace, Cursor, Fragment, LevelField};

pub use contour_common::{ContourError, Grid, GridSpec, Point, Result};
