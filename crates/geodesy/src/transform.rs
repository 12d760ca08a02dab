//! Conversions between data (geographic or grid) and plot coordinates.

use contour_common::{BoundingBox, Point};

/// Two-way mapping between data coordinates and plot coordinates.
///
/// Implementations must be cheap to call per vertex and shareable across
/// the threads that extract different levels.
pub trait PlotTransform: Send + Sync {
    /// Data coordinates (x/lon, y/lat) to plot coordinates.
    fn to_plot(&self, data: Point) -> Point;

    /// Plot coordinates back to data coordinates.
    fn to_data(&self, plot: Point) -> Point;

    /// Convert a whole path to plot coordinates.
    fn path_to_plot(&self, path: &[Point]) -> Vec<Point> {
        path.iter().map(|p| self.to_plot(*p)).collect()
    }
}

/// Plot coordinates equal data coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl PlotTransform for Identity {
    fn to_plot(&self, data: Point) -> Point {
        data
    }

    fn to_data(&self, plot: Point) -> Point {
        plot
    }
}

/// Axis-aligned scale and offset (a linear Cartesian or plate carrée map).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl LinearTransform {
    pub fn new(scale_x: f64, scale_y: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        }
    }

    /// Map `region` onto a plot of `width` x `height` units with y up.
    pub fn fit(region: &BoundingBox, width: f64, height: f64) -> Self {
        let scale_x = width / region.width();
        let scale_y = height / region.height();
        Self::new(
            scale_x,
            scale_y,
            -region.min_x * scale_x,
            -region.min_y * scale_y,
        )
    }
}

impl PlotTransform for LinearTransform {
    fn to_plot(&self, data: Point) -> Point {
        Point::new(
            data.x * self.scale_x + self.offset_x,
            data.y * self.scale_y + self.offset_y,
        )
    }

    fn to_data(&self, plot: Point) -> Point {
        Point::new(
            (plot.x - self.offset_x) / self.scale_x,
            (plot.y - self.offset_y) / self.scale_y,
        )
    }
}
