//! Grid specifications and read-only sample access.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, ContourError, Result};

/// Node registration of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Registration {
    /// Nodes sit on the region boundary.
    #[default]
    Gridline,
    /// Nodes sit at cell centres, half an increment inside the boundary.
    Pixel,
}

/// Boundary behaviour of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridTopology {
    /// x is longitude and the last column repeats the first (360° wrap)
    #[serde(default)]
    pub periodic_x: bool,
    /// First/last rows sit on the poles
    #[serde(default)]
    pub polar: bool,
    /// Sample values are angles in degrees (0 and 360 are the same value)
    #[serde(default)]
    pub cyclic_values: bool,
    /// x/y are longitude/latitude
    #[serde(default)]
    pub geographic: bool,
}

/// Specification of a regular grid.
///
/// Row 0 is the northernmost row; x grows with column and y shrinks
/// with row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns
    pub nx: usize,
    /// Number of rows
    pub ny: usize,
    /// Column increment
    pub dx: f64,
    /// Row increment (positive)
    pub dy: f64,
    /// West boundary
    pub west: f64,
    /// North boundary
    pub north: f64,
    #[serde(default)]
    pub registration: Registration,
    #[serde(default)]
    pub topology: GridTopology,
}

impl GridSpec {
    /// Create a gridline-registered specification.
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64, west: f64, north: f64) -> Self {
        Self {
            nx,
            ny,
            dx,
            dy,
            west,
            north,
            registration: Registration::Gridline,
            topology: GridTopology::default(),
        }
    }

    /// Unit-spaced grid whose x equals the column and whose south row is y = 0.
    pub fn unit(nx: usize, ny: usize) -> Self {
        Self::new(nx, ny, 1.0, 1.0, 0.0, ny.saturating_sub(1) as f64)
    }

    /// Global geographic grid spanning 0..360 with a repeated seam column.
    pub fn global(nx: usize, ny: usize) -> Self {
        let dx = 360.0 / (nx.saturating_sub(1).max(1)) as f64;
        let dy = 180.0 / (ny.saturating_sub(1).max(1)) as f64;
        let mut spec = Self::new(nx, ny, dx, dy, 0.0, 90.0);
        spec.topology = GridTopology {
            periodic_x: true,
            polar: true,
            cyclic_values: false,
            geographic: true,
        };
        spec
    }

    /// Builder-style topology override.
    pub fn with_topology(mut self, topology: GridTopology) -> Self {
        self.topology = topology;
        self
    }

    fn half_offsets(&self) -> (f64, f64) {
        match self.registration {
            Registration::Gridline => (0.0, 0.0),
            Registration::Pixel => (0.5 * self.dx, 0.5 * self.dy),
        }
    }

    /// x coordinate of a (fractional) column.
    pub fn col_to_x(&self, col: f64) -> f64 {
        let (xoff, _) = self.half_offsets();
        self.west + col * self.dx + xoff
    }

    /// y coordinate of a (fractional) row.
    pub fn row_to_y(&self, row: f64) -> f64 {
        let (_, yoff) = self.half_offsets();
        self.north - row * self.dy - yoff
    }

    /// Fractional column of an x coordinate.
    pub fn x_to_col(&self, x: f64) -> f64 {
        let (xoff, _) = self.half_offsets();
        (x - self.west - xoff) / self.dx
    }

    /// Fractional row of a y coordinate.
    pub fn y_to_row(&self, y: f64) -> f64 {
        let (_, yoff) = self.half_offsets();
        (self.north - yoff - y) / self.dy
    }

    /// x of the first node column.
    pub fn x_min(&self) -> f64 {
        self.col_to_x(0.0)
    }

    /// x of the last node column.
    pub fn x_max(&self) -> f64 {
        self.col_to_x(self.nx.saturating_sub(1) as f64)
    }

    /// Bounding box of the node locations.
    pub fn bbox(&self) -> BoundingBox {
        let y_min = self.row_to_y(self.ny.saturating_sub(1) as f64);
        BoundingBox::new(self.x_min(), y_min, self.x_max(), self.row_to_y(0.0))
    }

    /// Whether columns wrap around 360° of longitude.
    pub fn is_periodic(&self) -> bool {
        self.topology.periodic_x
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// Check the specification can be contoured.
    pub fn validate(&self) -> Result<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(ContourError::invalid_grid(format!(
                "need at least 2x2 nodes, got {}x{}",
                self.nx, self.ny
            )));
        }
        if !(self.dx > 0.0) || !(self.dy > 0.0) {
            return Err(ContourError::invalid_grid("increments must be > 0"));
        }
        if self.topology.periodic_x {
            if self.registration != Registration::Gridline {
                return Err(ContourError::invalid_grid(
                    "periodic grids must be gridline registered with a repeated seam column",
                ));
            }
            let span = (self.nx - 1) as f64 * self.dx;
            if (span - 360.0).abs() > 1.0e-6 * self.dx {
                return Err(ContourError::invalid_grid(format!(
                    "periodic grid spans {span} degrees, expected 360"
                )));
            }
        }
        Ok(())
    }
}

/// A read-only grid of samples with optional padding around the nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub spec: GridSpec,
    /// Padding rows/columns stored on each side of the nodes
    #[serde(default)]
    pub pad: usize,
    /// Row-major samples including padding; NaN marks missing data
    pub data: Vec<f32>,
}

impl Grid {
    /// Create an unpadded grid.
    pub fn new(spec: GridSpec, data: Vec<f32>) -> Result<Self> {
        Self::with_padding(spec, data, 0)
    }

    /// Create a grid whose data carries `pad` extra rows/columns on each side.
    pub fn with_padding(spec: GridSpec, data: Vec<f32>, pad: usize) -> Result<Self> {
        spec.validate()?;
        let expected = (spec.nx + 2 * pad) * (spec.ny + 2 * pad);
        if data.len() != expected {
            return Err(ContourError::invalid_grid(format!(
                "expected {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self { spec, pad, data })
    }

    /// Unit-spaced grid from row-major data (row 0 is the top row).
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let ny = rows.len();
        let nx = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != nx) {
            return Err(ContourError::invalid_grid("ragged rows"));
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(GridSpec::unit(nx, ny), data)
    }

    pub fn nx(&self) -> usize {
        self.spec.nx
    }

    pub fn ny(&self) -> usize {
        self.spec.ny
    }

    /// Sample at a node, skipping the padding.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        let stride = self.spec.nx + 2 * self.pad;
        self.data[(row + self.pad) * stride + col + self.pad]
    }

    /// Sample at a node if it lies inside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.spec.ny && col < self.spec.nx {
            Some(self.value(row, col))
        } else {
            None
        }
    }

    /// Min and max of the non-NaN samples.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for row in 0..self.spec.ny {
            for col in 0..self.spec.nx {
                let v = self.value(row, col);
                if v.is_nan() {
                    continue;
                }
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_grid_mapping() {
        let spec = GridSpec::unit(4, 3);
        assert_eq!(spec.col_to_x(2.0), 2.0);
        assert_eq!(spec.row_to_y(0.0), 2.0);
        assert_eq!(spec.row_to_y(2.0), 0.0);
        assert_eq!(spec.x_to_col(1.5), 1.5);
        assert_eq!(spec.y_to_row(0.5), 1.5);
    }

    #[test]
    fn test_pixel_registration_offsets() {
        let mut spec = GridSpec::new(10, 5, 2.0, 2.0, 0.0, 10.0);
        spec.registration = Registration::Pixel;
        assert_eq!(spec.col_to_x(0.0), 1.0);
        assert_eq!(spec.row_to_y(0.0), 9.0);
        assert_eq!(spec.x_to_col(1.0), 0.0);
    }

    #[test]
    fn test_global_grid_is_periodic() {
        let spec = GridSpec::global(73, 37);
        assert!(spec.validate().is_ok());
        assert!(spec.is_periodic());
        assert_eq!(spec.x_max(), 360.0);
        assert_eq!(spec.row_to_y(36.0), -90.0);
    }

    #[test]
    fn test_validate_rejects_bad_specs() {
        assert!(GridSpec::unit(1, 5).validate().is_err());
        let mut spec = GridSpec::unit(5, 5);
        spec.dx = 0.0;
        assert!(spec.validate().is_err());

        let periodic = GridSpec::unit(5, 5).with_topology(GridTopology {
            periodic_x: true,
            ..Default::default()
        });
        assert!(periodic.validate().is_err());
    }

    #[test]
    fn test_padded_access() {
        // 2x2 nodes with one padding cell all around
        let data = vec![
            9.0, 9.0, 9.0, 9.0, //
            9.0, 1.0, 2.0, 9.0, //
            9.0, 3.0, 4.0, 9.0, //
            9.0, 9.0, 9.0, 9.0,
        ];
        let grid = Grid::with_padding(GridSpec::unit(2, 2), data, 1).unwrap();
        assert_eq!(grid.value(0, 0), 1.0);
        assert_eq!(grid.value(1, 1), 4.0);
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_value_range_skips_nan() {
        let grid =
            Grid::from_rows(&[vec![1.0, f32::NAN], vec![-3.0, 7.0]]).unwrap();
        assert_eq!(grid.value_range(), Some((-3.0, 7.0)));
    }

    #[test]
    fn test_data_length_mismatch() {
        assert!(Grid::new(GridSpec::unit(3, 3), vec![0.0; 8]).is_err());
    }
}
