//! Resumable scan of one level: returns one unused contour per call.
//!
//! The scan seeds contours on the south, east, north and west borders
//! first (so open contours are traced from one end) and then on interior
//! vertical and horizontal edges. Each scanner owns its edge bitmap and
//! cursor, so levels can be scanned on separate threads.

use contour_common::{Grid, Result};

use crate::bitmap::{EdgeBitmap, Side};
use crate::config::TraceConfig;
use crate::contour::ContourPath;
use crate::orient::{orient, Orientation};
use crate::smooth::{smooth_path, SmoothingConfig};
use crate::splice::splice;
use crate::walker::{trace, Cursor, LevelField};

/// Where the scanner looks for seed edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    SouthBorder,
    EastBorder,
    NorthBorder,
    WestBorder,
    InteriorVertical,
    InteriorHorizontal,
}

impl ScanPhase {
    /// Phase after this one; periodic grids have no east/west border.
    fn next(self, periodic: bool) -> Option<ScanPhase> {
        match self {
            ScanPhase::SouthBorder if periodic => Some(ScanPhase::NorthBorder),
            ScanPhase::SouthBorder => Some(ScanPhase::EastBorder),
            ScanPhase::EastBorder => Some(ScanPhase::NorthBorder),
            ScanPhase::NorthBorder if periodic => Some(ScanPhase::InteriorVertical),
            ScanPhase::NorthBorder => Some(ScanPhase::WestBorder),
            ScanPhase::WestBorder => Some(ScanPhase::InteriorVertical),
            ScanPhase::InteriorVertical => Some(ScanPhase::InteriorHorizontal),
            ScanPhase::InteriorHorizontal => None,
        }
    }

    pub fn is_border(&self) -> bool {
        !matches!(self, ScanPhase::InteriorVertical | ScanPhase::InteriorHorizontal)
    }
}

/// Result of one scanner step.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStep {
    Contour(ContourPath),
    /// No more seeds in this phase; the next call starts the following one.
    PhaseDone(ScanPhase),
    Exhausted,
}

/// Scan state for one level.
pub struct ContourScanner<'g> {
    field: LevelField<'g>,
    bitmap: EdgeBitmap,
    phase: Option<ScanPhase>,
    position: usize,
    smoothing: SmoothingConfig,
    orientation: Orientation,
    emitted: usize,
}

impl<'g> ContourScanner<'g> {
    pub fn new(grid: &'g Grid, level: f64, config: &TraceConfig) -> Result<Self> {
        grid.spec.validate()?;
        let field = LevelField::new(grid, level)?;
        let bitmap = EdgeBitmap::new(grid.nx(), grid.ny(), grid.spec.is_periodic())?;
        Ok(Self {
            field,
            bitmap,
            phase: Some(ScanPhase::SouthBorder),
            position: 0,
            smoothing: config.smoothing,
            orientation: config.orientation,
            emitted: 0,
        })
    }

    /// Start a new scan of the same grid at another level.
    pub fn restart(&mut self, level: f64) -> Result<()> {
        self.field = LevelField::new(self.field.grid(), level)?;
        self.bitmap.clear();
        self.phase = Some(ScanPhase::SouthBorder);
        self.position = 0;
        self.emitted = 0;
        Ok(())
    }

    pub fn level(&self) -> f64 {
        self.field.level()
    }

    /// Current phase, None once the scan is exhausted.
    pub fn phase(&self) -> Option<ScanPhase> {
        self.phase
    }

    pub fn field(&self) -> &LevelField<'g> {
        &self.field
    }

    /// Advance to the next contour or phase boundary.
    pub fn next_step(&mut self) -> Result<ScanStep> {
        let Some(phase) = self.phase else {
            return Ok(ScanStep::Exhausted);
        };
        while let Some(start) = self.seed(phase, self.position) {
            self.position += 1;
            if !self.field.starts_trace(&self.bitmap, start) {
                continue;
            }
            let path = self.build(start)?;
            if path.points.len() < 2 {
                tracing::debug!(
                    level = self.level(),
                    row = start.row,
                    col = start.col,
                    "dropping single-point contour"
                );
                continue;
            }
            self.emitted += 1;
            return Ok(ScanStep::Contour(path));
        }

        self.phase = phase.next(self.field.spec().is_periodic());
        self.position = 0;
        if self.phase.is_none() {
            tracing::debug!(
                level = self.level(),
                contours = self.emitted,
                used_edges = self.bitmap.count_set(),
                "scan exhausted"
            );
        }
        Ok(ScanStep::PhaseDone(phase))
    }

    /// Next contour of this level, or None once every edge has been scanned.
    pub fn next_contour(&mut self) -> Result<Option<ContourPath>> {
        loop {
            match self.next_step()? {
                ScanStep::Contour(path) => return Ok(Some(path)),
                ScanStep::PhaseDone(_) => continue,
                ScanStep::Exhausted => return Ok(None),
            }
        }
    }

    /// Seed cell and entry side for `position` within `phase`.
    fn seed(&self, phase: ScanPhase, position: usize) -> Option<Cursor> {
        let spec = self.field.spec();
        let (nx, ny) = (spec.nx, spec.ny);
        let cursor = match phase {
            ScanPhase::SouthBorder if position < nx - 1 => Cursor::new(ny - 2, position, Side::South),
            ScanPhase::EastBorder if position < ny - 1 => {
                Cursor::new(ny - 2 - position, nx - 2, Side::East)
            }
            ScanPhase::NorthBorder if position < nx - 1 => {
                Cursor::new(0, nx - 2 - position, Side::North)
            }
            ScanPhase::WestBorder if position < ny - 1 => Cursor::new(position, 0, Side::West),
            ScanPhase::InteriorVertical => {
                // Periodic grids also seed on the seam; the repeated last
                // column is the same edge.
                let (first, count) = if spec.is_periodic() {
                    (0, nx - 1)
                } else {
                    (1, nx - 2)
                };
                if count == 0 || position >= (ny - 1) * count {
                    return None;
                }
                Cursor::new(position / count, first + position % count, Side::West)
            }
            ScanPhase::InteriorHorizontal => {
                if position >= (ny - 2) * (nx - 1) {
                    return None;
                }
                Cursor::new(1 + position / (nx - 1), position % (nx - 1), Side::North)
            }
            _ => return None,
        };
        Some(cursor)
    }

    /// Trace from a seed edge, splicing the other half when the first
    /// walk stops short, then smooth and orient.
    fn build(&mut self, start: Cursor) -> Result<ContourPath> {
        self.bitmap.test_and_set(start.row, start.col, start.entry);
        let seed = self.field.crossing(start.row, start.col, start.entry);
        let forward = trace(&self.field, &mut self.bitmap, start, seed)?;

        let points = match self.field.neighbor(start.row, start.col, start.entry) {
            Some(back) if !forward.is_closed() => {
                let backward = trace(&self.field, &mut self.bitmap, back, seed)?;
                tracing::debug!(
                    forward = forward.points.len(),
                    backward = backward.points.len(),
                    "splicing fragments"
                );
                splice(&forward.points, &backward.points)?
            }
            _ => forward.points,
        };

        let mut path = ContourPath::new(self.level(), smooth_path(&points, &self.smoothing)?);
        if path.closed {
            orient(&mut path.points, &self.field, self.orientation);
        }
        Ok(path)
    }
}

impl Iterator for ContourScanner<'_> {
    type Item = Result<ContourPath>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_contour().transpose()
    }
}
