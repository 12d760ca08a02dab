//! Contour paths and multi-level extraction.
//!
//! Each level is scanned by its own [`ContourScanner`], so levels run in
//! parallel. Labels are placed afterwards on one thread through a single
//! [`LabelEngine`], which keeps label isolation independent of the order
//! in which levels finish.

use std::sync::Arc;

use contour_common::{ContourError, Grid, Point, Result};
use geodesy::PlotTransform;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::closure::{classify_closure, Closure};
use crate::config::TraceConfig;
use crate::label::{Label, LabelConfig, LabelEngine, PathInfo};
use crate::label::text::format_value;
use crate::scanner::ContourScanner;
use crate::ticks::{enclosed_extremum, innermost, place_ticks, Extremum, Tick, TickConfig};

/// A traced contour (polyline).
#[derive(Debug, Clone, PartialEq)]
pub struct ContourPath {
    pub level: f64,
    pub points: Vec<Point>,
    /// First and last points are identical
    pub closed: bool,
}

impl ContourPath {
    pub fn new(level: f64, points: Vec<Point>) -> Self {
        let closed = points.len() > 2
            && points
                .first()
                .zip(points.last())
                .is_some_and(|(a, b)| a.bits_eq(b));
        Self {
            level,
            points,
            closed,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length along the path
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

/// Configuration for a set of contours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Contour levels to trace; generated from `interval` when empty
    pub levels: Vec<f64>,
    /// Level spacing used when no explicit levels are given
    pub interval: Option<f64>,
    /// Only levels that are multiples of this carry labels; all do when unset
    pub annotation_interval: Option<f64>,
    /// Line width in plot units
    pub line_width: f32,
    /// Line color [R, G, B, A]
    pub line_color: [u8; 4],
    /// Unit conversion offset for label display (e.g., -273.15 to show Celsius)
    pub label_unit_offset: f64,
    /// Special level styling overrides
    pub special_levels: Vec<SpecialLevelConfig>,
    pub trace: TraceConfig,
    /// Label placement; no labels when unset
    pub labels: Option<LabelConfig>,
    /// Ticks on innermost closed highs and lows; none when unset
    pub ticks: Option<TickConfig>,
}

/// Special styling for a specific contour level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialLevelConfig {
    /// The level value (in data units)
    pub level: f64,
    /// Custom line color for this level
    #[serde(default)]
    pub line_color: Option<[u8; 4]>,
    /// Custom line width for this level
    #[serde(default)]
    pub line_width: Option<f32>,
    /// Custom label text (overrides numeric value)
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![],
            interval: None,
            annotation_interval: None,
            line_width: 2.0,
            line_color: [0, 0, 0, 255],
            label_unit_offset: 0.0,
            special_levels: vec![],
            trace: TraceConfig::default(),
            labels: None,
            ticks: None,
        }
    }
}

impl ContourConfig {
    /// Load configuration from environment variables.
    ///
    /// Labels are enabled when `CONTOUR_LABEL_SPACING` is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.trace = TraceConfig::from_env();

        if let Ok(val) = std::env::var("CONTOUR_INTERVAL") {
            if let Ok(interval) = val.parse() {
                config.interval = Some(interval);
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_ANNOTATION_INTERVAL") {
            if let Ok(interval) = val.parse() {
                config.annotation_interval = Some(interval);
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_TICKS") {
            config.ticks = TickConfig::from_str(&val);
        }

        if std::env::var("CONTOUR_LABEL_SPACING").is_ok() {
            config.labels = Some(LabelConfig::from_env());
        }

        config
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(ContourError::Config)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(interval) = self.interval {
            if !(interval > 0.0) {
                return Err("interval must be > 0".to_string());
            }
        }

        if let Some(interval) = self.annotation_interval {
            if !(interval > 0.0) {
                return Err("annotation_interval must be > 0".to_string());
            }
        }

        if self.levels.iter().any(|l| !l.is_finite()) {
            return Err("levels must be finite".to_string());
        }

        if !(self.line_width > 0.0) {
            return Err("line_width must be > 0".to_string());
        }

        self.trace.validate()?;

        if let Some(labels) = &self.labels {
            labels.validate()?;
        }

        if let Some(ticks) = &self.ticks {
            ticks.validate()?;
        }

        Ok(())
    }

    fn special(&self, level: f64) -> impl Iterator<Item = &SpecialLevelConfig> {
        self.special_levels
            .iter()
            .filter(move |s| (s.level - level).abs() < 0.01)
    }

    /// Get the color for a specific level, checking special levels first
    pub fn get_level_color(&self, level: f64) -> [u8; 4] {
        self.special(level)
            .find_map(|s| s.line_color)
            .unwrap_or(self.line_color)
    }

    /// Get the line width for a specific level, checking special levels first
    pub fn get_level_width(&self, level: f64) -> f32 {
        self.special(level)
            .find_map(|s| s.line_width)
            .unwrap_or(self.line_width)
    }

    /// Get the label text for a level
    pub fn get_level_label(&self, level: f64) -> String {
        if let Some(label) = self.special(level).find_map(|s| s.label.clone()) {
            return label;
        }
        // Default: show numeric value with unit offset applied
        format_value(level + self.label_unit_offset, None)
    }

    /// Whether contours at `level` carry labels.
    pub fn is_annotated(&self, level: f64) -> bool {
        match self.annotation_interval {
            Some(step) => {
                let multiple = level / step;
                (multiple - multiple.round()).abs() < 1.0e-6
            }
            None => true,
        }
    }

    /// Levels to trace on `grid`, inside the configured range.
    pub fn levels_for(&self, grid: &Grid) -> Vec<f64> {
        let levels = if !self.levels.is_empty() {
            self.levels.clone()
        } else {
            match (self.interval, grid.value_range()) {
                (Some(interval), Some((min, max))) => {
                    generate_contour_levels(min as f64, max as f64, interval)
                }
                _ => Vec::new(),
            }
        };
        levels
            .into_iter()
            .filter(|&l| self.trace.accepts_level(l))
            .collect()
    }
}

/// Generate contour levels automatically based on data range and interval
pub fn generate_contour_levels(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0) || !(max_value > min_value) {
        return vec![];
    }

    // Start from first multiple of interval above min_value
    let first = (min_value / interval).ceil();
    let last = (max_value / interval).floor();
    if last < first {
        return vec![];
    }
    (0..=(last - first) as usize)
        .map(|i| (first + i as f64) * interval)
        .collect()
}

/// Line style resolved for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelStyle {
    pub line_color: [u8; 4],
    pub line_width: f32,
}

/// A finished contour: path, closure, style and labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourSegment {
    pub level: f64,
    pub points: Vec<Point>,
    pub closure: Closure,
    pub labels: Vec<Label>,
    pub style: LevelStyle,
    /// Level text as shown on labels
    pub text: String,
    /// Set on innermost closed contours selected for ticking
    pub extremum: Option<Extremum>,
    pub ticks: Vec<Tick>,
}

/// Trace every contour of one level without labels.
///
/// Closed contours with fewer than `min_points` points are dropped.
/// Recoverable failures on a single contour are logged and skipped.
pub fn trace_level(grid: &Grid, level: f64, config: &ContourConfig) -> Result<Vec<ContourSegment>> {
    let style = LevelStyle {
        line_color: config.get_level_color(level),
        line_width: config.get_level_width(level),
    };
    let text = config.get_level_label(level);

    let mut segments = Vec::new();
    let mut dropped = 0usize;
    for result in ContourScanner::new(grid, level, &config.trace)? {
        let mut path = match result {
            Ok(path) => path,
            Err(e) if !e.is_fatal() => {
                tracing::debug!(level, error = %e, "skipping contour");
                continue;
            }
            Err(e) => return Err(e),
        };
        let closure = classify_closure(&mut path.points, &grid.spec);
        if closure.is_closed() && path.len() < config.trace.min_points {
            dropped += 1;
            continue;
        }
        segments.push(ContourSegment {
            level,
            points: path.points,
            closure,
            labels: Vec::new(),
            style,
            text: text.clone(),
            extremum: None,
            ticks: Vec::new(),
        });
    }

    tracing::debug!(
        level,
        num_contours = segments.len(),
        dropped_small = dropped,
        "Traced level"
    );
    Ok(segments)
}

/// Place labels on segments in order, with `table` as their table number.
fn label_segments(
    segments: &mut [ContourSegment],
    engine: &mut LabelEngine,
    table: usize,
) -> Result<()> {
    for (index, segment) in segments.iter_mut().enumerate() {
        let info = PathInfo {
            text: &segment.text,
            header: None,
            closed: segment.closure.is_closed(),
            segment: index,
            table,
        };
        segment.labels = engine.place(&mut segment.points, &info)?;
    }
    Ok(())
}

/// Mark innermost closed contours, across all levels, with the extremum
/// they enclose when `config` asks for it.
fn mark_extrema(tables: &mut [Vec<ContourSegment>], grid: &Grid, config: &TickConfig) {
    let closed: Vec<(usize, usize)> = tables
        .iter()
        .enumerate()
        .flat_map(|(t, segments)| {
            segments
                .iter()
                .enumerate()
                .filter(|(_, s)| s.closure == Closure::Closed)
                .map(move |(i, _)| (t, i))
        })
        .collect();
    let rings: Vec<&[Point]> = closed
        .iter()
        .map(|&(t, i)| tables[t][i].points.as_slice())
        .collect();
    let flags = innermost(&rings);

    let found: Vec<(usize, usize, Extremum)> = closed
        .iter()
        .zip(&flags)
        .filter(|(_, inner)| **inner)
        .filter_map(|(&(t, i), _)| {
            let segment = &tables[t][i];
            let kind = enclosed_extremum(&segment.points, segment.level, grid)?;
            config.wants(kind).then_some((t, i, kind))
        })
        .collect();

    tracing::debug!(
        closed = closed.len(),
        ticked = found.len(),
        "Marked innermost contours"
    );
    for (t, i, kind) in found {
        tables[t][i].extremum = Some(kind);
    }
}

/// Tick the marked segments; points must already be in plot coordinates.
fn tick_segments(segments: &mut [ContourSegment], config: &TickConfig) {
    for segment in segments {
        if let Some(kind) = segment.extremum {
            segment.ticks = place_ticks(&segment.points, kind, config);
        }
    }
}

/// Trace one level, tick it and label it with `engine` when given.
pub fn extract_level(
    grid: &Grid,
    level: f64,
    config: &ContourConfig,
    engine: Option<&mut LabelEngine>,
) -> Result<Vec<ContourSegment>> {
    let mut tables = vec![trace_level(grid, level, config)?];
    if let Some(ticks) = &config.ticks {
        mark_extrema(&mut tables, grid, ticks);
        tick_segments(&mut tables[0], ticks);
    }
    let mut segments = tables.remove(0);
    if let Some(engine) = engine {
        if config.is_annotated(level) {
            label_segments(&mut segments, engine, 0)?;
        }
    }
    Ok(segments)
}

/// Trace all configured levels in parallel, then label them in level order.
///
/// With a transform, paths are returned in plot coordinates and label
/// placement happens there; map distances convert back through it.
pub fn extract_levels(
    grid: &Grid,
    config: &ContourConfig,
    transform: Option<Arc<dyn PlotTransform>>,
) -> Result<Vec<ContourSegment>> {
    config.validate().map_err(ContourError::Config)?;
    let levels = config.levels_for(grid);

    let mut traced: Vec<Vec<ContourSegment>> = levels
        .par_iter()
        .map(|&level| trace_level(grid, level, config))
        .collect::<Result<_>>()?;
    if let Some(ticks) = &config.ticks {
        mark_extrema(&mut traced, grid, ticks);
    }

    let mut engine = match &config.labels {
        Some(labels) => {
            let engine = LabelEngine::new(labels.clone())?;
            Some(match &transform {
                Some(t) => engine.with_transform(Arc::clone(t)),
                None => engine,
            })
        }
        None => None,
    };

    let mut all = Vec::new();
    for (table, mut segments) in traced.into_iter().enumerate() {
        if let Some(t) = &transform {
            for segment in &mut segments {
                segment.points = t.path_to_plot(&segment.points);
            }
        }
        if let Some(ticks) = &config.ticks {
            tick_segments(&mut segments, ticks);
        }
        if let Some(engine) = engine.as_mut() {
            if config.is_annotated(levels[table]) {
                label_segments(&mut segments, engine, table)?;
            }
        }
        all.try_reserve(segments.len())?;
        all.extend(segments);
    }

    tracing::debug!(
        num_levels = levels.len(),
        num_contours = all.len(),
        total_points = all.iter().map(|c| c.points.len()).sum::<usize>(),
        total_labels = all.iter().map(|c| c.labels.len()).sum::<usize>(),
        total_ticks = all.iter().map(|c| c.ticks.len()).sum::<usize>(),
        "Generated contours"
    );
    Ok(all)
}
