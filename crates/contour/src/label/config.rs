//! Label configuration.

use geodesy::{DistanceKind, DistanceUnit};
use serde::{Deserialize, Serialize};

use super::policy::{CountPolicy, CrossingPolicy, FixedPolicy, LabelPolicy, SpacingPolicy};

/// Which policy chooses label candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Placement {
    Spacing(SpacingPolicy),
    Count(CountPolicy),
    Crossing(CrossingPolicy),
    Fixed(FixedPolicy),
}

impl Placement {
    pub(crate) fn as_policy(&self) -> &dyn LabelPolicy {
        match self {
            Placement::Spacing(p) => p,
            Placement::Count(p) => p,
            Placement::Crossing(p) => p,
            Placement::Fixed(p) => p,
        }
    }
}

/// What a label says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelText {
    /// The contour's own text (its level)
    Contour,
    Constant { text: String },
    /// The segment header supplied with the path
    Header,
    /// Distance along the path in plot units times `scale`
    PlotDistance {
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    /// Distance along the path on the map, in the configured unit
    MapDistance,
    /// Index of the segment within its table
    SegmentIndex,
    /// "table/segment"
    TableSegment,
    /// The label attached to the matched fixed point
    FixedPoint,
    /// The label of the crossing line
    CrossingLine,
}

fn unit_scale() -> f64 {
    1.0
}

/// Orientation of the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AngleMode {
    AlongLine,
    Normal,
    Fixed { degrees: f64 },
}

/// Metric used to space labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    #[default]
    Plot,
    /// Distances on the map; needs `map_distance` and a plot transform
    Map,
}

/// How map distances are computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapDistance {
    pub kind: DistanceKind,
    pub unit: DistanceUnit,
}

/// Offset applied to the label anchor after placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    pub dx: f64,
    pub dy: f64,
    /// Rotate the offset with the label instead of using plot axes
    #[serde(default)]
    pub along_line: bool,
}

/// Configuration for the label engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub placement: Placement,

    pub text: LabelText,

    pub angle: AngleMode,

    /// Points on each side of a label used to fit its angle; derived from
    /// the path when unset.
    pub half_width: Option<usize>,

    /// Path stretches curving tighter than this radius do not count
    /// towards label spacing; 0 disables the gate.
    pub min_radius: f64,

    /// Minimum distance between any two labels.
    pub isolation: Option<f64>,

    /// Text before the label; a leading '-' joins it without a space.
    pub prefix: Option<String>,

    /// Text after the label; a leading '-' joins it without a space.
    pub unit: Option<String>,

    pub nudge: Option<Nudge>,

    pub measure: Measure,

    pub map_distance: Option<MapDistance>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            placement: Placement::Spacing(SpacingPolicy::default()),
            text: LabelText::Contour,
            angle: AngleMode::AlongLine,
            half_width: None,
            min_radius: 0.0,
            isolation: None,
            prefix: None,
            unit: None,
            nudge: None,
            measure: Measure::Plot,
            map_distance: None,
        }
    }
}

impl LabelConfig {
    /// Spacing placement with default settings otherwise.
    pub fn spacing(spacing: f64) -> Self {
        Self {
            placement: Placement::Spacing(SpacingPolicy {
                spacing,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONTOUR_LABEL_SPACING") {
            if let Ok(spacing) = val.parse() {
                config.placement = Placement::Spacing(SpacingPolicy {
                    spacing,
                    ..Default::default()
                });
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_LABEL_ISOLATION") {
            if let Ok(radius) = val.parse() {
                config.isolation = Some(radius);
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_LABEL_MIN_RADIUS") {
            if let Ok(radius) = val.parse() {
                config.min_radius = radius;
            }
        }

        config
    }

    /// Whether map distances must be computed.
    pub fn needs_map_distance(&self) -> bool {
        self.measure == Measure::Map || self.text == LabelText::MapDistance
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.text, &self.placement) {
            (LabelText::FixedPoint, Placement::Fixed(_)) => {}
            (LabelText::FixedPoint, _) => {
                return Err("fixed-point text needs fixed-point placement".to_string());
            }
            (LabelText::CrossingLine, Placement::Crossing(_)) => {}
            (LabelText::CrossingLine, _) => {
                return Err("crossing-line text needs crossing placement".to_string());
            }
            _ => {}
        }

        if self.needs_map_distance() && self.map_distance.is_none() {
            return Err("map distances requested without map_distance settings".to_string());
        }

        if let Placement::Spacing(p) = &self.placement {
            if !(0.0..=1.0).contains(&p.closed_fraction) {
                return Err("closed_fraction must be within 0-1".to_string());
            }
        }

        if !(self.min_radius >= 0.0) {
            return Err("min_radius must be >= 0".to_string());
        }

        if let Some(radius) = self.isolation {
            if !(radius > 0.0) {
                return Err("isolation radius must be > 0".to_string());
            }
        }

        if let AngleMode::Fixed { degrees } = self.angle {
            if !degrees.is_finite() {
                return Err("fixed label angle must be finite".to_string());
            }
        }

        Ok(())
    }
}
