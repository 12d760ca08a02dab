//! Configuration for tracing contours.

use serde::{Deserialize, Serialize};

use crate::interp::Method;
use crate::orient::Orientation;
use crate::smooth::SmoothingConfig;

/// How each level is traced and post-processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Resampling of traced paths.
    pub smoothing: SmoothingConfig,

    /// Direction of travel for closed contours.
    pub orientation: Orientation,

    /// Closed contours with fewer points are dropped.
    pub min_points: usize,

    /// Skip levels below this value.
    pub low: Option<f64>,

    /// Skip levels above this value.
    pub high: Option<f64>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            orientation: Orientation::None,
            min_points: 0,
            low: None,
            high: None,
        }
    }
}

impl TraceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONTOUR_SMOOTH_FACTOR") {
            if let Ok(factor) = val.parse() {
                config.smoothing.factor = factor;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_SMOOTH_KIND") {
            config.smoothing.method = match val.to_lowercase().as_str() {
                "none" => None,
                other => Method::from_str(other).or(config.smoothing.method),
            };
        }

        if let Ok(val) = std::env::var("CONTOUR_ORIENTATION") {
            if let Some(orientation) = Orientation::from_str(&val) {
                config.orientation = orientation;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_MIN_POINTS") {
            if let Ok(n) = val.parse() {
                config.min_points = n;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(low), Some(high)) = (self.low, self.high) {
            if low > high {
                return Err(format!("level range is empty: low {low} > high {high}"));
            }
        }

        if self.smoothing.factor > 100 {
            return Err("smoothing factor must be <= 100".to_string());
        }

        Ok(())
    }

    /// Whether `level` lies in the configured range.
    pub fn accepts_level(&self, level: f64) -> bool {
        self.low.map_or(true, |low| level >= low) && self.high.map_or(true, |high| level <= high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TraceConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.smoothing.is_enabled());
        assert!(config.accepts_level(-1e9));
    }

    #[test]
    fn test_level_range() {
        let config = TraceConfig {
            low: Some(0.0),
            high: Some(10.0),
            ..Default::default()
        };
        assert!(config.accepts_level(0.0));
        assert!(config.accepts_level(10.0));
        assert!(!config.accepts_level(10.5));

        let empty = TraceConfig {
            low: Some(5.0),
            high: Some(1.0),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TraceConfig =
            serde_json::from_str(r#"{"orientation": "high_left", "min_points": 8}"#).unwrap();
        assert_eq!(config.orientation, Orientation::HighLeft);
        assert_eq!(config.min_points, 8);
        assert_eq!(config.smoothing, SmoothingConfig::default());
    }
}
