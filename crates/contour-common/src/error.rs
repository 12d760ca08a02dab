//! Error types for contour extraction and labeling.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using ContourError.
pub type Result<T> = std::result::Result<T, ContourError>;

/// Errors that can occur while tracing or labeling contours.
#[derive(Debug, Error)]
pub enum ContourError {
    // === Fatal ===
    /// A path or bitmap buffer could not grow.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Label configuration that cannot be honoured (a programming defect).
    #[error("label policy misconfigured: {0}")]
    PolicyMisconfiguration(String),

    // === Recoverable ===
    /// Input too small or empty for the requested operation.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    // === Setup ===
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContourError {
    /// Create a DegenerateInput error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Create a PolicyMisconfiguration error.
    pub fn misconfigured(msg: impl Into<String>) -> Self {
        Self::PolicyMisconfiguration(msg.into())
    }

    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Whether the batch of extractions must stop on this error.
    ///
    /// Recoverable conditions are logged by the caller and the next
    /// contour or level is processed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ContourError::DegenerateInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(!ContourError::degenerate("3 points").is_fatal());
        assert!(ContourError::misconfigured("no text").is_fatal());
        assert!(ContourError::invalid_grid("nx = 1").is_fatal());
    }

    #[test]
    fn test_allocation_error_converts() {
        let err = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let err: ContourError = err.into();
        assert!(matches!(err, ContourError::Allocation(_)));
        assert!(err.to_string().starts_with("allocation failed"));
    }
}
