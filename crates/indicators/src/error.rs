//! Indicator error types.

use thiserror::Error;

/// Errors that can occur during indicator computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    /// Insufficient data for computation
    #[error("insufficient data: need {required} points, got {actual}")]
    InsufficientData {
        /// Required number of points.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// Series columns disagree in length
    #[error("series length mismatch: {0}")]
    LengthMismatch(String),
}
