//! Error handling for the Star Rating engine.
//!
//! Failures fall into three groups. Units that cannot be evaluated
//! (`InsufficientData`) are excluded by the aggregating functions and surfaced
//! as counts. Caller contract violations (`InvalidInput`) always propagate.
//! Undefined ratios (ROI with no investment, payback with no revenue) are not
//! errors at all; they are reported as `None` on the result records.

use std::io;

/// Specialized error type for the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A member, measure or group does not carry enough data to be evaluated
    #[error("Insufficient data for {unit}: {reason}")]
    InsufficientData {
        /// The unit that was skipped (e.g. "member M001", "measure GSD")
        unit: String,
        /// Why it could not be evaluated
        reason: String,
    },

    /// Input violates the caller contract
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error reading a configuration or snapshot file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a configuration or snapshot file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Create an `InsufficientData` error
    pub fn insufficient(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Create an `InvalidInput` error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the error only excludes a single unit from an aggregate
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fail with `InvalidInput` unless `value` is a finite number in [0, 1]
pub fn ensure_unit_interval(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "{name} must be between 0 and 1, got {value}"
        )))
    }
}
