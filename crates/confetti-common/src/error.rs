//! Error types for the confetti engine.

use thiserror::Error;

/// Top-level error type for confetti configuration.
///
/// Errors are only produced while configuring a particle system. The
/// per-frame path never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfettiError {
    /// A configuration value is unusable (empty palette, non-finite number...).
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration {
        /// Name of the offending setting
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A `[min, max]` range has its bounds inverted.
    #[error("Invalid range for {field}: max {max} is below min {min}")]
    InvalidRange {
        /// Name of the offending setting
        field: &'static str,
        /// Configured lower bound
        min: f32,
        /// Configured upper bound
        max: f32,
    },
}

impl ConfettiError {
    /// Shorthand for [`ConfettiError::InvalidConfiguration`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for confetti operations.
pub type ConfettiResult<T> = Result<T, ConfettiError>;

/// Rejects NaN and infinite values.
pub fn ensure_finite(field: &'static str, value: f32) -> ConfettiResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfettiError::invalid(field, format!("{value} is not a finite number")))
    }
}

/// Validates an optional `[min, max]` pair.
///
/// An absent `max` is a degenerate range and always valid. A present `max`
/// below `min` is rejected rather than swapped.
pub fn ensure_range(field: &'static str, min: f32, max: Option<f32>) -> ConfettiResult<()> {
    ensure_finite(field, min)?;
    if let Some(max) = max {
        ensure_finite(field, max)?;
        if max < min {
            return Err(ConfettiError::InvalidRange { field, min, max });
        }
    }
    Ok(())
}
