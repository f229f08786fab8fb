//! Error taxonomy for configuration and control-thread operations.
//!
//! Nothing in the realtime render path returns these: every error is raised
//! while building or reconfiguring components, or when a control thread
//! hands an event to the engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// Bad waveform/curve/filter/modulation selection or an unusable shape.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown effect kind, or a missing/unknown effect parameter.
    #[error("invalid effect: {0}")]
    InvalidEffect(String),

    #[error("invalid parameter `{name}` = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// The bounded control queue had no room for the event.
    #[error("note event queue is full")]
    QueueFull,
}

impl SynthError {
    pub(crate) fn parameter(name: &'static str, value: impl Into<f64>, expected: &'static str) -> Self {
        SynthError::InvalidParameter {
            name,
            value: value.into(),
            expected,
        }
    }
}

/// Check that `value` is finite and inside `[min, max]`.
pub(crate) fn check_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
    expected: &'static str,
) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SynthError::parameter(name, value, expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_rejects_nan() {
        assert!(check_range("mix", f32::NAN, 0.0, 1.0, "0..=1").is_err());
        assert!(check_range("mix", 0.5, 0.0, 1.0, "0..=1").is_ok());
    }

    #[test]
    fn parameter_error_message_names_the_parameter() {
        let err = SynthError::parameter("duty_cycle", 1.5f32, "a value in [0, 1]");
        let message = err.to_string();
        assert!(message.contains("duty_cycle"));
        assert!(message.contains("1.5"));
    }
}
