use thiserror::Error;

/// Construction-time failures.
///
/// Everything here is detected while building settings, curves, clocks or
/// physics bindings. A running simulation never produces these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("fixed step duration must be positive (got {0})")]
    NonPositiveStep(f32),

    #[error("{probe} probe normal range is inverted: min {min} > max {max}")]
    InvertedNormalRange {
        probe: &'static str,
        min: f32,
        max: f32,
    },

    #[error("a jumper needs at least one jump curve")]
    NoJumpCurves,

    #[error("jump curve has no keyframes")]
    EmptyCurve,

    #[error("jump curve keyframe {index} is not after the previous one")]
    UnorderedKeyframes { index: usize },

    #[error("rigid body {0} does not exist in the physics world")]
    MissingBody(String),

    #[error("rigid body {0} has no attached collider")]
    MissingCollider(String),
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Rejects non-finite and negative values.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(value)
}
