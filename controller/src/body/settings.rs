use crate::constants::{
    DEFAULT_AIR_DAMPING, DEFAULT_GROUND_DAMPING, DEFAULT_PLATFORM_VELOCITY_MULTIPLIER,
};
use crate::error::{ConfigError, ensure_finite, ensure_non_negative};
use crate::math::Vec2;

/// Per-body velocity arbitration settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySettings {
    /// Per-axis multiplier applied to the current velocity while on the ground.
    pub ground_damping: Vec2,
    /// Per-axis multiplier applied to the current velocity while airborne.
    pub air_damping: Vec2,
    /// Attach to non-static bodies in contact (moving platforms).
    pub sticky: bool,
    /// Scale of the attached platform's velocity added to requested axes.
    pub platform_velocity_multiplier: f32,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            ground_damping: DEFAULT_GROUND_DAMPING,
            air_damping: DEFAULT_AIR_DAMPING,
            sticky: true,
            platform_velocity_multiplier: DEFAULT_PLATFORM_VELOCITY_MULTIPLIER,
        }
    }
}

impl BodySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("ground damping x", self.ground_damping.x)?;
        ensure_non_negative("ground damping y", self.ground_damping.y)?;
        ensure_non_negative("air damping x", self.air_damping.x)?;
        ensure_non_negative("air damping y", self.air_damping.y)?;
        ensure_finite("platform velocity multiplier", self.platform_velocity_multiplier)?;
        Ok(())
    }
}

/// A knockback hit: an impulse plus the time during which move requests stop
/// regaining control over the velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Knockback {
    impulse: Vec2,
    duration: f32,
}

impl Knockback {
    pub fn new(impulse: Vec2, duration: f32) -> Result<Self, ConfigError> {
        ensure_finite("knockback impulse x", impulse.x)?;
        ensure_finite("knockback impulse y", impulse.y)?;
        let duration = ensure_non_negative("knockback duration", duration)?;
        Ok(Self { impulse, duration })
    }

    #[inline]
    pub fn impulse(&self) -> Vec2 {
        self.impulse
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
