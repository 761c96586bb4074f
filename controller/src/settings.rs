/*!
Per-character configuration.

Groups the settings of every component a [`Character`] is built from. All parts
have defaults tuned for a ~1 m tall character at 50 Hz, and are immutable once
the character exists.
*/

use crate::body::BodySettings;
use crate::character::Character;
use crate::clock::SimulationClock;
use crate::collision::CollisionSettings;
use crate::constants::DEFAULT_FIXED_HZ;
use crate::error::{ConfigError, ensure_finite};
use crate::jump::{AirJumpSettings, AirJumper};

#[derive(Clone, Debug, PartialEq)]
pub struct ControllerSettings {
    pub collision: CollisionSettings,
    pub body: BodySettings,
    /// `None` builds a character that cannot jump.
    pub jump: Option<AirJumpSettings>,
    /// Fixed simulation rate (Hz).
    pub fixed_hz: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            collision: CollisionSettings::default(),
            body: BodySettings::default(),
            jump: Some(AirJumpSettings::default()),
            fixed_hz: DEFAULT_FIXED_HZ,
        }
    }
}

impl ControllerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;
        self.body.validate()?;
        if let Some(jump) = &self.jump {
            jump.validate()?;
        }
        let hz = ensure_finite("fixed rate", self.fixed_hz)?;
        if hz <= 0.0 {
            return Err(ConfigError::NonPositiveStep(hz));
        }
        Ok(())
    }

    /// Clock ticking at `fixed_hz`.
    pub fn clock(&self) -> Result<SimulationClock, ConfigError> {
        SimulationClock::from_hz(self.fixed_hz)
    }
}

impl Character<AirJumper> {
    /// Validate `settings` and build a character with an air jumper.
    pub fn from_settings(settings: &ControllerSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let jumper = settings.jump.clone().map(AirJumper::new).transpose()?;
        Character::new(&settings.collision, settings.body, jumper)
    }
}
