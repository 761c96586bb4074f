use crate::error::{ConfigError, ensure_finite};

/// Fixed-step simulation time.
///
/// Time is derived from the tick counter (`now = ticks * dt`) instead of being
/// accumulated, so long runs do not drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationClock {
    dt: f32,
    ticks: u64,
}

impl SimulationClock {
    /// Create a clock with a fixed step duration in seconds.
    pub fn new(dt: f32) -> Result<Self, ConfigError> {
        let dt = ensure_finite("fixed step duration", dt)?;
        if dt <= 0.0 {
            return Err(ConfigError::NonPositiveStep(dt));
        }
        Ok(Self { dt, ticks: 0 })
    }

    /// Create a clock from a tick rate in Hz.
    pub fn from_hz(hz: f32) -> Result<Self, ConfigError> {
        Self::new(1.0 / hz)
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulation time of the current tick (seconds).
    #[inline]
    pub fn now(&self) -> f32 {
        (self.ticks as f64 * self.dt as f64) as f32
    }

    /// Move to the next tick.
    #[inline]
    pub fn advance(&mut self) {
        self.ticks += 1;
    }
}
