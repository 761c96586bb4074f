/*!
Jump capability layered on top of [`Body`].

A jumper listens to the body's grounded/takeoff notifications to keep its
counters, and while a jump is active it writes the curve's vertical speed into
the body every step and keeps the body classified as rising.

- curve:  keyframed jump speed over normalized jump time
- air:    multi-jump with a curve per jump, coyote time and short-hop cancel
- ground: a single jump allowed on the ground or within coyote time
*/

mod air;
mod curve;
mod ground;

pub use air::{AirJumpSettings, AirJumper};
pub use curve::{JumpCurve, Keyframe};
pub use ground::{GroundJumpSettings, GroundJumper};

use log::warn;

use crate::body::Body;
use crate::constants::MIN_JUMP_COOLDOWN;

/// Jump behavior driven by the fixed-step pipeline.
///
/// `attach` must be called once before the first `update`, otherwise the jumper
/// never hears about grounded/takeoff edges.
pub trait Jumper {
    fn can_jump(&self, now: f32) -> bool;

    fn is_jumping(&self, now: f32) -> bool;

    /// Start a jump if allowed. Returns whether it started.
    fn jump(&mut self, now: f32) -> bool;

    /// Cut the current jump short.
    fn cancel_jump(&mut self, now: f32);

    /// Inject the jump speed for the next body update. Runs after [`Body::update`].
    fn update(&mut self, body: &mut Body, now: f32);

    /// Subscribe to the body's notifications.
    fn attach(&mut self, body: &mut Body);

    /// Drop the subscription made by `attach`.
    fn detach(&mut self, body: &mut Body);
}

/// Cooldowns at or below zero would make the curve time infinite.
pub(crate) fn sanitize_cooldown(cooldown: f32) -> f32 {
    if cooldown.is_finite() && cooldown >= MIN_JUMP_COOLDOWN {
        return cooldown;
    }
    warn!("jump cooldown {cooldown} is unusable, clamping to {MIN_JUMP_COOLDOWN}");
    MIN_JUMP_COOLDOWN
}

/// Timing of the jump in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct JumpTiming {
    pub started_at: f32,
    pub cancelled_at: Option<f32>,
}

impl JumpTiming {
    pub const NEVER: JumpTiming = JumpTiming {
        started_at: f32::NEG_INFINITY,
        cancelled_at: None,
    };

    pub fn start(now: f32) -> Self {
        Self {
            started_at: now,
            cancelled_at: None,
        }
    }

    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.started_at
    }

    /// Curve speed at `now`, decayed exponentially since the cancel if any.
    pub fn speed(&self, curve: &JumpCurve, cooldown: f32, decay_rate: f32, now: f32) -> f32 {
        let t = (self.elapsed(now) / cooldown).clamp(0.0, 1.0);
        let speed = curve.evaluate(t);
        match self.cancelled_at {
            Some(at) => speed * (-decay_rate * (now - at).max(0.0)).exp().clamp(0.0, 1.0),
            None => speed,
        }
    }
}
