/*!
Velocity arbitration for one controlled body.

Every fixed step the body:
1. advances the knockback timer, or recovers the interpolation weight once it ran out
2. damps the current velocity per axis (ground or air damping)
3. overrides the axes that were requested this step
4. while standing on an attached platform, moves the target into the platform's frame
5. blends current velocity toward that target with a spherical interpolation
6. classifies the vertical state and fires grounded/takeoff notifications
7. forgets the requests; they only last one step

The physics engine stays authoritative for velocity: it is read from and written
back to the [`PhysicsBody`] every step.
*/

mod events;
mod settings;

pub use events::{BodyCallback, BodyEvent, BodyEventKind, SubscriptionId};
pub use settings::{BodySettings, Knockback};

use log::debug;

use crate::collision::CollisionState;
use crate::error::ConfigError;
use crate::math::{Vec2, scale_per_axis, slerp};
use crate::physics::{BodyId, PhysicsBody, TouchingBody};

use events::Subscribers;

/// Vertical classification. Exactly one holds at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalState {
    #[default]
    Grounded,
    Rising,
    Falling,
}

/// The platform the body currently rides, with its velocity sampled this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    pub body: BodyId,
    pub velocity: Vec2,
}

#[derive(Debug)]
pub struct Body {
    settings: BodySettings,
    velocity: Vec2,
    move_velocity: Vec2,
    move_x_set: bool,
    move_y_set: bool,
    weight: f32,
    remaining_knockback: f32,
    vertical: VerticalState,
    attached: Option<Attachment>,
    subscribers: Subscribers,
    touching: Vec<TouchingBody>,
}

impl Body {
    pub fn new(settings: BodySettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            velocity: Vec2::zeros(),
            move_velocity: Vec2::zeros(),
            move_x_set: false,
            move_y_set: false,
            weight: 1.0,
            remaining_knockback: 0.0,
            vertical: VerticalState::Grounded,
            attached: None,
            subscribers: Subscribers::default(),
            touching: Vec::new(),
        })
    }

    /// Run one fixed step. `collision` must already be refreshed for this step.
    pub fn update<P: PhysicsBody + ?Sized>(
        &mut self,
        collision: &CollisionState,
        physics: &mut P,
        dt: f32,
        now: f32,
    ) {
        if self.remaining_knockback > 0.0 {
            self.remaining_knockback = (self.remaining_knockback - dt).max(0.0);
        } else {
            self.weight = (self.weight + dt).min(1.0);
        }
        self.weight = self.weight.clamp(0.0, 1.0);

        let on_ground = collision.is_touching_bottom();
        let velocity = physics.velocity();
        let damping = if on_ground {
            self.settings.ground_damping
        } else {
            self.settings.air_damping
        };

        if self.settings.sticky {
            self.update_attachment(&*physics);
        }
        let carry = self
            .attached
            .filter(|_| on_ground)
            .map(|platform| platform.velocity * self.settings.platform_velocity_multiplier);

        let mut target = scale_per_axis(velocity, damping);
        if self.move_x_set {
            target.x = self.move_velocity.x;
        }
        if self.move_y_set {
            target.y = self.move_velocity.y;
        }
        if let Some(carry) = carry {
            // Requests are relative to the platform. Unrequested horizontal speed
            // is damped toward the platform's; a rider has no vertical speed of its own.
            target.x = if self.move_x_set {
                self.move_velocity.x + carry.x
            } else {
                carry.x + (velocity.x - carry.x) * damping.x
            };
            target.y = if self.move_y_set {
                self.move_velocity.y + carry.y
            } else {
                carry.y
            };
        }

        let blended = slerp(velocity, target, self.weight);
        physics.set_velocity(blended);
        self.velocity = blended;

        self.classify(on_ground, blended.y, now);

        self.move_x_set = false;
        self.move_y_set = false;
    }

    fn classify(&mut self, on_ground: bool, vy: f32, now: f32) {
        let next = match self.vertical {
            VerticalState::Rising if vy <= 0.0 => VerticalState::Falling,
            VerticalState::Rising => VerticalState::Rising,
            VerticalState::Falling if on_ground => VerticalState::Grounded,
            VerticalState::Falling if vy > 0.0 => VerticalState::Rising,
            VerticalState::Falling => VerticalState::Falling,
            VerticalState::Grounded if on_ground => VerticalState::Grounded,
            VerticalState::Grounded if vy > 0.0 => VerticalState::Rising,
            VerticalState::Grounded => VerticalState::Falling,
        };
        self.transition(next, now);
    }

    fn transition(&mut self, next: VerticalState, now: f32) {
        let previous = self.vertical;
        if previous == next {
            return;
        }
        self.vertical = next;
        debug!("vertical state {previous:?} -> {next:?} at {now:.3}s");

        let kind = match (previous, next) {
            (VerticalState::Grounded, _) => BodyEventKind::Takeoff,
            (_, VerticalState::Grounded) => BodyEventKind::Grounded,
            _ => return,
        };
        self.subscribers.emit(&BodyEvent { kind, time: now });
    }

    fn update_attachment<P: PhysicsBody + ?Sized>(&mut self, physics: &P) {
        self.touching.clear();
        physics.touching_bodies(&mut self.touching);

        let current = self
            .attached
            .and_then(|a| self.touching.iter().find(|t| t.body == a.body))
            .or_else(|| self.touching.first())
            .map(|t| Attachment {
                body: t.body,
                velocity: t.velocity,
            });

        match (self.attached, current) {
            (Some(old), Some(new)) if old.body != new.body => {
                debug!("moved from platform {:?} to {:?}", old.body, new.body)
            }
            (None, Some(new)) => debug!("attached to platform {:?}", new.body),
            (Some(old), None) => debug!("detached from platform {:?}", old.body),
            _ => {}
        }
        self.attached = current;
    }

    /// Request a horizontal speed for the next step only.
    pub fn set_move_velocity_x(&mut self, x: f32) {
        self.move_velocity.x = x;
        self.move_x_set = true;
    }

    /// Request a vertical speed for the next step only.
    pub fn set_move_velocity_y(&mut self, y: f32) {
        self.move_velocity.y = y;
        self.move_y_set = true;
    }

    pub fn set_move_velocity(&mut self, velocity: Vec2) {
        self.move_velocity = velocity;
        self.move_x_set = true;
        self.move_y_set = true;
    }

    /// Force the `Rising` classification. Leaving the ground this way fires `Takeoff`.
    pub fn set_rising(&mut self, now: f32) {
        self.transition(VerticalState::Rising, now);
    }

    /// Continuous force for the next physics step.
    pub fn add_force<P: PhysicsBody + ?Sized>(&self, physics: &mut P, force: Vec2) {
        physics.add_force(force);
    }

    /// Apply a knockback impulse and hand velocity control to physics for its duration.
    pub fn add_knockback_impulse<P: PhysicsBody + ?Sized>(
        &mut self,
        physics: &mut P,
        knockback: Knockback,
    ) {
        physics.apply_impulse(knockback.impulse());
        self.remaining_knockback += knockback.duration();
        self.weight = 0.0;
    }

    /// Register a callback for grounded/takeoff edges.
    pub fn subscribe(&mut self, callback: impl FnMut(&BodyEvent) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Velocity written to physics by the last update.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn remaining_knockback(&self) -> f32 {
        self.remaining_knockback
    }

    #[inline]
    pub fn vertical_state(&self) -> VerticalState {
        self.vertical
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.vertical == VerticalState::Grounded
    }

    #[inline]
    pub fn is_rising(&self) -> bool {
        self.vertical == VerticalState::Rising
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.vertical == VerticalState::Falling
    }

    #[inline]
    pub fn attached_platform(&self) -> Option<Attachment> {
        self.attached
    }

    #[inline]
    pub fn settings(&self) -> &BodySettings {
        &self.settings
    }
}
