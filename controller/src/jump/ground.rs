use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::body::{Body, BodyEvent, BodyEventKind, SubscriptionId};
use crate::constants::{DEFAULT_COYOTE_TIME, DEFAULT_JUMP_CANCEL_DECAY_RATE, DEFAULT_JUMP_COOLDOWN};
use crate::error::{ConfigError, ensure_finite, ensure_non_negative};

use super::{JumpCurve, JumpTiming, Jumper, sanitize_cooldown};

#[derive(Clone, Debug, PartialEq)]
pub struct GroundJumpSettings {
    pub curve: JumpCurve,
    pub jump_cooldown: f32,
    pub jump_cancel_decay_rate: f32,
    pub coyote_time: f32,
}

impl Default for GroundJumpSettings {
    fn default() -> Self {
        Self {
            curve: JumpCurve::default(),
            jump_cooldown: DEFAULT_JUMP_COOLDOWN,
            jump_cancel_decay_rate: DEFAULT_JUMP_CANCEL_DECAY_RATE,
            coyote_time: DEFAULT_COYOTE_TIME,
        }
    }
}

impl GroundJumpSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("jump cooldown", self.jump_cooldown)?;
        ensure_non_negative("jump cancel decay rate", self.jump_cancel_decay_rate)?;
        ensure_non_negative("coyote time", self.coyote_time)?;
        Ok(())
    }
}

#[derive(Debug)]
struct Ledger {
    grounded: bool,
    coyote_until: f32,
    /// A jump was made since the last landing.
    jumped: bool,
    timing: JumpTiming,
}

/// One jump per landing, available on the ground or within coyote time.
#[derive(Debug)]
pub struct GroundJumper {
    curve: JumpCurve,
    cooldown: f32,
    decay_rate: f32,
    coyote_time: f32,
    ledger: Rc<RefCell<Ledger>>,
    subscription: Option<SubscriptionId>,
}

impl GroundJumper {
    pub fn new(settings: GroundJumpSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            curve: settings.curve,
            cooldown: sanitize_cooldown(settings.jump_cooldown),
            decay_rate: settings.jump_cancel_decay_rate,
            coyote_time: settings.coyote_time,
            ledger: Rc::new(RefCell::new(Ledger {
                grounded: true,
                coyote_until: f32::NEG_INFINITY,
                jumped: false,
                timing: JumpTiming::NEVER,
            })),
            subscription: None,
        })
    }
}

impl Jumper for GroundJumper {
    fn can_jump(&self, now: f32) -> bool {
        let ledger = self.ledger.borrow();
        let on_ground = ledger.grounded || now < ledger.coyote_until;
        on_ground && !ledger.jumped && ledger.timing.elapsed(now) > self.cooldown
    }

    fn is_jumping(&self, now: f32) -> bool {
        let ledger = self.ledger.borrow();
        ledger.jumped && ledger.timing.elapsed(now) <= self.cooldown
    }

    fn jump(&mut self, now: f32) -> bool {
        if !self.can_jump(now) {
            return false;
        }
        let mut ledger = self.ledger.borrow_mut();
        ledger.jumped = true;
        ledger.timing = JumpTiming::start(now);
        debug!("ground jump started at {now:.3}s");
        true
    }

    fn cancel_jump(&mut self, now: f32) {
        if !self.is_jumping(now) {
            return;
        }
        let mut ledger = self.ledger.borrow_mut();
        if ledger.timing.cancelled_at.is_none() {
            ledger.timing.cancelled_at = Some(now);
        }
    }

    fn update(&mut self, body: &mut Body, now: f32) {
        if !self.is_jumping(now) {
            return;
        }
        let speed = self
            .ledger
            .borrow()
            .timing
            .speed(&self.curve, self.cooldown, self.decay_rate, now);
        body.set_move_velocity_y(speed);
        body.set_rising(now);
    }

    fn attach(&mut self, body: &mut Body) {
        if let Some(id) = self.subscription.take() {
            body.unsubscribe(id);
        }
        self.ledger.borrow_mut().grounded = body.is_grounded();

        let ledger = Rc::clone(&self.ledger);
        let coyote_time = self.coyote_time;
        self.subscription = Some(body.subscribe(move |event: &BodyEvent| {
            let mut ledger = ledger.borrow_mut();
            match event.kind {
                BodyEventKind::Takeoff => {
                    ledger.grounded = false;
                    ledger.coyote_until = event.time + coyote_time;
                }
                BodyEventKind::Grounded => {
                    ledger.grounded = true;
                    ledger.jumped = false;
                }
            }
        }));
    }

    fn detach(&mut self, body: &mut Body) {
        if let Some(id) = self.subscription.take() {
            body.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodySettings;

    fn rig() -> (GroundJumper, Body) {
        let mut body = Body::new(BodySettings::default()).unwrap();
        let mut jumper = GroundJumper::new(GroundJumpSettings::default()).unwrap();
        jumper.attach(&mut body);
        (jumper, body)
    }

    #[test]
    fn one_jump_per_landing() {
        let (mut jumper, mut body) = rig();
        assert!(jumper.can_jump(0.0));
        assert!(jumper.jump(0.0));
        jumper.update(&mut body, 0.0);
        assert!(body.is_rising());

        // Takeoff opened a coyote window, but the jump is spent.
        assert!(!jumper.jump(0.3));
        assert!(!jumper.jump(1.0));
    }

    #[test]
    fn coyote_window_after_walking_off() {
        let (mut jumper, mut body) = rig();
        body.set_rising(2.0);
        assert!(jumper.can_jump(2.1));
        assert!(!jumper.can_jump(2.25));
        assert!(jumper.jump(2.15));
    }

    #[test]
    fn cancel_only_applies_while_jumping() {
        let (mut jumper, mut body) = rig();
        jumper.cancel_jump(0.0);
        assert_eq!(jumper.ledger.borrow().timing.cancelled_at, None);

        assert!(jumper.jump(0.0));
        jumper.update(&mut body, 0.0);
        jumper.cancel_jump(0.1);
        assert_eq!(jumper.ledger.borrow().timing.cancelled_at, Some(0.1));
    }

    #[test]
    fn update_injects_curve_speed() {
        let settings = GroundJumpSettings {
            curve: JumpCurve::constant(5.0).unwrap(),
            ..Default::default()
        };
        let mut jumper = GroundJumper::new(settings).unwrap();
        let mut body = Body::new(BodySettings::default()).unwrap();
        jumper.attach(&mut body);

        let mut physics = crate::test_support::ScriptedPhysics::default();
        let collision =
            crate::collision::CollisionState::new(&Default::default()).unwrap();

        assert!(jumper.jump(0.0));
        jumper.update(&mut body, 0.0);
        body.update(&collision, &mut physics, 0.02, 0.02);
        assert_eq!(physics.velocity.y, 5.0);
    }
}
