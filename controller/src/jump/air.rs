use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::body::{Body, BodyEvent, BodyEventKind, SubscriptionId};
use crate::constants::{
    DEFAULT_COYOTE_TIME, DEFAULT_JUMP_CANCEL_DECAY_RATE, DEFAULT_JUMP_COOLDOWN,
    DEFAULT_MAXIMUM_JUMP_COUNT,
};
use crate::error::{ConfigError, ensure_finite, ensure_non_negative};

use super::{JumpCurve, JumpTiming, Jumper, sanitize_cooldown};

#[derive(Clone, Debug, PartialEq)]
pub struct AirJumpSettings {
    /// Speed curve of each jump in order. The last one is reused for further jumps.
    pub curves: Vec<JumpCurve>,
    /// Jumps available before landing. Negative means unbounded.
    pub maximum_jump_count: i32,
    /// Length of one jump (seconds); also the minimum time between two jumps.
    pub jump_cooldown: f32,
    /// Exponential decay rate of the jump speed after a cancel (1/s).
    pub jump_cancel_decay_rate: f32,
    /// Time after walking off a ledge during which the ground jump is still available.
    pub coyote_time: f32,
}

impl Default for AirJumpSettings {
    fn default() -> Self {
        Self {
            curves: vec![JumpCurve::default()],
            maximum_jump_count: DEFAULT_MAXIMUM_JUMP_COUNT,
            jump_cooldown: DEFAULT_JUMP_COOLDOWN,
            jump_cancel_decay_rate: DEFAULT_JUMP_CANCEL_DECAY_RATE,
            coyote_time: DEFAULT_COYOTE_TIME,
        }
    }
}

impl AirJumpSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.curves.is_empty() {
            return Err(ConfigError::NoJumpCurves);
        }
        ensure_finite("jump cooldown", self.jump_cooldown)?;
        ensure_non_negative("jump cancel decay rate", self.jump_cancel_decay_rate)?;
        ensure_non_negative("coyote time", self.coyote_time)?;
        Ok(())
    }
}

/// Counters shared with the body's notification callback.
#[derive(Debug)]
struct Ledger {
    /// Index of the active jump curve; -1 while grounded.
    pointer: i32,
    coyote_until: f32,
    /// Left the ground without jumping; the first jump is still claimable.
    ground_jump_pending: bool,
    timing: JumpTiming,
}

impl Ledger {
    fn on_event(&mut self, event: &BodyEvent, coyote_time: f32) {
        match event.kind {
            BodyEventKind::Takeoff => {
                self.coyote_until = event.time + coyote_time;
                if self.pointer < 0 {
                    self.pointer = 0;
                    self.ground_jump_pending = true;
                }
            }
            BodyEventKind::Grounded => {
                self.pointer = -1;
                self.ground_jump_pending = false;
            }
        }
    }
}

/// Multi-jump: one ground jump plus air jumps up to the maximum count.
///
/// Walking off a ledge consumes the ground jump unless a jump is made within the
/// coyote time. Only the first jump can be cut short.
#[derive(Debug)]
pub struct AirJumper {
    curves: Vec<JumpCurve>,
    maximum_jump_count: i32,
    cooldown: f32,
    decay_rate: f32,
    coyote_time: f32,
    ledger: Rc<RefCell<Ledger>>,
    subscription: Option<SubscriptionId>,
}

impl AirJumper {
    pub fn new(settings: AirJumpSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            curves: settings.curves,
            maximum_jump_count: settings.maximum_jump_count,
            cooldown: sanitize_cooldown(settings.jump_cooldown),
            decay_rate: settings.jump_cancel_decay_rate,
            coyote_time: settings.coyote_time,
            ledger: Rc::new(RefCell::new(Ledger {
                pointer: -1,
                coyote_until: f32::NEG_INFINITY,
                ground_jump_pending: false,
                timing: JumpTiming::NEVER,
            })),
            subscription: None,
        })
    }

    /// Index of the active jump curve; -1 while grounded.
    pub fn jump_pointer(&self) -> i32 {
        self.ledger.borrow().pointer
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    fn count_allows(&self, pointer: i32) -> bool {
        self.maximum_jump_count < 0 || pointer < self.maximum_jump_count - 1
    }

    fn coyote_claim(&self, ledger: &Ledger, now: f32) -> bool {
        self.maximum_jump_count != 0 && ledger.ground_jump_pending && now < ledger.coyote_until
    }

    fn curve_index(&self, pointer: i32) -> usize {
        let mut index = pointer.max(0) as usize;
        if self.maximum_jump_count > 0 {
            index = index.min(self.maximum_jump_count as usize - 1);
        }
        index.min(self.curves.len() - 1)
    }
}

impl Jumper for AirJumper {
    fn can_jump(&self, now: f32) -> bool {
        let ledger = self.ledger.borrow();
        let cooled = ledger.timing.elapsed(now) > self.cooldown;
        cooled && (self.count_allows(ledger.pointer) || self.coyote_claim(&ledger, now))
    }

    fn is_jumping(&self, now: f32) -> bool {
        let ledger = self.ledger.borrow();
        ledger.pointer >= 0 && ledger.timing.elapsed(now) <= self.cooldown
    }

    fn jump(&mut self, now: f32) -> bool {
        if !self.can_jump(now) {
            return false;
        }
        let mut ledger = self.ledger.borrow_mut();
        if self.coyote_claim(&ledger, now) {
            debug!("coyote jump at {now:.3}s");
        } else {
            ledger.pointer += 1;
        }
        ledger.ground_jump_pending = false;
        ledger.timing = JumpTiming::start(now);
        debug!("jump {} started at {now:.3}s", ledger.pointer);
        true
    }

    fn cancel_jump(&mut self, now: f32) {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.pointer == 0 && ledger.timing.cancelled_at.is_none() {
            ledger.timing.cancelled_at = Some(now);
        }
    }

    fn update(&mut self, body: &mut Body, now: f32) {
        if !self.is_jumping(now) {
            return;
        }
        let speed = {
            let ledger = self.ledger.borrow();
            let curve = &self.curves[self.curve_index(ledger.pointer)];
            ledger.timing.speed(curve, self.cooldown, self.decay_rate, now)
        };
        body.set_move_velocity_y(speed);
        // May fire takeoff, which borrows the ledger.
        body.set_rising(now);
    }

    fn attach(&mut self, body: &mut Body) {
        if let Some(id) = self.subscription.take() {
            body.unsubscribe(id);
        }
        let ledger = Rc::clone(&self.ledger);
        let coyote_time = self.coyote_time;
        self.subscription = Some(body.subscribe(move |event| {
            ledger.borrow_mut().on_event(event, coyote_time);
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

    fn rig(settings: AirJumpSettings) -> (AirJumper, Body) {
        let mut body = Body::new(BodySettings::default()).unwrap();
        let mut jumper = AirJumper::new(settings).unwrap();
        jumper.attach(&mut body);
        (jumper, body)
    }

    #[test]
    fn two_jumps_then_none_until_landing() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        let cooldown = jumper.cooldown();

        assert!(jumper.jump(0.0));
        assert_eq!(jumper.jump_pointer(), 0);
        jumper.update(&mut body, 0.0);
        assert!(body.is_rising());
        // Jumping from the ground does not count the takeoff as another jump.
        assert_eq!(jumper.jump_pointer(), 0);

        // Still in the first jump.
        assert!(!jumper.jump(0.1));

        let t1 = cooldown + 0.01;
        assert!(jumper.jump(t1));
        assert_eq!(jumper.jump_pointer(), 1);

        let t2 = t1 + cooldown + 0.01;
        assert!(!jumper.can_jump(t2));
        assert!(!jumper.jump(t2));
        // A refused jump leaves the state untouched.
        assert_eq!(jumper.jump_pointer(), 1);
        assert_eq!(jumper.ledger.borrow().timing, JumpTiming::start(t1));
    }

    #[test]
    fn short_hop_speed_decays_below_the_full_curve() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        let curve = JumpCurve::default();
        assert!(jumper.jump(0.0));
        jumper.update(&mut body, 0.0);
        jumper.cancel_jump(0.1);

        let timing = jumper.ledger.borrow().timing;
        let mut prev = f32::INFINITY;
        for i in 0..=15 {
            let now = 0.1 + i as f32 * 0.01;
            let speed = timing.speed(&curve, jumper.cooldown(), 10.0, now);
            let full = curve.evaluate(now / jumper.cooldown());
            assert!(speed <= full + 1.0e-6);
            assert!(speed <= prev);
            prev = speed;
        }
        assert!(prev < 0.1);
    }

    #[test]
    fn landing_resets_the_pointer() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        assert!(jumper.jump(0.0));
        jumper.update(&mut body, 0.0);
        assert!(jumper.jump(0.3));

        assert!(!jumper.can_jump(0.7));

        jumper.ledger.borrow_mut().on_event(
            &BodyEvent {
                kind: BodyEventKind::Grounded,
                time: 0.7,
            },
            0.2,
        );
        assert_eq!(jumper.jump_pointer(), -1);
        assert!(jumper.can_jump(0.7));
    }

    #[test]
    fn walking_off_a_ledge_allows_a_coyote_ground_jump() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        // Body leaves the ground without jumping.
        body.set_rising(1.0);
        assert_eq!(jumper.jump_pointer(), 0);
        assert!(!jumper.is_jumping(1.0));

        // Within coyote time: the ground jump, first curve.
        assert!(jumper.jump(1.1));
        assert_eq!(jumper.jump_pointer(), 0);

        // Then one air jump remains.
        assert!(jumper.jump(1.4));
        assert_eq!(jumper.jump_pointer(), 1);
        assert!(!jumper.jump(1.7));
    }

    #[test]
    fn late_jump_after_a_ledge_is_an_air_jump() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        body.set_rising(1.0);
        // Coyote time of 0.2 s is over.
        assert!(jumper.jump(1.5));
        assert_eq!(jumper.jump_pointer(), 1);
        assert!(!jumper.jump(2.0));
    }

    #[test]
    fn single_jump_count_still_gets_the_coyote_jump() {
        let settings = AirJumpSettings {
            maximum_jump_count: 1,
            ..Default::default()
        };
        let (mut jumper, mut body) = rig(settings);
        body.set_rising(0.0);
        assert!(jumper.jump(0.1));
        assert!(!jumper.jump(0.5));
    }

    #[test]
    fn unbounded_jumps_reuse_the_last_curve() {
        let settings = AirJumpSettings {
            curves: vec![
                JumpCurve::constant(9.0).unwrap(),
                JumpCurve::constant(4.0).unwrap(),
            ],
            maximum_jump_count: -1,
            ..Default::default()
        };
        let (mut jumper, mut body) = rig(settings);
        let mut now = 0.0;
        for _ in 0..5 {
            assert!(jumper.jump(now));
            jumper.update(&mut body, now);
            now += 0.3;
        }
        assert_eq!(jumper.jump_pointer(), 4);
        assert_eq!(jumper.curve_index(4), 1);
    }

    #[test]
    fn curve_index_is_capped_by_the_maximum_count() {
        let settings = AirJumpSettings {
            curves: vec![
                JumpCurve::constant(9.0).unwrap(),
                JumpCurve::constant(6.0).unwrap(),
                JumpCurve::constant(3.0).unwrap(),
            ],
            maximum_jump_count: 2,
            ..Default::default()
        };
        let jumper = AirJumper::new(settings).unwrap();
        assert_eq!(jumper.curve_index(0), 0);
        assert_eq!(jumper.curve_index(1), 1);
        assert_eq!(jumper.curve_index(5), 1);
    }

    #[test]
    fn only_the_first_jump_can_be_cancelled() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        assert!(jumper.jump(0.0));
        jumper.update(&mut body, 0.0);
        jumper.cancel_jump(0.05);
        assert_eq!(jumper.ledger.borrow().timing.cancelled_at, Some(0.05));
        // A second cancel keeps the first cancel time.
        jumper.cancel_jump(0.1);
        assert_eq!(jumper.ledger.borrow().timing.cancelled_at, Some(0.05));

        assert!(jumper.jump(0.3));
        jumper.cancel_jump(0.35);
        assert_eq!(jumper.ledger.borrow().timing.cancelled_at, None);
    }

    #[test]
    fn jump_is_not_active_after_its_cooldown() {
        let (mut jumper, mut body) = rig(AirJumpSettings::default());
        assert!(jumper.jump(0.0));
        assert!(jumper.is_jumping(0.25));
        assert!(!jumper.is_jumping(0.26));

        // A finished jump stops injecting speed.
        let mut idle = Body::new(BodySettings::default()).unwrap();
        jumper.update(&mut idle, 0.3);
        assert!(idle.is_grounded());
        jumper.detach(&mut body);
        assert_eq!(body.subscriber_count(), 0);
    }

    #[test]
    fn empty_curve_list_is_rejected() {
        let settings = AirJumpSettings {
            curves: Vec::new(),
            ..Default::default()
        };
        assert_eq!(AirJumper::new(settings).err(), Some(ConfigError::NoJumpCurves));
    }

    #[test]
    fn zero_cooldown_is_clamped() {
        let settings = AirJumpSettings {
            jump_cooldown: 0.0,
            ..Default::default()
        };
        let jumper = AirJumper::new(settings).unwrap();
        assert!(jumper.cooldown() > 0.0);
    }
}
