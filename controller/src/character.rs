use crate::body::{Body, BodySettings};
use crate::clock::SimulationClock;
use crate::collision::{CollisionSettings, CollisionState};
use crate::error::ConfigError;
use crate::jump::{AirJumper, Jumper};
use crate::physics::PhysicsBody;

/// A controlled body with its collision state and optional jumper, updated in
/// the fixed order: probes, body, jumper.
///
/// The physics step itself belongs to the caller and runs after [`Character::fixed_update`].
#[derive(Debug)]
pub struct Character<J: Jumper = AirJumper> {
    collision: CollisionState,
    body: Body,
    jumper: Option<J>,
}

impl<J: Jumper> Character<J> {
    pub fn new(
        collision: &CollisionSettings,
        body: BodySettings,
        jumper: Option<J>,
    ) -> Result<Self, ConfigError> {
        let collision = CollisionState::new(collision)?;
        let mut body = Body::new(body)?;
        let mut jumper = jumper;
        if let Some(j) = jumper.as_mut() {
            j.attach(&mut body);
        }
        Ok(Self {
            collision,
            body,
            jumper,
        })
    }

    /// Run one fixed step against `physics` at the clock's current tick.
    pub fn fixed_update<P: PhysicsBody + ?Sized>(&mut self, physics: &mut P, clock: &SimulationClock) {
        let dt = clock.dt();
        let now = clock.now();

        self.collision.refresh(&*physics, dt);
        self.body.update(&self.collision, physics, dt, now);
        if let Some(jumper) = self.jumper.as_mut() {
            jumper.update(&mut self.body, now);
        }
    }

    /// Start a jump if the jumper allows it. Without a jumper this is a no-op.
    pub fn jump(&mut self, now: f32) -> bool {
        self.jumper.as_mut().is_some_and(|j| j.jump(now))
    }

    pub fn cancel_jump(&mut self, now: f32) {
        if let Some(jumper) = self.jumper.as_mut() {
            jumper.cancel_jump(now);
        }
    }

    pub fn can_jump(&self, now: f32) -> bool {
        self.jumper.as_ref().is_some_and(|j| j.can_jump(now))
    }

    pub fn is_jumping(&self, now: f32) -> bool {
        self.jumper.as_ref().is_some_and(|j| j.is_jumping(now))
    }

    #[inline]
    pub fn collision(&self) -> &CollisionState {
        &self.collision
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[inline]
    pub fn jumper(&self) -> Option<&J> {
        self.jumper.as_ref()
    }

    #[inline]
    pub fn jumper_mut(&mut self) -> Option<&mut J> {
        self.jumper.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Knockback, VerticalState};
    use crate::jump::{AirJumpSettings, GroundJumpSettings, GroundJumper};
    use crate::math::Vec2;
    use crate::physics::ColliderId;
    use crate::test_support::ScriptedPhysics;

    fn air_character() -> Character {
        Character::new(
            &CollisionSettings::default(),
            BodySettings::default(),
            Some(AirJumper::new(AirJumpSettings::default()).unwrap()),
        )
        .unwrap()
    }

    fn step<J: Jumper>(
        character: &mut Character<J>,
        physics: &mut ScriptedPhysics,
        clock: &mut SimulationClock,
    ) {
        character.fixed_update(physics, clock);
        clock.advance();
    }

    #[test]
    fn walking_on_ground_only_damps_x() {
        let mut character = air_character();
        let mut physics = ScriptedPhysics::default();
        physics.ground();
        physics.velocity = Vec2::new(2.0, 0.0);
        let mut clock = SimulationClock::new(0.02).unwrap();

        step(&mut character, &mut physics, &mut clock);

        assert!((physics.velocity - Vec2::new(1.7, 0.0)).norm() < 1.0e-6);
        assert_eq!(character.body().vertical_state(), VerticalState::Grounded);
        assert!(character.collision().is_touching_bottom());
    }

    #[test]
    fn jump_is_injected_on_the_following_step() {
        let mut character = air_character();
        let mut physics = ScriptedPhysics::default();
        physics.ground();
        let mut clock = SimulationClock::new(0.02).unwrap();

        step(&mut character, &mut physics, &mut clock);
        assert!(character.jump(clock.now()));

        // The jumper runs after the body: the takeoff is immediate, the speed arrives next step.
        step(&mut character, &mut physics, &mut clock);
        assert!(character.body().is_rising());
        assert_eq!(physics.velocity.y, 0.0);

        step(&mut character, &mut physics, &mut clock);
        assert!(physics.velocity.y > 6.0);
        assert!(character.body().is_rising());
    }

    #[test]
    fn cancelled_jump_is_slower_than_a_full_one() {
        let run = |cancel: bool| {
            let mut character = air_character();
            let mut physics = ScriptedPhysics::default();
            physics.ground();
            let mut clock = SimulationClock::new(0.02).unwrap();
            assert!(character.jump(clock.now()));
            let mut speeds = Vec::new();
            for i in 0..10 {
                if cancel && i == 2 {
                    character.cancel_jump(clock.now());
                }
                step(&mut character, &mut physics, &mut clock);
                physics.clear_hits();
                speeds.push(physics.velocity.y);
            }
            speeds
        };

        let full = run(false);
        let short = run(true);
        for (s, f) in short.iter().zip(&full) {
            assert!(*s <= *f + 1.0e-6);
        }
        assert!(short[8] < full[8] * 0.5);
    }

    #[test]
    fn knockback_overrides_requests_then_control_returns() {
        let mut character = air_character();
        let mut physics = ScriptedPhysics::default();
        physics.ground();
        let mut clock = SimulationClock::new(0.02).unwrap();

        let knockback = Knockback::new(Vec2::new(-8.0, 0.0), 0.2).unwrap();
        character
            .body_mut()
            .add_knockback_impulse(&mut physics, knockback);
        // The double does not integrate; stand in for the engine.
        physics.velocity = Vec2::new(-8.0, 0.0);

        character.body_mut().set_move_velocity_x(5.0);
        step(&mut character, &mut physics, &mut clock);
        assert_eq!(physics.velocity.x, -8.0);

        for _ in 0..80 {
            character.body_mut().set_move_velocity_x(5.0);
            step(&mut character, &mut physics, &mut clock);
        }
        assert_eq!(character.body().weight(), 1.0);
        assert_eq!(physics.velocity.x, 5.0);
    }

    #[test]
    fn ignored_ground_is_not_ground() {
        let mut character = air_character();
        let mut physics = ScriptedPhysics::default();
        physics.push_hit(
            crate::contact_flags::ContactSide::Bottom,
            Vec2::new(0.0, 1.0),
            ColliderId(9),
        );
        physics.ignore(ColliderId(9));
        let mut clock = SimulationClock::new(0.02).unwrap();
        step(&mut character, &mut physics, &mut clock);
        assert!(!character.collision().is_touching_bottom());
        assert!(character.body().is_falling());
    }

    #[test]
    fn ground_jumper_plugs_into_the_same_pipeline() {
        let mut character: Character<GroundJumper> = Character::new(
            &CollisionSettings::default(),
            BodySettings::default(),
            Some(GroundJumper::new(GroundJumpSettings::default()).unwrap()),
        )
        .unwrap();
        let mut physics = ScriptedPhysics::default();
        physics.ground();
        let mut clock = SimulationClock::new(0.02).unwrap();

        assert!(character.jump(clock.now()));
        step(&mut character, &mut physics, &mut clock);
        step(&mut character, &mut physics, &mut clock);
        assert!(physics.velocity.y > 6.0);
        assert!(!character.jump(clock.now()));
    }

    #[test]
    fn without_a_jumper_jumps_are_refused() {
        let mut character: Character = Character::new(
            &CollisionSettings::default(),
            BodySettings::default(),
            None,
        )
        .unwrap();
        assert!(!character.can_jump(0.0));
        assert!(!character.jump(0.0));
        assert!(!character.is_jumping(0.0));
    }
}
