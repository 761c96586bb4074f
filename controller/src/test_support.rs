//! Scripted physics double for unit tests.

use std::cell::RefCell;

use crate::contact_flags::ContactSide;
use crate::math::Vec2;
use crate::physics::{BodyId, ColliderId, PhysicsBody, ProbeHit, TouchingBody};

const SIDES: [ContactSide; 4] = [
    ContactSide::Bottom,
    ContactSide::Left,
    ContactSide::Right,
    ContactSide::Top,
];

/// A body whose casts return whatever the test pushed for that direction.
///
/// Velocity is only changed by the controller or the test; impulses and forces are
/// recorded, not integrated.
#[derive(Default)]
pub struct ScriptedPhysics {
    pub velocity: Vec2,
    pub impulses: Vec<Vec2>,
    pub forces: Vec<Vec2>,
    pub touching: Vec<TouchingBody>,
    hits: [Vec<ProbeHit>; 4],
    ignored: Vec<ColliderId>,
    casts: RefCell<Vec<(Vec2, f32)>>,
}

impl ScriptedPhysics {
    pub fn push_hit(&mut self, side: ContactSide, normal: Vec2, collider: ColliderId) {
        self.hits[side as usize].push(ProbeHit {
            normal,
            distance: 0.0,
            collider,
            body: None,
        });
    }

    /// Flat ground under the body.
    pub fn ground(&mut self) {
        self.push_hit(ContactSide::Bottom, Vec2::new(0.0, 1.0), ColliderId(0));
    }

    pub fn clear_hits(&mut self) {
        for side in &mut self.hits {
            side.clear();
        }
    }

    pub fn ignore(&mut self, collider: ColliderId) {
        self.ignored.push(collider);
    }

    pub fn touch(&mut self, body: BodyId, velocity: Vec2) {
        self.touching.push(TouchingBody { body, velocity });
    }

    pub fn cast_distances(&self) -> Vec<f32> {
        self.casts.borrow().iter().map(|&(_, d)| d).collect()
    }

    pub fn cast_directions(&self) -> Vec<Vec2> {
        self.casts.borrow().iter().map(|&(dir, _)| dir).collect()
    }
}

impl PhysicsBody for ScriptedPhysics {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.impulses.push(impulse);
    }

    fn add_force(&mut self, force: Vec2) {
        self.forces.push(force);
    }

    fn cast(&self, direction: Vec2, distance: f32, hits: &mut Vec<ProbeHit>) {
        self.casts.borrow_mut().push((direction, distance));
        if let Some(side) = SIDES.iter().find(|s| s.direction() == direction) {
            hits.extend(self.hits[*side as usize].iter().copied());
        }
    }

    fn is_collision_ignored(&self, other: ColliderId) -> bool {
        self.ignored.contains(&other)
    }

    fn touching_bodies(&self, out: &mut Vec<TouchingBody>) {
        out.extend(self.touching.iter().copied());
    }
}
