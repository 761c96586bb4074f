//! Boundary between the controller and the physics engine.
//!
//! The controller never integrates motion or resolves contacts itself. Each step it
//! reads the body's velocity, casts the body's collider in the four probe
//! directions, checks pairwise ignore state, and writes a velocity back. Engines
//! plug in by implementing [`PhysicsBody`] for a per-body view
//! (see [`crate::rapier_world::RapierBody`]).

use crate::math::Vec2;

/// Engine-agnostic collider identity.
///
/// Engines with generational handles pack `(index, generation)` as
/// `index | generation << 32` (see [`pack_handle`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// Engine-agnostic rigid-body identity. Same packing as [`ColliderId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Packs a generational `(index, generation)` handle into a single `u64`.
///
/// # Bit layout
/// - bits 0..=31  : index
/// - bits 32..=63 : generation
#[inline]
pub fn pack_handle(index: u32, generation: u32) -> u64 {
    (index as u64) | ((generation as u64) << u32::BITS)
}

/// Inverse of [`pack_handle`].
#[inline]
pub fn unpack_handle(packed: u64) -> (u32, u32) {
    const INDEX_MASK: u64 = u32::MAX as u64;
    ((packed & INDEX_MASK) as u32, (packed >> u32::BITS) as u32)
}

/// One hit of a collider cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    /// World-space surface normal of the hit collider, pointing away from it.
    pub normal: Vec2,
    /// Distance travelled along the cast direction before contact (meters).
    pub distance: f32,
    /// The collider that was hit.
    pub collider: ColliderId,
    /// The rigid body owning the hit collider, if any.
    pub body: Option<BodyId>,
}

/// A non-static rigid body currently in contact with the controlled body.
///
/// Its velocity is what lets a moving platform carry the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchingBody {
    pub body: BodyId,
    pub velocity: Vec2,
}

/// The physics engine's view of one controlled body.
pub trait PhysicsBody {
    /// Current linear velocity (m/s).
    fn velocity(&self) -> Vec2;

    /// Overwrite the linear velocity (m/s).
    fn set_velocity(&mut self, velocity: Vec2);

    /// Instantaneous change of momentum.
    fn apply_impulse(&mut self, impulse: Vec2);

    /// Continuous force for the next integration step only.
    fn add_force(&mut self, force: Vec2);

    /// Sweep the body's collider along `direction` (unit) for `distance` meters and
    /// append every hit to `hits`. No filtering is applied here.
    fn cast(&self, direction: Vec2, distance: f32, hits: &mut Vec<ProbeHit>);

    /// Whether collisions between the body's collider and `other` are currently ignored.
    fn is_collision_ignored(&self, other: ColliderId) -> bool;

    /// Append the non-static rigid bodies currently in contact with the body.
    fn touching_bodies(&self, out: &mut Vec<TouchingBody>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_packing_round_trips_extremes() {
        let samples = [(0, 0), (1, 0), (0, 1), (42, 7), (u32::MAX, u32::MAX)];
        for &(index, generation) in &samples {
            assert_eq!(unpack_handle(pack_handle(index, generation)), (index, generation));
        }
    }

    #[test]
    fn handle_packing_places_generation_in_high_bits() {
        assert_eq!(pack_handle(5, 3), 5 | (3 << 32));
    }
}
