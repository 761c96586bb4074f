//! rapier2d-backed physics world and the [`PhysicsBody`] view of one of its bodies.
//!
//! The world owns the full simulation pipeline (bodies, colliders, broad/narrow
//! phase, islands, joints, CCD) and steps it with gravity. Controlled bodies are
//! regular dynamic rigid bodies with locked rotations; the controller only reads
//! and writes their velocity.
//!
//! Pairwise collision ignoring (one-way platform passthrough) is enforced by a
//! contact-pair filter hook, and the same ignore list is what probes consult.

// Re-export Rapier so downstream crates can build scenes without depending on
// `rapier2d` directly.
pub use rapier2d;

use std::collections::HashSet;

use log::{debug, warn};
use rapier2d::na::{Isometry2, Translation2};
use rapier2d::parry::bounding_volume::BoundingVolume;
use rapier2d::parry::query::{ShapeCastOptions, cast_shapes};
use rapier2d::parry::shape::Shape;
use rapier2d::prelude::*;

use crate::constants::GRAVITY_MPS2;
use crate::error::ConfigError;
use crate::math::Vec2;
use crate::physics::{
    BodyId, ColliderId, PhysicsBody, ProbeHit, TouchingBody, pack_handle, unpack_handle,
};

/// Margin around the swept probe volume when gathering broad-phase candidates
/// (meters). Broad-phase leaves are only refit by [`RapierWorld::step`].
const BROAD_PHASE_MARGIN: f32 = 0.25;

/// Collider shapes the scene helpers can build.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Axis-aligned box in the body's frame, given by half-extents (meters).
    Cuboid { half_extents: Vec2 },

    /// Circle (meters).
    Ball { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Box with rounded corners (meters).
    ///
    /// `border_radius` is added around `half_extents`.
    RoundCuboid {
        half_extents: Vec2,
        border_radius: f32,
    },
}

/// Pose, shape and surface of a body to insert.
#[derive(Clone, Debug)]
pub struct BodyDef {
    /// World-space translation (meters).
    pub translation: Vec2,
    /// Rotation angle (radians).
    pub rotation: f32,
    pub shape: ColliderShapeDef,
    pub friction: f32,
}

impl BodyDef {
    pub fn cuboid(translation: Vec2, half_extents: Vec2) -> Self {
        Self {
            translation,
            rotation: 0.0,
            shape: ColliderShapeDef::Cuboid { half_extents },
            friction: 0.5,
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }
}

#[inline]
pub fn collider_id(handle: ColliderHandle) -> ColliderId {
    let (index, generation) = handle.into_raw_parts();
    ColliderId(pack_handle(index, generation))
}

#[inline]
pub fn body_id(handle: RigidBodyHandle) -> BodyId {
    let (index, generation) = handle.into_raw_parts();
    BodyId(pack_handle(index, generation))
}

#[inline]
pub fn collider_handle(id: ColliderId) -> ColliderHandle {
    let (index, generation) = unpack_handle(id.0);
    ColliderHandle::from_raw_parts(index, generation)
}

#[inline]
pub fn body_handle(id: BodyId) -> RigidBodyHandle {
    let (index, generation) = unpack_handle(id.0);
    RigidBodyHandle::from_raw_parts(index, generation)
}

/// Unordered collider pairs whose contacts are dropped.
#[derive(Clone, Debug, Default)]
pub struct IgnoredPairs {
    pairs: HashSet<(ColliderId, ColliderId)>,
}

impl IgnoredPairs {
    fn key(a: ColliderId, b: ColliderId) -> (ColliderId, ColliderId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn set(&mut self, a: ColliderId, b: ColliderId, ignore: bool) {
        if ignore {
            self.pairs.insert(Self::key(a, b));
        } else {
            self.pairs.remove(&Self::key(a, b));
        }
    }

    pub fn contains(&self, a: ColliderId, b: ColliderId) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }
}

impl PhysicsHooks for IgnoredPairs {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self.contains(collider_id(context.collider1), collider_id(context.collider2)) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }
}

/// A rapier2d simulation plus the ignore list its contact filter enforces.
pub struct RapierWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    ignored: IgnoredPairs,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: Vector::new(0.0, -GRAVITY_MPS2),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            ignored: IgnoredPairs::default(),
        }
    }

    /// Integrate one step of `dt` seconds. Forces added since the last step are
    /// applied once and then cleared.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        // NOTE: Rapier 0.31 signature:
        // step(gravity, params, islands, broad_phase, narrow_phase, bodies, colliders,
        //      impulse_joints, multibody_joints, ccd_solver, hooks, events)
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &self.ignored,
            &(),
        );

        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }
    }

    /// Static level geometry.
    pub fn insert_fixed(&mut self, def: &BodyDef) -> (RigidBodyHandle, ColliderHandle) {
        let rb = RigidBodyBuilder::fixed()
            .translation(def.translation)
            .rotation(def.rotation)
            .build();
        self.insert(rb, def)
    }

    /// A controlled character: dynamic, rotation locked, never asleep.
    pub fn insert_character(&mut self, def: &BodyDef) -> (RigidBodyHandle, ColliderHandle) {
        let rb = RigidBodyBuilder::dynamic()
            .translation(def.translation)
            .rotation(def.rotation)
            .lock_rotations()
            .can_sleep(false)
            .ccd_enabled(true)
            .build();
        self.insert(rb, def)
    }

    /// A moving platform driven by its velocity.
    pub fn insert_platform(&mut self, def: &BodyDef, velocity: Vec2) -> (RigidBodyHandle, ColliderHandle) {
        let rb = RigidBodyBuilder::kinematic_velocity_based()
            .translation(def.translation)
            .rotation(def.rotation)
            .linvel(velocity)
            .build();
        self.insert(rb, def)
    }

    fn insert(&mut self, rb: RigidBody, def: &BodyDef) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(rb);
        let collider = collider_from_def(&def.shape)
            .friction(def.friction)
            .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    pub fn set_collision_ignored(&mut self, a: ColliderHandle, b: ColliderHandle, ignore: bool) {
        debug!("collision {a:?} / {b:?} ignored: {ignore}");
        self.ignored.set(collider_id(a), collider_id(b), ignore);
    }

    pub fn is_collision_ignored(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.ignored.contains(collider_id(a), collider_id(b))
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|rb| *rb.translation())
    }

    pub fn set_linvel(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_linvel(velocity, true);
        }
    }

    /// Borrowed scene-query view over the broad phase.
    ///
    /// Colliders inserted since the last [`step`](Self::step) are not visible yet.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// The controller's view of `handle`.
    ///
    /// Fails when the body does not exist or has no collider to probe with.
    pub fn body(&mut self, handle: RigidBodyHandle) -> Result<RapierBody<'_>, ConfigError> {
        let rb = self
            .bodies
            .get(handle)
            .ok_or_else(|| ConfigError::MissingBody(format!("{handle:?}")))?;
        let collider = *rb
            .colliders()
            .first()
            .ok_or_else(|| ConfigError::MissingCollider(format!("{handle:?}")))?;
        Ok(RapierBody {
            world: self,
            body: handle,
            collider,
        })
    }
}

fn collider_from_def(shape: &ColliderShapeDef) -> ColliderBuilder {
    match shape {
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }

        ColliderShapeDef::Ball { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(half_extents.x, half_extents.y, *border_radius),
    }
}

/// Mutable view of one controlled body inside a [`RapierWorld`].
pub struct RapierBody<'a> {
    world: &'a mut RapierWorld,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl RapierBody<'_> {
    pub fn handle(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    fn rigid_body(&self) -> Option<&RigidBody> {
        self.world.bodies.get(self.body)
    }

    fn rigid_body_mut(&mut self) -> Option<&mut RigidBody> {
        self.world.bodies.get_mut(self.body)
    }
}

impl PhysicsBody for RapierBody<'_> {
    fn velocity(&self) -> Vec2 {
        self.rigid_body()
            .map(|rb| *rb.linvel())
            .unwrap_or_else(Vec2::zeros)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        if let Some(rb) = self.rigid_body_mut() {
            rb.set_linvel(velocity, true);
        }
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if let Some(rb) = self.rigid_body_mut() {
            rb.apply_impulse(impulse, true);
        }
    }

    fn add_force(&mut self, force: Vec2) {
        if let Some(rb) = self.rigid_body_mut() {
            rb.add_force(force, true);
        }
    }

    fn cast(&self, direction: Vec2, distance: f32, hits: &mut Vec<ProbeHit>) {
        let Some(own) = self.world.colliders.get(self.collider) else {
            return;
        };
        let start = own.position();
        let motion = direction * distance;
        let end = Isometry2::from_parts(
            Translation2::from(start.translation.vector + motion),
            start.rotation,
        );
        let swept = own
            .shape()
            .compute_swept_aabb(start, &end)
            .loosened(BROAD_PHASE_MARGIN);

        let mut options = ShapeCastOptions::with_max_time_of_impact(1.0);
        // Resting contacts overlap slightly; report them at distance zero.
        options.stop_at_penetration = true;
        options.compute_impact_geometry_on_penetration = true;

        let filter = QueryFilter::default()
            .exclude_rigid_body(self.body)
            .exclude_sensors();
        let queries = self.world.query_pipeline(filter);
        let still = Vector::zeros();
        for (handle, other) in queries.intersect_aabb_conservative(swept) {
            match cast_shapes(
                start,
                &motion,
                own.shape(),
                other.position(),
                &still,
                other.shape(),
                options,
            ) {
                Ok(Some(hit)) => hits.push(ProbeHit {
                    normal: other.position().rotation * hit.normal2.into_inner(),
                    distance: hit.time_of_impact * distance,
                    collider: collider_id(handle),
                    body: other.parent().map(body_id),
                }),
                Ok(None) => {}
                Err(_) => warn!("unsupported shape pair in probe cast against {handle:?}"),
            }
        }
    }

    fn is_collision_ignored(&self, other: ColliderId) -> bool {
        self.world.ignored.contains(collider_id(self.collider), other)
    }

    fn touching_bodies(&self, out: &mut Vec<TouchingBody>) {
        let world = &*self.world;
        for pair in world.narrow_phase.contact_pairs_with(self.collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            let other = if pair.collider1 == self.collider {
                pair.collider2
            } else {
                pair.collider1
            };
            let Some(parent) = world.colliders.get(other).and_then(|c| c.parent()) else {
                continue;
            };
            let Some(rb) = world.bodies.get(parent) else {
                continue;
            };
            let id = body_id(parent);
            if rb.is_fixed() || out.iter().any(|t| t.body == id) {
                continue;
            }
            out.push(TouchingBody {
                body: id,
                velocity: *rb.linvel(),
            });
        }
    }
}
