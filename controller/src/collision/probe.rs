use std::cell::Cell;

use log::trace;

use crate::contact_flags::ContactSide;
use crate::math::{Vec2, normalize_or_zero};
use crate::physics::{PhysicsBody, ProbeHit};

use super::settings::ProbeSettings;

impl ContactSide {
    /// Unit cast direction of the probe on this side.
    pub fn direction(self) -> Vec2 {
        match self {
            ContactSide::Bottom => Vec2::new(0.0, -1.0),
            ContactSide::Left => Vec2::new(-1.0, 0.0),
            ContactSide::Right => Vec2::new(1.0, 0.0),
            ContactSide::Top => Vec2::new(0.0, 1.0),
        }
    }
}

/// Directional contact query on one side of a body.
///
/// Every step the probe sweeps the body's collider a short distance along its
/// direction and keeps the hits whose normal passes the angle filter. The
/// aggregate normal is computed on first read and reused until the next refresh.
#[derive(Debug)]
pub struct ContactProbe {
    side: ContactSide,
    direction: Vec2,
    settings: ProbeSettings,
    min_probe_distance: f32,
    hits: Vec<ProbeHit>,
    normal: Cell<Option<Vec2>>,
}

impl ContactProbe {
    pub fn new(side: ContactSide, settings: ProbeSettings, min_probe_distance: f32) -> Self {
        Self {
            side,
            direction: side.direction(),
            settings,
            min_probe_distance,
            hits: Vec::new(),
            normal: Cell::new(None),
        }
    }

    /// Re-query the world for this step.
    ///
    /// The cast reaches `max(min_probe_distance, dot(velocity * dt, direction))`,
    /// so a body moving fast toward a surface senses it before arriving.
    pub fn refresh<P: PhysicsBody + ?Sized>(&mut self, physics: &P, dt: f32) {
        let travel = (physics.velocity() * dt).dot(&self.direction);
        let distance = self.min_probe_distance.max(travel);

        self.hits.clear();
        self.normal.set(None);
        physics.cast(self.direction, distance, &mut self.hits);

        let settings = self.settings;
        self.hits
            .retain(|hit| settings.accepts(hit.normal) && !physics.is_collision_ignored(hit.collider));

        trace!(
            "{:?} probe: {} hit(s) within {:.3} m",
            self.side,
            self.hits.len(),
            distance
        );
    }

    #[inline]
    pub fn side(&self) -> ContactSide {
        self.side
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    #[inline]
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    #[inline]
    pub fn has_hits(&self) -> bool {
        !self.hits.is_empty()
    }

    #[inline]
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    /// Accepted hits of the current step.
    #[inline]
    pub fn hits(&self) -> &[ProbeHit] {
        &self.hits
    }

    /// Normalized sum of the accepted hit normals, or zero without hits.
    pub fn normal(&self) -> Vec2 {
        if self.hits.is_empty() {
            return Vec2::zeros();
        }
        if let Some(cached) = self.normal.get() {
            return cached;
        }
        let sum = self.hits.iter().fold(Vec2::zeros(), |acc, hit| acc + hit.normal);
        let normal = normalize_or_zero(sum);
        self.normal.set(Some(normal));
        normal
    }
}
