use log::debug;

use crate::contact_flags::{ContactFlags, ContactSide};
use crate::error::ConfigError;
use crate::math::{Vec2, normalize_or_zero};
use crate::physics::PhysicsBody;

use super::probe::ContactProbe;
use super::settings::CollisionSettings;

/// The four contact probes of a body and the predicates derived from them.
#[derive(Debug)]
pub struct CollisionState {
    down: ContactProbe,
    left: ContactProbe,
    right: ContactProbe,
    up: ContactProbe,
    flags: ContactFlags,
}

impl CollisionState {
    pub fn new(settings: &CollisionSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let d = settings.min_probe_distance;
        Ok(Self {
            down: ContactProbe::new(ContactSide::Bottom, settings.bottom, d),
            left: ContactProbe::new(ContactSide::Left, settings.left, d),
            right: ContactProbe::new(ContactSide::Right, settings.right, d),
            up: ContactProbe::new(ContactSide::Top, settings.top, d),
            flags: ContactFlags::empty(),
        })
    }

    /// Refresh all probes in the order down, left, right, up.
    pub fn refresh<P: PhysicsBody + ?Sized>(&mut self, physics: &P, dt: f32) {
        self.down.refresh(physics, dt);
        self.left.refresh(physics, dt);
        self.right.refresh(physics, dt);
        self.up.refresh(physics, dt);

        let mut flags = ContactFlags::empty();
        flags.set(ContactSide::Bottom, self.down.has_hits());
        flags.set(ContactSide::Left, self.left.has_hits());
        flags.set(ContactSide::Right, self.right.has_hits());
        flags.set(ContactSide::Top, self.up.has_hits());
        if flags != self.flags {
            debug!("contacts changed: {:#06b} -> {:#06b}", self.flags.bits, flags.bits);
            self.flags = flags;
        }
    }

    pub fn probe(&self, side: ContactSide) -> &ContactProbe {
        match side {
            ContactSide::Bottom => &self.down,
            ContactSide::Left => &self.left,
            ContactSide::Right => &self.right,
            ContactSide::Top => &self.up,
        }
    }

    /// Sides in contact as of the last refresh.
    #[inline]
    pub fn flags(&self) -> ContactFlags {
        self.flags
    }

    #[inline]
    pub fn is_touching_bottom(&self) -> bool {
        self.down.has_hits()
    }

    #[inline]
    pub fn is_touching_top(&self) -> bool {
        self.up.has_hits()
    }

    #[inline]
    pub fn is_touching_left(&self) -> bool {
        self.left.has_hits()
    }

    #[inline]
    pub fn is_touching_right(&self) -> bool {
        self.right.has_hits()
    }

    #[inline]
    pub fn is_touching_side(&self) -> bool {
        self.is_touching_left() || self.is_touching_right()
    }

    pub fn bottom_normal(&self) -> Vec2 {
        self.down.normal()
    }

    pub fn top_normal(&self) -> Vec2 {
        self.up.normal()
    }

    pub fn left_normal(&self) -> Vec2 {
        self.left.normal()
    }

    pub fn right_normal(&self) -> Vec2 {
        self.right.normal()
    }

    /// Combined wall normal, zero when neither side touches anything.
    pub fn side_normal(&self) -> Vec2 {
        normalize_or_zero(self.left.normal() + self.right.normal())
    }
}
