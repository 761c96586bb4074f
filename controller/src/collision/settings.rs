/*!
Contact probe filter settings.

Each probe only accepts hits whose surface normal points back toward the body
from its side. The filter is an angle range on the XY plane, in degrees, measured
as `atan2(y, x)`:

- bottom: `[15, 165]`   (ground, normals pointing up)
- left:   `[-15, 15]`   (walls facing +X)
- right:  `[165, 195]`  (walls facing -X)
- top:    `[-165, -15]` (ceilings, normals pointing down)

Ranges are compared modulo 360, so a range may cross the ±180 seam.
*/

use crate::constants::{
    BOTTOM_NORMAL_RANGE, DEFAULT_MIN_PROBE_DISTANCE, LEFT_NORMAL_RANGE, RIGHT_NORMAL_RANGE,
    TOP_NORMAL_RANGE,
};
use crate::error::{ConfigError, ensure_finite, ensure_non_negative};
use crate::math::{Vec2, normal_angle_deg};

/// Accepted normal-angle range of one probe, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeSettings {
    pub min_normal_angle: f32,
    pub max_normal_angle: f32,
}

impl ProbeSettings {
    pub const fn new(min_normal_angle: f32, max_normal_angle: f32) -> Self {
        Self {
            min_normal_angle,
            max_normal_angle,
        }
    }

    /// Whether a hit with this surface normal passes the filter.
    pub fn accepts(&self, normal: Vec2) -> bool {
        let width = self.max_normal_angle - self.min_normal_angle;
        if width >= 360.0 {
            return true;
        }
        let offset = (normal_angle_deg(normal) - self.min_normal_angle).rem_euclid(360.0);
        offset <= width
    }

    /// Right-side settings mirrored from left-side settings (angles + 180).
    pub fn mirror_left_to_right(left: &ProbeSettings) -> ProbeSettings {
        ProbeSettings::new(left.min_normal_angle + 180.0, left.max_normal_angle + 180.0)
    }

    /// Top settings mirrored from bottom settings (angles - 180).
    pub fn mirror_bottom_to_top(bottom: &ProbeSettings) -> ProbeSettings {
        ProbeSettings::new(bottom.min_normal_angle - 180.0, bottom.max_normal_angle - 180.0)
    }

    pub fn validate(&self, probe: &'static str) -> Result<(), ConfigError> {
        ensure_finite("probe min normal angle", self.min_normal_angle)?;
        ensure_finite("probe max normal angle", self.max_normal_angle)?;
        if self.min_normal_angle > self.max_normal_angle {
            return Err(ConfigError::InvertedNormalRange {
                probe,
                min: self.min_normal_angle,
                max: self.max_normal_angle,
            });
        }
        Ok(())
    }
}

/// Filters and probe distance for the four probes of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSettings {
    pub bottom: ProbeSettings,
    pub left: ProbeSettings,
    pub right: ProbeSettings,
    pub top: ProbeSettings,
    /// Shortest cast distance (meters), used when the body is at rest.
    pub min_probe_distance: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            bottom: ProbeSettings::new(BOTTOM_NORMAL_RANGE.0, BOTTOM_NORMAL_RANGE.1),
            left: ProbeSettings::new(LEFT_NORMAL_RANGE.0, LEFT_NORMAL_RANGE.1),
            right: ProbeSettings::new(RIGHT_NORMAL_RANGE.0, RIGHT_NORMAL_RANGE.1),
            top: ProbeSettings::new(TOP_NORMAL_RANGE.0, TOP_NORMAL_RANGE.1),
            min_probe_distance: DEFAULT_MIN_PROBE_DISTANCE,
        }
    }
}

impl CollisionSettings {
    /// Builds symmetric settings: right mirrors left and top mirrors bottom.
    pub fn mirrored(bottom: ProbeSettings, left: ProbeSettings, min_probe_distance: f32) -> Self {
        Self {
            bottom,
            left,
            right: ProbeSettings::mirror_left_to_right(&left),
            top: ProbeSettings::mirror_bottom_to_top(&bottom),
            min_probe_distance,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bottom.validate("bottom")?;
        self.left.validate("left")?;
        self.right.validate("right")?;
        self.top.validate("top")?;
        ensure_non_negative("min probe distance", self.min_probe_distance)?;
        Ok(())
    }
}
