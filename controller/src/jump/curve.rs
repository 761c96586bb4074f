use crate::constants::DEFAULT_JUMP_SPEED;
use crate::error::{ConfigError, ensure_finite};

/// One control point of a [`JumpCurve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key.
    pub in_tangent: f32,
    /// Slope leaving this key.
    pub out_tangent: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    /// Key with flat tangents.
    pub const fn flat(time: f32, value: f32) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }
}

/// Jump speed over normalized jump time.
///
/// Cubic Hermite segments between keyframes; values are held constant outside
/// the key range.
#[derive(Clone, Debug, PartialEq)]
pub struct JumpCurve {
    keys: Vec<Keyframe>,
}

impl Default for JumpCurve {
    /// `ease_in_out(0, DEFAULT_JUMP_SPEED, 1, 0)`.
    fn default() -> Self {
        Self {
            keys: vec![Keyframe::flat(0.0, DEFAULT_JUMP_SPEED), Keyframe::flat(1.0, 0.0)],
        }
    }
}

impl JumpCurve {
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::EmptyCurve);
        }
        for key in &keys {
            ensure_finite("keyframe time", key.time)?;
            ensure_finite("keyframe value", key.value)?;
            ensure_finite("keyframe in tangent", key.in_tangent)?;
            ensure_finite("keyframe out tangent", key.out_tangent)?;
        }
        if let Some(index) = (1..keys.len()).find(|&i| keys[i].time <= keys[i - 1].time) {
            return Err(ConfigError::UnorderedKeyframes { index });
        }
        Ok(Self { keys })
    }

    /// Smooth start and stop between two values.
    pub fn ease_in_out(t0: f32, v0: f32, t1: f32, v1: f32) -> Result<Self, ConfigError> {
        Self::new(vec![Keyframe::flat(t0, v0), Keyframe::flat(t1, v1)])
    }

    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Result<Self, ConfigError> {
        let slope = (v1 - v0) / (t1 - t0);
        Self::new(vec![
            Keyframe::new(t0, v0, slope, slope),
            Keyframe::new(t1, v1, slope, slope),
        ])
    }

    pub fn constant(value: f32) -> Result<Self, ConfigError> {
        Self::new(vec![Keyframe::flat(0.0, value)])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; t lies in (keys[i-1], keys[i]].
        let i = self.keys.partition_point(|k| k.time < t);
        let (a, b) = (&self.keys[i - 1], &self.keys[i]);

        let span = b.time - a.time;
        let s = (t - a.time) / span;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * a.value + h10 * span * a.out_tangent + h01 * b.value + h11 * span * b.in_tangent
    }
}
