/*!
Tuning defaults for the contact probes, the body and the jumpers.

Notes
- Distances are in meters, time in seconds, speeds in meters per second.
- Angles are in degrees, measured on the XY plane as `atan2(y, x)`.
- These are defaults. Per-body values live in the settings structs and are
  immutable once a character is built.
*/

use nalgebra::Vector2;

/// Shortest distance a probe casts, even when the body is at rest (meters).
/// Fast bodies probe further ahead along their velocity.
pub const DEFAULT_MIN_PROBE_DISTANCE: f32 = 0.1;

/// Accepted normal angles for ground contact.
pub const BOTTOM_NORMAL_RANGE: (f32, f32) = (15.0, 165.0);

/// Accepted normal angles for contact on the body's left side (wall facing +X).
pub const LEFT_NORMAL_RANGE: (f32, f32) = (-15.0, 15.0);

/// Accepted normal angles for contact on the body's right side (wall facing -X).
pub const RIGHT_NORMAL_RANGE: (f32, f32) = (165.0, 195.0);

/// Accepted normal angles for ceiling contact.
pub const TOP_NORMAL_RANGE: (f32, f32) = (-165.0, -15.0);

/// Per-axis velocity multiplier applied every step while touching the ground.
/// Values close to 1 are recommended.
pub const DEFAULT_GROUND_DAMPING: Vector2<f32> = Vector2::new(0.85, 1.0);

/// Per-axis velocity multiplier applied every step while airborne.
pub const DEFAULT_AIR_DAMPING: Vector2<f32> = Vector2::new(0.95, 1.0);

/// Multiplier applied to an attached platform's velocity before it is added to
/// the move target.
pub const DEFAULT_PLATFORM_VELOCITY_MULTIPLIER: f32 = 1.0;

/// Time length of one jump, which is also the time domain of one jump curve.
pub const DEFAULT_JUMP_COOLDOWN: f32 = 0.25;

/// Lower bound for any jump cooldown. Keeps curve time normalization finite.
pub const MIN_JUMP_COOLDOWN: f32 = 1.0e-3;

/// Exponential decay rate of the jump speed after a jump cancel (1/s).
/// Higher values give more abrupt short hops.
pub const DEFAULT_JUMP_CANCEL_DECAY_RATE: f32 = 10.0;

/// Extra grounded time after leaving the ground without jumping.
pub const DEFAULT_COYOTE_TIME: f32 = 0.2;

/// Jumps available before touching the ground again. Negative means unbounded.
pub const DEFAULT_MAXIMUM_JUMP_COUNT: i32 = 2;

/// Initial vertical speed of the default jump curve.
pub const DEFAULT_JUMP_SPEED: f32 = 7.0;

/// Default fixed simulation rate (Hz).
pub const DEFAULT_FIXED_HZ: f32 = 50.0;

/// Practical small length for normalization and comparisons.
pub const VEC_EPS: f32 = 1.0e-6;

/// Gravity magnitude in meters per second squared (positive value).
/// Applied by the physics world as a downward acceleration.
pub const GRAVITY_MPS2: f32 = 9.81;
