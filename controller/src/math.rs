use nalgebra as na;

use crate::constants::VEC_EPS;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;

/// Angle of a normal on the XY plane in degrees, `atan2(y, x)`, in `(-180, 180]`.
#[inline]
pub fn normal_angle_deg(normal: Vec2) -> f32 {
    normal.y.atan2(normal.x).to_degrees()
}

/// Normalizes `v`, or returns the zero vector when `v` is too short to have a direction.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    v.try_normalize(VEC_EPS).unwrap_or_else(Vec2::zeros)
}

/// Component-wise product.
#[inline]
pub fn scale_per_axis(v: Vec2, factors: Vec2) -> Vec2 {
    v.component_mul(&factors)
}

/// Spherical interpolation between two velocities.
///
/// The direction rotates by `t` of the angle between `a` and `b` while the
/// magnitude interpolates linearly, so a blend follows direction changes instead
/// of cutting through the origin.
/// - `t` is clamped to `[0, 1]`; `t = 0` returns `a` and `t = 1` returns `b` exactly.
/// - Degenerate inputs (a zero vector, or opposite directions where the rotation
///   sense is undefined) fall back to a linear blend.
pub fn slerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }

    let len_a = a.norm();
    let len_b = b.norm();
    if len_a <= VEC_EPS || len_b <= VEC_EPS {
        return a.lerp(&b, t);
    }

    // Signed angle from a to b.
    let cross = a.x * b.y - a.y * b.x;
    let angle = cross.atan2(a.dot(&b));
    if angle.abs() >= std::f32::consts::PI - 1.0e-4 {
        return a.lerp(&b, t);
    }

    let dir = na::Rotation2::new(angle * t) * (a / len_a);
    dir * (len_a + (len_b - len_a) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).norm() < EPS
    }

    #[test]
    fn slerp_endpoints_are_exact() {
        let a = Vec2::new(3.0, -2.0);
        let b = Vec2::new(5.0, 0.25);
        assert_eq!(slerp(a, b, 0.0), a);
        assert_eq!(slerp(a, b, 1.0), b);
        assert_eq!(slerp(a, b, 1.5), b);
        assert_eq!(slerp(a, b, -1.0), a);
    }

    #[test]
    fn slerp_rotates_direction_and_lerps_magnitude() {
        let a = Vec2::new(2.0, 0.0);
        let b = Vec2::new(0.0, 4.0);

        let half = slerp(a, b, 0.5);

        // Halfway through a quarter turn, with magnitude halfway between 2 and 4.
        let expected = Vec2::new(1.0, 1.0).normalize() * 3.0;
        assert!(approx(half, expected), "half = {half:?}");
    }

    #[test]
    fn slerp_same_direction_is_a_magnitude_lerp() {
        let a = Vec2::new(0.0, -1.0);
        let b = Vec2::new(0.0, -3.0);
        assert!(approx(slerp(a, b, 0.25), Vec2::new(0.0, -1.5)));
    }

    #[test]
    fn slerp_from_rest_falls_back_to_lerp() {
        let a = Vec2::zeros();
        let b = Vec2::new(4.0, 2.0);
        assert!(approx(slerp(a, b, 0.5), Vec2::new(2.0, 1.0)));
    }

    #[test]
    fn slerp_opposite_directions_fall_back_to_lerp() {
        let a = Vec2::new(5.0, 0.0);
        let b = Vec2::new(-5.0, 0.0);
        assert!(approx(slerp(a, b, 0.5), Vec2::zeros()));
    }

    #[test]
    fn normal_angle_is_measured_from_positive_x() {
        assert!((normal_angle_deg(Vec2::new(0.0, 1.0)) - 90.0).abs() < EPS);
        assert!((normal_angle_deg(Vec2::new(1.0, 0.0))).abs() < EPS);
        assert!((normal_angle_deg(Vec2::new(0.0, -1.0)) + 90.0).abs() < EPS);
    }

    #[test]
    fn normalize_or_zero_handles_cancelling_normals() {
        assert_eq!(normalize_or_zero(Vec2::zeros()), Vec2::zeros());
        assert!(approx(normalize_or_zero(Vec2::new(0.0, 2.0)), Vec2::new(0.0, 1.0)));
    }
}
