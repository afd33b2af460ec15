//! Pure vector and geometry helpers.

use std::f64::consts::{PI, TAU};

use crate::types::Vec2;

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    a.distance(b)
}

/// Unit vector in the direction of `v`, or zero for a zero-length input.
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Clamp `v` into `[lo, hi]`. Unlike `f64::clamp` this never panics on an
/// inverted range; `lo` wins.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Wrap an angle into `[-PI, PI)`.
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Heading of `v` in radians (atan2 convention).
pub fn angle_of(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Unit vector pointing along `angle`.
pub fn from_angle(angle: f64) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Turn unit heading `current` toward `desired`, by at most `max_turn` radians.
pub fn rotate_toward(current: Vec2, desired: Vec2, max_turn: f64) -> Vec2 {
    let cur = angle_of(current);
    let diff = wrap_angle(angle_of(desired) - cur);
    from_angle(cur + clamp(diff, -max_turn, max_turn))
}

/// Squared distance from `p` to the segment `a..b`.
pub fn segment_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(a);
    }
    let t = clamp((p - a).dot(ab) / len_sq, 0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// Clamp a point into the `[0, width] x [0, height]` box.
pub fn clamp_to_arena(p: Vec2, width: f64, height: f64) -> Vec2 {
    Vec2::new(clamp(p.x, 0.0, width), clamp(p.y, 0.0, height))
}

/// Scale `v` down so its length does not exceed `max_len`.
pub fn cap_length(v: Vec2, max_len: f64) -> Vec2 {
    let len = v.length();
    if len > max_len && len > 0.0 {
        v * (max_len / len)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_angle_range() {
        for a in [-10.0, -PI, 0.0, PI, 7.5, 100.0] {
            let w = wrap_angle(a);
            assert!((-PI..PI).contains(&w), "{a} wrapped to {w}");
        }
    }

    #[test]
    fn test_rotate_toward_is_bounded() {
        let cur = Vec2::new(1.0, 0.0);
        let desired = Vec2::new(-1.0, 0.01);
        let turned = rotate_toward(cur, desired, 0.1);
        assert!((angle_of(turned) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((segment_distance_sq(Vec2::new(5.0, 3.0), a, b) - 9.0).abs() < 1e-12);
        assert!((segment_distance_sq(Vec2::new(-4.0, 0.0), a, b) - 16.0).abs() < 1e-12);
        assert!((segment_distance_sq(Vec2::new(13.0, 4.0), a, b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_cap_length() {
        let v = cap_length(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-9);
        assert_eq!(cap_length(Vec2::new(1.0, 1.0), 10.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_lerp_and_clamp() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
    }
}
