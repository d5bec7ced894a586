//! Geometry utilities for the ring
//!
//! Vector, segment and circle math shared by movement, collision separation
//! and punch resolution. Every function is pure and total: degenerate input
//! (zero-length segments, coincident points, rays that miss) yields a
//! defined fallback instead of NaN.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Lengths below this are treated as zero.
pub const EPSILON_LEN: f32 = 1e-6;

// ============================================================================
// Vec2
// ============================================================================

/// 2D point / vector in screen pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Angle of this vector (`atan2(y, x)`).
    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Normalized copy, or `None` for a (near) zero vector.
    #[inline]
    pub fn try_normalize(self) -> Option<Vec2> {
        let len = self.length();
        if len > EPSILON_LEN {
            Some(Vec2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

// ============================================================================
// Scalar helpers
// ============================================================================

/// Ternary sign with a dead zone: -1, 0 or +1.
#[inline]
pub fn sign3(value: f32, dead_zone: f32) -> i32 {
    if value > dead_zone {
        1
    } else if value < -dead_zone {
        -1
    } else {
        0
    }
}

/// Rotate a vector by `angle_deg` degrees (screen coordinates).
pub fn rotate_vec(v: Vec2, angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

// ============================================================================
// Segment / circle
// ============================================================================

/// Closest point to `p` on segment `a..b`. A degenerate segment returns `a`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let ab_len2 = ab.length_squared();
    if ab_len2 <= 1e-9 {
        return a;
    }
    let t = ((p - a).dot(ab) / ab_len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Whether segment `a..b` touches the circle (`center`, `radius`).
pub fn segment_circle_hit(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = closest_point_on_segment(a, b, center);
    (center - closest).length_squared() <= radius * radius
}

/// First non-negative parameter `t` at which the ray `origin + t * dir`
/// enters the circle (`center`, `radius`). `dir` must be unit length.
///
/// Returns `None` when the ray misses or the circle lies entirely behind
/// the origin.
pub fn ray_circle_first_intersection(
    origin: Vec2,
    dir: Vec2,
    center: Vec2,
    radius: f32,
) -> Option<f32> {
    let d = origin - center;
    let b = 2.0 * d.dot(dir);
    let c = d.length_squared() - radius * radius;

    // a == 1 for a unit direction
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) * 0.5;
    let t2 = (-b + sqrt_disc) * 0.5;

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
