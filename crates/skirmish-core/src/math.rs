use core::ops::{Add, AddAssign, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// Distance projected onto the ground plane (x/z).
    pub fn flat_distance(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn normalize_or_zero(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    /// Yaw (radians) of the direction from `self` to `target` on the ground plane.
    pub fn yaw_to(self, target: Vec3) -> f32 {
        (target.z - self.z).atan2(target.x - self.x)
    }

    /// Unit vector on the ground plane for a yaw angle.
    pub fn from_yaw(yaw: f32) -> Vec3 {
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Perpendicular on the ground plane (90 degrees counter-clockwise).
    pub fn flat_perp(self) -> Vec3 {
        Vec3::new(-self.z, 0.0, self.x)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(mut a: f32) -> f32 {
    use core::f32::consts::{PI, TAU};
    while a > PI {
        a -= TAU;
    }
    while a <= -PI {
        a += TAU;
    }
    a
}

/// Axis-aligned box described by center and half extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub const fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    pub fn expanded(&self, pad: f32) -> Aabb {
        Aabb::new(
            self.center,
            self.half_extents + Vec3::new(pad, pad, pad),
        )
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y && p.z >= min.z && p.z <= max.z
    }
}

/// Slab test: does the segment `a -> b` pass through `aabb`?
pub fn segment_intersects_aabb(a: Vec3, b: Vec3, aabb: &Aabb) -> bool {
    let min = aabb.min();
    let max = aabb.max();
    let dir = b - a;

    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for (origin, delta, lo, hi) in [
        (a.x, dir.x, min.x, max.x),
        (a.y, dir.y, min.y, max.y),
        (a.z, dir.z, min.z, max.z),
    ] {
        if delta.abs() <= f32::EPSILON {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / delta;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            core::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_range() {
        use core::f32::consts::PI;
        for a in [-10.0f32, -PI, 0.0, PI, 3.5, 10.0] {
            let w = wrap_angle(a);
            assert!(w > -PI - 1e-4 && w <= PI + 1e-4, "wrapped {a} to {w}");
        }
    }

    #[test]
    fn segment_hits_box_through_middle() {
        let b = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(segment_intersects_aabb(
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            &b
        ));
    }

    #[test]
    fn segment_misses_box_to_the_side() {
        let b = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(!segment_intersects_aabb(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(10.0, 0.0, 5.0),
            &b
        ));
    }

    #[test]
    fn segment_stopping_short_misses() {
        let b = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(!segment_intersects_aabb(
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            &b
        ));
    }

    #[test]
    fn default_box_is_a_point_at_the_origin() {
        let b = Aabb::default();
        assert_eq!(b.min(), Vec3::ZERO);
        assert_eq!(b.max(), Vec3::ZERO);
        assert!(b.contains(Vec3::ZERO));
    }

    #[test]
    fn yaw_round_trips_through_direction() {
        let from = Vec3::ZERO;
        let to = Vec3::new(1.0, 0.0, 1.0);
        let yaw = from.yaw_to(to);
        let dir = Vec3::from_yaw(yaw);
        assert!((dir.x - dir.z).abs() < 1e-5);
    }
}
