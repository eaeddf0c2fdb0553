//! Minimal vector math shared by the builder, picking and cameras.
//!
//! World space is Y-up. A layout's ground-plane `(x, y)` maps to world
//! `(x, _, z)`.

use serde::{Deserialize, Serialize};

/// World-space point or direction, Y-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Unit vector in the same direction; zero stays zero.
    pub fn normalize(&self) -> Self {
        match self.length() {
            len if len > 0.0 => Self::new(self.x / len, self.y / len, self.z / len),
            _ => Self::ZERO,
        }
    }

    /// Component-wise approximate equality, for tests and pose checks.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.zip(*other, |a, b| (a - b).abs())
            .to_array()
            .iter()
            .all(|d| *d <= eps)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

/// A half-line used for pointer picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let half = extents * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test. Returns the entry distance along the ray, or the exit
    /// distance when the origin is already inside.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let o = ray.origin.to_array();
        let d = ray.direction.to_array();
        let lo = self.min.to_array();
        let hi = self.max.to_array();

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            if d[axis].abs() < 1e-8 {
                if o[axis] < lo[axis] || o[axis] > hi[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d[axis];
            let mut t0 = (lo[axis] - o[axis]) * inv;
            let mut t1 = (hi[axis] - o[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
        if t_far < 0.0 {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_zero_and_scales_to_unit() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let v = Vec3::new(3.0, 0.0, -4.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.approx_eq(&Vec3::new(0.6, 0.0, -0.8), 1e-6));
        assert_eq!(Vec3::from_array(v.to_array()), v);
    }

    #[test]
    fn ray_hits_box_in_front() {
        let b = Aabb::from_center_extents(Vec3::new(0.0, 0.0, -5.0), Vec3::new(2.0, 2.0, 2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = b.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box_behind() {
        let b = Aabb::from_center_extents(Vec3::new(0.0, 0.0, 5.0), Vec3::new(2.0, 2.0, 2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn flat_box_is_hit_from_above() {
        let floor = Aabb::from_center_extents(Vec3::new(2.0, 0.0, 1.5), Vec3::new(4.0, 0.0, 3.0));
        let ray = Ray::new(Vec3::new(1.0, 5.0, 1.0), Vec3::new(0.0, -1.0, 0.0));
        let t = floor.intersect(&ray).unwrap();
        assert!(ray.at(t).approx_eq(&Vec3::new(1.0, 0.0, 1.0), 1e-5));
    }
}
