//! Geometry kernel for tile face culling: points, planes and polygon clipping.
//!
//! Points are stored in `f64`, but the plane math rounds through `f32` at the
//! same places the legacy renderer did so clip results match it exactly.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

pub mod plane;
pub mod polygon;
pub mod polygon2d;
pub mod ray2d;

pub use plane::Plane;
pub use polygon::{PlaneRect, Polygon};
pub use ray2d::Ray2d;

/// General point/plane comparison tolerance.
pub const EPSILON: f64 = 5e-4;
/// Tolerance used when clipping tilted fragments by the box planes.
pub const CUT_EPSILON: f64 = 5e-4;
/// Tolerance for world-space plane coincidence between neighbouring boxes.
pub const BOUNDARY_EPSILON: f64 = 1e-9;
/// Tolerance for raw grid coordinates.
pub const RAW_COORD_EPSILON: f64 = 1e-6;

/// Rounds to the nearest `f32` and widens back.
#[inline]
pub fn fround(v: f64) -> f64 {
    v as f32 as f64
}

/// Index of the axis that is neither `one` nor `two`.
#[inline]
pub fn third_axis(one: usize, two: usize) -> usize {
    match (one.min(two), one.max(two)) {
        (0, 1) => 2,
        (0, 2) => 1,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Copy of `self` with one axis replaced.
    #[inline]
    pub fn with_axis(mut self, axis: usize, value: f64) -> Vec3 {
        self[axis] = value;
        self
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Component-wise equality within `eps`. Any NaN difference compares unequal.
    #[inline]
    pub fn approx_eq(self, rhs: Vec3, eps: f64) -> bool {
        (self.x - rhs.x).abs() <= eps && (self.y - rhs.y).abs() <= eps && (self.z - rhs.z).abs() <= eps
    }

    // --- f32-faithful variants ---

    /// Subtraction with each component rounded to `f32`.
    #[inline]
    pub fn sub_f32(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            fround(self.x - rhs.x),
            fround(self.y - rhs.y),
            fround(self.z - rhs.z),
        )
    }

    /// Cross product with every product and difference rounded to `f32`.
    #[inline]
    pub fn cross_f32(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            fround(fround(self.y * rhs.z) - fround(self.z * rhs.y)),
            fround(fround(self.z * rhs.x) - fround(self.x * rhs.z)),
            fround(fround(self.x * rhs.y) - fround(self.y * rhs.x)),
        )
    }

    /// Dot product accumulated left to right in `f32`.
    #[inline]
    pub fn dot_f32(self, rhs: Vec3) -> f64 {
        fround(fround(fround(self.x * rhs.x) + fround(self.y * rhs.y)) + fround(self.z * rhs.z))
    }

    #[inline]
    pub fn length_f32(self) -> f64 {
        fround(hypot3(self.x, self.y, self.z))
    }

    /// Normalizes with an `f32` length. A zero vector yields NaN components.
    #[inline]
    pub fn normalized_f32(self) -> Vec3 {
        let len = self.length_f32();
        Vec3::new(
            fround(self.x / len),
            fround(self.y / len),
            fround(self.z / len),
        )
    }

    #[inline]
    pub fn rounded_f32(self) -> Vec3 {
        Vec3::new(fround(self.x), fround(self.y), fround(self.z))
    }

    #[inline]
    pub fn has_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;
    #[inline]
    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<usize> for Vec3 {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Axis-aligned bounds in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Three-way hypotenuse scaled by the largest magnitude, with the squares
/// summed under Kahan compensation. Infinity wins over NaN.
fn hypot3(x: f64, y: f64, z: f64) -> f64 {
    let abs = [x.abs(), y.abs(), z.abs()];
    let mut max = 0.0f64;
    let mut has_nan = false;
    for a in abs {
        if a.is_nan() {
            has_nan = true;
        } else if a > max {
            max = a;
        }
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    if has_nan {
        return f64::NAN;
    }
    if max == 0.0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for a in abs {
        let n = a / max;
        let summand = n * n - compensation;
        let preliminary = sum + summand;
        compensation = (preliminary - sum) - summand;
        sum = preliminary;
    }
    sum.sqrt() * max
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn index_matches_fields(v in any::<Vec3>()) {
            prop_assume!(!v.has_nan());
            prop_assert_eq!(v[0], v.x);
            prop_assert_eq!(v[1], v.y);
            prop_assert_eq!(v[2], v.z);
        }
    }

    #[test]
    fn fround_truncates_to_single_precision() {
        assert_eq!(fround(0.1), 0.1f32 as f64);
        assert_ne!(fround(0.1), 0.1);
        assert_eq!(fround(0.5), 0.5);
    }

    #[test]
    fn hypot3_scales_by_largest_component() {
        assert_eq!(hypot3(4.0, -8.0, 8.0), 12.0);
        assert_eq!(hypot3(-2.0, 1.0, 2.0), 3.0);
        assert_eq!(hypot3(1.0, 1.0, 1.0), 3.0f64.sqrt());
        assert_eq!(hypot3(0.0, -0.0, 0.0), 0.0);
        assert_eq!(hypot3(1e-200, 0.0, 0.0), 1e-200);
        assert_eq!(hypot3(1e300, 0.0, 0.0), 1e300);
        assert_eq!(hypot3(f64::NAN, f64::NEG_INFINITY, 1.0), f64::INFINITY);
        assert!(hypot3(f64::NAN, 1.0, 1.0).is_nan());
        assert_eq!(Vec3::new(0.0, 8.0, -16.0).length_f32(), fround(hypot3(0.0, 8.0, 16.0)));
    }

    #[test]
    fn third_axis_covers_all_pairs() {
        assert_eq!(third_axis(1, 2), 0);
        assert_eq!(third_axis(2, 1), 0);
        assert_eq!(third_axis(0, 2), 1);
        assert_eq!(third_axis(0, 1), 2);
    }

    #[test]
    fn zero_vector_normalizes_to_nan() {
        assert!(Vec3::ZERO.normalized_f32().has_nan());
    }
}
