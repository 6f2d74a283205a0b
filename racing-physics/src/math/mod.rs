// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! 2D vector math
//!
//! A small double-precision vector type plus the free-function primitives
//! the rest of the engine is written against. Everything here is pure and
//! stateless; degenerate inputs resolve to neutral values instead of errors.

mod bounds;

pub use bounds::BoundingBox;

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// 2D vector with double-precision components
///
/// # Examples
///
/// ```
/// use racing_physics::math::Vec2;
///
/// let v = Vec2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert_eq!(Vec2::zero().normalized(), Vec2::zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vec2::new(0.0, 0.0)
    }

    /// Unit vector pointing along `angle` (radians, measured from +x)
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(cos, sin)
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared length, cheaper than [`Vec2::length`] for comparisons
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Dot product
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product of two planar vectors
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::zero()
        }
    }

    /// Counter-clockwise perpendicular `(-y, x)`
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Rotate by `angle` radians around the origin
    pub fn rotated(self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Distance to another point
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// Check that both components are finite
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// `a + b`
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

/// `a - b`
pub fn subtract(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

/// Scale `v` by `scalar`
pub fn multiply(v: Vec2, scalar: f64) -> Vec2 {
    v * scalar
}

/// Length of `v`
pub fn length(v: Vec2) -> f64 {
    v.length()
}

/// Squared length of `v`
pub fn squared_length(v: Vec2) -> f64 {
    v.length_squared()
}

/// Normalize `v`; the zero vector maps to itself
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalized()
}

/// Dot product of `a` and `b`
pub fn dot_product(a: Vec2, b: Vec2) -> f64 {
    a.dot(b)
}

/// Sign of `value` with an exact zero for zero
///
/// `f64::signum` returns `1.0` for `+0.0`, which would make a car at rest
/// brake "forwards".
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::zero()), Vec2::zero());
        assert_eq!(Vec2::new(f64::NAN, 0.0).normalized(), Vec2::zero());
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(Vec2::new(10.0, -10.0));
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_primitives() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(add(a, b), Vec2::new(4.0, 1.0));
        assert_eq!(subtract(a, b), Vec2::new(-2.0, 3.0));
        assert_eq!(multiply(a, 2.0), Vec2::new(2.0, 4.0));
        assert_eq!(dot_product(a, b), 1.0);
        assert_eq!(squared_length(b), 10.0);
        assert_eq!(length(Vec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_rotation() {
        let r = Vec2::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sign_of_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(2.0), 1.0);
    }
}
