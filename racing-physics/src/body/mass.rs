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
//! Body mass

use crate::error::{PhysicsError, Result};

/// Mass of a body in kilograms
///
/// Zero or near-zero mass marks an immovable body. Its inverse mass is
/// zero, so impulses and forces never move it.
///
/// # Examples
///
/// ```
/// use racing_physics::body::Mass;
///
/// let mass = Mass::new(1500.0).unwrap();
/// assert_eq!(mass.inverse(), 1.0 / 1500.0);
/// assert!(Mass::immovable().is_immovable());
/// assert!(Mass::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    value: f64,
}

impl Mass {
    /// Threshold below which mass is considered effectively zero (immovable)
    pub const IMMOVABLE_THRESHOLD: f64 = 1e-10;

    /// Create a mass, rejecting negative and non-finite values
    pub fn new(value: f64) -> Result<Self> {
        if value >= 0.0 && value.is_finite() {
            Ok(Mass { value })
        } else {
            Err(PhysicsError::InvalidMass(value))
        }
    }

    /// Mass of a body that nothing can move
    pub fn immovable() -> Self {
        Mass { value: 0.0 }
    }

    /// Mass in kilograms
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Check if this is an immovable body (zero or near-zero mass)
    pub fn is_immovable(&self) -> bool {
        self.value < Self::IMMOVABLE_THRESHOLD
    }

    /// `1 / mass`, or zero for immovable bodies
    pub fn inverse(&self) -> f64 {
        if self.is_immovable() {
            0.0
        } else {
            1.0 / self.value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_mass() {
        assert_eq!(Mass::new(2.0).unwrap().inverse(), 0.5);
        assert_eq!(Mass::new(0.0).unwrap().inverse(), 0.0);
        assert_eq!(Mass::new(1e-12).unwrap().inverse(), 0.0);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(Mass::new(f64::NAN).is_err());
        assert!(Mass::new(f64::INFINITY).is_err());
        assert_eq!(Mass::new(-3.0), Err(PhysicsError::InvalidMass(-3.0)));
    }
}
