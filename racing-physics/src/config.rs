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
//! World and vehicle configuration
//!
//! Both config types are plain values with sensible defaults, `with_*`
//! builder methods and a `validate` pass. Nothing here is global: a world
//! owns its [`WorldConfig`] and every car owns its [`CarConfig`].
//!
//! With the `serde` feature both types (de)serialize, and missing fields
//! fall back to their defaults.

use crate::error::{PhysicsError, Result};
use crate::spatial::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH};

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Most sub-steps a single tick may be split into
pub const MAX_SUBSTEPS_PER_TICK: f64 = 1024.0;

/// Simulation-wide settings threaded into a [`World`](crate::World)
///
/// # Examples
///
/// ```
/// use racing_physics::WorldConfig;
///
/// let config = WorldConfig::default()
///     .with_units_per_meter(32.0)
///     .with_max_substep(1.0 / 120.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Items a quadtree leaf holds before it splits
    pub quadtree_capacity: usize,
    /// Deepest level the quadtree may split to
    pub quadtree_max_depth: usize,
    /// Longest frame delta a single tick will simulate, in seconds
    pub max_frame_delta: f64,
    /// Longest integration step, in seconds
    pub max_substep: f64,
    /// World units per simulated meter
    pub units_per_meter: f64,
    /// Gravity used for tire loads, in m/s²
    pub gravity: f64,
    /// Bounciness of contacts, 0 to 1
    pub restitution: f64,
    /// Fraction of the penetration removed per contact
    pub position_correction: f64,
    /// Factor applied to angular velocity after an impact
    pub angular_damping: f64,
    /// Whether the tick resolves contacts between solid bodies
    pub resolve_contacts: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            quadtree_capacity: DEFAULT_CAPACITY,
            quadtree_max_depth: DEFAULT_MAX_DEPTH,
            max_frame_delta: 0.25,
            max_substep: 1.0 / 60.0,
            units_per_meter: 1.0,
            gravity: STANDARD_GRAVITY,
            restitution: 0.3,
            position_correction: 0.2,
            angular_damping: 0.9,
            resolve_contacts: true,
        }
    }
}

impl WorldConfig {
    /// Set the quadtree leaf capacity
    pub fn with_quadtree_capacity(mut self, capacity: usize) -> Self {
        self.quadtree_capacity = capacity;
        self
    }

    /// Set the quadtree depth cap
    pub fn with_quadtree_max_depth(mut self, depth: usize) -> Self {
        self.quadtree_max_depth = depth;
        self
    }

    /// Set the longest frame delta a tick simulates
    pub fn with_max_frame_delta(mut self, seconds: f64) -> Self {
        self.max_frame_delta = seconds;
        self
    }

    /// Set the longest integration step
    pub fn with_max_substep(mut self, seconds: f64) -> Self {
        self.max_substep = seconds;
        self
    }

    /// Set the world-unit scale
    pub fn with_units_per_meter(mut self, units: f64) -> Self {
        self.units_per_meter = units;
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set contact restitution
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the position correction factor
    pub fn with_position_correction(mut self, factor: f64) -> Self {
        self.position_correction = factor;
        self
    }

    /// Set the post-impact angular damping factor
    pub fn with_angular_damping(mut self, factor: f64) -> Self {
        self.angular_damping = factor;
        self
    }

    /// Turn built-in contact resolution on or off
    pub fn with_contact_resolution(mut self, enabled: bool) -> Self {
        self.resolve_contacts = enabled;
        self
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        if self.quadtree_capacity == 0 {
            return Err(invalid("quadtree_capacity must be at least 1"));
        }
        positive(self.max_frame_delta, "max_frame_delta")?;
        positive(self.max_substep, "max_substep")?;
        if self.max_frame_delta / self.max_substep > MAX_SUBSTEPS_PER_TICK {
            return Err(invalid(
                "max_frame_delta / max_substep exceeds the sub-step limit per tick",
            ));
        }
        positive(self.units_per_meter, "units_per_meter")?;
        non_negative(self.gravity, "gravity")?;
        unit_interval(self.restitution, "restitution")?;
        unit_interval(self.position_correction, "position_correction")?;
        unit_interval(self.angular_damping, "angular_damping")?;
        Ok(())
    }
}

/// Geometry and tuning of a car for the bicycle model
///
/// Distances are in meters, forces in newtons. The cornering stiffness
/// values are negative: a positive slip angle produces a force pushing the
/// axle the other way.
///
/// # Examples
///
/// ```
/// use racing_physics::CarConfig;
///
/// let kart = CarConfig::default().with_mass(300.0).with_max_grip(3.0);
/// assert!(kart.validate().is_ok());
/// assert_eq!(kart.wheelbase(), 2.4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarConfig {
    /// Mass in kilograms
    pub mass: f64,
    /// Distance from the center of gravity to the front axle
    pub cg_to_front: f64,
    /// Distance from the center of gravity to the rear axle
    pub cg_to_rear: f64,
    /// Largest lateral grip coefficient a tire can produce
    pub max_grip: f64,
    /// Front cornering stiffness
    pub cornering_stiffness_front: f64,
    /// Rear cornering stiffness
    pub cornering_stiffness_rear: f64,
    /// Traction force at full throttle
    pub engine_force: f64,
    /// Braking force at full brake
    pub brake_force: f64,
    /// Share of traction that follows the steered wheels, 0 to 1
    pub drivetrain_ratio: f64,
    /// Linear rolling resistance coefficient
    pub resistance: f64,
    /// Quadratic aerodynamic drag coefficient
    pub drag: f64,
    /// Rotational inertia per kilogram of mass
    pub inertia_scale: f64,
}

impl Default for CarConfig {
    fn default() -> Self {
        CarConfig {
            mass: 1500.0,
            cg_to_front: 1.2,
            cg_to_rear: 1.2,
            max_grip: 2.0,
            cornering_stiffness_front: -5.0,
            cornering_stiffness_rear: -5.2,
            engine_force: 8000.0,
            brake_force: 12000.0,
            drivetrain_ratio: 0.5,
            resistance: 30.0,
            drag: 5.0,
            inertia_scale: 1.0,
        }
    }
}

impl CarConfig {
    /// Set the mass
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set both axle distances from the center of gravity
    pub fn with_axles(mut self, cg_to_front: f64, cg_to_rear: f64) -> Self {
        self.cg_to_front = cg_to_front;
        self.cg_to_rear = cg_to_rear;
        self
    }

    /// Set the lateral grip limit
    pub fn with_max_grip(mut self, max_grip: f64) -> Self {
        self.max_grip = max_grip;
        self
    }

    /// Set both cornering stiffness constants
    pub fn with_cornering_stiffness(mut self, front: f64, rear: f64) -> Self {
        self.cornering_stiffness_front = front;
        self.cornering_stiffness_rear = rear;
        self
    }

    /// Set the full-throttle traction force
    pub fn with_engine_force(mut self, force: f64) -> Self {
        self.engine_force = force;
        self
    }

    /// Set the full-brake force
    pub fn with_brake_force(mut self, force: f64) -> Self {
        self.brake_force = force;
        self
    }

    /// Set the drivetrain split
    pub fn with_drivetrain_ratio(mut self, ratio: f64) -> Self {
        self.drivetrain_ratio = ratio;
        self
    }

    /// Set linear resistance and quadratic drag
    pub fn with_resistance(mut self, resistance: f64, drag: f64) -> Self {
        self.resistance = resistance;
        self.drag = drag;
        self
    }

    /// Set the inertia scale
    pub fn with_inertia_scale(mut self, scale: f64) -> Self {
        self.inertia_scale = scale;
        self
    }

    /// Distance between the axles
    pub fn wheelbase(&self) -> f64 {
        self.cg_to_front + self.cg_to_rear
    }

    /// Rotational inertia
    pub fn inertia(&self) -> f64 {
        self.mass * self.inertia_scale
    }

    /// Check the car can be simulated
    pub fn validate(&self) -> Result<()> {
        let car = |msg: &str| PhysicsError::InvalidCar(msg.to_string());
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Err(car("mass must be positive and finite"));
        }
        if !(self.cg_to_front > 0.0 && self.cg_to_rear > 0.0) || !self.wheelbase().is_finite() {
            return Err(car("axle distances must be positive and finite"));
        }
        if !(self.max_grip >= 0.0 && self.max_grip.is_finite()) {
            return Err(car("max_grip must be non-negative and finite"));
        }
        if !(0.0..=1.0).contains(&self.drivetrain_ratio) {
            return Err(car("drivetrain_ratio must lie in [0, 1]"));
        }
        if !(self.inertia_scale > 0.0 && self.inertia_scale.is_finite()) {
            return Err(car("inertia_scale must be positive and finite"));
        }
        let others = [
            self.cornering_stiffness_front,
            self.cornering_stiffness_rear,
            self.engine_force,
            self.brake_force,
            self.resistance,
            self.drag,
        ];
        if others.iter().any(|v| !v.is_finite()) {
            return Err(car("tuning values must be finite"));
        }
        if self.resistance < 0.0 || self.drag < 0.0 {
            return Err(car("resistance and drag must be non-negative"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> PhysicsError {
    PhysicsError::InvalidConfig(msg.to_string())
}

fn positive(value: f64, name: &str) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be positive and finite, got {value}")))
    }
}

fn non_negative(value: f64, name: &str) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be non-negative and finite, got {value}")))
    }
}

fn unit_interval(value: f64, name: &str) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must lie in [0, 1], got {value}")))
    }
}
