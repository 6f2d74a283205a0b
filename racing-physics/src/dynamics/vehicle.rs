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
//! Bicycle-model car dynamics
//!
//! The car is reduced to one front and one rear axle on its center line.
//! Each tick the world velocity is resolved into the car frame (`x` forward,
//! `y` to the left), tire slip angles give clamped lateral forces, throttle
//! and brake give traction, and linear plus quadratic resistance opposes
//! motion along both local axes independently.
//!
//! [`CarBody::forces`] is a pure function of state and controls; the world
//! integrates its result with the body's other motion.

use crate::config::CarConfig;
use crate::error::Result;
use crate::math::{sign, Vec2};
use std::f64::consts::FRAC_PI_4;

/// Steering limit in radians, either way
pub const MAX_STEER_ANGLE: f64 = FRAC_PI_4;

/// Car-specific state carried by a body
#[derive(Debug, Clone, PartialEq)]
pub struct CarBody {
    config: CarConfig,
    steer_angle: f64,
    throttle: f64,
    brake: f64,
    is_player: bool,
}

/// Forces acting on a car for one integration step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarForces {
    /// Net force along the car's heading
    pub forward: f64,
    /// Net force to the car's left
    pub lateral: f64,
    /// Net yaw torque
    pub torque: f64,
    /// Front axle slip angle
    pub front_slip: f64,
    /// Rear axle slip angle
    pub rear_slip: f64,
}

impl CarForces {
    /// Net force in world coordinates for a car heading along `rotation`
    pub fn world_force(&self, rotation: f64) -> Vec2 {
        let heading = Vec2::from_angle(rotation);
        heading * self.forward + heading.perp() * self.lateral
    }
}

impl CarBody {
    /// Validate `config` and create a car at rest with neutral controls
    pub fn new(config: CarConfig) -> Result<Self> {
        config.validate()?;
        Ok(CarBody {
            config,
            steer_angle: 0.0,
            throttle: 0.0,
            brake: 0.0,
            is_player: false,
        })
    }

    /// Mark the car as player-controlled
    pub fn with_player(mut self, is_player: bool) -> Self {
        self.is_player = is_player;
        self
    }

    /// Geometry and tuning
    pub fn config(&self) -> &CarConfig {
        &self.config
    }

    /// Current steer angle in radians
    pub fn steer_angle(&self) -> f64 {
        self.steer_angle
    }

    /// Set the steer angle, clamped to ±[`MAX_STEER_ANGLE`]
    pub fn set_steer_angle(&mut self, angle: f64) {
        self.steer_angle =
            finite_or_zero(angle, "steer angle").clamp(-MAX_STEER_ANGLE, MAX_STEER_ANGLE);
    }

    /// Current throttle
    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    /// Set the throttle; `1.0` applies the full engine force
    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = finite_or_zero(throttle, "throttle");
    }

    /// Current brake
    pub fn brake(&self) -> f64 {
        self.brake
    }

    /// Set the brake; `1.0` applies the full brake force
    pub fn set_brake(&mut self, brake: f64) {
        self.brake = finite_or_zero(brake, "brake");
    }

    /// Whether a player drives this car
    pub fn is_player(&self) -> bool {
        self.is_player
    }

    /// Set whether a player drives this car
    pub fn set_player(&mut self, is_player: bool) {
        self.is_player = is_player;
    }

    /// Forces for the given world-frame motion
    pub fn forces(
        &self,
        velocity: Vec2,
        rotation: f64,
        angular_velocity: f64,
        gravity: f64,
    ) -> CarForces {
        let c = &self.config;
        let heading = Vec2::from_angle(rotation);
        let vx = velocity.dot(heading);
        let vy = velocity.dot(heading.perp());

        // Static load split: the axle nearer the CG carries more weight
        let weight = c.mass * gravity;
        let wheelbase = c.wheelbase();
        let front_load = weight * c.cg_to_rear / wheelbase;
        let rear_load = weight * c.cg_to_front / wheelbase;

        let (front_slip, rear_slip) = if vx == 0.0 {
            (0.0, 0.0)
        } else {
            let front = (vy + angular_velocity * c.cg_to_front).atan2(vx.abs())
                - self.steer_angle * sign(vx);
            let rear = (vy - angular_velocity * c.cg_to_rear).atan2(vx.abs());
            (front, rear)
        };

        let front_lateral =
            (c.cornering_stiffness_front * front_slip).clamp(-c.max_grip, c.max_grip) * front_load;
        let rear_lateral =
            (c.cornering_stiffness_rear * rear_slip).clamp(-c.max_grip, c.max_grip) * rear_load;

        let traction = c.engine_force * self.throttle - c.brake_force * self.brake * sign(vx);
        let (steer_sin, steer_cos) = self.steer_angle.sin_cos();
        let ratio = c.drivetrain_ratio;
        let traction_forward = traction * ((1.0 - ratio) + ratio * steer_cos);
        let traction_lateral = traction * ratio * steer_sin;

        let resistance_forward = -(c.resistance * vx + c.drag * vx * vx.abs());
        let resistance_lateral = -(c.resistance * vy + c.drag * vy * vy.abs());

        CarForces {
            forward: traction_forward - front_lateral * steer_sin + resistance_forward,
            lateral: traction_lateral
                + front_lateral * steer_cos
                + rear_lateral
                + resistance_lateral,
            torque: c.cg_to_front * front_lateral * steer_cos - c.cg_to_rear * rear_lateral,
            front_slip,
            rear_slip,
        }
    }

    /// Speed at which full-throttle traction equals resistance, in m/s
    pub fn terminal_speed(&self, throttle: f64) -> f64 {
        let c = &self.config;
        let traction = c.engine_force * throttle;
        if traction <= 0.0 {
            return 0.0;
        }
        if c.drag == 0.0 {
            return if c.resistance > 0.0 {
                traction / c.resistance
            } else {
                f64::INFINITY
            };
        }
        let discriminant = c.resistance * c.resistance + 4.0 * c.drag * traction;
        (discriminant.sqrt() - c.resistance) / (2.0 * c.drag)
    }
}

fn finite_or_zero(value: f64, what: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::warn!("Ignoring non-finite {} {}", what, value);
        0.0
    }
}
