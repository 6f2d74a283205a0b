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
//! Motion integration and collision response
//!
//! Integration is semi-implicit Euler: velocity first, then position from
//! the new velocity. Cars get their forces from the bicycle model in
//! [`vehicle`]; every other movable body coasts on its current velocity.
//! Positions advance in world units, so velocities in m/s are scaled by
//! [`WorldConfig::units_per_meter`].

pub mod response;
pub mod vehicle;

pub use response::resolve_contact;
pub use vehicle::{CarBody, CarForces, MAX_STEER_ANGLE};

use crate::body::Body;
use crate::config::WorldConfig;

/// Advance one movable body by `dt` seconds
///
/// Static bodies are left untouched. The collider is not refreshed here;
/// callers follow up with [`Body::sync_shape_to_body`].
pub fn integrate_body(body: &mut Body, dt: f64, config: &WorldConfig) {
    if !body.is_movable() {
        return;
    }

    if let Some(car) = body.car() {
        let forces = car.forces(
            body.velocity,
            body.rotation,
            body.angular_velocity,
            config.gravity,
        );
        let acceleration = forces.world_force(body.rotation) * (1.0 / car.config().mass);
        let angular_acceleration = forces.torque / car.config().inertia();
        body.velocity += acceleration * dt;
        body.angular_velocity += angular_acceleration * dt;
    }

    body.position += body.velocity * (dt * config.units_per_meter);
    body.rotation += body.angular_velocity * dt;
}
