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
//! Rigid bodies and their builder

use crate::body::Mass;
use crate::config::CarConfig;
use crate::dynamics::CarBody;
use crate::error::{PhysicsError, Result};
use crate::math::{BoundingBox, Vec2};
use crate::shapes::{ColliderInfo, Shape};

/// A simulated body with exactly one collider
///
/// Setting the pose does not touch the collider. The world refreshes every
/// collider once per step through [`Body::sync_shape_to_body`]; call it
/// yourself after moving a body if you query its shape before the next
/// tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) position: Vec2,
    pub(crate) rotation: f64,
    pub(crate) velocity: Vec2,
    pub(crate) angular_velocity: f64,
    mass: Mass,
    movable: bool,
    sensor: bool,
    tag: u64,
    shape: Shape,
    car: Option<CarBody>,
}

/// Pose and motion of a body, kept to roll back a failed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MotionState {
    position: Vec2,
    rotation: f64,
    velocity: Vec2,
    angular_velocity: f64,
}

impl Body {
    /// Start building a body
    pub fn builder() -> BodyBuilder {
        BodyBuilder::new()
    }

    /// World position of the body origin
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the body origin
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    /// Linear velocity in m/s
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the linear velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Angular velocity in rad/s
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Set the angular velocity
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Mass
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// `1 / mass`, zero for static bodies
    pub fn inverse_mass(&self) -> f64 {
        if self.movable {
            self.mass.inverse()
        } else {
            0.0
        }
    }

    /// Whether integration and collision response may move this body
    pub fn is_movable(&self) -> bool {
        self.movable
    }

    /// Whether this body only reports overlaps and never collides
    pub fn is_sensor(&self) -> bool {
        self.sensor
    }

    /// Opaque value for collaborators
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// Replace the tag
    pub fn set_tag(&mut self, tag: u64) {
        self.tag = tag;
    }

    /// The collider
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Car state, if this body is a car
    pub fn car(&self) -> Option<&CarBody> {
        self.car.as_ref()
    }

    /// Mutable car state, for control inputs
    pub fn car_mut(&mut self) -> Option<&mut CarBody> {
        self.car.as_mut()
    }

    /// World-space bounds of the collider
    pub fn bounding_box(&self) -> BoundingBox {
        self.shape.bounding_box()
    }

    /// Refresh the collider's world geometry from the current pose
    pub fn sync_shape_to_body(&mut self) {
        self.shape.sync_to_pose(self.position, self.rotation);
    }

    /// Narrow-phase test against another body's collider
    pub fn check_collision<'a>(&'a self, other: &'a Body) -> Option<ColliderInfo<'a>> {
        self.shape.check_collision(&other.shape)
    }

    pub(crate) fn motion_state(&self) -> MotionState {
        MotionState {
            position: self.position,
            rotation: self.rotation,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
        }
    }

    pub(crate) fn restore(&mut self, state: MotionState) {
        self.position = state.position;
        self.rotation = state.rotation;
        self.velocity = state.velocity;
        self.angular_velocity = state.angular_velocity;
    }

    pub(crate) fn has_finite_state(&self) -> bool {
        self.position.is_valid()
            && self.velocity.is_valid()
            && self.rotation.is_finite()
            && self.angular_velocity.is_finite()
    }
}

/// Fluent constructor for [`Body`]
///
/// # Examples
///
/// ```
/// use racing_physics::body::Body;
/// use racing_physics::math::Vec2;
/// use racing_physics::shapes::CircleShape;
///
/// let body = Body::builder()
///     .position(Vec2::new(5.0, 5.0))
///     .mass(2.0)
///     .shape(CircleShape::new(Vec2::zero(), 1.0).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(body.shape().center(), Vec2::new(5.0, 5.0));
///
/// assert!(Body::builder().build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    position: Vec2,
    rotation: f64,
    velocity: Vec2,
    angular_velocity: f64,
    mass: f64,
    movable: bool,
    sensor: bool,
    tag: u64,
    shape: Option<Shape>,
    car: Option<CarConfig>,
    player: bool,
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyBuilder {
    /// A movable, unit-mass body at the origin with no collider yet
    pub fn new() -> Self {
        BodyBuilder {
            position: Vec2::zero(),
            rotation: 0.0,
            velocity: Vec2::zero(),
            angular_velocity: 0.0,
            mass: 1.0,
            movable: true,
            sensor: false,
            tag: 0,
            shape: None,
            car: None,
            player: false,
        }
    }

    /// Initial position
    pub fn position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Initial rotation in radians
    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Initial linear velocity
    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Initial angular velocity
    pub fn angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Mass in kilograms; ignored for static bodies and cars
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Whether the body can move
    pub fn movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    /// Shorthand for `movable(false)`
    pub fn fixed(self) -> Self {
        self.movable(false)
    }

    /// Make the body a sensor that never takes part in contact resolution
    pub fn sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    /// Opaque value for collaborators
    pub fn tag(mut self, tag: u64) -> Self {
        self.tag = tag;
        self
    }

    /// The collider; required
    pub fn shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Drive the body with the car model; the car's mass replaces [`mass`](Self::mass)
    pub fn car(mut self, config: CarConfig) -> Self {
        self.car = Some(config);
        self
    }

    /// Mark a car body as player-controlled; has no effect without [`car`](Self::car)
    pub fn player(mut self, is_player: bool) -> Self {
        self.player = is_player;
        self
    }

    /// Validate and create the body
    pub fn build(self) -> Result<Body> {
        let mut shape = self.shape.ok_or(PhysicsError::MissingShape)?;

        if !self.position.is_valid() || !self.rotation.is_finite() {
            return Err(PhysicsError::NonFinite("body pose"));
        }
        if !self.velocity.is_valid() || !self.angular_velocity.is_finite() {
            return Err(PhysicsError::NonFinite("body velocity"));
        }

        let car = match self.car {
            Some(config) => Some(CarBody::new(config)?.with_player(self.player)),
            None => None,
        };

        let mass = match (&car, self.movable) {
            (_, false) => Mass::immovable(),
            (Some(car), true) => Mass::new(car.config().mass)?,
            (None, true) => {
                let mass = Mass::new(self.mass)?;
                if mass.is_immovable() {
                    return Err(PhysicsError::InvalidMass(self.mass));
                }
                mass
            }
        };

        shape.sync_to_pose(self.position, self.rotation);
        Ok(Body {
            position: self.position,
            rotation: self.rotation,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
            mass,
            movable: self.movable,
            sensor: self.sensor,
            tag: self.tag,
            shape,
            car,
        })
    }
}
