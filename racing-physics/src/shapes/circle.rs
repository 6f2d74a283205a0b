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
//! Circle collider

use super::Projection;
use crate::error::{PhysicsError, Result};
use crate::math::{BoundingBox, Vec2};

/// Circle anchored at an offset from its body
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    offset: Vec2,
    radius: f64,
    center: Vec2,
}

impl CircleShape {
    /// Create a circle whose center sits at `offset` from the body origin
    pub fn new(offset: Vec2, radius: f64) -> Result<Self> {
        if !offset.is_valid() {
            return Err(PhysicsError::NonFinite("circle offset"));
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        Ok(CircleShape { offset, radius, center: offset })
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Project onto a unit axis
    pub fn project(&self, axis: Vec2) -> Projection {
        let c = self.center.dot(axis);
        Projection::new(c - self.radius, c + self.radius)
    }

    /// World-space bounds
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub(crate) fn sync_to_pose(&mut self, position: Vec2) {
        self.center = self.offset + position;
    }
}
