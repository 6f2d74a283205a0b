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
//! Axis-aligned box collider

use crate::error::{PhysicsError, Result};
use crate::math::{BoundingBox, Vec2};

/// Axis-aligned box anchored at an offset from its body
///
/// The world-space top-left corner is `offset + body_position`. Boxes stay
/// axis-aligned; body rotation does not affect them.
#[derive(Debug, Clone, PartialEq)]
pub struct AabbShape {
    offset: Vec2,
    size: Vec2,
    position: Vec2,
}

impl AabbShape {
    /// Create a box whose top-left corner sits at `offset` from the body origin
    pub fn new(offset: Vec2, size: Vec2) -> Result<Self> {
        if !offset.is_valid() {
            return Err(PhysicsError::NonFinite("box offset"));
        }
        if !(size.x > 0.0 && size.y > 0.0 && size.is_valid()) {
            return Err(PhysicsError::InvalidSize { width: size.x, height: size.y });
        }
        Ok(AabbShape { offset, size, position: offset })
    }

    /// Create a box of `size` centered on the body origin
    pub fn centered(size: Vec2) -> Result<Self> {
        AabbShape::new(size * -0.5, size)
    }

    /// World-space top-left corner
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Offset of the top-left corner from the body origin
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Half extents
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Corners in winding order starting at the top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let p = self.position;
        let s = self.size;
        [
            p,
            Vec2::new(p.x + s.x, p.y),
            Vec2::new(p.x + s.x, p.y + s.y),
            Vec2::new(p.x, p.y + s.y),
        ]
    }

    /// World-space bounds
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub(crate) fn sync_to_pose(&mut self, position: Vec2) {
        self.position = self.offset + position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_plus_offset() {
        let mut aabb = AabbShape::new(Vec2::new(1.0, 2.0), Vec2::new(4.0, 2.0)).unwrap();
        aabb.sync_to_pose(Vec2::new(10.0, 10.0));
        assert_eq!(aabb.position(), Vec2::new(11.0, 12.0));
        assert_eq!(aabb.center(), Vec2::new(13.0, 13.0));

        // Recomputed from the offset, never accumulated
        aabb.sync_to_pose(Vec2::new(10.0, 10.0));
        assert_eq!(aabb.position(), Vec2::new(11.0, 12.0));
    }

    #[test]
    fn test_rejects_empty_size() {
        assert!(AabbShape::new(Vec2::zero(), Vec2::new(0.0, 1.0)).is_err());
        assert!(AabbShape::new(Vec2::zero(), Vec2::new(1.0, -1.0)).is_err());
        assert!(AabbShape::new(Vec2::new(f64::NAN, 0.0), Vec2::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn test_centered() {
        let aabb = AabbShape::centered(Vec2::new(2.0, 4.0)).unwrap();
        assert_eq!(aabb.bounding_box(), BoundingBox::new(-1.0, -2.0, 2.0, 4.0));
    }
}
