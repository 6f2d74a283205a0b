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
//! Axis-aligned world-space rectangles

use super::Vec2;

/// Axis-aligned rectangle given by its top-left corner and size
///
/// Bounding boxes are always derived from shapes; nothing in the engine
/// edits them by hand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
}

impl BoundingBox {
    /// Create a bounding box from its top-left corner and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        BoundingBox { x, y, width, height }
    }

    /// Smallest box enclosing both corners
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        BoundingBox::new(min_x, min_y, a.x.max(b.x) - min_x, a.y.max(b.y) - min_y)
    }

    /// Smallest box enclosing every point; `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(BoundingBox::from_corners(min, max))
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive intersection test; touching edges count as intersecting
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    /// Check whether `other` lies entirely inside this box (edges inclusive)
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check whether a point lies inside this box (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// The four equal quadrants: top-left, top-right, bottom-left, bottom-right
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        [
            BoundingBox::new(self.x, self.y, hw, hh),
            BoundingBox::new(self.x + hw, self.y, hw, hh),
            BoundingBox::new(self.x, self.y + hh, hw, hh),
            BoundingBox::new(self.x + hw, self.y + hh, hw, hh),
        ]
    }

    /// Check that all fields are finite and the size is non-negative
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}
