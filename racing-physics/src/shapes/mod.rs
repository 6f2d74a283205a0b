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
//! Collider shapes and narrow-phase collision
//!
//! Four concrete kinds share one contract:
//!
//! - [`Shape::bounding_box`]: world-space enclosing rectangle
//! - [`Shape::sync_to_pose`]: refresh cached world geometry from a body pose
//! - [`Shape::check_collision`]: symmetric pairwise overlap test
//!
//! # Collision evidence
//!
//! A successful test yields a [`ColliderInfo`]. Its `mtv`, when present, is
//! the translation that moves `shape_a` out of `shape_b`; it therefore
//! points from B towards A. `None` from a test always means "not
//! colliding".

mod aabb;
mod circle;
mod narrowphase;
mod polygon;
mod segment;

pub use aabb::AabbShape;
pub use circle::CircleShape;
pub use narrowphase::check_collision;
pub use polygon::PolygonShape;
pub use segment::{segment_intersection, SegmentShape, DEFAULT_THICKNESS};

use crate::math::{BoundingBox, Vec2};
use std::fmt;

/// Discriminant of a [`Shape`], ordered for pair canonicalisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    /// Axis-aligned box
    Aabb,
    /// Circle
    Circle,
    /// Convex polygon
    Polygon,
    /// Line segment
    Segment,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Aabb => "box",
            ShapeKind::Circle => "circle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Segment => "segment",
        };
        f.write_str(name)
    }
}

/// A collider attached to exactly one body
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box
    Aabb(AabbShape),
    /// Circle
    Circle(CircleShape),
    /// Convex polygon
    Polygon(PolygonShape),
    /// Line segment
    Segment(SegmentShape),
}

impl Shape {
    /// Which kind of shape this is
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Aabb(_) => ShapeKind::Aabb,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Segment(_) => ShapeKind::Segment,
        }
    }

    /// World-space enclosing rectangle for the current pose
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Aabb(s) => s.bounding_box(),
            Shape::Circle(s) => s.bounding_box(),
            Shape::Polygon(s) => s.bounding_box(),
            Shape::Segment(s) => s.bounding_box(),
        }
    }

    /// Representative world-space center
    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Aabb(s) => s.center(),
            Shape::Circle(s) => s.center(),
            Shape::Polygon(s) => s.centroid(),
            Shape::Segment(s) => s.midpoint(),
        }
    }

    /// Recompute world-space geometry from an absolute body pose
    ///
    /// Boxes and circles ignore rotation; polygons and segments rotate
    /// their local geometry about the body origin.
    pub fn sync_to_pose(&mut self, position: Vec2, rotation: f64) {
        match self {
            Shape::Aabb(s) => s.sync_to_pose(position),
            Shape::Circle(s) => s.sync_to_pose(position),
            Shape::Polygon(s) => s.sync_to_pose(position, rotation),
            Shape::Segment(s) => s.sync_to_pose(position, rotation),
        }
    }

    /// Test for overlap with another shape
    ///
    /// `a.check_collision(b)` and `b.check_collision(a)` always agree on
    /// whether the shapes overlap; the evidence of one is the
    /// [`ColliderInfo::swapped`] evidence of the other.
    pub fn check_collision<'a>(&'a self, other: &'a Shape) -> Option<ColliderInfo<'a>> {
        check_collision(self, other)
    }
}

impl From<AabbShape> for Shape {
    fn from(s: AabbShape) -> Self {
        Shape::Aabb(s)
    }
}

impl From<CircleShape> for Shape {
    fn from(s: CircleShape) -> Self {
        Shape::Circle(s)
    }
}

impl From<PolygonShape> for Shape {
    fn from(s: PolygonShape) -> Self {
        Shape::Polygon(s)
    }
}

impl From<SegmentShape> for Shape {
    fn from(s: SegmentShape) -> Self {
        Shape::Segment(s)
    }
}

/// Evidence that two shapes overlap
///
/// Created fresh by every test and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderInfo<'a> {
    /// First shape of the tested pair
    pub shape_a: &'a Shape,
    /// Second shape of the tested pair
    pub shape_b: &'a Shape,
    /// Contact points; not every pair computes them
    pub contact_points: Vec<Vec2>,
    /// Translation that separates `shape_a` from `shape_b`, if known
    pub mtv: Option<Vec2>,
}

impl<'a> ColliderInfo<'a> {
    pub(crate) fn new(shape_a: &'a Shape, shape_b: &'a Shape) -> Self {
        ColliderInfo {
            shape_a,
            shape_b,
            contact_points: Vec::new(),
            mtv: None,
        }
    }

    pub(crate) fn with_mtv(mut self, mtv: Vec2) -> Self {
        self.mtv = Some(mtv);
        self
    }

    pub(crate) fn with_contact(mut self, point: Vec2) -> Self {
        self.contact_points.push(point);
        self
    }

    /// The same evidence seen from the other shape
    pub fn swapped(self) -> ColliderInfo<'a> {
        ColliderInfo {
            shape_a: self.shape_b,
            shape_b: self.shape_a,
            contact_points: self.contact_points,
            mtv: self.mtv.map(|m| -m),
        }
    }

    /// Penetration depth along the MTV, zero if no MTV was computed
    pub fn depth(&self) -> f64 {
        self.mtv.map_or(0.0, Vec2::length)
    }
}

/// Interval of a shape projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Lower end
    pub min: f64,
    /// Upper end
    pub max: f64,
}

impl Projection {
    /// Create a projection interval
    pub fn new(min: f64, max: f64) -> Self {
        Projection { min, max }
    }

    /// Length of the shared part of two intervals, zero if disjoint
    pub fn overlap(&self, other: &Projection) -> f64 {
        (self.max.min(other.max) - self.min.max(other.min)).max(0.0)
    }
}
