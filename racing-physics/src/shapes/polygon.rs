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
//! Convex polygon collider
//!
//! Vertices are stored once in the body's local frame. Every pose sync
//! recomputes the world-space vertices from the body's absolute position
//! and rotation, so no rounding error accumulates across ticks no matter
//! how many times the body turns.

use super::Projection;
use crate::error::{PhysicsError, Result};
use crate::math::{BoundingBox, Vec2};

const AREA_EPSILON: f64 = 1e-12;

/// Convex polygon in its body's local frame plus cached world geometry
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    local: Vec<Vec2>,
    world: Vec<Vec2>,
    position: Vec2,
    rotation: f64,
    bounds: BoundingBox,
}

impl PolygonShape {
    /// Create a convex polygon from vertices relative to the body origin
    ///
    /// Either winding is accepted. Fails for fewer than three vertices,
    /// non-finite coordinates, zero area or a concave outline.
    ///
    /// # Examples
    ///
    /// ```
    /// use racing_physics::math::Vec2;
    /// use racing_physics::shapes::PolygonShape;
    ///
    /// let triangle = PolygonShape::new(vec![
    ///     Vec2::new(0.0, 0.0),
    ///     Vec2::new(1.0, 0.0),
    ///     Vec2::new(0.0, 1.0),
    /// ]);
    /// assert!(triangle.is_ok());
    /// assert!(PolygonShape::new(vec![Vec2::zero(), Vec2::new(1.0, 0.0)]).is_err());
    /// ```
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        validate_convex(&vertices)?;
        let mut polygon = PolygonShape {
            world: vertices.clone(),
            local: vertices,
            position: Vec2::zero(),
            rotation: 0.0,
            bounds: BoundingBox::default(),
        };
        polygon.sync_to_pose(Vec2::zero(), 0.0);
        Ok(polygon)
    }

    /// Axis-aligned rectangle of `size` centered on the body origin
    pub fn rectangle(size: Vec2) -> Result<Self> {
        let h = size * 0.5;
        PolygonShape::new(vec![
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ])
    }

    /// World-space vertices for the current pose
    pub fn vertices(&self) -> &[Vec2] {
        &self.world
    }

    /// Vertices in the body's local frame
    pub fn local_vertices(&self) -> &[Vec2] {
        &self.local
    }

    /// World-space origin (the body position at the last sync)
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Absolute rotation at the last sync
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Vertex average, used to orient separation vectors
    pub fn centroid(&self) -> Vec2 {
        vertex_mean(&self.world)
    }

    /// Unit edge normals of the world-space outline
    pub fn axes(&self) -> Vec<Vec2> {
        edge_normals(&self.world)
    }

    /// Project the world-space outline onto a unit axis
    pub fn project(&self, axis: Vec2) -> Projection {
        project_vertices(&self.world, axis)
    }

    /// World-space bounds
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    pub(crate) fn sync_to_pose(&mut self, position: Vec2, rotation: f64) {
        self.position = position;
        self.rotation = rotation;
        let (sin, cos) = rotation.sin_cos();
        for (world, local) in self.world.iter_mut().zip(&self.local) {
            *world = Vec2::new(
                position.x + local.x * cos - local.y * sin,
                position.y + local.x * sin + local.y * cos,
            );
        }
        self.bounds = BoundingBox::from_points(self.world.iter().copied()).unwrap_or_default();
    }
}

/// Unit normals of each edge of a closed outline; zero-length edges are skipped
pub(crate) fn edge_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    let n = vertices.len();
    let mut axes = Vec::with_capacity(n);
    for i in 0..n {
        let edge = vertices[(i + 1) % n] - vertices[i];
        let normal = edge.perp().normalized();
        if normal != Vec2::zero() {
            axes.push(normal);
        }
    }
    axes
}

pub(crate) fn project_vertices(vertices: &[Vec2], axis: Vec2) -> Projection {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in vertices {
        let d = v.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    Projection::new(min, max)
}

pub(crate) fn vertex_mean(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::zero();
    }
    let sum = vertices.iter().fold(Vec2::zero(), |acc, v| acc + *v);
    sum * (1.0 / vertices.len() as f64)
}

fn validate_convex(vertices: &[Vec2]) -> Result<()> {
    if vertices.len() < 3 {
        return Err(PhysicsError::TooFewVertices { vertices: vertices.len() });
    }
    if vertices.iter().any(|v| !v.is_valid()) {
        return Err(PhysicsError::NonFinite("polygon vertex"));
    }

    let n = vertices.len();
    let twice_area: f64 = (0..n).map(|i| vertices[i].cross(vertices[(i + 1) % n])).sum();
    if twice_area.abs() <= AREA_EPSILON {
        return Err(PhysicsError::DegeneratePolygon);
    }

    // Every turn must bend the same way as the overall winding
    let winding = twice_area.signum();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        if (b - a).cross(c - b) * winding < -AREA_EPSILON {
            return Err(PhysicsError::NonConvexPolygon);
        }
    }
    Ok(())
}
