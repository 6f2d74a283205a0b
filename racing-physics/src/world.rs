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
//! The simulation world
//!
//! A [`World`] owns every body, the broad-phase index and the overlap
//! registry, and advances them together one frame at a time.
//!
//! # Tick order
//!
//! 1. The frame delta is validated, clamped to
//!    [`WorldConfig::max_frame_delta`] and split into equal sub-steps no
//!    longer than [`WorldConfig::max_substep`].
//! 2. Each sub-step integrates every movable body in insertion order and
//!    syncs its collider, rebuilds the quadtree, then resolves contacts once
//!    per colliding unordered pair.
//! 3. The overlap registry is evaluated once, after the last sub-step.
//!
//! Everything runs on the calling thread. The only parallel path is
//! [`World::cast_rays`] with the `parallel` feature, which reads a finished
//! world.

use crate::body::{Body, BodyHandle, BodySet};
use crate::config::WorldConfig;
use crate::dynamics::{integrate_body, resolve_contact};
use crate::error::{PhysicsError, Result};
use crate::math::{BoundingBox, Vec2};
use crate::overlap::{OverlapEvent, OverlapId, OverlapOptions, OverlapRegistry};
use crate::shapes::{SegmentShape, Shape};
use crate::spatial::QuadTree;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Summary of one call to [`World::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Sub-steps run
    pub substeps: u32,
    /// Seconds simulated after clamping
    pub simulated: f64,
    /// Contacts resolved across all sub-steps
    pub contacts: usize,
    /// Overlap callbacks invoked
    pub overlaps_fired: usize,
    /// Body steps undone because they produced non-finite state
    pub rolled_back: usize,
}

/// A ray to cast into the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec2,
    /// Direction; need not be normalized
    pub direction: Vec2,
    /// Longest distance to look
    pub max_distance: f64,
    /// Body to skip, usually the caster
    pub ignore: Option<BodyHandle>,
}

impl Ray {
    /// Create a ray that hits every body
    pub fn new(origin: Vec2, direction: Vec2, max_distance: f64) -> Self {
        Ray {
            origin,
            direction,
            max_distance,
            ignore: None,
        }
    }

    /// Skip `body` when casting
    pub fn ignoring(mut self, body: BodyHandle) -> Self {
        self.ignore = Some(body);
        self
    }
}

/// Result of a ray cast
///
/// A miss reports `body: None`, the full distance, the ray's far end and a
/// zero normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the origin to `point`
    pub distance: f64,
    /// First point of contact, or the ray's far end on a miss
    pub point: Vec2,
    /// Unit separation direction at the hit, zero if unknown
    pub normal: Vec2,
    /// Body that was hit
    pub body: Option<BodyHandle>,
}

impl RayHit {
    /// Whether the ray hit anything
    pub fn is_hit(&self) -> bool {
        self.body.is_some()
    }
}

/// Container and driver for a racing simulation
///
/// # Examples
///
/// ```
/// use racing_physics::body::Body;
/// use racing_physics::math::{BoundingBox, Vec2};
/// use racing_physics::shapes::CircleShape;
/// use racing_physics::{World, WorldConfig};
///
/// let bounds = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
/// let mut world = World::new(bounds, WorldConfig::default()).unwrap();
/// let ball = world.add_body(
///     Body::builder()
///         .position(Vec2::new(10.0, 10.0))
///         .velocity(Vec2::new(1.0, 0.0))
///         .shape(CircleShape::new(Vec2::zero(), 1.0).unwrap())
///         .build()
///         .unwrap(),
/// );
///
/// let report = world.tick(0.2);
/// assert_eq!(report.substeps, 12);
/// assert!((world.body(ball).unwrap().position().x - 10.2).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    bodies: BodySet,
    index: QuadTree<BodyHandle>,
    overlaps: OverlapRegistry,
    elapsed: f64,
}

impl World {
    /// Create an empty world over `bounds`
    ///
    /// The bounds become the root region of the spatial index. Bodies may
    /// leave them; they are still simulated, just indexed less efficiently.
    pub fn new(bounds: BoundingBox, config: WorldConfig) -> Result<Self> {
        if !bounds.is_valid() || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(PhysicsError::InvalidBounds);
        }
        config.validate()?;
        let index = QuadTree::new(bounds, config.quadtree_capacity, config.quadtree_max_depth);
        Ok(World {
            config,
            bodies: BodySet::new(),
            index,
            overlaps: OverlapRegistry::new(),
            elapsed: 0.0,
        })
    }

    /// Configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Root region of the spatial index
    pub fn bounds(&self) -> BoundingBox {
        self.index.bounds()
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check whether the world holds no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Add a body and return its handle
    pub fn add_body(&mut self, mut body: Body) -> BodyHandle {
        body.sync_shape_to_body();
        let bounds = body.bounding_box();
        let kind = body.shape().kind();
        let handle = self.bodies.insert(body);
        self.index.insert(handle, bounds);
        log::debug!("Added {} with {} collider", handle, kind);
        handle
    }

    /// Remove a body along with every overlap subscription that names it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        self.overlaps.remove_involving(handle);
        self.rebuild_index();
        log::debug!("Removed {}", handle);
        Ok(body)
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body mutably, for control inputs and teleports
    ///
    /// Pose changes reach the collider and the spatial index at the next
    /// tick, or at once through [`World::refresh`].
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// All bodies
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// The spatial index as of the last rebuild
    pub fn spatial_index(&self) -> &QuadTree<BodyHandle> {
        &self.index
    }

    /// Overlap subscriptions
    pub fn overlaps(&self) -> &OverlapRegistry {
        &self.overlaps
    }

    /// Overlap subscriptions, for enabling, resetting and removing
    pub fn overlaps_mut(&mut self) -> &mut OverlapRegistry {
        &mut self.overlaps
    }

    /// Subscribe to overlaps between two bodies that are in this world
    pub fn add_overlap<F>(
        &mut self,
        first: BodyHandle,
        second: BodyHandle,
        callback: F,
        options: OverlapOptions,
    ) -> Result<OverlapId>
    where
        F: FnMut(&OverlapEvent<'_>) + 'static,
    {
        for handle in [first, second] {
            if !self.bodies.contains(handle) {
                return Err(PhysicsError::UnknownBody(handle));
            }
        }
        Ok(self.overlaps.add_overlap(first, second, callback, options))
    }

    /// Sync every collider to its body and rebuild the spatial index
    pub fn refresh(&mut self) {
        for i in 0..self.bodies.len() {
            let handle = self.bodies.handles()[i];
            if let Some(body) = self.bodies.get_mut(handle) {
                body.sync_shape_to_body();
            }
        }
        self.rebuild_index();
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Negative and non-finite deltas are ignored. Deltas above
    /// [`WorldConfig::max_frame_delta`] are clamped, so a long pause never
    /// feeds the integrator one huge step.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        let mut report = TickReport::default();
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid frame delta {}", dt);
            return report;
        }

        let dt = if dt > self.config.max_frame_delta {
            log::debug!("Clamping frame delta {} to {}", dt, self.config.max_frame_delta);
            self.config.max_frame_delta
        } else {
            dt
        };

        if dt > 0.0 {
            // The epsilon keeps 0.25 / (1 / 60) from rounding up to 16 steps
            let steps = ((dt / self.config.max_substep) - 1e-9).ceil().max(1.0) as u32;
            let h = dt / f64::from(steps);
            for _ in 0..steps {
                report.rolled_back += self.integrate(h);
                self.rebuild_index();
                if self.config.resolve_contacts {
                    report.contacts += self.resolve_contacts();
                }
            }
            report.substeps = steps;
            report.simulated = dt;
            self.elapsed += dt;
        }

        report.overlaps_fired = self.overlaps.process_overlaps(&self.bodies);
        report
    }

    fn integrate(&mut self, dt: f64) -> usize {
        let mut rolled_back = 0;
        for i in 0..self.bodies.len() {
            let handle = self.bodies.handles()[i];
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            let before = body.motion_state();
            integrate_body(body, dt, &self.config);
            if !body.has_finite_state() {
                log::warn!("{} produced non-finite state; step rolled back", handle);
                body.restore(before);
                rolled_back += 1;
            }
            body.sync_shape_to_body();
        }
        rolled_back
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (handle, body) in self.bodies.iter() {
            if !self.index.insert(handle, body.bounding_box()) {
                log::warn!("{} has non-finite bounds and was left out of the index", handle);
            }
        }
    }

    fn resolve_contacts(&mut self) -> usize {
        let mut resolved = 0;
        for (a, b) in self.index.candidate_pairs() {
            let Some((body_a, body_b)) = self.bodies.get_pair_mut(a, b) else {
                continue;
            };
            if body_a.is_sensor() || body_b.is_sensor() {
                continue;
            }
            if !body_a.is_movable() && !body_b.is_movable() {
                continue;
            }
            let Some(mtv) = body_a.check_collision(body_b).and_then(|info| info.mtv) else {
                continue;
            };
            let impulse = resolve_contact(body_a, body_b, mtv, &self.config);
            log::trace!("Resolved {} against {}: mtv {:?}, impulse {}", a, b, mtv, impulse);
            resolved += 1;
        }
        resolved
    }

    /// Apply the contact response to two bodies if they overlap now
    ///
    /// Returns the impulse magnitude, zero when they do not overlap, the
    /// pair reports no separation vector, or they are already separating.
    pub fn resolve_collision(&mut self, a: BodyHandle, b: BodyHandle) -> Result<f64> {
        for handle in [a, b] {
            if !self.bodies.contains(handle) {
                return Err(PhysicsError::UnknownBody(handle));
            }
        }
        let Some((body_a, body_b)) = self.bodies.get_pair_mut(a, b) else {
            return Ok(0.0);
        };
        let Some(mtv) = body_a.check_collision(body_b).and_then(|info| info.mtv) else {
            return Ok(0.0);
        };
        Ok(resolve_contact(body_a, body_b, mtv, &self.config))
    }

    /// Bodies whose bounding boxes intersect `range`, in handle order
    pub fn query_region(&self, range: &BoundingBox) -> Vec<BodyHandle> {
        self.index.query(range)
    }

    /// Cast a single ray and report the nearest body it touches
    ///
    /// Sensor bodies are transparent to rays.
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f64,
        ignore: Option<BodyHandle>,
    ) -> RayHit {
        cast(
            &self.bodies,
            &self.index,
            &Ray {
                origin,
                direction,
                max_distance,
                ignore,
            },
        )
    }

    /// Cast a batch of rays; results follow the input order
    pub fn cast_rays(&self, rays: &[Ray]) -> Vec<RayHit> {
        let bodies = &self.bodies;
        let index = &self.index;

        #[cfg(feature = "parallel")]
        {
            rays.par_iter().map(|ray| cast(bodies, index, ray)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            rays.iter().map(|ray| cast(bodies, index, ray)).collect()
        }
    }
}

fn cast(bodies: &BodySet, index: &QuadTree<BodyHandle>, ray: &Ray) -> RayHit {
    let direction = ray.direction.normalized();
    let reach = if ray.max_distance.is_finite() { ray.max_distance.max(0.0) } else { 0.0 };
    let end = ray.origin + direction * reach;
    let mut best = RayHit {
        distance: reach,
        point: end,
        normal: Vec2::zero(),
        body: None,
    };

    let Ok(segment) = SegmentShape::ray(ray.origin, end) else {
        return best;
    };
    let probe = Shape::Segment(segment);

    for handle in index.query(&probe.bounding_box()) {
        if Some(handle) == ray.ignore {
            continue;
        }
        let Some(body) = bodies.get(handle) else {
            continue;
        };
        if body.is_sensor() {
            continue;
        }
        let Some(info) = probe.check_collision(body.shape()) else {
            continue;
        };
        for &point in &info.contact_points {
            let distance = point.distance(ray.origin);
            if distance < best.distance || (best.body.is_none() && distance <= best.distance) {
                best = RayHit {
                    distance,
                    point,
                    normal: info.mtv.map_or(Vec2::zero(), Vec2::normalized),
                    body: Some(handle),
                };
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{AabbShape, CircleShape};
    use approx::assert_relative_eq;

    fn world() -> World {
        World::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0), WorldConfig::default()).unwrap()
    }

    fn ball(x: f64, y: f64) -> Body {
        Body::builder()
            .position(Vec2::new(x, y))
            .shape(CircleShape::new(Vec2::zero(), 1.0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_rejects_bad_bounds_and_config() {
        assert_eq!(
            World::new(BoundingBox::new(0.0, 0.0, 0.0, 10.0), WorldConfig::default()).unwrap_err(),
            PhysicsError::InvalidBounds
        );
        let config = WorldConfig::default().with_max_frame_delta(-1.0);
        assert!(World::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), config).is_err());

        // A sub-step this small would split one frame into millions of steps
        let config = WorldConfig::default().with_max_substep(1e-7);
        assert!(matches!(
            World::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), config),
            Err(PhysicsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_delta_is_ignored() {
        let mut world = world();
        let h = world.add_body(ball(10.0, 10.0));
        world.body_mut(h).unwrap().set_velocity(Vec2::new(1.0, 0.0));
        assert_eq!(world.tick(f64::NAN), TickReport::default());
        assert_eq!(world.tick(-1.0), TickReport::default());
        assert_eq!(world.body(h).unwrap().position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_large_delta_is_clamped_and_substepped() {
        let mut world = world();
        let h = world.add_body(ball(10.0, 10.0));
        world.body_mut(h).unwrap().set_velocity(Vec2::new(4.0, 0.0));
        let report = world.tick(10.0);
        assert_eq!(report.simulated, 0.25);
        assert_eq!(report.substeps, 15);
        assert_relative_eq!(world.body(h).unwrap().position().x, 11.0, epsilon = 1e-9);
        assert_eq!(world.elapsed(), 0.25);
    }

    #[test]
    fn test_zero_delta_still_evaluates_overlaps() {
        let mut world = world();
        let a = world.add_body(ball(10.0, 10.0));
        let b = world.add_body(ball(11.0, 10.0));
        world
            .add_overlap(a, b, |_: &OverlapEvent<'_>| {}, OverlapOptions::default())
            .unwrap();
        let report = world.tick(0.0);
        assert_eq!(report.substeps, 0);
        assert_eq!(report.overlaps_fired, 1);
    }

    #[test]
    fn test_contacts_push_bodies_apart() {
        let mut world = world();
        let a = world.add_body(ball(10.0, 10.0));
        let b = world.add_body(ball(11.5, 10.0));
        let report = world.tick(1.0 / 60.0);
        assert_eq!(report.contacts, 1);
        let gap = world.body(b).unwrap().position().x - world.body(a).unwrap().position().x;
        assert!(gap > 1.5);
    }

    #[test]
    fn test_contact_resolution_can_be_disabled() {
        let config = WorldConfig::default().with_contact_resolution(false);
        let mut world = World::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0), config).unwrap();
        let a = world.add_body(ball(10.0, 10.0));
        world.add_body(ball(11.5, 10.0));
        assert_eq!(world.tick(1.0 / 60.0).contacts, 0);
        assert_eq!(world.body(a).unwrap().position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_sensors_do_not_collide() {
        let mut world = world();
        let a = world.add_body(ball(10.0, 10.0));
        world.add_body(
            Body::builder()
                .position(Vec2::new(10.5, 10.0))
                .sensor(true)
                .fixed()
                .shape(AabbShape::centered(Vec2::new(2.0, 2.0)).unwrap())
                .build()
                .unwrap(),
        );
        assert_eq!(world.tick(1.0 / 60.0).contacts, 0);
        assert_eq!(world.body(a).unwrap().position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_non_finite_step_is_rolled_back() {
        let mut world = world();
        let h = world.add_body(ball(10.0, 10.0));
        world.body_mut(h).unwrap().set_velocity(Vec2::new(f64::INFINITY, 0.0));
        let report = world.tick(0.1);
        assert!(report.rolled_back > 0);
        assert!(world.body(h).unwrap().position().is_valid());
    }

    #[test]
    fn test_remove_body_invalidates_handle() {
        let mut world = world();
        let h = world.add_body(ball(10.0, 10.0));
        assert!(world.remove_body(h).is_ok());
        assert_eq!(world.remove_body(h).unwrap_err(), PhysicsError::UnknownBody(h));
        assert!(world.query_region(&world.bounds()).is_empty());
    }

    #[test]
    fn test_add_overlap_requires_live_bodies() {
        let mut world = world();
        let a = world.add_body(ball(10.0, 10.0));
        let b = world.add_body(ball(50.0, 50.0));
        world.remove_body(b).unwrap();
        let err = world
            .add_overlap(a, b, |_: &OverlapEvent<'_>| {}, OverlapOptions::default())
            .unwrap_err();
        assert_eq!(err, PhysicsError::UnknownBody(b));
    }

    #[test]
    fn test_resolve_collision() {
        let mut world = world();
        let a = world.add_body(ball(10.0, 10.0));
        let b = world.add_body(ball(11.5, 10.0));
        world.body_mut(a).unwrap().set_velocity(Vec2::new(1.0, 0.0));
        let impulse = world.resolve_collision(a, b).unwrap();
        assert!(impulse > 0.0);
        assert!(world.body(b).unwrap().velocity().x > 0.0);

        let far = world.add_body(ball(80.0, 80.0));
        assert_eq!(world.resolve_collision(a, far).unwrap(), 0.0);
    }

    #[test]
    fn test_raycast_hits_nearest() {
        let mut world = world();
        let near = world.add_body(ball(20.0, 10.0));
        world.add_body(ball(40.0, 10.0));
        let hit = world.raycast(Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), 50.0, None);
        assert_eq!(hit.body, Some(near));
        assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-9);
        assert_relative_eq!(hit.point.x, 19.0, epsilon = 1e-9);
        assert_relative_eq!(hit.normal.length(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_raycast_miss_and_ignore() {
        let mut world = world();
        let own = world.add_body(ball(10.0, 10.0));
        let miss = world.raycast(Vec2::new(10.0, 10.0), Vec2::new(0.0, 1.0), 20.0, Some(own));
        assert!(!miss.is_hit());
        assert_eq!(miss.distance, 20.0);
        assert_eq!(miss.point, Vec2::new(10.0, 30.0));
        assert_eq!(miss.normal, Vec2::zero());

        let degenerate = world.raycast(Vec2::new(10.0, 10.0), Vec2::zero(), 20.0, None);
        assert!(!degenerate.is_hit());
    }

    #[test]
    fn test_cast_rays_keeps_order() {
        let mut world = world();
        let target = world.add_body(ball(50.0, 50.0));
        let rays = [
            Ray::new(Vec2::new(40.0, 50.0), Vec2::new(1.0, 0.0), 20.0),
            Ray::new(Vec2::new(40.0, 50.0), Vec2::new(-1.0, 0.0), 20.0),
        ];
        let hits = world.cast_rays(&rays);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].body, Some(target));
        assert!(!hits[1].is_hit());
    }
}
