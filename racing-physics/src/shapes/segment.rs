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
//! Line segment collider, used for barriers and ray casts

use crate::error::{PhysicsError, Result};
use crate::math::{BoundingBox, Vec2};

/// Default thickness for barrier segments
pub const DEFAULT_THICKNESS: f64 = 0.1;

/// Line segment with a thickness
///
/// Thickness only widens the bounding box and scales the segment's own
/// response normal; the intersection tests treat the segment as a line.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentShape {
    local_start: Vec2,
    local_end: Vec2,
    start: Vec2,
    end: Vec2,
    thickness: f64,
}

impl SegmentShape {
    /// Create a segment from endpoints relative to the body origin
    pub fn new(start: Vec2, end: Vec2, thickness: f64) -> Result<Self> {
        validate(start, end, thickness)?;
        Ok(SegmentShape {
            local_start: start,
            local_end: end,
            start,
            end,
            thickness,
        })
    }

    /// Zero-thickness segment in world coordinates, as used for ray casts
    pub fn ray(start: Vec2, end: Vec2) -> Result<Self> {
        SegmentShape::new(start, end, 0.0)
    }

    /// World-space start point
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// World-space end point
    pub fn end(&self) -> Vec2 {
        self.end
    }

    /// Thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// `end - start`
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Midpoint
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Unit normal perpendicular to the segment, or zero if degenerate
    pub fn normal(&self) -> Vec2 {
        self.direction().perp().normalized()
    }

    /// Move both endpoints directly in world space
    ///
    /// Intended for free-standing shapes such as sensor rays that are not
    /// attached to a body; the local frame is reset to match.
    pub fn set_endpoints(&mut self, start: Vec2, end: Vec2) -> Result<()> {
        validate(start, end, self.thickness)?;
        self.local_start = start;
        self.local_end = end;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Point on the segment closest to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            return self.start;
        }
        let t = ((p - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
        self.start + d * t
    }

    /// World-space bounds widened by the thickness on every side
    pub fn bounding_box(&self) -> BoundingBox {
        let t = self.thickness;
        let min_x = self.start.x.min(self.end.x);
        let max_x = self.start.x.max(self.end.x);
        let min_y = self.start.y.min(self.end.y);
        let max_y = self.start.y.max(self.end.y);
        BoundingBox::new(min_x - t, min_y - t, max_x - min_x + 2.0 * t, max_y - min_y + 2.0 * t)
    }

    pub(crate) fn sync_to_pose(&mut self, position: Vec2, rotation: f64) {
        self.start = position + self.local_start.rotated(rotation);
        self.end = position + self.local_end.rotated(rotation);
    }
}

fn validate(start: Vec2, end: Vec2, thickness: f64) -> Result<()> {
    if !start.is_valid() || !end.is_valid() {
        return Err(PhysicsError::NonFinite("segment endpoint"));
    }
    if start == end {
        return Err(PhysicsError::DegenerateSegment);
    }
    if !(thickness >= 0.0 && thickness.is_finite()) {
        return Err(PhysicsError::InvalidThickness(thickness));
    }
    Ok(())
}

/// Parametric intersection of segments `a1..a2` and `b1..b2`
///
/// Returns the crossing point when both parameters fall in `[0, 1]`.
/// Parallel and coincident segments have a zero denominator and report no
/// intersection.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(a1 + (a2 - a1) * ua)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_cross() {
        let p = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        );
        assert_eq!(p, Some(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_parallel_is_none() {
        let p = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        assert_eq!(p, None);

        // Collinear overlap also has a zero denominator
        let p = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 0.0),
        );
        assert_eq!(p, None);
    }

    #[test]
    fn test_out_of_range_is_none() {
        let p = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 1.0),
        );
        assert_eq!(p, None);
    }

    #[test]
    fn test_bounding_box_includes_thickness() {
        let seg = SegmentShape::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), 0.5).unwrap();
        assert_eq!(seg.bounding_box(), BoundingBox::new(-0.5, -0.5, 5.0, 1.0));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            SegmentShape::new(Vec2::zero(), Vec2::zero(), 0.1),
            Err(PhysicsError::DegenerateSegment)
        );
        assert_eq!(
            SegmentShape::new(Vec2::zero(), Vec2::new(1.0, 0.0), -1.0),
            Err(PhysicsError::InvalidThickness(-1.0))
        );
        assert!(SegmentShape::ray(Vec2::zero(), Vec2::new(0.0, 5.0)).is_ok());
    }

    #[test]
    fn test_closest_point() {
        let seg = SegmentShape::ray(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(seg.closest_point(Vec2::new(4.0, 3.0)), Vec2::new(4.0, 0.0));
        assert_eq!(seg.closest_point(Vec2::new(-4.0, 3.0)), Vec2::new(0.0, 0.0));
    }
}
