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
//! Pairwise narrow-phase tests
//!
//! The sixteen ordered kind pairs collapse to ten unordered ones. A pair is
//! first put into canonical order by [`ShapeKind`]; the test for that
//! ordering runs, and the evidence is swapped back if the caller's order
//! was the reverse. Adding a shape kind therefore means adding its row of
//! the `match` in [`canonical`], and the compiler points at every gap.
//!
//! # Algorithms
//!
//! - **box / box**: interval overlap on both axes
//! - **box / circle**: clamped distance from the circle center, with an
//!   "inside on one axis" fast path and a corner-distance fallback
//! - **box, circle, polygon / polygon**: separating-axis theorem over edge
//!   normals (plus the nearest-vertex axis for circles); the first axis with
//!   no overlap exits early, otherwise the axis of least overlap gives the MTV
//! - **segment / polygon or box**: parametric edge intersection; the
//!   crossing nearest the segment start supplies the contact, the segment's
//!   own normal scaled by its thickness is reported as the MTV
//! - **segment / circle**: closest point on the segment within the radius
//! - **segment / segment**: parametric intersection, contact point only

use super::polygon::{edge_normals, project_vertices};
use super::segment::segment_intersection;
use super::{AabbShape, CircleShape, ColliderInfo, PolygonShape, Projection, SegmentShape, Shape};
use crate::math::Vec2;

/// Test two shapes for overlap
///
/// Symmetric in its arguments: the evidence for `(b, a)` is the
/// [`ColliderInfo::swapped`] evidence for `(a, b)`.
///
/// # Examples
///
/// ```
/// use racing_physics::math::Vec2;
/// use racing_physics::shapes::{check_collision, AabbShape, Shape};
///
/// let a: Shape = AabbShape::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)).unwrap().into();
/// let b: Shape = AabbShape::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)).unwrap().into();
/// assert!(check_collision(&a, &b).is_some());
/// ```
pub fn check_collision<'a>(a: &'a Shape, b: &'a Shape) -> Option<ColliderInfo<'a>> {
    if a.kind() > b.kind() {
        canonical(b, a).map(ColliderInfo::swapped)
    } else {
        canonical(a, b)
    }
}

/// Dispatch for pairs with `a.kind() <= b.kind()`
fn canonical<'a>(a: &'a Shape, b: &'a Shape) -> Option<ColliderInfo<'a>> {
    match (a, b) {
        (Shape::Aabb(x), Shape::Aabb(y)) => {
            box_box(x, y).map(|mtv| ColliderInfo::new(a, b).with_mtv(mtv))
        }
        (Shape::Aabb(x), Shape::Circle(c)) => box_circle(x, c).map(|hit| hit.into_info(a, b)),
        (Shape::Aabb(x), Shape::Polygon(p)) => {
            sat(&x.corners(), x.center(), p.vertices(), p.centroid())
                .map(|mtv| ColliderInfo::new(a, b).with_mtv(mtv))
        }
        (Shape::Aabb(x), Shape::Segment(s)) => segment_outline(s, &x.corners(), x.center())
            .map(|hit| hit.into_info(b, a).swapped()),
        (Shape::Circle(c), Shape::Circle(d)) => circle_circle(c, d).map(|hit| hit.into_info(a, b)),
        (Shape::Circle(c), Shape::Polygon(p)) => {
            circle_polygon(c, p).map(|hit| hit.into_info(a, b))
        }
        (Shape::Circle(c), Shape::Segment(s)) => {
            segment_circle(s, c).map(|hit| hit.into_info(b, a).swapped())
        }
        (Shape::Polygon(p), Shape::Polygon(q)) => {
            sat(p.vertices(), p.centroid(), q.vertices(), q.centroid())
                .map(|mtv| ColliderInfo::new(a, b).with_mtv(mtv))
        }
        (Shape::Polygon(p), Shape::Segment(s)) => segment_outline(s, p.vertices(), p.centroid())
            .map(|hit| hit.into_info(b, a).swapped()),
        (Shape::Segment(s), Shape::Segment(t)) => {
            segment_intersection(s.start(), s.end(), t.start(), t.end())
                .map(|point| ColliderInfo::new(a, b).with_contact(point))
        }
        // Only reachable with the arguments out of canonical order
        _ => None,
    }
}

/// Contact data produced by the pair tests before it is tied to shapes
struct Hit {
    contact: Option<Vec2>,
    mtv: Option<Vec2>,
}

impl Hit {
    fn into_info<'a>(self, a: &'a Shape, b: &'a Shape) -> ColliderInfo<'a> {
        let mut info = ColliderInfo::new(a, b);
        if let Some(point) = self.contact {
            info = info.with_contact(point);
        }
        info.mtv = self.mtv;
        info
    }
}

/// Flip `axis` so that it points from `from` towards `to`
fn orient(axis: Vec2, from: Vec2, to: Vec2) -> Vec2 {
    if axis.dot(to - from) < 0.0 {
        -axis
    } else {
        axis
    }
}

fn box_box(a: &AabbShape, b: &AabbShape) -> Option<Vec2> {
    let (ap, asz) = (a.position(), a.size());
    let (bp, bsz) = (b.position(), b.size());

    let overlapping = ap.x < bp.x + bsz.x
        && ap.x + asz.x > bp.x
        && ap.y < bp.y + bsz.y
        && ap.y + asz.y > bp.y;
    if !overlapping {
        return None;
    }

    let overlap_x = (ap.x + asz.x).min(bp.x + bsz.x) - ap.x.max(bp.x);
    let overlap_y = (ap.y + asz.y).min(bp.y + bsz.y) - ap.y.max(bp.y);
    let away = a.center() - b.center();
    let mtv = if overlap_x < overlap_y {
        Vec2::new(if away.x < 0.0 { -overlap_x } else { overlap_x }, 0.0)
    } else {
        Vec2::new(0.0, if away.y < 0.0 { -overlap_y } else { overlap_y })
    };
    Some(mtv)
}

fn box_circle(aabb: &AabbShape, circle: &CircleShape) -> Option<Hit> {
    let half = aabb.half_size();
    let r = circle.radius();
    let delta = circle.center() - aabb.center();
    let distance = Vec2::new(delta.x.abs(), delta.y.abs());

    if distance.x > half.x + r || distance.y > half.y + r {
        return None;
    }

    let inside_on_axis = distance.x <= half.x || distance.y <= half.y;
    if !inside_on_axis {
        let corner = Vec2::new(distance.x - half.x, distance.y - half.y);
        if corner.length_squared() > r * r {
            return None;
        }
    }

    // Nearest point of the box to the circle center
    let min = aabb.position();
    let max = min + aabb.size();
    let c = circle.center();
    let nearest = Vec2::new(c.x.clamp(min.x, max.x), c.y.clamp(min.y, max.y));
    let outward = c - nearest;
    let gap = outward.length();

    // `towards_circle` points from the box into the circle
    let (towards_circle, depth) = if gap > 0.0 {
        (outward * (1.0 / gap), r - gap)
    } else if half.x - distance.x < half.y - distance.y {
        let sx = if delta.x < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(sx, 0.0), half.x - distance.x + r)
    } else {
        let sy = if delta.y < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(0.0, sy), half.y - distance.y + r)
    };

    Some(Hit {
        contact: Some(nearest),
        mtv: Some(-towards_circle * depth),
    })
}

fn circle_circle(a: &CircleShape, b: &CircleShape) -> Option<Hit> {
    let offset = a.center() - b.center();
    let distance = offset.length();
    let reach = a.radius() + b.radius();
    if distance > reach {
        return None;
    }

    let normal = if distance > 0.0 {
        offset * (1.0 / distance)
    } else {
        Vec2::new(0.0, 1.0)
    };
    Some(Hit {
        contact: Some(a.center() - normal * a.radius()),
        mtv: Some(normal * (reach - distance)),
    })
}

/// Separating-axis test between two convex outlines
///
/// Returns the MTV for `a`, oriented from `b_center` towards `a_center`.
fn sat(a: &[Vec2], a_center: Vec2, b: &[Vec2], b_center: Vec2) -> Option<Vec2> {
    let mut axes = edge_normals(a);
    axes.extend(edge_normals(b));

    let (depth, axis) = least_overlap(
        &axes,
        |axis| project_vertices(a, axis),
        |axis| project_vertices(b, axis),
    )?;
    Some(orient(axis, b_center, a_center) * depth)
}

/// Run the axis loop shared by every SAT variant
///
/// Returns `None` as soon as one axis separates the projections.
fn least_overlap<FA, FB>(axes: &[Vec2], project_a: FA, project_b: FB) -> Option<(f64, Vec2)>
where
    FA: Fn(Vec2) -> Projection,
    FB: Fn(Vec2) -> Projection,
{
    let mut best: Option<(f64, Vec2)> = None;
    for &axis in axes {
        let pa = project_a(axis);
        let pb = project_b(axis);
        let overlap = separation_depth(&pa, &pb);
        if overlap <= 0.0 {
            return None;
        }
        if best.map_or(true, |(depth, _)| overlap < depth) {
            best = Some((overlap, axis));
        }
    }
    best
}

/// Overlap of two intervals, extended to full separation when one contains the other
fn separation_depth(a: &Projection, b: &Projection) -> f64 {
    let overlap = a.overlap(b);
    if overlap <= 0.0 {
        return 0.0;
    }
    let contained = (a.min >= b.min && a.max <= b.max) || (b.min >= a.min && b.max <= a.max);
    if contained {
        overlap + (a.min - b.min).abs().min((a.max - b.max).abs())
    } else {
        overlap
    }
}

fn circle_polygon(circle: &CircleShape, polygon: &PolygonShape) -> Option<Hit> {
    let c = circle.center();
    let nearest = polygon
        .vertices()
        .iter()
        .copied()
        .min_by(|p, q| {
            (*p - c)
                .length_squared()
                .total_cmp(&(*q - c).length_squared())
        })?;

    let mut axes = polygon.axes();
    let vertex_axis = (c - nearest).normalized();
    if vertex_axis != Vec2::zero() {
        axes.push(vertex_axis);
    }

    let (depth, axis) = least_overlap(
        &axes,
        |axis| circle.project(axis),
        |axis| polygon.project(axis),
    )?;
    let away = orient(axis, polygon.centroid(), c);
    Some(Hit {
        contact: Some(c - away * circle.radius()),
        mtv: Some(away * depth),
    })
}

/// Segment against the closed outline of a box or polygon
///
/// Every edge is tested; the crossing met first when walking the segment
/// from its start is reported, so a ray sees the near side of an obstacle.
/// The MTV is reported for the segment and points away from `center`.
fn segment_outline(segment: &SegmentShape, outline: &[Vec2], center: Vec2) -> Option<Hit> {
    let n = outline.len();
    let start = segment.start();
    let point = (0..n)
        .filter_map(|i| {
            segment_intersection(start, segment.end(), outline[i], outline[(i + 1) % n])
        })
        .min_by(|p, q| {
            (*p - start)
                .length_squared()
                .total_cmp(&(*q - start).length_squared())
        })?;

    let normal = orient(segment.normal(), center, segment.midpoint());
    Some(Hit {
        contact: Some(point),
        mtv: Some(normal * segment.thickness()),
    })
}

fn segment_circle(segment: &SegmentShape, circle: &CircleShape) -> Option<Hit> {
    let c = circle.center();
    let r = circle.radius();
    let closest = segment.closest_point(c);
    let offset = closest - c;
    let distance = offset.length();
    if distance > r {
        return None;
    }

    let away = if distance > 0.0 {
        offset * (1.0 / distance)
    } else {
        segment.normal()
    };
    Some(Hit {
        contact: Some(first_entry(segment, c, r).unwrap_or(closest)),
        mtv: Some(away * (r - distance)),
    })
}

/// Where the segment, walked from its start, first touches the circle
fn first_entry(segment: &SegmentShape, center: Vec2, radius: f64) -> Option<Vec2> {
    let start = segment.start();
    if (start - center).length_squared() <= radius * radius {
        return Some(start);
    }
    let d = segment.direction();
    let f = start - center;
    let a = d.length_squared();
    let b = 2.0 * f.dot(d);
    let c = f.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if a == 0.0 || discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t).then(|| start + d * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn aabb(x: f64, y: f64, w: f64, h: f64) -> Shape {
        AabbShape::new(Vec2::new(x, y), Vec2::new(w, h)).unwrap().into()
    }

    fn circle(x: f64, y: f64, r: f64) -> Shape {
        CircleShape::new(Vec2::new(x, y), r).unwrap().into()
    }

    fn square_at(x: f64, y: f64) -> Shape {
        let mut s: Shape = PolygonShape::rectangle(Vec2::new(1.0, 1.0)).unwrap().into();
        s.sync_to_pose(Vec2::new(x, y), 0.0);
        s
    }

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
        SegmentShape::new(Vec2::new(x1, y1), Vec2::new(x2, y2), 0.1)
            .unwrap()
            .into()
    }

    #[test]
    fn test_box_box() {
        let a = aabb(0.0, 0.0, 2.0, 2.0);
        assert!(check_collision(&a, &aabb(1.0, 1.0, 2.0, 2.0)).is_some());
        assert!(check_collision(&a, &aabb(3.0, 0.0, 2.0, 2.0)).is_none());
        assert!(check_collision(&a, &aabb(0.0, 5.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn test_box_box_mtv_separates() {
        let a = aabb(0.0, 0.0, 2.0, 2.0);
        let b = aabb(1.5, 0.2, 2.0, 2.0);
        let info = check_collision(&a, &b).unwrap();
        assert_eq!(info.mtv, Some(Vec2::new(-0.5, 0.0)));
    }

    #[test]
    fn test_box_circle_fast_path_and_corner() {
        let b = aabb(0.0, 0.0, 2.0, 2.0);
        // Beside an edge
        assert!(check_collision(&b, &circle(2.5, 1.0, 0.6)).is_some());
        // Near a corner but outside the rounded region
        assert!(check_collision(&b, &circle(2.5, 2.5, 0.6)).is_none());
        // Inside the rounded corner region
        assert!(check_collision(&b, &circle(2.3, 2.3, 0.5)).is_some());
    }

    #[test]
    fn test_circle_circle_boundary_collides() {
        let a = circle(0.0, 0.0, 1.0);
        assert!(check_collision(&a, &circle(2.0, 0.0, 1.0)).is_some());
        assert!(check_collision(&a, &circle(2.0001, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_polygon_polygon_sat() {
        let a = square_at(0.0, 0.0);
        let b = square_at(0.5, 0.5);
        let info = check_collision(&a, &b).unwrap();
        let mtv = info.mtv.unwrap();
        assert!((mtv.length() - 0.5).abs() < 1e-12);
        // Pushes A away from B
        assert!(mtv.x < 0.0 || mtv.y < 0.0);
        assert!(check_collision(&a, &square_at(3.0, 3.0)).is_none());
    }

    #[test]
    fn test_circle_polygon() {
        let poly = square_at(0.0, 0.0);
        assert!(check_collision(&circle(0.9, 0.0, 0.5), &poly).is_some());
        assert!(check_collision(&circle(2.0, 0.0, 0.5), &poly).is_none());
        // Off the corner: the nearest-vertex axis separates
        assert!(check_collision(&circle(1.0, 1.0, 0.6), &poly).is_none());
    }

    #[test]
    fn test_segment_polygon_reports_contact_and_mtv() {
        let poly = square_at(0.0, 0.0);
        let seg = segment(-2.0, 0.0, 0.0, 0.0);
        let info = check_collision(&seg, &poly).unwrap();
        assert_eq!(info.contact_points, vec![Vec2::new(-0.5, 0.0)]);
        let mtv = info.mtv.unwrap();
        assert!((mtv.length() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_segment_segment() {
        let a = segment(0.0, 0.0, 2.0, 2.0);
        let b = segment(0.0, 2.0, 2.0, 0.0);
        let info = check_collision(&a, &b).unwrap();
        assert_eq!(info.contact_points, vec![Vec2::new(1.0, 1.0)]);
        assert!(info.mtv.is_none());
    }

    #[test]
    fn test_segment_box_and_circle_entry_point() {
        let ray = segment(-5.0, 1.0, 5.0, 1.0);
        let b = aabb(0.0, 0.0, 2.0, 2.0);
        let info = check_collision(&ray, &b).unwrap();
        assert_eq!(info.contact_points[0], Vec2::new(0.0, 1.0));

        let c = circle(0.0, 1.0, 1.0);
        let info = check_collision(&ray, &c).unwrap();
        assert!((info.contact_points[0].x + 1.0).abs() < 1e-12);
        assert!(check_collision(&segment(-5.0, 3.0, 5.0, 3.0), &c).is_none());
    }

    #[test]
    fn test_symmetry_over_all_kind_pairs() {
        let shapes = vec![
            aabb(-0.5, -0.5, 1.0, 1.0),
            circle(0.3, 0.2, 0.6),
            square_at(0.4, -0.3),
            segment(-1.0, -1.0, 1.0, 1.0),
        ];
        for a in &shapes {
            for b in &shapes {
                let ab = check_collision(a, b);
                let ba = check_collision(b, a);
                assert_eq!(ab.is_some(), ba.is_some(), "{} vs {}", a.kind(), b.kind());
                if std::ptr::eq(a, b) {
                    continue;
                }
                if let (Some(ab), Some(ba)) = (ab, ba) {
                    assert_eq!(ab.mtv.map(|m| -m), ba.mtv);
                    assert_eq!(ab.shape_a.kind(), ba.shape_b.kind());
                }
            }
        }
        assert_eq!(shapes[3].kind(), ShapeKind::Segment);
    }
}
