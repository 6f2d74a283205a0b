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
//! Integration tests for the narrow phase and collider geometry

use racing_physics::math::Vec2;
use racing_physics::shapes::{
    check_collision, AabbShape, CircleShape, PolygonShape, SegmentShape, Shape,
};

fn aabb(x: f64, y: f64, w: f64, h: f64) -> Shape {
    AabbShape::new(Vec2::new(x, y), Vec2::new(w, h)).unwrap().into()
}

fn circle(x: f64, y: f64, r: f64) -> Shape {
    CircleShape::new(Vec2::new(x, y), r).unwrap().into()
}

fn unit_square(x: f64, y: f64) -> Shape {
    let mut shape: Shape = PolygonShape::rectangle(Vec2::new(1.0, 1.0)).unwrap().into();
    shape.sync_to_pose(Vec2::new(x, y), 0.0);
    shape
}

#[test]
fn test_disjoint_boxes_never_collide() {
    let a = aabb(0.0, 0.0, 2.0, 2.0);
    let offsets = [
        (3.0, 0.0),
        (-3.0, 0.0),
        (0.0, 3.0),
        (0.0, -3.0),
        (2.5, 2.5),
        (-10.0, 7.0),
    ];
    for (x, y) in offsets {
        let b = aabb(x, y, 2.0, 2.0);
        assert!(check_collision(&a, &b).is_none(), "boxes at ({x}, {y}) overlap");
        assert!(check_collision(&b, &a).is_none());
    }
}

#[test]
fn test_overlapping_boxes_report_evidence() {
    let a = aabb(0.0, 0.0, 2.0, 2.0);
    let b = aabb(1.0, 1.0, 2.0, 2.0);
    let info = check_collision(&a, &b).expect("boxes overlap");
    assert!(std::ptr::eq(info.shape_a, &a));
    assert!(std::ptr::eq(info.shape_b, &b));
}

#[test]
fn test_circle_boundary_is_inclusive() {
    for (r1, r2) in [(1.0, 1.0), (0.5, 2.0), (3.0, 0.25)] {
        let a = circle(0.0, 0.0, r1);
        let touching = circle(r1 + r2, 0.0, r2);
        let apart = circle(r1 + r2 + 1e-6, 0.0, r2);
        assert!(check_collision(&a, &touching).is_some());
        assert!(check_collision(&touching, &a).is_some());
        assert!(check_collision(&a, &apart).is_none());
    }
}

#[test]
fn test_polygon_squares_sat() {
    let a = unit_square(0.0, 0.0);
    assert!(check_collision(&a, &unit_square(0.5, 0.5)).is_some());
    assert!(check_collision(&a, &unit_square(3.0, 3.0)).is_none());
}

#[test]
fn test_sat_mtv_separates() {
    let a = unit_square(0.0, 0.0);
    let b = unit_square(0.8, 0.1);
    let mtv = check_collision(&a, &b).unwrap().mtv.unwrap();
    assert!(mtv.x < 0.0);
    assert!((mtv.length() - 0.2).abs() < 1e-9);

    // Applying the MTV leaves the shapes at most touching
    let mut moved = a.clone();
    moved.sync_to_pose(mtv * 1.001, 0.0);
    assert!(check_collision(&moved, &b).is_none());
}

#[test]
fn test_rotated_polygon_has_no_drift() {
    let mut shape: Shape = PolygonShape::rectangle(Vec2::new(2.0, 1.0)).unwrap().into();
    let fresh = shape.clone();
    for i in 0..10_000 {
        shape.sync_to_pose(Vec2::new(1.0, 2.0), i as f64 * 0.37);
    }
    shape.sync_to_pose(Vec2::zero(), 0.0);
    assert_eq!(shape, fresh);
}

#[test]
fn test_every_pair_is_symmetric() {
    let shapes: Vec<Shape> = vec![
        aabb(-1.0, -1.0, 2.0, 2.0),
        circle(0.5, 0.0, 1.0),
        unit_square(0.0, 0.5),
        SegmentShape::new(Vec2::new(-2.0, 0.2), Vec2::new(2.0, 0.3), 0.1)
            .unwrap()
            .into(),
        circle(10.0, 10.0, 1.0),
    ];
    for a in &shapes {
        for b in &shapes {
            if std::ptr::eq(a, b) {
                continue;
            }
            let ab = check_collision(a, b);
            let ba = check_collision(b, a);
            assert_eq!(ab.is_some(), ba.is_some(), "{} vs {}", a.kind(), b.kind());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                assert_eq!(ab.mtv.map(|m| -m), ba.mtv, "{} vs {}", a.kind(), b.kind());
            }
        }
    }
}

#[test]
fn test_segments_cross_without_mtv() {
    let a: Shape = SegmentShape::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), 0.1)
        .unwrap()
        .into();
    let b: Shape = SegmentShape::new(Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0), 0.1)
        .unwrap()
        .into();
    let info = check_collision(&a, &b).unwrap();
    assert_eq!(info.contact_points, vec![Vec2::new(1.0, 1.0)]);
    assert_eq!(info.mtv, None);
}

#[test]
fn test_ray_against_every_kind() {
    let ray: Shape = SegmentShape::ray(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0))
        .unwrap()
        .into();
    let targets = [aabb(1.0, -1.0, 2.0, 2.0), circle(2.0, 0.0, 1.0), unit_square(1.5, 0.0)];
    for target in &targets {
        let info = check_collision(&ray, target).expect("ray hits target");
        let point = info.contact_points[0];
        assert!((point.x - 1.0).abs() < 1e-9, "{} hit at {:?}", target.kind(), point);
    }

    let beside = aabb(1.0, 5.0, 2.0, 2.0);
    assert!(check_collision(&ray, &beside).is_none());
}
