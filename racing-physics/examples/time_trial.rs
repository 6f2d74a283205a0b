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
//! Time trial around a square track
//!
//! Builds a track from barrier segments, drops four checkpoint sensors
//! around it and lets a simple autopilot drive one lap. Checkpoints are
//! trigger-once overlap subscriptions, so each reports exactly one passage.

use racing_physics::body::Body;
use racing_physics::math::{BoundingBox, Vec2};
use racing_physics::shapes::{AabbShape, PolygonShape, SegmentShape};
use racing_physics::{BodyHandle, CarConfig, OverlapEvent, OverlapOptions, World, WorldConfig};
use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::rc::Rc;

const OUTER: f64 = 100.0;
const INNER: f64 = 60.0;

fn square_barrier(world: &mut World, half: f64) {
    let corners = [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ];
    for i in 0..4 {
        world.add_body(
            Body::builder()
                .fixed()
                .shape(SegmentShape::new(corners[i], corners[(i + 1) % 4], 0.5).unwrap())
                .build()
                .unwrap(),
        );
    }
}

fn checkpoint(world: &mut World, center: Vec2, size: Vec2) -> BodyHandle {
    world.add_body(
        Body::builder()
            .position(center)
            .fixed()
            .sensor(true)
            .shape(AabbShape::centered(size).unwrap())
            .build()
            .unwrap(),
    )
}

/// Wrap an angle into (-PI, PI]
fn wrap(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

fn main() {
    println!("Racing Physics - Time Trial");
    println!("===========================\n");

    let mut world = World::new(
        BoundingBox::new(-120.0, -120.0, 240.0, 240.0),
        WorldConfig::default(),
    )
    .unwrap();

    square_barrier(&mut world, OUTER);
    square_barrier(&mut world, INNER);
    println!("Track: {} barrier segments", world.len());

    let lane = OUTER - INNER;
    let mid = (OUTER + INNER) / 2.0;
    let checkpoints = [
        (Vec2::new(mid, 0.0), Vec2::new(lane, 4.0)),
        (Vec2::new(0.0, mid), Vec2::new(4.0, lane)),
        (Vec2::new(-mid, 0.0), Vec2::new(lane, 4.0)),
        (Vec2::new(0.0, -mid), Vec2::new(4.0, lane)),
    ];

    let car = world.add_body(
        Body::builder()
            .position(Vec2::new(mid, -mid + 10.0))
            .rotation(FRAC_PI_2)
            .car(CarConfig::default().with_max_grip(4.0))
            .player(true)
            .shape(PolygonShape::rectangle(Vec2::new(3.0, 1.5)).unwrap())
            .build()
            .unwrap(),
    );

    let passed: Rc<RefCell<Vec<(usize, f64)>>> = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(RefCell::new(0.0));
    let mut targets = Vec::new();
    for (i, (center, size)) in checkpoints.iter().enumerate() {
        let sensor = checkpoint(&mut world, *center, *size);
        let log = Rc::clone(&passed);
        let now = Rc::clone(&clock);
        world
            .add_overlap(
                car,
                sensor,
                move |_: &OverlapEvent<'_>| log.borrow_mut().push((i, *now.borrow())),
                OverlapOptions::default().trigger_once(true),
            )
            .unwrap();
        targets.push(*center);
    }
    println!("Checkpoints: {}\n", targets.len());

    let dt = 1.0 / 60.0;
    let mut next = 0;
    let mut contacts = 0;
    while *clock.borrow() < 120.0 && passed.borrow().len() < targets.len() {
        // Aim at the next checkpoint not yet passed
        if let Some((index, _)) = passed.borrow().last() {
            next = (index + 1) % targets.len();
        }
        let body = world.body(car).unwrap();
        let to_target = targets[next] - body.position();
        let error = wrap(to_target.y.atan2(to_target.x) - body.rotation());
        let speed = body.velocity().length();

        let controls = world.body_mut(car).unwrap().car_mut().unwrap();
        controls.set_steer_angle(error * 1.5);
        controls.set_throttle(if speed < 14.0 { 0.6 } else { 0.0 });
        controls.set_brake(if speed > 18.0 { 0.3 } else { 0.0 });

        let report = world.tick(dt);
        contacts += report.contacts;
        *clock.borrow_mut() += dt;
    }

    for (index, time) in passed.borrow().iter() {
        println!("  checkpoint {} at {:6.2}s", index + 1, time);
    }

    let body = world.body(car).unwrap();
    println!("\nFinal position: ({:.1}, {:.1})", body.position().x, body.position().y);
    println!("Barrier contacts: {}", contacts);
    if passed.borrow().len() == targets.len() {
        println!("Lap complete in {:.2}s", *clock.borrow());
    } else {
        println!("Did not finish: {}/{} checkpoints", passed.borrow().len(), targets.len());
    }
}
