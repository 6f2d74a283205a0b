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
//! Ray sensors for an AI driver
//!
//! Casts a fan of rays from the front of a car every few frames and steers
//! away from whichever side sees the closer obstacle. Build with
//! `--features parallel` to cast the fan on the rayon thread pool.

use racing_physics::body::Body;
use racing_physics::math::{BoundingBox, Vec2};
use racing_physics::shapes::{CircleShape, PolygonShape, SegmentShape};
use racing_physics::{CarConfig, Ray, World, WorldConfig};

const FAN: [f64; 7] = [-1.0, -0.6, -0.3, 0.0, 0.3, 0.6, 1.0];
const SENSOR_RANGE: f64 = 40.0;

fn main() {
    println!("Racing Physics - Ray Sensors");
    println!("============================\n");

    let mut world = World::new(
        BoundingBox::new(-100.0, -100.0, 200.0, 200.0),
        WorldConfig::default(),
    )
    .unwrap();

    // A corridor with a few round obstacles
    for y in [-12.0, 12.0] {
        world.add_body(
            Body::builder()
                .fixed()
                .shape(SegmentShape::new(Vec2::new(-80.0, y), Vec2::new(80.0, y), 0.5).unwrap())
                .build()
                .unwrap(),
        );
    }
    for (x, y) in [(10.0, 4.0), (30.0, -5.0), (50.0, 6.0)] {
        world.add_body(
            Body::builder()
                .position(Vec2::new(x, y))
                .fixed()
                .shape(CircleShape::new(Vec2::zero(), 2.5).unwrap())
                .build()
                .unwrap(),
        );
    }

    let car = world.add_body(
        Body::builder()
            .position(Vec2::new(-60.0, 0.0))
            .car(CarConfig::default())
            .shape(PolygonShape::rectangle(Vec2::new(3.0, 1.5)).unwrap())
            .build()
            .unwrap(),
    );

    let dt = 1.0 / 60.0;
    for frame in 0..(60 * 12) {
        let body = world.body(car).unwrap();
        let heading = body.rotation();
        let nose = body.position() + Vec2::from_angle(heading) * 1.5;
        let rays: Vec<Ray> = FAN
            .iter()
            .map(|offset| {
                Ray::new(nose, Vec2::from_angle(heading + offset), SENSOR_RANGE).ignoring(car)
            })
            .collect();
        let hits = world.cast_rays(&rays);

        // Positive offsets look left; steer towards the more open side
        let mut left = 0.0;
        let mut right = 0.0;
        for (offset, hit) in FAN.iter().zip(&hits) {
            let closeness = 1.0 - hit.distance / SENSOR_RANGE;
            if *offset > 0.0 {
                left += closeness;
            } else if *offset < 0.0 {
                right += closeness;
            }
        }
        let ahead = hits[FAN.len() / 2].distance;

        let controls = world.body_mut(car).unwrap().car_mut().unwrap();
        controls.set_steer_angle((right - left) * 0.8);
        controls.set_throttle(if ahead > 15.0 { 0.5 } else { 0.2 });

        world.tick(dt);

        if frame % 60 == 0 {
            let body = world.body(car).unwrap();
            let readings: Vec<String> =
                hits.iter().map(|h| format!("{:5.1}", h.distance)).collect();
            println!(
                "t={:4.1}s pos=({:6.1}, {:5.1}) rays=[{}]",
                frame as f64 * dt,
                body.position().x,
                body.position().y,
                readings.join(" ")
            );
        }
    }
}
