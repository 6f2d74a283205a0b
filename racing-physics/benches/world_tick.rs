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
//! Benchmarks for a full world tick with cars, crates and barriers

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use racing_physics::body::Body;
use racing_physics::math::{BoundingBox, Vec2};
use racing_physics::shapes::{AabbShape, PolygonShape, SegmentShape};
use racing_physics::{CarConfig, OverlapEvent, OverlapOptions, Ray, World, WorldConfig};

fn build_world(cars: usize) -> World {
    let mut world = World::new(
        BoundingBox::new(-200.0, -200.0, 400.0, 400.0),
        WorldConfig::default(),
    )
    .unwrap();

    // Square track of barrier segments
    let corners = [
        Vec2::new(-150.0, -150.0),
        Vec2::new(150.0, -150.0),
        Vec2::new(150.0, 150.0),
        Vec2::new(-150.0, 150.0),
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

    let checkpoint = world.add_body(
        Body::builder()
            .fixed()
            .sensor(true)
            .position(Vec2::new(0.0, 100.0))
            .shape(AabbShape::centered(Vec2::new(10.0, 10.0)).unwrap())
            .build()
            .unwrap(),
    );

    for i in 0..cars {
        let x = -120.0 + (i % 20) as f64 * 12.0;
        let y = -120.0 + (i / 20) as f64 * 8.0;
        let car = world.add_body(
            Body::builder()
                .position(Vec2::new(x, y))
                .rotation(0.1 * i as f64)
                .car(CarConfig::default())
                .shape(PolygonShape::rectangle(Vec2::new(3.0, 1.5)).unwrap())
                .build()
                .unwrap(),
        );
        if let Some(controls) = world.body_mut(car).and_then(|b| b.car_mut()) {
            controls.set_throttle(0.6);
            controls.set_steer_angle(if i % 2 == 0 { 0.1 } else { -0.1 });
        }
        world
            .add_overlap(car, checkpoint, |_: &OverlapEvent<'_>| {}, OverlapOptions::default())
            .unwrap();
    }
    world
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    for cars in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(cars), &cars, |b, &cars| {
            b.iter_batched(
                || build_world(cars),
                |mut world| {
                    for _ in 0..10 {
                        black_box(world.tick(1.0 / 60.0));
                    }
                    world
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_ray_fan(c: &mut Criterion) {
    let world = build_world(50);
    let rays: Vec<Ray> = (0..64)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 64.0;
            Ray::new(Vec2::zero(), Vec2::from_angle(angle), 200.0)
        })
        .collect();
    c.bench_function("cast_rays_64", |b| {
        b.iter(|| black_box(world.cast_rays(black_box(&rays))));
    });
}

criterion_group!(world_benches, bench_tick, bench_ray_fan);
criterion_main!(world_benches);
