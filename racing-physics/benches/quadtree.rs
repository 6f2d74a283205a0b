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
//! Benchmarks for the quadtree broad phase
//!
//! The world rebuilds its tree every sub-step, so rebuild cost matters as
//! much as query cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use racing_physics::math::BoundingBox;
use racing_physics::spatial::{QuadTree, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH};

const WORLD: BoundingBox = BoundingBox::new(0.0, 0.0, 1000.0, 1000.0);

/// Deterministic scatter so runs are comparable
fn scatter(count: usize) -> Vec<BoundingBox> {
    let mut state = 0x2545_f491_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10.0
    };
    (0..count)
        .map(|_| BoundingBox::new(next(), next(), 3.0, 1.5))
        .collect()
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_rebuild");
    for count in [100, 1000, 5000] {
        let boxes = scatter(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &boxes, |b, boxes| {
            let mut tree = QuadTree::new(WORLD, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH);
            b.iter(|| {
                tree.clear();
                for (i, bounds) in boxes.iter().enumerate() {
                    tree.insert(i as u32, *bounds);
                }
                black_box(tree.len());
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");
    for count in [100, 1000, 5000] {
        let mut tree = QuadTree::new(WORLD, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH);
        for (i, bounds) in scatter(count).into_iter().enumerate() {
            tree.insert(i as u32, bounds);
        }
        let range = BoundingBox::new(400.0, 400.0, 50.0, 50.0);
        group.bench_with_input(BenchmarkId::new("region", count), &tree, |b, tree| {
            b.iter(|| black_box(tree.query(black_box(&range)).len()));
        });
        group.bench_with_input(BenchmarkId::new("pairs", count), &tree, |b, tree| {
            b.iter(|| black_box(tree.candidate_pairs().len()));
        });
    }
    group.finish();
}

criterion_group!(quadtree_benches, bench_rebuild, bench_query);
criterion_main!(quadtree_benches);
