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
//! # Racing Physics
//!
//! A deterministic 2D physics core for top-down racing games.
//!
//! ## Features
//!
//! - **Colliders**: axis-aligned boxes, circles, convex polygons and line
//!   segments with a symmetric narrow phase that reports separation vectors
//! - **Broad phase**: a quadtree rebuilt every step from the live bodies
//! - **Vehicle dynamics**: a bicycle model with slip-angle tire grip,
//!   traction, braking, rolling resistance and drag
//! - **Collision response**: symmetric impulses with restitution and
//!   position correction
//! - **Overlap subscriptions**: gameplay callbacks for checkpoints,
//!   barriers and car-to-car rules
//! - **Ray casts**: sensor rays for AI drivers, batched in parallel with the
//!   optional `parallel` feature
//!
//! ## Example
//!
//! ```rust
//! use racing_physics::body::Body;
//! use racing_physics::math::{BoundingBox, Vec2};
//! use racing_physics::shapes::PolygonShape;
//! use racing_physics::{CarConfig, World, WorldConfig};
//!
//! let mut world = World::new(
//!     BoundingBox::new(-500.0, -500.0, 1000.0, 1000.0),
//!     WorldConfig::default(),
//! )
//! .unwrap();
//!
//! let car = world.add_body(
//!     Body::builder()
//!         .car(CarConfig::default())
//!         .player(true)
//!         .shape(PolygonShape::rectangle(Vec2::new(3.0, 1.5)).unwrap())
//!         .build()
//!         .unwrap(),
//! );
//!
//! world.body_mut(car).unwrap().car_mut().unwrap().set_throttle(1.0);
//! for _ in 0..60 {
//!     world.tick(1.0 / 60.0);
//! }
//! assert!(world.body(car).unwrap().position().x > 0.0);
//! ```

#![warn(missing_docs)]

/// Bodies, handles and body storage
pub mod body;

/// World and vehicle configuration
pub mod config;

/// Motion integration, vehicle dynamics and contact response
pub mod dynamics;

/// Error types
pub mod error;

/// 2D vectors and bounding boxes
pub mod math;

/// Overlap subscriptions
pub mod overlap;

/// Collider shapes and narrow-phase tests
pub mod shapes;

/// Broad-phase spatial index
pub mod spatial;

/// The simulation world
pub mod world;

pub use body::{Body, BodyBuilder, BodyHandle};
pub use config::{CarConfig, WorldConfig, MAX_SUBSTEPS_PER_TICK};
pub use error::{PhysicsError, Result};
pub use overlap::{OverlapEvent, OverlapId, OverlapOptions, OverlapRegistry};
pub use shapes::{ColliderInfo, Shape};
pub use world::{Ray, RayHit, TickReport, World};
