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
//! Error types
//!
//! Only configuration mistakes are errors. They are reported when a shape,
//! body or world is constructed so that nothing malformed ever reaches the
//! tick loop. Unsupported shape pairs and numeric degeneracy are not errors.

use crate::body::BodyHandle;
use thiserror::Error;

/// Errors produced when building shapes, bodies and worlds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A polygon needs at least three vertices
    #[error("polygon needs at least 3 vertices, got {vertices}")]
    TooFewVertices {
        /// Number of vertices supplied
        vertices: usize,
    },

    /// A polygon whose vertices enclose no area
    #[error("polygon vertices are collinear or coincident")]
    DegeneratePolygon,

    /// A polygon outline that turns both ways
    #[error("polygon is not convex")]
    NonConvexPolygon,

    /// A circle radius that is zero, negative or not finite
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// A box with a zero, negative or non-finite extent
    #[error("box size must be positive and finite, got {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },

    /// A segment whose endpoints coincide
    #[error("segment endpoints coincide")]
    DegenerateSegment,

    /// A segment thickness that is negative or not finite
    #[error("segment thickness must be non-negative and finite, got {0}")]
    InvalidThickness(f64),

    /// A coordinate that is NaN or infinite
    #[error("{0} contains a non-finite coordinate")]
    NonFinite(&'static str),

    /// A mass that is not usable for the kind of body it is attached to
    #[error("invalid mass {0}: movable bodies need a positive, finite mass")]
    InvalidMass(f64),

    /// A body builder that was never given a collider
    #[error("physical body requires a collider shape")]
    MissingShape,

    /// Car geometry or tuning that cannot be simulated
    #[error("invalid car configuration: {0}")]
    InvalidCar(String),

    /// World bounds that are empty or not finite
    #[error("world bounds must have positive, finite size")]
    InvalidBounds,

    /// A world configuration value out of range
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),

    /// A handle that does not resolve to a live body
    #[error("no live body for {0}")]
    UnknownBody(BodyHandle),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PhysicsError::TooFewVertices { vertices: 2 };
        assert_eq!(err.to_string(), "polygon needs at least 3 vertices, got 2");

        let err = PhysicsError::UnknownBody(BodyHandle::new(3, 1));
        assert_eq!(err.to_string(), "no live body for Body(3, gen: 1)");
    }
}
