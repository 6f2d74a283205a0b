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
//! Impulse-based contact response

use crate::body::Body;
use crate::config::WorldConfig;
use crate::math::Vec2;

/// Push two overlapping bodies apart and exchange momentum
///
/// `mtv` is the translation that separates `a` from `b`, so it points from
/// `b` towards `a`. The impulse along its direction uses the configured
/// restitution and is split by inverse mass; a fraction of the penetration
/// is removed by moving both bodies apart the same way. Bodies with zero
/// inverse mass receive nothing.
///
/// Returns the magnitude of the impulse, zero when the bodies were already
/// separating or neither can move.
pub fn resolve_contact(a: &mut Body, b: &mut Body, mtv: Vec2, config: &WorldConfig) -> f64 {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    let normal = mtv.normalized();
    if inv_sum == 0.0 || normal == Vec2::zero() {
        return 0.0;
    }

    let correction = mtv * (config.position_correction / inv_sum);
    a.position += correction * inv_a;
    b.position -= correction * inv_b;

    let approach = (a.velocity - b.velocity).dot(normal);
    let mut impulse = 0.0;
    if approach < 0.0 {
        impulse = -(1.0 + config.restitution) * approach / inv_sum;
        a.velocity += normal * (impulse * inv_a);
        b.velocity -= normal * (impulse * inv_b);
        for body in [&mut *a, &mut *b] {
            if body.is_movable() {
                body.angular_velocity *= config.angular_damping;
            }
        }
    }

    a.sync_shape_to_body();
    b.sync_shape_to_body();
    impulse
}
