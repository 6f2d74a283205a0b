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
//! Bodies, their handles and their storage
//!
//! A [`Body`] owns exactly one collider [`Shape`](crate::shapes::Shape).
//! Bodies are created through [`BodyBuilder`] and handed to a
//! [`World`](crate::World), which stores them in a [`BodySet`] and gives back
//! a generational [`BodyHandle`].

mod handle;
mod mass;
mod rigid;
mod set;

pub use handle::BodyHandle;
pub use mass::Mass;
pub use rigid::{Body, BodyBuilder};
pub use set::BodySet;
