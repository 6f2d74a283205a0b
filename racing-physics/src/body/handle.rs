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
//! Generational body handles

use std::fmt;

/// Handle to a body owned by a [`World`](crate::World)
///
/// A handle pairs a slot index with the generation of the body that
/// occupied the slot when the handle was issued. Removing a body bumps the
/// slot's generation, so stale handles never resolve to a later occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Create a handle from a slot index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        BodyHandle { index, generation }
    }

    /// Slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({}, gen: {})", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_equality() {
        let h1 = BodyHandle::new(1, 0);
        let h2 = BodyHandle::new(1, 0);
        let h3 = BodyHandle::new(1, 1);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_handle_ordering() {
        assert!(BodyHandle::new(0, 5) < BodyHandle::new(1, 0));
        assert!(BodyHandle::new(2, 0) < BodyHandle::new(2, 1));
    }
}
