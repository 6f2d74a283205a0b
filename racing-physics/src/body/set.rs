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
//! Generational storage for bodies

use crate::body::{Body, BodyHandle};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Owns every body in a world
///
/// Slots are reused after removal with a bumped generation, so handles to
/// removed bodies stay dead. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<BodyHandle>,
}

impl BodySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle
    pub fn insert(&mut self, body: Body) -> BodyHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                BodyHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    body: Some(body),
                });
                BodyHandle::new(index, 0)
            }
        };
        self.order.push(handle);
        handle
    }

    /// Remove a body, invalidating its handle
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.slot_mut(handle)?;
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.order.retain(|h| *h != handle);
        Some(body)
    }

    /// Check whether a handle resolves to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Look up a body
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.body.as_ref())
    }

    /// Look up a body mutably
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slot_mut(handle).and_then(|slot| slot.body.as_mut())
    }

    /// Borrow two distinct bodies mutably at once
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        if a.index() == b.index() || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (i, j) = (a.index() as usize, b.index() as usize);
        let (first, second) = if i < j {
            let (left, right) = self.slots.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = self.slots.split_at_mut(i);
            (&mut right[0], &mut left[j])
        };
        Some((first.body.as_mut()?, second.body.as_mut()?))
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles of live bodies in insertion order
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Live bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .iter()
            .filter_map(move |&handle| self.get(handle).map(|body| (handle, body)))
    }

    /// Remove every body; all outstanding handles become stale
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.body.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.order.clear();
    }

    fn slot_mut(&mut self, handle: BodyHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::shapes::CircleShape;

    fn body(x: f64) -> Body {
        Body::builder()
            .position(Vec2::new(x, 0.0))
            .shape(CircleShape::new(Vec2::zero(), 1.0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = BodySet::new();
        let a = set.insert(body(1.0));
        let b = set.insert(body(2.0));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(a).unwrap().position().x, 1.0);
        assert_eq!(set.get(b).unwrap().position().x, 2.0);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut set = BodySet::new();
        let a = set.insert(body(1.0));
        assert!(set.remove(a).is_some());
        assert!(set.remove(a).is_none());

        let b = set.insert(body(2.0));
        assert_eq!(b.index(), a.index());
        assert_ne!(b, a);
        assert!(set.get(a).is_none());
        assert_eq!(set.get(b).unwrap().position().x, 2.0);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut set = BodySet::new();
        let a = set.insert(body(1.0));
        let b = set.insert(body(2.0));
        let c = set.insert(body(3.0));
        set.remove(b);
        let d = set.insert(body(4.0));
        let order: Vec<_> = set.iter().map(|(h, _)| h).collect();
        assert_eq!(order, vec![a, c, d]);
    }

    #[test]
    fn test_pair_mut() {
        let mut set = BodySet::new();
        let a = set.insert(body(1.0));
        let b = set.insert(body(2.0));
        {
            let (ba, bb) = set.get_pair_mut(b, a).unwrap();
            assert_eq!(ba.position().x, 2.0);
            assert_eq!(bb.position().x, 1.0);
            ba.set_position(Vec2::new(20.0, 0.0));
        }
        assert_eq!(set.get(b).unwrap().position().x, 20.0);
        assert!(set.get_pair_mut(a, a).is_none());
    }

    #[test]
    fn test_clear() {
        let mut set = BodySet::new();
        let a = set.insert(body(1.0));
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(a));
    }
}
