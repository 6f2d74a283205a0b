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
//! Overlap subscriptions
//!
//! Geometry decides whether two bodies touch; subscriptions decide whether
//! gameplay hears about it. Each subscription names two bodies, a callback
//! and a few flags. Once per tick the world runs the narrow phase for every
//! live subscription and calls back on overlap.
//!
//! # Flags
//!
//! - `enabled`: disabled subscriptions are skipped entirely
//! - `trigger_once`: after the first firing the subscription latches and
//!   stays silent until [`OverlapRegistry::reset`]
//! - `uses_collision_evidence`: the event carries the [`ColliderInfo`]
//!
//! Subscriptions hold handles, not bodies. The world drops every
//! subscription that names a body when that body is removed.

use crate::body::{Body, BodyHandle, BodySet};
use crate::shapes::ColliderInfo;
use std::fmt;

/// Options for a new subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlapOptions {
    /// Fire at most once until reset
    pub trigger_once: bool,
    /// Whether the subscription is evaluated at all
    pub enabled: bool,
    /// Pass the collision evidence to the callback
    pub uses_collision_evidence: bool,
}

impl Default for OverlapOptions {
    fn default() -> Self {
        OverlapOptions {
            trigger_once: false,
            enabled: true,
            uses_collision_evidence: false,
        }
    }
}

impl OverlapOptions {
    /// Set `trigger_once`
    pub fn trigger_once(mut self, trigger_once: bool) -> Self {
        self.trigger_once = trigger_once;
        self
    }

    /// Set `enabled`
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set `uses_collision_evidence`
    pub fn with_evidence(mut self, uses_collision_evidence: bool) -> Self {
        self.uses_collision_evidence = uses_collision_evidence;
        self
    }
}

/// Identifier of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlapId(u64);

impl OverlapId {
    /// Raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Overlap({})", self.0)
    }
}

/// Read-only view of a subscription's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapSubscription {
    id: OverlapId,
    first: BodyHandle,
    second: BodyHandle,
    options: OverlapOptions,
    has_triggered: bool,
}

impl OverlapSubscription {
    /// Identifier
    pub fn id(&self) -> OverlapId {
        self.id
    }

    /// First body
    pub fn first(&self) -> BodyHandle {
        self.first
    }

    /// Second body
    pub fn second(&self) -> BodyHandle {
        self.second
    }

    /// Whether the subscription names `body`
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.first == body || self.second == body
    }

    /// Whether the subscription is evaluated
    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Whether the subscription fires at most once
    pub fn is_trigger_once(&self) -> bool {
        self.options.trigger_once
    }

    /// Whether a trigger-once subscription has latched
    pub fn has_triggered(&self) -> bool {
        self.has_triggered
    }

    /// Whether events carry collision evidence
    pub fn uses_collision_evidence(&self) -> bool {
        self.options.uses_collision_evidence
    }

    fn is_live(&self) -> bool {
        self.options.enabled && !(self.options.trigger_once && self.has_triggered)
    }
}

/// What a callback receives when its bodies overlap
pub struct OverlapEvent<'a> {
    /// Subscription that fired
    pub id: OverlapId,
    /// Handle of the first body
    pub first: BodyHandle,
    /// Handle of the second body
    pub second: BodyHandle,
    /// The first body
    pub body_a: &'a Body,
    /// The second body
    pub body_b: &'a Body,
    /// Narrow-phase evidence, when the subscription asked for it
    pub evidence: Option<&'a ColliderInfo<'a>>,
}

/// Callback invoked on overlap
pub type OverlapCallback = Box<dyn FnMut(&OverlapEvent<'_>)>;

struct Entry {
    subscription: OverlapSubscription,
    callback: OverlapCallback,
}

/// Unordered collection of overlap subscriptions
#[derive(Default)]
pub struct OverlapRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl fmt::Debug for OverlapRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.subscription))
            .finish()
    }
}

impl OverlapRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to overlaps between `first` and `second`
    ///
    /// Nothing checks that the bodies exist; a subscription naming a body
    /// that is not in the evaluated set simply never fires.
    pub fn add_overlap<F>(
        &mut self,
        first: BodyHandle,
        second: BodyHandle,
        callback: F,
        options: OverlapOptions,
    ) -> OverlapId
    where
        F: FnMut(&OverlapEvent<'_>) + 'static,
    {
        let id = OverlapId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            subscription: OverlapSubscription {
                id,
                first,
                second,
                options,
                has_triggered: false,
            },
            callback: Box::new(callback),
        });
        log::debug!("Added {} between {} and {}", id, first, second);
        id
    }

    /// Drop one subscription; returns whether it existed
    pub fn remove_overlap(&mut self, id: OverlapId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.subscription.id != id);
        let removed = self.entries.len() != before;
        if removed {
            log::debug!("Removed {}", id);
        }
        removed
    }

    /// Drop every subscription naming `body`; returns how many went
    pub fn remove_involving(&mut self, body: BodyHandle) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.subscription.involves(body));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Removed {} overlap subscription(s) for {}", removed, body);
        }
        removed
    }

    /// Enable or disable a subscription; returns whether it exists
    pub fn set_enabled(&mut self, id: OverlapId, enabled: bool) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.subscription.options.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Clear the trigger-once latch; returns whether the subscription exists
    pub fn reset(&mut self, id: OverlapId) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.subscription.has_triggered = false;
                true
            }
            None => false,
        }
    }

    /// Current state of a subscription
    pub fn subscription(&self, id: OverlapId) -> Option<OverlapSubscription> {
        self.entries
            .iter()
            .find(|e| e.subscription.id == id)
            .map(|e| e.subscription)
    }

    /// All subscriptions in registration order
    pub fn subscriptions(&self) -> impl Iterator<Item = OverlapSubscription> + '_ {
        self.entries.iter().map(|e| e.subscription)
    }

    /// Number of subscriptions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether there are no subscriptions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Test every live subscription and fire callbacks on overlap
    ///
    /// Returns the number of callbacks invoked.
    pub fn process_overlaps(&mut self, bodies: &BodySet) -> usize {
        let mut fired = 0;
        for entry in &mut self.entries {
            let sub = &mut entry.subscription;
            if !sub.is_live() {
                continue;
            }
            let (Some(body_a), Some(body_b)) = (bodies.get(sub.first), bodies.get(sub.second))
            else {
                continue;
            };
            let Some(info) = body_a.check_collision(body_b) else {
                continue;
            };

            let event = OverlapEvent {
                id: sub.id,
                first: sub.first,
                second: sub.second,
                body_a,
                body_b,
                evidence: sub.options.uses_collision_evidence.then_some(&info),
            };
            (entry.callback)(&event);
            fired += 1;

            if sub.options.trigger_once {
                sub.has_triggered = true;
            }
        }
        fired
    }

    fn entry_mut(&mut self, id: OverlapId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.subscription.id == id)
    }
}
