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
//! Region quadtree over bounding boxes
//!
//! # Insertion semantics
//!
//! An item is stored in every leaf whose region its bounding box
//! intersects, so bodies straddling a quadrant boundary are never lost.
//! Items entirely outside the root region are kept in a separate list that
//! every query scans as well.
//!
//! # Node invariant
//!
//! A node has either no children (leaf) or exactly four. An item whose box
//! covers a node's whole region stays on that node, leaf or branch, since
//! no split below it could ever separate it from anything. Every other item
//! lives in leaves only. A leaf splits when an insert would take its
//! uncovering items past `capacity` and at least one of them fits inside a
//! single quadrant. Otherwise, or once it sits at `max_depth`, the leaf
//! simply grows. Large overlapping bodies such as track barriers therefore
//! settle near the root instead of fanning the tree out to its full depth.
//!
//! # Memory
//!
//! Nodes live in one arena vector. [`QuadTree::clear`] truncates it without
//! releasing capacity, so rebuilding the tree every tick settles into zero
//! allocations once the arena has grown to the working size.

use crate::math::BoundingBox;

/// Leaf capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 4;

/// Depth cap used when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Debug, Clone)]
struct Node<T> {
    bounds: BoundingBox,
    depth: usize,
    items: Vec<(T, BoundingBox)>,
    children: Option<[usize; 4]>,
}

impl<T> Node<T> {
    fn leaf(bounds: BoundingBox, depth: usize) -> Self {
        Node {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

/// Broad-phase quadtree keyed by small copyable identifiers
///
/// # Examples
///
/// ```
/// use racing_physics::math::BoundingBox;
/// use racing_physics::spatial::QuadTree;
///
/// let mut tree = QuadTree::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0), 4, 8);
/// tree.insert(1u32, BoundingBox::new(10.0, 10.0, 5.0, 5.0));
/// tree.insert(2u32, BoundingBox::new(80.0, 80.0, 5.0, 5.0));
///
/// assert_eq!(tree.query(&BoundingBox::new(0.0, 0.0, 50.0, 50.0)), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    capacity: usize,
    max_depth: usize,
    nodes: Vec<Node<T>>,
    outside: Vec<(T, BoundingBox)>,
    len: usize,
}

impl<T> QuadTree<T>
where
    T: Copy + Ord,
{
    /// Create an empty tree over `bounds`
    ///
    /// A capacity of zero is treated as one.
    pub fn new(bounds: BoundingBox, capacity: usize, max_depth: usize) -> Self {
        QuadTree {
            capacity: capacity.max(1),
            max_depth,
            nodes: vec![Node::leaf(bounds, 0)],
            outside: Vec::new(),
            len: 0,
        }
    }

    /// Region covered by the root node
    pub fn bounds(&self) -> BoundingBox {
        self.nodes[0].bounds
    }

    /// Number of items inserted since the last clear
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, leaves and branches together
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level currently in use
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Number of items that lie entirely outside the root region
    pub fn outside_count(&self) -> usize {
        self.outside.len()
    }

    /// Drop every item and child node, leaving a single empty leaf
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.items.clear();
        root.children = None;
        self.outside.clear();
        self.len = 0;
    }

    /// Insert an item with its bounding box
    ///
    /// Returns `false` and stores nothing if the box is not finite.
    pub fn insert(&mut self, item: T, bounds: BoundingBox) -> bool {
        if !bounds.is_valid() {
            log::warn!("Skipping quadtree insert with non-finite bounds {:?}", bounds);
            return false;
        }
        self.len += 1;
        if self.nodes[0].bounds.intersects(&bounds) {
            self.insert_at(0, item, bounds);
        } else {
            self.outside.push((item, bounds));
        }
        true
    }

    fn insert_at(&mut self, index: usize, item: T, bounds: BoundingBox) {
        if !self.nodes[index].bounds.intersects(&bounds) {
            return;
        }

        let node = &mut self.nodes[index];
        if bounds.contains(&node.bounds) {
            node.items.push((item, bounds));
            return;
        }

        if let Some(children) = node.children {
            for child in children {
                self.insert_at(child, item, bounds);
            }
            return;
        }

        let region = node.bounds;
        let loose = node.items.iter().filter(|(_, b)| !b.contains(&region)).count();
        if loose < self.capacity
            || node.depth >= self.max_depth
            || !splits_apart(node, &bounds)
        {
            node.items.push((item, bounds));
            return;
        }

        let children = self.subdivide(index);
        for child in children {
            self.insert_at(child, item, bounds);
        }
    }

    /// Split a full leaf into four quadrants and push its uncovering items down
    fn subdivide(&mut self, index: usize) -> [usize; 4] {
        let region = self.nodes[index].bounds;
        let depth = self.nodes[index].depth + 1;
        let first = self.nodes.len();
        for quadrant in region.quadrants() {
            self.nodes.push(Node::leaf(quadrant, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];

        let (covering, loose): (Vec<_>, Vec<_>) = std::mem::take(&mut self.nodes[index].items)
            .into_iter()
            .partition(|(_, b)| b.contains(&region));
        self.nodes[index].items = covering;
        self.nodes[index].children = Some(children);
        for (item, bounds) in loose {
            for child in children {
                self.insert_at(child, item, bounds);
            }
        }
        children
    }

    /// Every item whose bounding box intersects `range`
    ///
    /// Each item is reported once, in ascending order.
    pub fn query(&self, range: &BoundingBox) -> Vec<T> {
        let mut found = Vec::new();
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.bounds.intersects(range) {
                continue;
            }
            found.extend(
                node.items
                    .iter()
                    .filter(|(_, b)| b.intersects(range))
                    .map(|(item, _)| *item),
            );
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        found.extend(
            self.outside
                .iter()
                .filter(|(_, b)| b.intersects(range))
                .map(|(item, _)| *item),
        );
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Every unordered pair of distinct items whose bounding boxes intersect
    ///
    /// Pairs are `(lower, higher)`, sorted and reported once each.
    pub fn candidate_pairs(&self) -> Vec<(T, T)> {
        let mut pairs = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            push_pairs(&node.items, &mut pairs);
            if node.children.is_none() || node.items.is_empty() {
                continue;
            }
            // Items held on a branch meet everything stored beneath it
            for (item, bounds) in &node.items {
                for other in self.query_below(index, bounds) {
                    pairs.push(ordered(*item, other));
                }
            }
        }

        for (i, (item, bounds)) in self.outside.iter().enumerate() {
            for (other, other_bounds) in &self.outside[i + 1..] {
                if bounds.intersects(other_bounds) {
                    pairs.push(ordered(*item, *other));
                }
            }
            // Outside items can still reach into the root region
            for other in self.query_inside(bounds) {
                pairs.push(ordered(*item, other));
            }
        }

        pairs.retain(|(a, b)| a != b);
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    fn query_inside(&self, range: &BoundingBox) -> Vec<T> {
        self.query_from(vec![0], range)
    }

    fn query_below(&self, index: usize, range: &BoundingBox) -> Vec<T> {
        match self.nodes[index].children {
            Some(children) => self.query_from(children.to_vec(), range),
            None => Vec::new(),
        }
    }

    fn query_from(&self, mut stack: Vec<usize>, range: &BoundingBox) -> Vec<T> {
        let mut found = Vec::new();
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.bounds.intersects(range) {
                continue;
            }
            found.extend(
                node.items
                    .iter()
                    .filter(|(_, b)| b.intersects(range))
                    .map(|(item, _)| *item),
            );
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        found
    }
}

/// Whether splitting a leaf would isolate at least one of its loose items
///
/// When every item reaches all four quadrants each child would inherit the
/// whole leaf, so the split only multiplies nodes.
fn splits_apart<T>(leaf: &Node<T>, incoming: &BoundingBox) -> bool {
    let quadrants = leaf.bounds.quadrants();
    let separable = |b: &BoundingBox| quadrants.iter().any(|q| q.contains(b));
    separable(incoming)
        || leaf
            .items
            .iter()
            .any(|(_, b)| !b.contains(&leaf.bounds) && separable(b))
}

fn ordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn push_pairs<T: Copy + Ord>(items: &[(T, BoundingBox)], pairs: &mut Vec<(T, T)>) {
    for (i, (a, a_bounds)) in items.iter().enumerate() {
        for (b, b_bounds) in &items[i + 1..] {
            if a_bounds.intersects(b_bounds) {
                pairs.push(ordered(*a, *b));
            }
        }
    }
}
