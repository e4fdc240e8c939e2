// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small generational element tree implementing [`ElementTree`].
//!
//! Toolkits normally implement [`ElementTree`] over their own widget tree.
//! [`Scene`] is a self-contained implementation for tests, demos, and hosts
//! that only need rectangles: screen-space bounds, flags, paint order by
//! insertion, and an optional mark region standing in for alpha-tested shapes.
//! A container can also narrow action-target searches to some of its
//! children, the way an open menu layer only lets its menus be pressed.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::element::ElementTree;
use crate::types::{ElementFlags, HitMode};

/// Identifier for an element in a [`Scene`] (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32, u32);

impl ElementId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    bounds: Rect,
    flags: ElementFlags,
    mark_region: Option<Rect>,
    action_children: Option<Vec<ElementId>>,
}

/// Rectangle-based element tree with a single root.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: Option<ElementId>,
}

impl Scene {
    /// Create a scene whose root covers `bounds`.
    pub fn new(bounds: Rect) -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: None,
        };
        scene.root = Some(scene.alloc(None, bounds));
        scene
    }

    /// Insert a child of `parent` on top of its existing siblings.
    ///
    /// If `parent` is stale the element is created detached and is never hit.
    pub fn insert(&mut self, parent: ElementId, bounds: Rect) -> ElementId {
        let parent = self.is_alive(parent).then_some(parent);
        let id = self.alloc(parent, bounds);
        if let Some(p) = parent {
            self.node_mut(p).children.push(id);
        }
        id
    }

    /// Remove an element and its subtree. Removing the root empties the scene.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent
            && self.is_alive(parent)
        {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move a live element to the top of its siblings' paint order.
    pub fn raise(&mut self, id: ElementId) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        let siblings = &mut self.node_mut(parent).children;
        siblings.retain(|&c| c != id);
        siblings.push(id);
    }

    /// Update screen-space bounds.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.bounds = bounds;
        }
    }

    /// Update hit-test flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    /// Restrict the mark test to a region in element-local coordinates.
    ///
    /// Points inside the bounds but outside the region fall through to
    /// whatever is painted below. `None` makes the whole element opaque.
    pub fn set_mark_region(&mut self, id: ElementId, region: Option<Rect>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.mark_region = region;
        }
    }

    /// Limit [`HitMode::ActionTarget`] searches inside `id` to `children`.
    ///
    /// `children` should be children of `id`, listed in paint order. While a
    /// scope is set, an action-target search that hits none of them lands on
    /// `id` itself, so presses outside an open menu reach the layer holding
    /// it. [`HitMode::Any`] searches still visit every child. `None` clears
    /// the scope.
    pub fn set_action_children(&mut self, id: ElementId, children: Option<Vec<ElementId>>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.action_children = children;
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns `true` if no live elements remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self, parent: Option<ElementId>, bounds: Rect) -> ElementId {
        let node = |generation| Node {
            generation,
            parent,
            children: Vec::new(),
            bounds,
            flags: ElementFlags::default(),
            mark_region: None,
            action_children: None,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId stores 32-bit slot indices."
        )]
        let idx = idx as u32;
        ElementId::new(idx, generation)
    }

    fn node(&self, id: ElementId) -> &Node {
        match self.nodes[id.idx()].as_ref() {
            Some(n) => n,
            None => unreachable!("caller checked liveness"),
        }
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        match self.nodes[id.idx()].as_mut() {
            Some(n) => n,
            None => unreachable!("caller checked liveness"),
        }
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.1)
    }
}

impl ElementTree for Scene {
    type Id = ElementId;

    fn root(&self) -> Option<ElementId> {
        self.root
    }

    fn is_alive(&self, id: ElementId) -> bool {
        self.node_opt(id).is_some()
    }

    fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn search_children(&self, id: ElementId, mode: HitMode) -> &[ElementId] {
        match self.node_opt(id) {
            Some(Node {
                action_children: Some(scope),
                ..
            }) if mode == HitMode::ActionTarget => scope.as_slice(),
            Some(n) => n.children.as_slice(),
            None => &[],
        }
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    fn mark_test(&self, id: ElementId, local: Point) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.mark_region.is_none_or(|r| r.contains(local)))
    }
}
