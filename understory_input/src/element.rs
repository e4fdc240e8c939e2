// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element tree seam and weak element references.
//!
//! The dispatcher never owns elements. It reads the UI tree through
//! [`ElementTree`] and remembers elements through [`ElementRef`], which must be
//! resolved against the tree on every read. Identifiers are expected to be
//! generational (as in [`Scene`](crate::scene::Scene)), so a stale reference can never
//! resolve to a newer element that reuses the same slot.

use kurbo::{Point, Rect};

use crate::types::{ElementFlags, HitMode};

/// Read access to the UI element tree.
///
/// Implemented by the host toolkit. All geometry is in screen space.
pub trait ElementTree {
    /// Element identifier. Should be generational so that destroyed
    /// elements stay distinguishable from their successors.
    type Id: Copy + Eq + core::fmt::Debug;

    /// The root element, if the tree has one.
    fn root(&self) -> Option<Self::Id>;

    /// Returns `true` if `id` refers to a live element.
    fn is_alive(&self, id: Self::Id) -> bool;

    /// Parent of a live element, or `None` for the root and stale ids.
    fn parent_of(&self, id: Self::Id) -> Option<Self::Id>;

    /// Children of a live element in paint order (the last child is topmost).
    ///
    /// Returns an empty slice for stale ids.
    fn children_of(&self, id: Self::Id) -> &[Self::Id];

    /// Children the hit tester visits inside `id` for a search in `mode`, in
    /// paint order.
    ///
    /// Defaults to [`ElementTree::children_of`]. A container can return a
    /// subset to keep a search inside part of its subtree; when none of the
    /// returned children qualifies the container itself is tested. An open
    /// menu layer, for instance, returns only its menus for
    /// [`HitMode::ActionTarget`] so a press elsewhere lands on the layer.
    fn search_children(&self, id: Self::Id, _mode: HitMode) -> &[Self::Id] {
        self.children_of(id)
    }

    /// Screen-space bounds of a live element.
    fn bounds(&self, id: Self::Id) -> Option<Rect>;

    /// Flags of a live element.
    fn flags(&self, id: Self::Id) -> Option<ElementFlags>;

    /// Opacity/mark test at a point local to the element's bounds.
    ///
    /// Only called for points already inside [`ElementTree::bounds`]. The default
    /// treats the whole rectangle as opaque.
    fn mark_test(&self, _id: Self::Id, _local: Point) -> bool {
        true
    }
}

/// A non-owning handle to an element.
///
/// An `ElementRef` never keeps its element alive; use [`ElementRef::resolve`]
/// to get the identifier back only while the element still exists.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementRef<K>(K);

impl<K: Copy + Eq> ElementRef<K> {
    /// Wrap an element identifier.
    pub fn new(id: K) -> Self {
        Self(id)
    }

    /// The wrapped identifier, without checking liveness.
    pub fn id(self) -> K {
        self.0
    }

    /// Resolve against `tree`: `Some(id)` while the element is alive, `None` once it is gone.
    pub fn resolve<T>(self, tree: &T) -> Option<K>
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        tree.is_alive(self.0).then_some(self.0)
    }

    /// Returns `true` if this reference names `id` (live or not).
    pub fn refers_to(self, id: K) -> bool {
        self.0 == id
    }
}

impl<K: Copy + Eq> From<K> for ElementRef<K> {
    fn from(id: K) -> Self {
        Self::new(id)
    }
}

/// Iterate the live identifiers of `refs`, skipping elements that are gone.
pub(crate) fn live<'a, K, T>(
    refs: &'a [ElementRef<K>],
    tree: &'a T,
) -> impl Iterator<Item = K> + 'a
where
    K: Copy + Eq,
    T: ElementTree<Id = K> + ?Sized,
{
    refs.iter().filter_map(move |r| r.resolve(tree))
}

/// Returns `true` if any of `refs` refers to `id`.
pub(crate) fn contains<K: Copy + Eq>(refs: &[ElementRef<K>], id: K) -> bool {
    refs.iter().any(|r| r.refers_to(id))
}
