// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing over an [`ElementTree`].
//!
//! [`find`] walks the tree from the root, descending only into elements whose
//! bounds contain the point and visiting children topmost-first, so the first
//! qualifying leaf found is the topmost one in paint order. Invisible elements
//! hide their whole subtree. Elements that do not qualify under the
//! [`HitMode`] (or fail their mark test) are transparent. The mode is also
//! handed to [`ElementTree::search_children`], so a container can keep a
//! search inside part of its subtree.
//!
//! Both functions are pure reads of the tree.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_input::element::ElementTree;
//! use understory_input::hit;
//! use understory_input::scene::Scene;
//! use understory_input::types::HitMode;
//!
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let root = scene.root().unwrap();
//! let panel = scene.insert(root, Rect::new(10.0, 10.0, 90.0, 90.0));
//! let button = scene.insert(panel, Rect::new(20.0, 20.0, 40.0, 40.0));
//!
//! let pt = Point::new(25.0, 25.0);
//! assert_eq!(hit::find(&scene, pt, HitMode::Any), Some(button));
//! assert_eq!(hit::chain_at(&scene, pt, HitMode::Any).as_slice(), &[button, panel, root]);
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::element::ElementTree;
use crate::types::{ElementFlags, HitMode};

/// Leaf-to-root element chain.
pub type Chain<K> = SmallVec<[K; 8]>;

/// Topmost element under `point` that qualifies under `mode`, or `None`.
pub fn find<T>(tree: &T, point: Point, mode: HitMode) -> Option<T::Id>
where
    T: ElementTree + ?Sized,
{
    find_in(tree, tree.root()?, point, mode)
}

/// The chain from the topmost element under `point` up to the root.
///
/// Empty when nothing qualifies.
pub fn chain_at<T>(tree: &T, point: Point, mode: HitMode) -> Chain<T::Id>
where
    T: ElementTree + ?Sized,
{
    match find(tree, point, mode) {
        Some(leaf) => ancestor_chain(tree, leaf),
        None => Chain::new(),
    }
}

/// `leaf` followed by each of its ancestors, ending at a root.
pub fn ancestor_chain<T>(tree: &T, leaf: T::Id) -> Chain<T::Id>
where
    T: ElementTree + ?Sized,
{
    let mut out = Chain::new();
    if !tree.is_alive(leaf) {
        return out;
    }
    let mut cur = Some(leaf);
    // Collect to root; the tree guarantees acyclic ancestry.
    while let Some(id) = cur {
        out.push(id);
        cur = tree.parent_of(id);
    }
    out
}

fn find_in<T>(tree: &T, id: T::Id, point: Point, mode: HitMode) -> Option<T::Id>
where
    T: ElementTree + ?Sized,
{
    let flags = tree.flags(id)?;
    if !flags.contains(ElementFlags::VISIBLE) {
        return None;
    }
    let bounds = tree.bounds(id)?;
    if !bounds.contains(point) {
        return None;
    }
    for &child in tree.search_children(id, mode).iter().rev() {
        if let Some(hit) = find_in(tree, child, point, mode) {
            return Some(hit);
        }
    }
    let local = point - Vec2::new(bounds.x0, bounds.y0);
    (mode.matches(flags) && tree.mark_test(id, local)).then_some(id)
}
