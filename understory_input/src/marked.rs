// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marked-set tracking: which elements are under the pointer.
//!
//! The marked set is the leaf-to-root chain returned by the hit tester at the
//! last settlement. [`MarkedSet::settle`] recomputes the chain wholesale,
//! diffs it against a snapshot of the previous one, and returns the
//! transitions:
//!
//! - `Exit` for every live element of the old chain that is not in the new
//!   one, deepest first;
//! - then, for every element of the new chain (leaf first), `Enter` if it is
//!   new or `Move` if it was already marked.
//!
//! Elements of the old chain that are gone get no `Exit`; they simply drop
//! out of the stored chain.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_input::element::ElementTree;
//! use understory_input::marked::{MarkedSet, Transition};
//! use understory_input::scene::Scene;
//! use understory_input::types::HitMode;
//!
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let root = scene.root().unwrap();
//! let a = scene.insert(root, Rect::new(0.0, 0.0, 50.0, 100.0));
//! let b = scene.insert(root, Rect::new(50.0, 0.0, 100.0, 100.0));
//!
//! let mut marked = MarkedSet::new();
//! let t = marked.settle(&scene, Point::new(10.0, 10.0), HitMode::Any);
//! assert_eq!(t, vec![Transition::Enter(a), Transition::Enter(root)]);
//! let t = marked.settle(&scene, Point::new(60.0, 10.0), HitMode::Any);
//! assert_eq!(
//!     t,
//!     vec![Transition::Exit(a), Transition::Enter(b), Transition::Move(root)]
//! );
//! ```

use alloc::vec::Vec;

use kurbo::Point;
use smallvec::SmallVec;

use crate::element::{self, ElementRef, ElementTree};
use crate::hit;
use crate::types::HitMode;

/// A marked-set transition for one element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition<K> {
    /// Pointer entered the element.
    Enter(K),
    /// Pointer left the element.
    Exit(K),
    /// Pointer moved within an element that stayed marked.
    Move(K),
}

/// The ordered set of elements under the pointer, leaf first.
#[derive(Clone, Debug)]
pub struct MarkedSet<K> {
    chain: SmallVec<[ElementRef<K>; 8]>,
}

impl<K: Copy + Eq> Default for MarkedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> MarkedSet<K> {
    /// An empty marked set.
    pub fn new() -> Self {
        Self {
            chain: SmallVec::new(),
        }
    }

    /// Stored references, leaf first. Some may be gone.
    pub fn as_slice(&self) -> &[ElementRef<K>] {
        &self.chain
    }

    /// Returns `true` if nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns `true` if `id` is in the stored chain.
    pub fn contains(&self, id: K) -> bool {
        element::contains(&self.chain, id)
    }

    /// Live marked elements, leaf first.
    pub fn live<'a, T>(&'a self, tree: &'a T) -> impl Iterator<Item = K> + 'a
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        element::live(&self.chain, tree)
    }

    /// The innermost live marked element.
    pub fn innermost<T>(&self, tree: &T) -> Option<K>
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        self.live(tree).next()
    }

    /// Recompute the chain under `point` and return the transitions.
    pub fn settle<T>(&mut self, tree: &T, point: Point, mode: HitMode) -> Vec<Transition<K>>
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        let now = hit::chain_at(tree, point, mode);
        self.replace(tree, now)
    }

    /// Like [`MarkedSet::settle`], but returns no transitions and keeps the
    /// set when the live chain under `point` is unchanged.
    pub fn resettle<T>(&mut self, tree: &T, point: Point, mode: HitMode) -> Vec<Transition<K>>
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        let now = hit::chain_at(tree, point, mode);
        if self.live(tree).eq(now.iter().copied()) {
            return Vec::new();
        }
        self.replace(tree, now)
    }

    /// Forget the whole chain, returning exits for the live elements (deepest first).
    pub fn clear<T>(&mut self, tree: &T) -> Vec<Transition<K>>
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        let old = core::mem::take(&mut self.chain);
        element::live(&old, tree).map(Transition::Exit).collect()
    }

    fn replace<T>(&mut self, tree: &T, now: hit::Chain<K>) -> Vec<Transition<K>>
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        let old = core::mem::take(&mut self.chain);

        let mut out = Vec::new();
        for id in element::live(&old, tree) {
            if !now.contains(&id) {
                out.push(Transition::Exit(id));
            }
        }
        for &id in &now {
            if element::contains(&old, id) {
                out.push(Transition::Move(id));
            } else {
                out.push(Transition::Enter(id));
            }
        }

        self.chain = now.into_iter().map(ElementRef::new).collect();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ElementId, Scene};
    use alloc::vec;
    use kurbo::Rect;

    fn scene() -> (Scene, ElementId, ElementId, ElementId, ElementId) {
        // root ⊃ left ⊃ inner; root ⊃ right
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = scene.root().unwrap();
        let left = scene.insert(root, Rect::new(0.0, 0.0, 50.0, 100.0));
        let inner = scene.insert(left, Rect::new(10.0, 10.0, 30.0, 30.0));
        let right = scene.insert(root, Rect::new(50.0, 0.0, 100.0, 100.0));
        (scene, root, left, inner, right)
    }

    #[test]
    fn fresh_settle_enters_leaf_first() {
        let (scene, root, left, inner, _) = scene();
        let mut m = MarkedSet::new();
        let t = m.settle(&scene, Point::new(15.0, 15.0), HitMode::Any);
        assert_eq!(
            t,
            vec![
                Transition::Enter(inner),
                Transition::Enter(left),
                Transition::Enter(root)
            ]
        );
        assert!(m.contains(inner));
        assert_eq!(m.innermost(&scene), Some(inner));
    }

    #[test]
    fn same_chain_only_moves() {
        let (scene, root, left, _, _) = scene();
        let mut m = MarkedSet::new();
        let _ = m.settle(&scene, Point::new(40.0, 50.0), HitMode::Any);
        let t = m.settle(&scene, Point::new(41.0, 51.0), HitMode::Any);
        assert_eq!(t, vec![Transition::Move(left), Transition::Move(root)]);
    }

    #[test]
    fn exits_are_deepest_first_and_precede_enters() {
        let (scene, root, left, inner, right) = scene();
        let mut m = MarkedSet::new();
        let _ = m.settle(&scene, Point::new(15.0, 15.0), HitMode::Any);
        let t = m.settle(&scene, Point::new(70.0, 15.0), HitMode::Any);
        assert_eq!(
            t,
            vec![
                Transition::Exit(inner),
                Transition::Exit(left),
                Transition::Enter(right),
                Transition::Move(root),
            ]
        );
    }

    #[test]
    fn gone_elements_get_no_exit_but_are_dropped() {
        let (mut scene, root, left, inner, right) = scene();
        let mut m = MarkedSet::new();
        let _ = m.settle(&scene, Point::new(15.0, 15.0), HitMode::Any);
        scene.remove(inner);
        let t = m.settle(&scene, Point::new(70.0, 15.0), HitMode::Any);
        assert_eq!(
            t,
            vec![
                Transition::Exit(left),
                Transition::Enter(right),
                Transition::Move(root),
            ]
        );
        assert!(!m.contains(inner));
    }

    #[test]
    fn leaving_everything_exits_whole_chain() {
        let (scene, root, left, _, _) = scene();
        let mut m = MarkedSet::new();
        let _ = m.settle(&scene, Point::new(40.0, 50.0), HitMode::Any);
        let t = m.settle(&scene, Point::new(500.0, 50.0), HitMode::Any);
        assert_eq!(t, vec![Transition::Exit(left), Transition::Exit(root)]);
        assert!(m.is_empty());
    }

    #[test]
    fn clear_exits_live_elements() {
        let (mut scene, root, left, inner, _) = scene();
        let mut m = MarkedSet::new();
        let _ = m.settle(&scene, Point::new(15.0, 15.0), HitMode::Any);
        scene.remove(inner);
        assert_eq!(
            m.clear(&scene),
            vec![Transition::Exit(left), Transition::Exit(root)]
        );
        assert!(m.is_empty());
        assert!(m.clear(&scene).is_empty());
    }

    #[test]
    fn resettle_is_silent_when_chain_is_unchanged() {
        let (mut scene, root, left, inner, _) = scene();
        let mut m = MarkedSet::new();
        let _ = m.settle(&scene, Point::new(15.0, 15.0), HitMode::Any);
        let pt = Point::new(15.0, 15.0);
        assert!(m.resettle(&scene, pt, HitMode::ActionTarget).is_empty());

        scene.set_flags(inner, crate::types::ElementFlags::VISIBLE);
        assert_eq!(
            m.resettle(&scene, pt, HitMode::ActionTarget),
            vec![
                Transition::Exit(inner),
                Transition::Move(left),
                Transition::Move(root)
            ]
        );
        assert!(!m.contains(inner));
    }
}
