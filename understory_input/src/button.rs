// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-button press tracking.
//!
//! One [`ButtonState`] exists per [`MouseButton`](crate::types::MouseButton). It keeps the
//! latest [`PressRecord`] (overwritten by each new press and kept across the
//! release so click and double-click detection can look back at it), the
//! recipients of the press before that, and whether the button's most recent
//! action was a press or a release.
//!
//! ## Transitions
//!
//! - Idle → press → Pressed. Recipients are the live marked set. A double-click
//!   is reported when an earlier press of the same button lies within the time
//!   window and, on each axis, within the distance window.
//! - Pressed → pointer move → Pressed, yielding a [`Drag`] step.
//! - Pressed → release → Idle, reporting that a click is due. A release
//!   without a press seen by this state (for example a press that happened
//!   outside the window) is not a click.
//!
//! This type only tracks state and answers queries; the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) turns the answers into events.

use kurbo::Point;
use smallvec::SmallVec;

use crate::element::{self, ElementRef, ElementTree};
use crate::event::Drag;
use crate::repeat::RepeatTimer;

/// Elements that received a press.
pub type Recipients<K> = SmallVec<[ElementRef<K>; 8]>;

/// What the latest press of a button looked like.
#[derive(Clone, Debug)]
pub struct PressRecord<K> {
    /// Engine time of the press.
    pub timestamp: u64,
    /// Pointer position at the press.
    pub position: Point,
    /// Elements marked at the press.
    pub recipients: Recipients<K>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum LastAction {
    #[default]
    None,
    Press,
    Release,
}

/// Thresholds for recognizing a double-click.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DoubleClickWindow {
    /// Maximum milliseconds between the two presses (inclusive).
    pub time: u64,
    /// Maximum distance between the two presses on each axis (inclusive).
    pub distance: f64,
}

impl DoubleClickWindow {
    /// Returns `true` if a press at (`position`, `timestamp`) pairs with `previous`.
    pub fn pairs<K>(&self, previous: &PressRecord<K>, position: Point, timestamp: u64) -> bool {
        if timestamp < previous.timestamp || timestamp - previous.timestamp > self.time {
            return false;
        }
        let d = position - previous.position;
        let r = self.distance;
        d.x <= r && d.x >= -r && d.y <= r && d.y >= -r
    }
}

/// Press/release state of one button.
#[derive(Clone, Debug)]
pub struct ButtonState<K> {
    latest: Option<PressRecord<K>>,
    previous_recipients: Recipients<K>,
    last: LastAction,
}

impl<K: Copy + Eq> Default for ButtonState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> ButtonState<K> {
    /// A button that has never been pressed.
    pub fn new() -> Self {
        Self {
            latest: None,
            previous_recipients: SmallVec::new(),
            last: LastAction::None,
        }
    }

    /// Returns `true` between a press and its release.
    pub fn is_down(&self) -> bool {
        self.last == LastAction::Press
    }

    /// The latest press, kept after release until the next press.
    pub fn latest_press(&self) -> Option<&PressRecord<K>> {
        self.latest.as_ref()
    }

    /// Record a press.
    ///
    /// `marked` is the current marked set; its live elements become the
    /// recipients. Returns `true` if this press completes a double-click.
    pub fn press<T>(
        &mut self,
        tree: &T,
        marked: &[ElementRef<K>],
        position: Point,
        timestamp: u64,
        window: DoubleClickWindow,
    ) -> bool
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        let double = self
            .latest
            .as_ref()
            .is_some_and(|prev| window.pairs(prev, position, timestamp));

        self.previous_recipients = match &self.latest {
            Some(prev) => element::live(&prev.recipients, tree)
                .map(ElementRef::new)
                .collect(),
            None => SmallVec::new(),
        };
        self.latest = Some(PressRecord {
            timestamp,
            position,
            recipients: element::live(marked, tree).map(ElementRef::new).collect(),
        });
        self.last = LastAction::Press;
        double
    }

    /// Record a release. Returns `true` if the button was down, meaning a click is due.
    pub fn release(&mut self) -> bool {
        let was_down = self.is_down();
        self.last = LastAction::Release;
        was_down
    }

    /// Drag step for a pointer move from `previous` to `current`, if the button is down.
    pub fn drag(&self, previous: Point, current: Point) -> Option<Drag> {
        if !self.is_down() {
            return None;
        }
        let press = self.latest.as_ref()?;
        Some(Drag {
            start: press.position,
            previous,
            current,
        })
    }

    /// Live recipients of the latest press.
    pub fn recipients<'a, T>(&'a self, tree: &'a T) -> impl Iterator<Item = K> + 'a
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        let refs: &[ElementRef<K>] = match &self.latest {
            Some(press) => &press.recipients,
            None => &[],
        };
        element::live(refs, tree)
    }

    /// Live recipients of the latest press that are still marked.
    ///
    /// These receive clicks and repeats.
    pub fn recipients_still_marked<'a, T>(
        &'a self,
        tree: &'a T,
        marked: &'a [ElementRef<K>],
    ) -> impl Iterator<Item = K> + 'a
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        self.recipients(tree)
            .filter(move |&id| element::contains(marked, id))
    }

    /// Live elements that received both the latest and the previous press.
    pub fn double_click_recipients<'a, T>(&'a self, tree: &'a T) -> impl Iterator<Item = K> + 'a
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        self.recipients(tree)
            .filter(move |&id| element::contains(&self.previous_recipients, id))
    }

    /// Number of repeats due while advancing the clock from `now` by `elapsed` ms.
    ///
    /// Zero unless the button is down.
    pub fn repeat_ticks(&self, now: u64, elapsed: u64, timer: RepeatTimer) -> u64 {
        match (&self.latest, self.is_down()) {
            (Some(press), true) => {
                let held = now.saturating_sub(press.timestamp);
                timer.ticks_between(held, held.saturating_add(elapsed))
            }
            _ => 0,
        }
    }
}
