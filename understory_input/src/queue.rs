// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pending-event queue.
//!
//! Outside processing, events are appended. While an event is being
//! processed, events it causes are inserted right after it, in posting order,
//! ahead of anything that was already waiting. Every consequence of an event
//! is therefore delivered before the next independent event:
//!
//! ```
//! use understory_input::event::{Event, EventKind};
//! use understory_input::queue::EventQueue;
//!
//! let mut queue: EventQueue<u32> = EventQueue::new();
//! queue.push(Event::new(EventKind::PointerLeftWindow));
//! queue.push(Event::new(EventKind::TimeAdvanced { millis: 10 }));
//! assert_eq!(queue.len(), 2);
//! ```

use alloc::collections::VecDeque;

use crate::event::{Event, EventKind};

/// FIFO of events with insert-after-current while processing.
#[derive(Clone, Debug)]
pub struct EventQueue<K> {
    pending: VecDeque<Event<K>>,
    // Insertion point while an event is being processed.
    cursor: Option<usize>,
}

impl<K> Default for EventQueue<K> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            cursor: None,
        }
    }
}

impl<K> EventQueue<K> {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Waiting events in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &Event<K>> {
        self.pending.iter()
    }

    /// Enqueue an event.
    pub fn push(&mut self, event: Event<K>) {
        match &mut self.cursor {
            Some(at) => {
                self.pending.insert(*at, event);
                *at += 1;
            }
            None => self.pending.push_back(event),
        }
    }

    /// Take the next event and start its processing step.
    pub(crate) fn begin_next(&mut self) -> Option<Event<K>> {
        let event = self.pending.pop_front()?;
        self.cursor = Some(0);
        Some(event)
    }

    /// End the current processing step.
    pub(crate) fn finish(&mut self) {
        self.cursor = None;
    }
}

/// Posting handle passed to handlers during delivery.
///
/// Everything posted through it is delivered right after the event being
/// handled, in posting order.
#[derive(Debug)]
pub struct Poster<'a, K> {
    queue: &'a mut EventQueue<K>,
}

impl<'a, K: Copy + Eq> Poster<'a, K> {
    pub(crate) fn new(queue: &'a mut EventQueue<K>) -> Self {
        Self { queue }
    }

    /// Post an event.
    pub fn post(&mut self, event: Event<K>) {
        self.queue.push(event);
    }

    /// Post an event addressed to `target`.
    pub fn post_to(&mut self, kind: EventKind, target: K) {
        self.queue.push(Event::for_element(kind, target));
    }

    /// Request a keyboard focus change, or clear the focus with `None`.
    ///
    /// The change happens when the request comes up in the queue, right after
    /// the event being handled and before anything that was already waiting.
    pub fn set_keyboard_focus(&mut self, focus: Option<K>) {
        self.queue.push(match focus {
            Some(id) => Event::for_element(EventKind::FocusRequest, id),
            None => Event::new(EventKind::FocusRequest),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn tick(ms: u64) -> Event<u32> {
        Event::new(EventKind::TimeAdvanced { millis: ms })
    }

    fn millis(q: &EventQueue<u32>) -> Vec<u64> {
        q.iter()
            .map(|e| match e.kind() {
                EventKind::TimeAdvanced { millis } => millis,
                _ => 0,
            })
            .collect()
    }

    #[test]
    fn appends_when_idle() {
        let mut q = EventQueue::new();
        q.push(tick(1));
        q.push(tick(2));
        assert_eq!(millis(&q), [1, 2]);
    }

    #[test]
    fn inserts_after_current_while_processing() {
        let mut q = EventQueue::new();
        q.push(tick(1));
        q.push(tick(2));
        q.push(tick(3));

        let first = q.begin_next().unwrap();
        assert_eq!(first.kind(), EventKind::TimeAdvanced { millis: 1 });
        q.push(tick(10));
        q.push(tick(11));
        q.finish();
        assert_eq!(millis(&q), [10, 11, 2, 3]);

        // Consequences of 10 go before 11.
        let _ = q.begin_next();
        q.push(tick(20));
        q.finish();
        assert_eq!(millis(&q), [20, 11, 2, 3]);

        // After finishing, pushes append again.
        q.push(tick(99));
        assert_eq!(millis(&q), [20, 11, 2, 3, 99]);
    }

    #[test]
    fn poster_targets_elements() {
        let mut q: EventQueue<u32> = EventQueue::new();
        let _ = q.begin_next();
        let mut p = Poster::new(&mut q);
        p.post_to(EventKind::Enter, 4);
        p.post(tick(5));
        q.finish();
        let targets: Vec<_> = q.iter().map(Event::target).collect();
        assert_eq!(targets, [Some(4), None]);
    }

    #[test]
    fn focus_requests_queue_in_posting_order() {
        let mut q: EventQueue<u32> = EventQueue::new();
        q.push(tick(1));
        let _ = q.begin_next();
        let mut p = Poster::new(&mut q);
        p.set_keyboard_focus(Some(3));
        p.set_keyboard_focus(None);
        q.finish();
        let queued: Vec<_> = q.iter().map(|e| (e.kind(), e.target())).collect();
        assert_eq!(
            queued,
            [
                (EventKind::FocusRequest, Some(3)),
                (EventKind::FocusRequest, None)
            ]
        );
    }

    #[test]
    fn begin_next_on_empty_is_none() {
        let mut q: EventQueue<u32> = EventQueue::new();
        assert!(q.begin_next().is_none());
        q.push(tick(1));
        assert_eq!(q.len(), 1);
    }
}
