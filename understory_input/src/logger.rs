// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category-filtered event trace.
//!
//! [`EventLogger`] turns delivered events into one-line records and emits them
//! as `tracing` events at `INFO` level under the `understory_input::events`
//! target. Call [`EventLogger::log`] from the handler passed to
//! [`Dispatcher::process`](crate::dispatcher::Dispatcher::process):
//!
//! ```
//! use understory_input::event::{Event, EventKind};
//! use understory_input::logger::EventLogger;
//!
//! let mut logger = EventLogger::new();
//! logger.ignore_pointer();
//! assert!(!logger.log(&Event::<u32>::new(EventKind::Enter)));
//! assert!(logger.is_logged(&Event::<u32>::new(EventKind::Text { ch: 'a' })));
//! ```

use alloc::format;
use alloc::string::String;
use core::fmt::Debug;

use crate::event::{Event, EventCategory};

/// Formats delivered events and forwards them to `tracing`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventLogger {
    filter: EventCategory,
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLogger {
    /// Log everything except time advances.
    pub fn new() -> Self {
        Self {
            filter: EventCategory::all().difference(EventCategory::TIME),
        }
    }

    /// Categories currently logged.
    pub fn filter(&self) -> EventCategory {
        self.filter
    }

    /// Log `categories` in addition to what is already logged.
    pub fn log_categories(&mut self, categories: EventCategory) {
        self.filter.insert(categories);
    }

    /// Stop logging `categories`.
    pub fn ignore_categories(&mut self, categories: EventCategory) {
        self.filter.remove(categories);
    }

    /// Log pointer motion, enter, exit.
    pub fn log_pointer(&mut self) {
        self.log_categories(EventCategory::POINTER);
    }

    /// Ignore pointer motion, enter, exit.
    pub fn ignore_pointer(&mut self) {
        self.ignore_categories(EventCategory::POINTER);
    }

    /// Log button events.
    pub fn log_buttons(&mut self) {
        self.log_categories(EventCategory::BUTTON);
    }

    /// Ignore button events.
    pub fn ignore_buttons(&mut self) {
        self.ignore_categories(EventCategory::BUTTON);
    }

    /// Log key events.
    pub fn log_keyboard(&mut self) {
        self.log_categories(EventCategory::KEYBOARD);
    }

    /// Ignore key events.
    pub fn ignore_keyboard(&mut self) {
        self.ignore_categories(EventCategory::KEYBOARD);
    }

    /// Log time advances.
    pub fn log_time(&mut self) {
        self.log_categories(EventCategory::TIME);
    }

    /// Ignore time advances.
    pub fn ignore_time(&mut self) {
        self.ignore_categories(EventCategory::TIME);
    }

    /// Log pointer, button and wheel events.
    pub fn log_mouse(&mut self) {
        self.log_categories(EventCategory::MOUSE);
    }

    /// Ignore pointer, button and wheel events.
    pub fn ignore_mouse(&mut self) {
        self.ignore_categories(EventCategory::MOUSE);
    }

    /// Log all user input.
    pub fn log_input(&mut self) {
        self.log_categories(EventCategory::INPUT);
    }

    /// Ignore all user input.
    pub fn ignore_input(&mut self) {
        self.ignore_categories(EventCategory::INPUT);
    }

    /// Log every category.
    pub fn log_all(&mut self) {
        self.filter = EventCategory::all();
    }

    /// Log nothing.
    pub fn ignore_all(&mut self) {
        self.filter = EventCategory::empty();
    }

    /// Returns `true` if `event` passes the filter.
    pub fn is_logged<K: Copy + Eq>(&self, event: &Event<K>) -> bool {
        self.filter.intersects(event.category())
    }

    /// One-line description of `event`.
    ///
    /// `mm:ss.mmm <kind> target=<id|-> mods=<names|-> at=(x, y)`
    pub fn format<K: Copy + Eq + Debug>(&self, event: &Event<K>) -> String {
        let ms = event.timestamp();
        let stamp = format!(
            "{:02}:{:02}.{:03}",
            ms / 60_000,
            (ms / 1000) % 60,
            ms % 1000
        );
        let target = match event.target() {
            Some(id) => format!("{id:?}"),
            None => String::from("-"),
        };
        let mut mods = String::new();
        for (name, _) in event.modifiers().iter_names() {
            if !mods.is_empty() {
                mods.push('+');
            }
            mods.push_str(name);
        }
        if mods.is_empty() {
            mods.push('-');
        }
        let p = event.pointer_position();
        format!(
            "{stamp} {} target={target} mods={mods} at=({:.1}, {:.1})",
            event.kind(),
            p.x,
            p.y
        )
    }

    /// Emit `event` if it passes the filter. Returns `true` if it was emitted.
    pub fn log<K: Copy + Eq + Debug>(&self, event: &Event<K>) -> bool {
        if !self.is_logged(event) {
            return false;
        }
        let line = self.format(event);
        tracing::info!(target: "understory_input::events", "{line}");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::types::{Modifiers, MouseButton};
    use kurbo::Point;

    #[test]
    fn default_filter_skips_time() {
        let logger = EventLogger::new();
        let tick = Event::<u32>::new(EventKind::TimeAdvanced { millis: 16 });
        assert!(!logger.is_logged(&tick));
        assert!(!logger.log(&tick));
        assert!(logger.is_logged(&Event::<u32>::new(EventKind::FocusGained)));
    }

    #[test]
    fn group_helpers_toggle_categories() {
        let mut logger = EventLogger::new();
        logger.ignore_mouse();
        assert!(!logger.filter().intersects(EventCategory::WHEEL));
        assert!(logger.filter().contains(EventCategory::KEYBOARD));
        logger.log_buttons();
        assert!(logger.filter().contains(EventCategory::BUTTON));
        logger.ignore_all();
        assert_eq!(logger.filter(), EventCategory::empty());
        logger.log_all();
        assert_eq!(logger.filter(), EventCategory::all());
    }

    #[test]
    fn format_line() {
        let logger = EventLogger::new();
        let mut ev = Event::for_element(
            EventKind::ButtonClick {
                button: MouseButton::Left,
            },
            7_u32,
        );
        ev.finalize(
            65_042,
            Modifiers::SHIFT | Modifiers::CONTROL,
            Point::new(12.0, 11.0),
            None,
        );
        assert_eq!(
            logger.format(&ev),
            "01:05.042 ButtonClick(Left) target=7 mods=SHIFT+CONTROL at=(12.0, 11.0)"
        );
    }

    #[test]
    fn format_general_event_without_modifiers() {
        let logger = EventLogger::new();
        let mut ev = Event::<u32>::new(EventKind::PointerLeftWindow);
        ev.finalize(5, Modifiers::empty(), Point::ZERO, None);
        assert_eq!(
            logger.format(&ev),
            "00:00.005 PointerLeftWindow target=- mods=- at=(0.0, 0.0)"
        );
    }
}
