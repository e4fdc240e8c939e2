// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Input: deterministic input event dispatch for UI element trees.
//!
//! This crate turns a small vocabulary of raw input primitives (pointer moved,
//! button pressed or released, key pressed or released, text, wheel, time
//! advanced) into a disambiguated stream of events: enter, exit, move, press,
//! drag, release, click, double-click, and repeat. It delivers them in a
//! well-defined order to a tree of elements that may change while events are
//! being handled.
//!
//! The crate does not own the element tree. It reads it through the
//! [`ElementTree`](element::ElementTree) trait and remembers elements only
//! through weak [`ElementRef`](element::ElementRef) handles, so elements removed
//! by a handler simply stop receiving events.
//!
//! ## Workflow
//!
//! 1. Implement [`ElementTree`](element::ElementTree) for your UI tree, or use
//!    the in-memory [`Scene`](scene::Scene).
//! 2. Create a [`Dispatcher`](dispatcher::Dispatcher) with an
//!    [`InputConfig`](config::InputConfig).
//! 3. Feed platform input through the inbound methods
//!    ([`pointer_moved`](dispatcher::Dispatcher::pointer_moved),
//!    [`button_pressed`](dispatcher::Dispatcher::button_pressed),
//!    [`time_advanced`](dispatcher::Dispatcher::time_advanced), and so on).
//! 4. Call [`process`](dispatcher::Dispatcher::process) with a handler. The
//!    handler sees every event, may mutate the tree, and may post follow-up
//!    events, which are delivered right after the one being handled.
//!
//! ## Ordering
//!
//! Events caused by an event are delivered after it and before anything that
//! was already waiting. Within one pointer move, drag events come first, then
//! the marked-set settlement with its exits (deepest first) followed by enters
//! and moves (leaf first).
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_input::config::InputConfig;
//! use understory_input::dispatcher::Dispatcher;
//! use understory_input::element::ElementTree;
//! use understory_input::event::EventKind;
//! use understory_input::scene::Scene;
//! use understory_input::types::MouseButton;
//!
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let root = scene.root().unwrap();
//! let slider = scene.insert(root, Rect::new(0.0, 0.0, 50.0, 50.0));
//!
//! let mut input = Dispatcher::new(InputConfig::default()).unwrap();
//! input.pointer_moved(Point::new(10.0, 10.0));
//! input.button_pressed(MouseButton::Left);
//! input.time_advanced(50);
//! input.pointer_moved(Point::new(12.0, 11.0));
//!
//! let mut dragged = None;
//! input.process(&mut scene, |_, event, _| {
//!     if let EventKind::ButtonDrag { drag, .. } = event.kind() {
//!         if event.target() == Some(slider) {
//!             dragged = Some(drag.total());
//!         }
//!     }
//! });
//! assert_eq!(dragged, Some(kurbo::Vec2::new(2.0, 1.0)));
//! ```
//!
//! ## Logging
//!
//! The dispatcher reports dropped deliveries and ignored key presses through
//! `tracing` at `TRACE` level, and double-clicks, focus and configuration
//! changes at `DEBUG`. [`EventLogger`](logger::EventLogger) prints delivered
//! events at `INFO`, filtered by [`EventCategory`](event::EventCategory).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod button;
pub mod config;
pub mod dispatcher;
pub mod element;
pub mod event;
pub mod hit;
pub mod keyboard;
pub mod logger;
pub mod marked;
pub mod queue;
pub mod repeat;
pub mod scene;
pub mod types;

pub use config::{ConfigError, InputConfig};
pub use dispatcher::Dispatcher;
pub use element::{ElementRef, ElementTree};
pub use event::{Event, EventKind};
