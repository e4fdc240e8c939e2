// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher: owns the queue and all interaction state, turns primitives
//! into derived events, and delivers them.
//!
//! ## Processing
//!
//! [`Dispatcher::process`] drains the queue. For each event it:
//!
//! 1. Finalizes it: stamps engine time, the modifier snapshot, and the pointer
//!    position (screen space, plus local to the target's origin).
//! 2. If it is targeted, drops it when the target is gone; otherwise routes
//!    it through the pipeline, which updates state and enqueues derived
//!    events right after the current one.
//! 3. Hands it to the handler together with a [`Poster`] for follow-ups.
//!
//! Derived events are general (then routed in turn) or targeted at single
//! elements:
//!
//! | General event      | Routing                                                             |
//! |--------------------|---------------------------------------------------------------------|
//! | `PointerMoved`     | a general `ButtonDrag` per held button, then one `PointerSettled`   |
//! | `PointerSettled`   | marked-set recomputation: targeted `Exit`, `Enter`, `Move`          |
//! | `PointerLeftWindow`| `Exit` for every marked element                                     |
//! | `ButtonPress`      | action-target resettlement, press to every marked element; general `ButtonDoubleClick` if due |
//! | `ButtonRelease`    | release to recipients and other marked elements; general `ButtonClick` |
//! | `ButtonDrag`       | copy to every live press recipient                                  |
//! | `ButtonClick`, `ButtonRepeat` | copy to press recipients still marked                    |
//! | `ButtonDoubleClick`| copy to elements that received both presses                         |
//! | `Key*`, `Text`     | copy to the keyboard focus                                          |
//! | `KeyboardLost`     | a `KeyRelease` to the keyboard focus per held key; modifiers clear  |
//! | `Wheel`            | copy to the innermost marked element                                |
//! | `TimeAdvanced`     | general `ButtonRepeat`/`KeyRepeat` as due, then the clock advances  |
//!
//! Handlers receive only a [`Poster`], so a handler cannot start a nested
//! drain. Focus changes requested through [`Poster::set_keyboard_focus`] are
//! queued like any other follow-up, so keyboard events already waiting behind
//! the current event reach the new focus.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_input::dispatcher::Dispatcher;
//! use understory_input::element::ElementTree;
//! use understory_input::event::EventKind;
//! use understory_input::scene::Scene;
//! use understory_input::types::MouseButton;
//!
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let root = scene.root().unwrap();
//! let button = scene.insert(root, Rect::new(10.0, 10.0, 40.0, 30.0));
//!
//! let mut dispatcher = Dispatcher::new(Default::default()).unwrap();
//! dispatcher.pointer_moved(Point::new(20.0, 20.0));
//! dispatcher.button_pressed(MouseButton::Left);
//! dispatcher.button_released(MouseButton::Left);
//!
//! let mut clicks = Vec::new();
//! dispatcher.process(&mut scene, |_, event, _| {
//!     if let (EventKind::ButtonClick { .. }, Some(id)) = (event.kind(), event.target()) {
//!         clicks.push(id);
//!     }
//! });
//! assert_eq!(clicks, [button, root]);
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Point;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::button::{ButtonState, DoubleClickWindow};
use crate::config::{ConfigError, InputConfig};
use crate::element::{ElementRef, ElementTree};
use crate::event::{Event, EventKind};
use crate::hit::Chain;
use crate::keyboard::KeyboardState;
use crate::marked::{MarkedSet, Transition};
use crate::queue::{EventQueue, Poster};
use crate::repeat::RepeatTimer;
use crate::types::{HitMode, Key, Modifiers, MouseButton, NativeKey, WheelAxis};

/// Input event dispatcher.
#[derive(Clone, Debug)]
pub struct Dispatcher<K> {
    config: InputConfig,
    button_timer: RepeatTimer,
    key_timer: RepeatTimer,
    queue: EventQueue<K>,
    time: u64,
    pointer: Point,
    marked: MarkedSet<K>,
    buttons: [ButtonState<K>; MouseButton::COUNT],
    keyboard: KeyboardState,
    focus: Option<ElementRef<K>>,
}

impl<K: Copy + Eq + Debug> Dispatcher<K> {
    /// Create a dispatcher with the given thresholds.
    pub fn new(config: InputConfig) -> Result<Self, ConfigError> {
        let (button_timer, key_timer) = config.timers()?;
        Ok(Self {
            config,
            button_timer,
            key_timer,
            queue: EventQueue::new(),
            time: 0,
            pointer: Point::ZERO,
            marked: MarkedSet::new(),
            buttons: core::array::from_fn(|_| ButtonState::new()),
            keyboard: KeyboardState::new(),
            focus: None,
        })
    }

    /// Current thresholds.
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Replace the thresholds. On error the old configuration stays in effect.
    pub fn set_config(&mut self, config: InputConfig) -> Result<(), ConfigError> {
        let (button_timer, key_timer) = config.timers()?;
        debug!(?config, "input configuration changed");
        self.config = config;
        self.button_timer = button_timer;
        self.key_timer = key_timer;
        Ok(())
    }

    // --- Inbound primitives ------------------------------------------------

    /// The pointer moved to `position` (screen space).
    pub fn pointer_moved(&mut self, position: Point) {
        self.submit(Event::new(EventKind::PointerMoved { position }));
    }

    /// The pointer left the window.
    pub fn pointer_left_window(&mut self) {
        self.submit(Event::new(EventKind::PointerLeftWindow));
    }

    /// A button was pressed.
    pub fn button_pressed(&mut self, button: MouseButton) {
        self.submit(Event::new(EventKind::ButtonPress { button }));
    }

    /// A button was released.
    pub fn button_released(&mut self, button: MouseButton) {
        self.submit(Event::new(EventKind::ButtonRelease {
            button,
            pressed_inside: false,
            release_inside: false,
        }));
    }

    /// The wheel rolled `distance` steps along `axis`.
    pub fn wheel_rolled(&mut self, axis: WheelAxis, distance: i32) {
        self.submit(Event::new(EventKind::Wheel { axis, distance }));
    }

    /// A key was pressed.
    pub fn key_pressed(&mut self, native: NativeKey) {
        self.submit(Event::new(EventKind::KeyPress {
            native,
            key: Key::Unmapped,
        }));
    }

    /// A key was released.
    pub fn key_released(&mut self, native: NativeKey) {
        self.submit(Event::new(EventKind::KeyRelease {
            native,
            key: Key::Unmapped,
        }));
    }

    /// A character was entered.
    pub fn text_input(&mut self, ch: char) {
        self.submit(Event::new(EventKind::Text { ch }));
    }

    /// The window lost the keyboard (deactivated or lost input focus).
    ///
    /// Every held key is released to the keyboard focus and modifiers
    /// clear, so no key repeats continue afterwards.
    pub fn keyboard_lost(&mut self) {
        self.submit(Event::new(EventKind::KeyboardLost));
    }

    /// `millis` milliseconds passed.
    pub fn time_advanced(&mut self, millis: u64) {
        self.submit(Event::new(EventKind::TimeAdvanced { millis }));
    }

    /// Enqueue an arbitrary event.
    pub fn submit(&mut self, event: Event<K>) {
        self.queue.push(event);
    }

    // --- Keyboard ------------------------------------------------------------

    /// Map a native key code to a key.
    pub fn map_key(&mut self, native: NativeKey, key: Key) {
        self.keyboard.map_key(native, key);
    }

    /// Remove the mapping for a native key code.
    pub fn unmap_key(&mut self, native: NativeKey) {
        self.keyboard.unmap_key(native);
    }

    /// Move keyboard focus, enqueueing `FocusLost` for the old holder and
    /// `FocusGained` for the new one.
    ///
    /// Takes effect immediately. From inside a handler use
    /// [`Poster::set_keyboard_focus`] instead.
    pub fn set_keyboard_focus(&mut self, focus: Option<K>) {
        self.move_focus(focus);
    }

    fn move_focus(&mut self, focus: Option<K>) {
        let old = self.focus.map(ElementRef::id);
        if old == focus {
            return;
        }
        debug!(from = ?old, to = ?focus, "keyboard focus changed");
        if let Some(id) = old {
            self.queue.push(Event::for_element(EventKind::FocusLost, id));
        }
        if let Some(id) = focus {
            self.queue.push(Event::for_element(EventKind::FocusGained, id));
        }
        self.focus = focus.map(ElementRef::new);
    }

    // --- Introspection -------------------------------------------------------

    /// Engine time in milliseconds.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Modifier keys currently held.
    pub fn modifiers(&self) -> Modifiers {
        self.keyboard.modifiers()
    }

    /// Elements under the pointer as of the last settlement.
    pub fn marked(&self) -> &MarkedSet<K> {
        &self.marked
    }

    /// Returns `true` if `button` is held from a press this dispatcher saw.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].is_down()
    }

    /// Per-button state.
    pub fn button_state(&self, button: MouseButton) -> &ButtonState<K> {
        &self.buttons[button.index()]
    }

    /// Element holding keyboard focus. It may already be gone.
    pub fn keyboard_focus(&self) -> Option<K> {
        self.focus.map(ElementRef::id)
    }

    /// Number of events waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    // --- Processing ----------------------------------------------------------

    /// Drain the queue, delivering every event to `handler`.
    ///
    /// The handler may mutate the tree and post follow-up events; events
    /// posted while handling an event are delivered right after it.
    pub fn process<T, F>(&mut self, tree: &mut T, mut handler: F)
    where
        T: ElementTree<Id = K>,
        F: FnMut(&mut T, &Event<K>, &mut Poster<'_, K>),
    {
        while let Some(mut event) = self.queue.begin_next() {
            if self.prepare(&*tree, &mut event) {
                let mut poster = Poster::new(&mut self.queue);
                handler(&mut *tree, &event, &mut poster);
            }
            self.queue.finish();
        }
    }

    /// Finalize and route one event. Returns `false` if it must not be delivered.
    fn prepare<T>(&mut self, tree: &T, event: &mut Event<K>) -> bool
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        if event.kind() == EventKind::FocusRequest {
            match event.target() {
                Some(id) if !tree.is_alive(id) => {
                    trace!(element = ?id, "ignoring focus request for removed element");
                }
                requested => self.move_focus(requested),
            }
            return false;
        }

        let origin = match event.target() {
            Some(id) => {
                if !tree.is_alive(id) {
                    trace!(
                        kind = event.kind().name(),
                        element = ?id,
                        "dropping event for removed element"
                    );
                    return false;
                }
                tree.bounds(id).map(|b| b.origin())
            }
            None => None,
        };
        let pointer = match event.kind() {
            EventKind::PointerMoved { position } | EventKind::PointerSettled { position }
                if event.is_general() =>
            {
                position
            }
            _ => self.pointer,
        };
        event.finalize(self.time, self.keyboard.modifiers(), pointer, origin);

        if event.is_general() {
            self.route(tree, event)
        } else {
            true
        }
    }

    fn route<T>(&mut self, tree: &T, event: &mut Event<K>) -> bool
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        match event.kind() {
            EventKind::PointerMoved { position } => {
                let previous = self.pointer;
                for button in MouseButton::ALL {
                    if let Some(drag) = self.buttons[button.index()].drag(previous, position) {
                        self.queue
                            .push(Event::new(EventKind::ButtonDrag { button, drag }));
                    }
                }
                self.queue
                    .push(Event::new(EventKind::PointerSettled { position }));
                self.pointer = position;
            }
            EventKind::PointerSettled { position } => {
                let mode = if self.any_button_down() {
                    HitMode::ActionTarget
                } else {
                    HitMode::Any
                };
                let transitions = self.marked.settle(tree, position, mode);
                self.post_transitions(transitions);
            }
            EventKind::PointerLeftWindow => {
                let transitions = self.marked.clear(tree);
                self.post_transitions(transitions);
            }
            EventKind::ButtonPress { button } => {
                // The button is now held, so only action targets may receive it.
                if !self.marked.is_empty() {
                    let transitions = self
                        .marked
                        .resettle(tree, self.pointer, HitMode::ActionTarget);
                    self.post_transitions(transitions);
                }
                let window = DoubleClickWindow {
                    time: self.config.double_click_time,
                    distance: self.config.double_click_distance,
                };
                let state = &mut self.buttons[button.index()];
                let double = state.press(
                    tree,
                    self.marked.as_slice(),
                    self.pointer,
                    self.time,
                    window,
                );
                let recipients: Chain<K> = state.recipients(tree).collect();
                self.post_each(&recipients, EventKind::ButtonPress { button });
                if double {
                    debug!(?button, at = self.time, "double-click");
                    self.queue
                        .push(Event::new(EventKind::ButtonDoubleClick { button }));
                }
            }
            EventKind::ButtonRelease { button, .. } => {
                let state = &mut self.buttons[button.index()];
                let was_down = state.release();
                let pointer = self.pointer;
                let inside = |id: K| tree.bounds(id).is_some_and(|b| b.contains(pointer));

                let mut releases: SmallVec<[(K, bool); 8]> = SmallVec::new();
                if was_down {
                    releases.extend(state.recipients(tree).map(|id| (id, true)));
                }
                for id in self.marked.live(tree) {
                    if !releases.iter().any(|&(r, _)| r == id) {
                        releases.push((id, false));
                    }
                }
                for (id, pressed_inside) in releases {
                    self.queue.push(Event::for_element(
                        EventKind::ButtonRelease {
                            button,
                            pressed_inside,
                            release_inside: inside(id),
                        },
                        id,
                    ));
                }
                event.set_kind(EventKind::ButtonRelease {
                    button,
                    pressed_inside: was_down,
                    release_inside: true,
                });
                if was_down {
                    self.queue
                        .push(Event::new(EventKind::ButtonClick { button }));
                }
            }
            kind @ EventKind::ButtonDrag { button, .. } => {
                let recipients: Chain<K> =
                    self.buttons[button.index()].recipients(tree).collect();
                self.post_each(&recipients, kind);
            }
            kind @ (EventKind::ButtonClick { button } | EventKind::ButtonRepeat { button }) => {
                let recipients: Chain<K> = self.buttons[button.index()]
                    .recipients_still_marked(tree, self.marked.as_slice())
                    .collect();
                self.post_each(&recipients, kind);
            }
            kind @ EventKind::ButtonDoubleClick { button } => {
                let recipients: Chain<K> = self.buttons[button.index()]
                    .double_click_recipients(tree)
                    .collect();
                self.post_each(&recipients, kind);
            }
            EventKind::KeyPress { native, .. } => {
                let Some(key) = self.keyboard.press(native, self.time) else {
                    trace!(native, "ignoring press of a key already held");
                    return false;
                };
                let kind = EventKind::KeyPress { native, key };
                event.set_kind(kind);
                self.post_to_focus(tree, kind);
            }
            EventKind::KeyRelease { native, .. } => {
                let key = self.keyboard.release(native);
                let kind = EventKind::KeyRelease { native, key };
                event.set_kind(kind);
                self.post_to_focus(tree, kind);
            }
            kind @ (EventKind::KeyRepeat { .. } | EventKind::Text { .. }) => {
                self.post_to_focus(tree, kind);
            }
            EventKind::KeyboardLost => {
                let released = self.keyboard.release_all();
                if !released.is_empty() {
                    debug!(keys = released.len(), "releasing held keys");
                }
                for (native, key) in released {
                    self.post_to_focus(tree, EventKind::KeyRelease { native, key });
                }
            }
            kind @ EventKind::Wheel { .. } => {
                if let Some(id) = self.marked.innermost(tree) {
                    self.queue.push(Event::for_element(kind, id));
                }
            }
            EventKind::TimeAdvanced { millis } => {
                for button in MouseButton::ALL {
                    let n = self.buttons[button.index()].repeat_ticks(
                        self.time,
                        millis,
                        self.button_timer,
                    );
                    for _ in 0..n {
                        self.queue
                            .push(Event::new(EventKind::ButtonRepeat { button }));
                    }
                }
                for (native, key, n) in self.keyboard.repeat_ticks(self.time, millis, self.key_timer)
                {
                    for _ in 0..n {
                        self.queue
                            .push(Event::new(EventKind::KeyRepeat { native, key }));
                    }
                }
                self.time = self.time.saturating_add(millis);
            }
            EventKind::Enter | EventKind::Exit | EventKind::Move => {}
            EventKind::FocusGained | EventKind::FocusLost | EventKind::FocusRequest => {}
        }
        true
    }

    fn any_button_down(&self) -> bool {
        self.buttons.iter().any(ButtonState::is_down)
    }

    fn post_each(&mut self, targets: &[K], kind: EventKind) {
        for &id in targets {
            self.queue.push(Event::for_element(kind, id));
        }
    }

    fn post_to_focus<T>(&mut self, tree: &T, kind: EventKind)
    where
        T: ElementTree<Id = K> + ?Sized,
    {
        if let Some(id) = self.focus.and_then(|f| f.resolve(tree)) {
            self.queue.push(Event::for_element(kind, id));
        }
    }

    fn post_transitions(&mut self, transitions: Vec<Transition<K>>) {
        for t in transitions {
            let (kind, id) = match t {
                Transition::Enter(id) => (EventKind::Enter, id),
                Transition::Exit(id) => (EventKind::Exit, id),
                Transition::Move(id) => (EventKind::Move, id),
            };
            self.queue.push(Event::for_element(kind, id));
        }
    }
}
