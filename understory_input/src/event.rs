// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events: a closed set of kinds plus the context stamped at finalization.
//!
//! An [`Event`] is either *general* (no target; it is routed through the
//! dispatcher's pipeline and then handed to the host) or *targeted* at one
//! element through an [`ElementRef`]. Timestamp, modifier snapshot, and
//! pointer position are filled in once, when the dispatcher dequeues the
//! event, so queued events observe the state at delivery time.

use core::fmt;

use kurbo::{Point, Vec2};

use crate::element::ElementRef;
use crate::types::{Key, Modifiers, MouseButton, NativeKey, WheelAxis};

/// Pointer positions describing one drag step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drag {
    /// Pointer position when the button was pressed.
    pub start: Point,
    /// Pointer position before this step.
    pub previous: Point,
    /// Pointer position after this step.
    pub current: Point,
}

impl Drag {
    /// Displacement since the press.
    pub fn total(&self) -> Vec2 {
        self.current - self.start
    }

    /// Displacement since the previous pointer sample.
    pub fn delta(&self) -> Vec2 {
        self.current - self.previous
    }
}

/// What happened, with the kind-specific payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Pointer moved to a new screen position (primitive).
    PointerMoved {
        /// New pointer position.
        position: Point,
    },
    /// Single marked-set recomputation for a pointer move.
    PointerSettled {
        /// Position the marked set is recomputed at.
        position: Point,
    },
    /// Pointer left the window (primitive).
    PointerLeftWindow,
    /// Pointer entered an element.
    Enter,
    /// Pointer left an element.
    Exit,
    /// Pointer moved within an element it was already over.
    Move,
    /// Button pressed.
    ButtonPress {
        /// Button pressed.
        button: MouseButton,
    },
    /// Button released.
    ///
    /// For targeted releases `pressed_inside` tells whether the element
    /// received the matching press, and `release_inside` whether the pointer
    /// is inside the element's bounds. For the general release
    /// `pressed_inside` tells whether the button was held from a press seen
    /// by this dispatcher, and `release_inside` is `true`.
    ButtonRelease {
        /// Button released.
        button: MouseButton,
        /// Press happened inside the element (or the window, for general events).
        pressed_inside: bool,
        /// Release happened inside the element (or the window, for general events).
        release_inside: bool,
    },
    /// Pointer moved while a button was held.
    ButtonDrag {
        /// Button held.
        button: MouseButton,
        /// Positions for this step.
        drag: Drag,
    },
    /// Press and release of a button both happened while over the element.
    ButtonClick {
        /// Button clicked.
        button: MouseButton,
    },
    /// Second press close in time and space to the previous press.
    ButtonDoubleClick {
        /// Button double-clicked.
        button: MouseButton,
    },
    /// A held button repeats.
    ButtonRepeat {
        /// Button held.
        button: MouseButton,
    },
    /// Key pressed.
    KeyPress {
        /// Platform key code.
        native: NativeKey,
        /// Translated key; filled in during routing.
        key: Key,
    },
    /// A held key repeats.
    KeyRepeat {
        /// Platform key code.
        native: NativeKey,
        /// Translated key.
        key: Key,
    },
    /// Key released.
    KeyRelease {
        /// Platform key code.
        native: NativeKey,
        /// Translated key; filled in during routing.
        key: Key,
    },
    /// Text input.
    Text {
        /// Character entered.
        ch: char,
    },
    /// Wheel rolled.
    Wheel {
        /// Wheel axis.
        axis: WheelAxis,
        /// Distance in wheel steps; sign gives the direction.
        distance: i32,
    },
    /// The window lost the keyboard; every held key counts as released.
    KeyboardLost,
    /// Time advanced (primitive).
    TimeAdvanced {
        /// Elapsed milliseconds.
        millis: u64,
    },
    /// Element gained keyboard focus.
    FocusGained,
    /// Element lost keyboard focus.
    FocusLost,
    /// Request to move keyboard focus to the event's target, or to clear it
    /// when the event is general. Consumed by the dispatcher, never delivered.
    FocusRequest,
}

impl EventKind {
    /// Short stable name of the kind.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PointerMoved { .. } => "PointerMoved",
            Self::PointerSettled { .. } => "PointerSettled",
            Self::PointerLeftWindow => "PointerLeftWindow",
            Self::Enter => "Enter",
            Self::Exit => "Exit",
            Self::Move => "Move",
            Self::ButtonPress { .. } => "ButtonPress",
            Self::ButtonRelease { .. } => "ButtonRelease",
            Self::ButtonDrag { .. } => "ButtonDrag",
            Self::ButtonClick { .. } => "ButtonClick",
            Self::ButtonDoubleClick { .. } => "ButtonDoubleClick",
            Self::ButtonRepeat { .. } => "ButtonRepeat",
            Self::KeyPress { .. } => "KeyPress",
            Self::KeyRepeat { .. } => "KeyRepeat",
            Self::KeyRelease { .. } => "KeyRelease",
            Self::Text { .. } => "Text",
            Self::Wheel { .. } => "Wheel",
            Self::KeyboardLost => "KeyboardLost",
            Self::TimeAdvanced { .. } => "TimeAdvanced",
            Self::FocusGained => "FocusGained",
            Self::FocusLost => "FocusLost",
            Self::FocusRequest => "FocusRequest",
        }
    }

    /// Category used for filtering.
    pub const fn category(&self) -> EventCategory {
        match self {
            Self::PointerMoved { .. }
            | Self::PointerSettled { .. }
            | Self::PointerLeftWindow
            | Self::Enter
            | Self::Exit
            | Self::Move => EventCategory::POINTER,
            Self::ButtonPress { .. }
            | Self::ButtonRelease { .. }
            | Self::ButtonDrag { .. }
            | Self::ButtonClick { .. }
            | Self::ButtonDoubleClick { .. }
            | Self::ButtonRepeat { .. } => EventCategory::BUTTON,
            Self::KeyPress { .. }
            | Self::KeyRepeat { .. }
            | Self::KeyRelease { .. }
            | Self::KeyboardLost => EventCategory::KEYBOARD,
            Self::Text { .. } => EventCategory::TEXT,
            Self::Wheel { .. } => EventCategory::WHEEL,
            Self::TimeAdvanced { .. } => EventCategory::TIME,
            Self::FocusGained | Self::FocusLost | Self::FocusRequest => EventCategory::FOCUS,
        }
    }

    /// The button this event concerns, for button events.
    pub const fn button(&self) -> Option<MouseButton> {
        match *self {
            Self::ButtonPress { button }
            | Self::ButtonRelease { button, .. }
            | Self::ButtonDrag { button, .. }
            | Self::ButtonClick { button }
            | Self::ButtonDoubleClick { button }
            | Self::ButtonRepeat { button } => Some(button),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match *self {
            Self::PointerMoved { position } | Self::PointerSettled { position } => {
                write!(f, "{name}({:.1}, {:.1})", position.x, position.y)
            }
            Self::ButtonRelease {
                button,
                pressed_inside,
                release_inside,
            } => write!(
                f,
                "{name}({button:?}, pressed_inside: {pressed_inside}, release_inside: {release_inside})"
            ),
            Self::ButtonDrag { button, drag } => {
                let (t, d) = (drag.total(), drag.delta());
                write!(
                    f,
                    "{name}({button:?}, total: ({:.1}, {:.1}), delta: ({:.1}, {:.1}))",
                    t.x, t.y, d.x, d.y
                )
            }
            Self::ButtonPress { button }
            | Self::ButtonClick { button }
            | Self::ButtonDoubleClick { button }
            | Self::ButtonRepeat { button } => write!(f, "{name}({button:?})"),
            Self::KeyPress { native, key }
            | Self::KeyRepeat { native, key }
            | Self::KeyRelease { native, key } => write!(f, "{name}({key:?}, native: {native})"),
            Self::Text { ch } => write!(f, "{name}({ch:?})"),
            Self::Wheel { axis, distance } => write!(f, "{name}({axis:?}, {distance})"),
            Self::TimeAdvanced { millis } => write!(f, "{name}({millis}ms)"),
            Self::PointerLeftWindow
            | Self::Enter
            | Self::Exit
            | Self::Move
            | Self::KeyboardLost
            | Self::FocusGained
            | Self::FocusLost
            | Self::FocusRequest => f.write_str(name),
        }
    }
}

bitflags::bitflags! {
    /// Coarse event grouping for filtering.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventCategory: u8 {
        /// Pointer motion, enter, exit, window leave.
        const POINTER  = 0b0000_0001;
        /// Button press, release, drag, click, double-click, repeat.
        const BUTTON   = 0b0000_0010;
        /// Key press, repeat, release.
        const KEYBOARD = 0b0000_0100;
        /// Wheel roll.
        const WHEEL    = 0b0000_1000;
        /// Text input.
        const TEXT     = 0b0001_0000;
        /// Time advance.
        const TIME     = 0b0010_0000;
        /// Keyboard focus changes.
        const FOCUS    = 0b0100_0000;

        /// Everything the mouse produces.
        const MOUSE = Self::POINTER.bits() | Self::BUTTON.bits() | Self::WHEEL.bits();
        /// Everything the user produces.
        const INPUT = Self::MOUSE.bits() | Self::KEYBOARD.bits() | Self::TEXT.bits();
    }
}

/// An event, queued or being delivered.
#[derive(Clone, Debug, PartialEq)]
pub struct Event<K> {
    kind: EventKind,
    target: Option<ElementRef<K>>,
    timestamp: u64,
    modifiers: Modifiers,
    pointer: Point,
    local_pointer: Point,
    finalized: bool,
}

impl<K: Copy + Eq> Event<K> {
    /// A general event, routed through the dispatcher's pipeline.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            timestamp: 0,
            modifiers: Modifiers::empty(),
            pointer: Point::ZERO,
            local_pointer: Point::ZERO,
            finalized: false,
        }
    }

    /// An event addressed to a single element.
    pub fn for_element(kind: EventKind, target: K) -> Self {
        Self {
            target: Some(ElementRef::new(target)),
            ..Self::new(kind)
        }
    }

    /// The kind and payload.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Target element identifier, or `None` for general events.
    ///
    /// The element may already be gone; the dispatcher never delivers such events.
    pub fn target(&self) -> Option<K> {
        self.target.map(ElementRef::id)
    }

    /// Returns `true` if this event has no target.
    pub fn is_general(&self) -> bool {
        self.target.is_none()
    }

    /// Engine time in milliseconds at finalization.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Modifier keys held at finalization.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Pointer position in screen space.
    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Pointer position relative to the target's origin (screen space for general events).
    pub fn local_pointer_position(&self) -> Point {
        self.local_pointer
    }

    /// Returns `true` once the dispatcher has stamped this event.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Category of the kind.
    pub fn category(&self) -> EventCategory {
        self.kind.category()
    }

    /// Button of a button event.
    pub fn button(&self) -> Option<MouseButton> {
        self.kind.button()
    }

    pub(crate) fn set_kind(&mut self, kind: EventKind) {
        self.kind = kind;
    }

    /// Stamp context. Later calls are ignored.
    pub(crate) fn finalize(
        &mut self,
        timestamp: u64,
        modifiers: Modifiers,
        pointer: Point,
        target_origin: Option<Point>,
    ) {
        if self.finalized {
            return;
        }
        self.timestamp = timestamp;
        self.modifiers = modifiers;
        self.pointer = pointer;
        self.local_pointer = match target_origin {
            Some(origin) => (pointer - origin).to_point(),
            None => pointer,
        };
        self.finalized = true;
    }
}
