// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small value types shared across the dispatch engine: buttons, keys,
//! modifiers, wheel axes, element flags, and hit-test modes.

/// A pointer button.
///
/// The set is closed; the platform bridge maps native button numbers onto it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// First extra button (usually "back").
    X1,
    /// Second extra button (usually "forward").
    X2,
}

impl MouseButton {
    /// Number of distinct buttons tracked by the engine.
    pub const COUNT: usize = 5;

    /// All buttons, in index order.
    pub const ALL: [Self; Self::COUNT] = [Self::Left, Self::Right, Self::Middle, Self::X1, Self::X2];

    /// Dense index of this button, in `0..COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Platform key code, as reported by the platform bridge.
pub type NativeKey = u32;

/// Translated key identity.
///
/// Native codes are mapped onto these through
/// [`Dispatcher::map_key`](crate::dispatcher::Dispatcher::map_key); codes
/// without a mapping translate to [`Key::Unmapped`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Return / enter.
    Return,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Function key `F1`..=`F12`.
    F(u8),
    /// Shift modifier.
    Shift,
    /// Control modifier.
    Control,
    /// Alt modifier.
    Alt,
    /// Super / command / windows modifier.
    Super,
    /// No translation is registered for the native code.
    Unmapped,
}

impl Key {
    /// The modifier flag this key controls, if it is a modifier key.
    pub const fn modifier(self) -> Option<Modifiers> {
        match self {
            Self::Shift => Some(Modifiers::SHIFT),
            Self::Control => Some(Modifiers::CONTROL),
            Self::Alt => Some(Modifiers::ALT),
            Self::Super => Some(Modifiers::SUPER),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held at the time an event was finalized.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT   = 0b0000_0001;
        /// Either control key.
        const CONTROL = 0b0000_0010;
        /// Either alt key.
        const ALT     = 0b0000_0100;
        /// Either super key.
        const SUPER   = 0b0000_1000;
    }
}

/// Scroll wheel axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WheelAxis {
    /// Vertical wheel (the common one).
    Vertical,
    /// Horizontal wheel or tilt.
    Horizontal,
}

bitflags::bitflags! {
    /// Per-element flags consulted by hit testing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is visible and can be found under the pointer.
        const VISIBLE       = 0b0000_0001;
        /// Element reacts to pointer input and may be the target of an action.
        const ACTION_TARGET = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ACTION_TARGET
    }
}

/// Restricts which elements a hit test may return.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HitMode {
    /// Any visible element whose mark test passes.
    #[default]
    Any,
    /// Only visible elements flagged [`ElementFlags::ACTION_TARGET`].
    ///
    /// Non-qualifying elements are transparent: the search continues into
    /// their children and the siblings painted below them.
    ActionTarget,
}

impl HitMode {
    /// Returns `true` if an element with `flags` qualifies under this mode.
    pub fn matches(self, flags: ElementFlags) -> bool {
        let required = match self {
            Self::Any => ElementFlags::VISIBLE,
            Self::ActionTarget => ElementFlags::VISIBLE | ElementFlags::ACTION_TARGET,
        };
        flags.contains(required)
    }
}
