// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard state: native key translation, held keys, and modifiers.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::repeat::RepeatTimer;
use crate::types::{Key, Modifiers, NativeKey};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct HeldKey {
    key: Key,
    since: u64,
}

/// Translation table plus the set of keys currently held.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    keymap: HashMap<NativeKey, Key>,
    // Ordered so that repeats for several held keys come out deterministically.
    held: BTreeMap<NativeKey, HeldKey>,
    modifiers: Modifiers,
}

impl KeyboardState {
    /// Empty table, nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a native code to a key, replacing any earlier mapping.
    pub fn map_key(&mut self, native: NativeKey, key: Key) {
        self.keymap.insert(native, key);
    }

    /// Remove the mapping for a native code.
    pub fn unmap_key(&mut self, native: NativeKey) {
        self.keymap.remove(&native);
    }

    /// Translate a native code; unmapped codes become [`Key::Unmapped`].
    pub fn translate(&self, native: NativeKey) -> Key {
        self.keymap.get(&native).copied().unwrap_or(Key::Unmapped)
    }

    /// Modifier keys currently held.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns `true` if the native key is held.
    pub fn is_held(&self, native: NativeKey) -> bool {
        self.held.contains_key(&native)
    }

    /// Record a key press at `now`.
    ///
    /// Returns the translated key, or `None` if the key is already held
    /// (platform auto-repeat), in which case nothing changes.
    pub fn press(&mut self, native: NativeKey, now: u64) -> Option<Key> {
        if self.held.contains_key(&native) {
            return None;
        }
        let key = self.translate(native);
        if let Some(m) = key.modifier() {
            self.modifiers |= m;
        }
        self.held.insert(native, HeldKey { key, since: now });
        Some(key)
    }

    /// Record a key release and return the translated key.
    ///
    /// The key pressed is reported, even if the mapping changed meanwhile.
    pub fn release(&mut self, native: NativeKey) -> Key {
        let key = match self.held.remove(&native) {
            Some(h) => h.key,
            None => self.translate(native),
        };
        if let Some(m) = key.modifier() {
            // Another held key may map to the same modifier.
            let still_held = self.held.values().any(|h| h.key.modifier() == Some(m));
            if !still_held {
                self.modifiers.remove(m);
            }
        }
        key
    }

    /// Release every held key and clear the modifiers.
    ///
    /// Returns the released keys, as pressed, in native code order.
    pub fn release_all(&mut self) -> Vec<(NativeKey, Key)> {
        self.modifiers = Modifiers::empty();
        core::mem::take(&mut self.held)
            .into_iter()
            .map(|(native, h)| (native, h.key))
            .collect()
    }

    /// Repeats due for each held key while advancing the clock from `now` by `elapsed` ms.
    ///
    /// Keys with no repeats due are omitted.
    pub fn repeat_ticks(
        &self,
        now: u64,
        elapsed: u64,
        timer: RepeatTimer,
    ) -> Vec<(NativeKey, Key, u64)> {
        self.held
            .iter()
            .filter_map(|(&native, h)| {
                let held = now.saturating_sub(h.since);
                let n = timer.ticks_between(held, held.saturating_add(elapsed));
                (n > 0).then_some((native, h.key, n))
            })
            .collect()
    }
}
