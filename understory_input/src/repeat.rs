// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repeat timing for held buttons and keys.
//!
//! A held input repeats once when it has been held for `delay` milliseconds
//! and then once every `rate` milliseconds. Counts are derived from the total
//! hold duration rather than accumulated per call, so splitting a time span
//! into any number of advances yields exactly the same number of repeats as
//! advancing it in one go.
//!
//! ```
//! use core::num::NonZeroU64;
//! use understory_input::repeat::RepeatTimer;
//!
//! let timer = RepeatTimer::new(300, NonZeroU64::new(200).unwrap());
//! assert_eq!(timer.count_at(299), 0);
//! assert_eq!(timer.count_at(300), 1);
//! assert_eq!(timer.count_at(700), 3);
//! // One 700ms advance and seven 100ms advances agree.
//! let split: u64 = (0..7).map(|i| timer.ticks_between(i * 100, (i + 1) * 100)).sum();
//! assert_eq!(split, timer.ticks_between(0, 700));
//! ```

use core::num::NonZeroU64;

/// Initial delay and rate of a repeating input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RepeatTimer {
    delay: u64,
    rate: NonZeroU64,
}

impl RepeatTimer {
    /// Create a timer. The rate cannot be zero.
    pub const fn new(delay: u64, rate: NonZeroU64) -> Self {
        Self { delay, rate }
    }

    /// Create a timer from plain milliseconds, rejecting a zero rate.
    pub fn from_millis(delay: u64, rate: u64) -> Option<Self> {
        NonZeroU64::new(rate).map(|rate| Self::new(delay, rate))
    }

    /// Milliseconds before the first repeat.
    pub const fn delay(&self) -> u64 {
        self.delay
    }

    /// Milliseconds between subsequent repeats.
    pub const fn rate(&self) -> u64 {
        self.rate.get()
    }

    /// Number of repeats due after an input has been held for `held` milliseconds.
    pub const fn count_at(&self, held: u64) -> u64 {
        if held < self.delay {
            0
        } else {
            1 + (held - self.delay) / self.rate.get()
        }
    }

    /// Number of repeats due when the hold duration advances from `before` to `after`.
    pub const fn ticks_between(&self, before: u64, after: u64) -> u64 {
        self.count_at(after).saturating_sub(self.count_at(before))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> RepeatTimer {
        RepeatTimer::from_millis(300, 200).unwrap()
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(RepeatTimer::from_millis(300, 0).is_none());
    }

    #[test]
    fn first_repeat_lands_on_delay() {
        let t = timer();
        assert_eq!(t.ticks_between(0, 299), 0);
        assert_eq!(t.ticks_between(299, 300), 1);
        assert_eq!(t.ticks_between(300, 499), 0);
        assert_eq!(t.ticks_between(499, 500), 1);
    }

    #[test]
    fn stall_catches_up_one_per_interval() {
        // A single 10s advance produces every interval that elapsed, no more.
        let t = timer();
        assert_eq!(t.ticks_between(0, 10_000), 1 + (10_000 - 300) / 200);
    }

    #[test]
    fn any_split_matches_single_advance() {
        let t = timer();
        let total = 1_337_u64;
        let expected = t.ticks_between(0, total);
        for step in [1_u64, 7, 50, 199, 200, 201, 300, 999] {
            let mut held = 0;
            let mut count = 0;
            while held < total {
                let next = (held + step).min(total);
                count += t.ticks_between(held, next);
                held = next;
            }
            assert_eq!(count, expected, "step {step}");
        }
    }

    #[test]
    fn zero_delay_repeats_every_rate() {
        let t = RepeatTimer::from_millis(0, 100).unwrap();
        assert_eq!(t.ticks_between(0, 99), 0);
        assert_eq!(t.ticks_between(0, 100), 1);
        assert_eq!(t.ticks_between(0, 350), 3);
    }
}
