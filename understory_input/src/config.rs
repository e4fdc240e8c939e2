// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing and distance thresholds.
//!
//! All settings are plain numbers. Invalid values are rejected when the
//! configuration is handed to the dispatcher, never during event processing.

use crate::repeat::RepeatTimer;

/// Configuration rejected by [`InputConfig::validate`].
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Button repeat rate of zero milliseconds.
    #[error("button repeat rate must be at least 1ms")]
    ZeroButtonRepeatRate,
    /// Key repeat rate of zero milliseconds.
    #[error("key repeat rate must be at least 1ms")]
    ZeroKeyRepeatRate,
    /// Negative, NaN, or infinite double-click distance.
    #[error("double-click distance must be finite and non-negative, got {0}")]
    InvalidDoubleClickDistance(f64),
}

/// Input thresholds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputConfig {
    /// Maximum milliseconds between two presses of a button for a double-click.
    pub double_click_time: u64,
    /// Maximum per-axis pointer distance between two presses for a double-click.
    pub double_click_distance: f64,
    /// Milliseconds a button is held before it starts repeating.
    pub button_repeat_delay: u64,
    /// Milliseconds between button repeats.
    pub button_repeat_rate: u64,
    /// Milliseconds a key is held before it starts repeating.
    pub key_repeat_delay: u64,
    /// Milliseconds between key repeats.
    pub key_repeat_rate: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click_time: 250,
            double_click_distance: 2.0,
            button_repeat_delay: 300,
            button_repeat_rate: 200,
            key_repeat_delay: 300,
            key_repeat_rate: 150,
        }
    }
}

impl InputConfig {
    /// Set the double-click window.
    pub fn with_double_click(mut self, time: u64, distance: f64) -> Self {
        self.double_click_time = time;
        self.double_click_distance = distance;
        self
    }

    /// Set button repeat delay and rate.
    pub fn with_button_repeat(mut self, delay: u64, rate: u64) -> Self {
        self.button_repeat_delay = delay;
        self.button_repeat_rate = rate;
        self
    }

    /// Set key repeat delay and rate.
    pub fn with_key_repeat(mut self, delay: u64, rate: u64) -> Self {
        self.key_repeat_delay = delay;
        self.key_repeat_rate = rate;
        self
    }

    /// Check every threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timers().map(|_| ())
    }

    /// Validate and build the button and key repeat timers.
    pub(crate) fn timers(&self) -> Result<(RepeatTimer, RepeatTimer), ConfigError> {
        if !self.double_click_distance.is_finite() || self.double_click_distance < 0.0 {
            return Err(ConfigError::InvalidDoubleClickDistance(
                self.double_click_distance,
            ));
        }
        let button = RepeatTimer::from_millis(self.button_repeat_delay, self.button_repeat_rate)
            .ok_or(ConfigError::ZeroButtonRepeatRate)?;
        let key = RepeatTimer::from_millis(self.key_repeat_delay, self.key_repeat_rate)
            .ok_or(ConfigError::ZeroKeyRepeatRate)?;
        Ok((button, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = InputConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.double_click_time, 250);
        assert_eq!(cfg.key_repeat_rate, 150);
    }

    #[test]
    fn zero_rates_are_rejected() {
        let cfg = InputConfig::default().with_button_repeat(300, 0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroButtonRepeatRate));
        let cfg = InputConfig::default().with_key_repeat(0, 0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroKeyRepeatRate));
    }

    #[test]
    fn bad_distance_is_rejected() {
        let cfg = InputConfig::default().with_double_click(250, -1.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDoubleClickDistance(_))
        ));
        let cfg = InputConfig::default().with_double_click(250, f64::NAN);
        assert!(cfg.validate().is_err());
        // Zero is a legal "same pixel only" window.
        let cfg = InputConfig::default().with_double_click(250, 0.0);
        assert!(cfg.validate().is_ok());
    }
}
