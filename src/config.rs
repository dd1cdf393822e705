#![cfg(feature = "std")]

//! Runtime settings for one match. Rule constants live in `core::config`.

use std::time::Duration;

use crate::core::{MatchRules, MOVE_CLOCK_TICKS, TURN_CLOCK_TICKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Length of one clock tick.
    pub tick: Duration,
    pub turn_clock_ticks: u32,
    pub move_clock_ticks: u32,
    /// Pause after a remote move before the next side may roll.
    pub settle_delay: Duration,
    pub heartbeat_interval: Duration,
    pub idle_timeout: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            turn_clock_ticks: TURN_CLOCK_TICKS,
            move_clock_ticks: MOVE_CLOCK_TICKS,
            settle_delay: Duration::from_millis(600),
            heartbeat_interval: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(45),
        }
    }
}

impl MatchConfig {
    pub fn rules(&self) -> MatchRules {
        MatchRules {
            turn_clock_ticks: self.turn_clock_ticks,
            move_clock_ticks: self.move_clock_ticks,
        }
    }
}
