//! Shared run control for the tick loop.
//!
//! [`OperatorState`] is wrapped in [`Arc`](std::sync::Arc) and shared
//! between the tick loop and whoever can stop it (the Ctrl+C handler in the
//! engine binary, or a test). The stop flag is an atomic so the loop reads
//! it without locking.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// A stop was requested.
    OperatorStop,
    /// Pushing a frame failed; the run was stopped.
    DisplayFailure,
}

/// Shared run control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Cleared to request a stop after the current tick.
    running: AtomicBool,

    /// Tick interval in milliseconds.
    tick_interval_ms: u64,

    /// Wall-clock time when the run was created.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
}

impl OperatorState {
    /// Create a running state.
    pub fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            running: AtomicBool::new(true),
            tick_interval_ms,
            started_at: Utc::now(),
            max_ticks,
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Whether the loop should keep going.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the loop to stop after the current tick.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    // -----------------------------------------------------------------------
    // Bounds
    // -----------------------------------------------------------------------

    /// Tick interval in milliseconds.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Whether `ticks_done` has reached the tick limit.
    pub const fn tick_limit_reached(&self, ticks_done: u64) -> bool {
        self.max_ticks > 0 && ticks_done >= self.max_ticks
    }

    /// When the run was created. Reported as the start of the run.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_observed() {
        let operator = OperatorState::new(0, 0);
        assert!(operator.is_running());
        operator.request_stop();
        assert!(!operator.is_running());
    }

    #[test]
    fn zero_max_ticks_is_unbounded() {
        let operator = OperatorState::new(0, 0);
        assert!(!operator.tick_limit_reached(u64::MAX));
        let bounded = OperatorState::new(0, 3);
        assert!(!bounded.tick_limit_reached(2));
        assert!(bounded.tick_limit_reached(3));
    }

    #[test]
    fn creation_time_is_in_the_past() {
        let operator = OperatorState::new(300, 0);
        assert_eq!(operator.tick_interval_ms(), 300);
        assert!(operator.started_at() <= Utc::now());
    }
}
