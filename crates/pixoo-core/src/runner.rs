//! Simulation loop runner.
//!
//! [`run_simulation`] drives any [`Simulation`] against any [`DisplaySink`]:
//!
//! - **Handshake**: clear to black, push, pause, before the first tick
//! - **Bounded runs**: stop after `max_ticks` (0 = unbounded)
//! - **Clean shutdown**: a stop request ends the loop after the current tick
//! - **Display failure**: a failed push is logged and ends the run
//!
//! Each tick checks the run flag, steps, draws, pushes, then sleeps for the
//! tick interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pixoo_types::Rgb;
use tracing::{error, info, warn};

use crate::display::{DisplayError, DisplaySink};
use crate::operator::{OperatorState, SimulationEndReason};
use crate::render::Simulation;

/// Pause after the handshake frame.
pub const HANDSHAKE_PAUSE: Duration = Duration::from_secs(1);

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The display did not accept the handshake frame.
    #[error("display handshake failed: {source}")]
    Handshake {
        /// The underlying display error.
        #[from]
        source: DisplayError,
    },
}

/// Loop settings that are not shared with the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Pause after the handshake frame.
    pub handshake_pause: Duration,
    /// Log status every N ticks; 0 disables.
    pub status_interval_ticks: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            handshake_pause: HANDSHAKE_PAUSE,
            status_interval_ticks: 20,
        }
    }
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// Ticks stepped.
    pub total_ticks: u64,
    /// Frames pushed successfully, handshake included.
    pub frames_pushed: u64,
    /// When the operator state was created.
    pub started_at: DateTime<Utc>,
    /// When the loop ended.
    pub ended_at: DateTime<Utc>,
}

/// Run the tick loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError::Handshake`] if the display rejects the first
/// frame. Failures after that end the run with
/// [`SimulationEndReason::DisplayFailure`] instead.
pub async fn run_simulation<S, D>(
    simulation: &mut S,
    sink: &mut D,
    operator: &Arc<OperatorState>,
    options: RunOptions,
) -> Result<SimulationResult, RunnerError>
where
    S: Simulation,
    D: DisplaySink,
{
    let started_at = operator.started_at();

    info!(
        simulation = simulation.name(),
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Establishing connection to display"
    );
    sink.clear(Rgb::BLACK);
    sink.push().await?;
    let mut frames_pushed: u64 = 1;
    if !options.handshake_pause.is_zero() {
        tokio::time::sleep(options.handshake_pause).await;
    }
    info!("Display connected");

    let mut total_ticks: u64 = 0;
    let end_reason = loop {
        // --- Check stop request (before tick) ---
        if !operator.is_running() {
            info!(tick = total_ticks, "Stop requested");
            break SimulationEndReason::OperatorStop;
        }

        // --- Step and draw ---
        simulation.step();
        total_ticks = total_ticks.saturating_add(1);
        simulation.draw(sink);

        // --- Push ---
        if let Err(e) = sink.push().await {
            error!(tick = total_ticks, error = %e, "Failed to push frame, stopping");
            operator.request_stop();
            break SimulationEndReason::DisplayFailure;
        }
        frames_pushed = frames_pushed.saturating_add(1);

        if total_ticks.checked_rem(options.status_interval_ticks) == Some(0) {
            simulation.log_status();
        }

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(total_ticks) {
            info!(
                tick = total_ticks,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            break SimulationEndReason::MaxTicksReached;
        }

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    };

    Ok(SimulationResult {
        end_reason,
        total_ticks,
        frames_pushed,
        started_at,
        ended_at: Utc::now(),
    })
}

/// Log how a run ended.
pub fn log_simulation_end(result: &SimulationResult) {
    let elapsed_ms = result
        .ended_at
        .signed_duration_since(result.started_at)
        .num_milliseconds();
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        frames_pushed = result.frames_pushed,
        elapsed_ms,
        "Simulation ended"
    );
    if result.total_ticks == 0 {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::display::MemorySink;

    /// Counts calls; draws its step count into pixel (0, 0).
    #[derive(Debug, Default)]
    struct Counter {
        steps: u64,
        statuses: Cell<u64>,
    }

    impl Simulation for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn step(&mut self) {
            self.steps += 1;
        }

        #[allow(clippy::cast_possible_truncation)]
        fn draw(&self, sink: &mut impl DisplaySink) {
            sink.draw_pixel(0, 0, Rgb(self.steps as u8, 0, 0));
        }

        fn log_status(&self) {
            self.statuses.set(self.statuses.get() + 1);
        }
    }

    /// A simulation that stops its own run after a number of steps.
    struct StopAfter {
        remaining: u64,
        operator: Arc<OperatorState>,
    }

    impl Simulation for StopAfter {
        fn name(&self) -> &'static str {
            "stop-after"
        }

        fn step(&mut self) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.operator.request_stop();
            }
        }

        fn draw(&self, _sink: &mut impl DisplaySink) {}

        fn log_status(&self) {}
    }

    fn quick() -> RunOptions {
        RunOptions {
            handshake_pause: Duration::ZERO,
            status_interval_ticks: 0,
        }
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut sim = Counter::default();
        let mut sink = MemorySink::new(4).with_history();
        let operator = Arc::new(OperatorState::new(0, 5));

        let result = run_simulation(&mut sim, &mut sink, &operator, quick())
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.started_at, operator.started_at());
        assert!(result.ended_at >= result.started_at);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.frames_pushed, 6);
        assert_eq!(sim.steps, 5);
        assert_eq!(sink.history().len(), 6);
        assert_eq!(sink.history()[0].get(0, 0), Some(Rgb::BLACK));
        assert_eq!(sink.history()[5].get(0, 0), Some(Rgb(5, 0, 0)));
    }

    #[tokio::test]
    async fn stop_before_first_tick() {
        let mut sim = Counter::default();
        let mut sink = MemorySink::new(4);
        let operator = Arc::new(OperatorState::new(0, 0));
        operator.request_stop();

        let result = run_simulation(&mut sim, &mut sink, &operator, quick())
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert_eq!(sink.pushes(), 1);
    }

    #[tokio::test]
    async fn stop_takes_effect_after_current_tick() {
        let operator = Arc::new(OperatorState::new(0, 0));
        let mut sim = StopAfter {
            remaining: 3,
            operator: Arc::clone(&operator),
        };
        let mut sink = MemorySink::new(4);

        let result = run_simulation(&mut sim, &mut sink, &operator, quick())
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 3);
        assert_eq!(sink.pushes(), 4);
    }

    #[tokio::test]
    async fn push_failure_ends_run_gracefully() {
        let mut sim = Counter::default();
        let mut sink = MemorySink::new(4).failing_after(3);
        let operator = Arc::new(OperatorState::new(0, 100));

        let result = run_simulation(&mut sim, &mut sink, &operator, quick())
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::DisplayFailure);
        assert_eq!(result.total_ticks, 3);
        assert_eq!(result.frames_pushed, 3);
        assert!(!operator.is_running());
    }

    #[tokio::test]
    async fn failed_handshake_is_an_error() {
        let mut sim = Counter::default();
        let mut sink = MemorySink::new(4).failing_after(0);
        let operator = Arc::new(OperatorState::new(0, 1));

        let result = run_simulation(&mut sim, &mut sink, &operator, quick()).await;

        assert!(matches!(result, Err(RunnerError::Handshake { .. })));
        assert_eq!(sim.steps, 0);
    }

    #[tokio::test]
    async fn status_is_logged_on_interval() {
        let mut sim = Counter::default();
        let mut sink = MemorySink::new(4);
        let operator = Arc::new(OperatorState::new(0, 10));
        let options = RunOptions {
            handshake_pause: Duration::ZERO,
            status_interval_ticks: 4,
        };

        let result = run_simulation(&mut sim, &mut sink, &operator, options)
            .await
            .unwrap();

        assert_eq!(result.total_ticks, 10);
        assert_eq!(sim.statuses.get(), 2);
    }
}
