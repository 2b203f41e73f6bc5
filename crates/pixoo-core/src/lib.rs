//! Runtime core for the Pixoo simulations.
//!
//! This crate turns the simulation crates into something that runs: it
//! loads configuration, defines the display sink the frames go to, draws
//! each simulation, and drives the tick loop.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `pixoo-config.yaml` into
//!   strongly-typed structs.
//! - [`display`] -- [`DisplaySink`] trait, [`FrameBuffer`], and the
//!   in-memory [`MemorySink`].
//! - [`operator`] -- Shared stop flag and tick bounds.
//! - [`render`] -- [`Simulation`] trait and renderers for both simulations.
//! - [`runner`] -- The async tick loop.

pub mod config;
pub mod display;
pub mod operator;
pub mod render;
pub mod runner;

// Re-export primary types at crate root.
pub use config::{
    ConfigError, DisplayConfig, DisplayTarget, LoggingConfig, RunConfig, SimulationConfig,
    SimulationMode,
};
pub use display::{DisplayError, DisplaySink, FrameBuffer, MemorySink};
pub use operator::{OperatorState, SimulationEndReason};
pub use render::{RESOURCE_COLOR, Simulation};
pub use runner::{RunOptions, RunnerError, SimulationResult, log_simulation_end, run_simulation};
