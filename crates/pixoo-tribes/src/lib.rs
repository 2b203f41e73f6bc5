//! Tribe simulation for the Pixoo display.
//!
//! Persons belong to tribes, stand on cells of a generated terrain grid, get
//! hungry, eat from their tribe's stockpile, gather resources, and wander.
//!
//! # Modules
//!
//! - [`config`] -- Tribe setup and vital tunables
//! - [`error`] -- Error types
//! - [`tribe`] -- Tribes, behavior weights, and stockpiles
//! - [`vitals`] -- Per-tick hunger, health, aging, and eating
//! - [`world`] -- The [`TribalWorld`] and its tick loop

pub mod config;
pub mod error;
pub mod tribe;
pub mod vitals;
pub mod world;

// Re-export primary types at crate root.
pub use config::{TribeConfig, VitalsConfig};
pub use error::TribeError;
pub use tribe::{Behavior, STARTING_RESOURCES, Tribe};
pub use vitals::{VitalTickResult, apply_vital_tick};
pub use world::TribalWorld;
