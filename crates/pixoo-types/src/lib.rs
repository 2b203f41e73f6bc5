//! Shared type definitions for the Pixoo Life simulations.
//!
//! Every crate in the workspace speaks in terms of the types defined here:
//! colors pushed to the display, toroidal grid positions, terrain biomes,
//! and the person/structure records that live on terrain cells.
//!
//! # Modules
//!
//! - [`color`] -- [`Rgb`] pixels and HSL conversion
//! - [`grid`] -- [`Position`], toroidal wrapping, and the 8-neighborhood
//! - [`enums`] -- Biomes, person roles, resource kinds, structure kinds
//! - [`ids`] -- Typed identifiers for tribes and persons
//! - [`structs`] -- Terrain [`Cell`], [`Person`], and [`Structure`] records

pub mod color;
pub mod enums;
pub mod grid;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use color::{Rgb, hsl_to_rgb};
pub use enums::{Biome, PersonRole, ResourceKind, StructureKind};
pub use grid::{NEIGHBOR_OFFSETS, Position, wrap};
pub use ids::{PersonId, TribeId};
pub use structs::{Cell, Person, STAT_MAX, Structure};

/// Edge length of the Pixoo display and of every simulation grid.
pub const GRID_SIZE: usize = 64;
