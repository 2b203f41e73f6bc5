//! Procedural terrain for the Pixoo simulations.
//!
//! A seeded gradient-noise lattice drives height, temperature, and moisture
//! fields. Rivers are carved into the height field before it is smoothed and
//! classified into biomes, and food resources are scattered over fertile
//! land. The result is a [`TerrainGrid`] of [`Cell`]s that the tribe
//! simulation lives on and the cellular simulation uses as a backdrop.
//!
//! # Modules
//!
//! - [`biome`] -- Biome thresholds and resource rolls.
//! - [`error`] -- Error types for grid construction.
//! - [`field`] -- Square scalar fields with toroidal lookups and blurring.
//! - [`mask`] -- Continent shapes blended into the height field.
//! - [`noise`] -- Seeded gradient noise and fractal sums.
//! - [`rivers`] -- River and tributary carving.
//! - [`spawn`] -- Walkability and settlement site selection.
//! - [`terrain`] -- [`TerrainParams`], [`TerrainGrid`], and [`generate`].
//!
//! [`Cell`]: pixoo_types::Cell

pub mod biome;
pub mod error;
pub mod field;
pub mod mask;
pub mod noise;
pub mod rivers;
pub mod spawn;
pub mod terrain;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use mask::ContinentShape;
pub use noise::NoiseState;
pub use spawn::{find_spawn_location, is_walkable};
pub use terrain::{TerrainGrid, TerrainParams, generate};
