//! "Life Evolved": a cellular automaton whose cells carry genomes.
//!
//! Each live cell holds a [`Genome`] with its own birth and survival rules
//! and a display hue. Dead cells are born from their dominant neighbor genome
//! (mutated) or, in crowded mixed neighborhoods, from a cross of the two most
//! common genomes. Connected same-genome regions are tracked as colonies.
//!
//! # Modules
//!
//! - [`colony`] -- Flood-fill colony detection.
//! - [`engine`] -- [`LifeEngine`] double buffer and the per-cell rule.
//! - [`error`] -- Rule-set construction errors.
//! - [`genome`] -- [`Genome`], [`RuleSet`], mutation and breeding.
//! - [`grid`] -- [`LifeCell`] and the toroidal [`LifeGrid`].
//! - [`seed`] -- Initial colony patterns.

pub mod colony;
pub mod engine;
pub mod error;
pub mod genome;
pub mod grid;
pub mod seed;

// Re-export primary types at crate root.
pub use colony::{Colony, detect_colonies};
pub use engine::{LifeEngine, LifeParams, next_cell};
pub use error::GenomeError;
pub use genome::{Genome, RuleSet, breed, mutate, should_breed};
pub use grid::{LifeCell, LifeGrid};
pub use seed::seed_colonies;
