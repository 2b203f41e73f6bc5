//! The generation step.
//!
//! Each step reads the current grid and writes every cell of the next grid,
//! then swaps the two. Colonies are recomputed after every swap.

use pixoo_types::{GRID_SIZE, NEIGHBOR_OFFSETS, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::colony::{Colony, detect_colonies};
use crate::genome::{Genome, breed, mutate, should_breed};
use crate::grid::{LifeCell, LifeGrid};
use crate::seed::seed_colonies;

/// Tunable knobs for the cellular simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeParams {
    /// Edge length of the grid.
    #[serde(default = "default_size")]
    pub size: usize,
    /// Number of colonies stamped at startup.
    #[serde(default = "default_initial_colonies")]
    pub initial_colonies: usize,
    /// Smallest connected group reported as a colony.
    #[serde(default = "default_min_colony_size")]
    pub min_colony_size: usize,
    /// Maximum number of colonies tracked.
    #[serde(default = "default_max_colonies")]
    pub max_colonies: usize,
}

const fn default_size() -> usize {
    GRID_SIZE
}

const fn default_initial_colonies() -> usize {
    4
}

const fn default_min_colony_size() -> usize {
    5
}

const fn default_max_colonies() -> usize {
    8
}

impl Default for LifeParams {
    fn default() -> Self {
        Self {
            size: default_size(),
            initial_colonies: default_initial_colonies(),
            min_colony_size: default_min_colony_size(),
            max_colonies: default_max_colonies(),
        }
    }
}

/// Double-buffered automaton state.
#[derive(Debug)]
pub struct LifeEngine<R = StdRng> {
    params: LifeParams,
    current: LifeGrid,
    next: LifeGrid,
    colonies: Vec<Colony>,
    generation: u64,
    rng: R,
}

impl LifeEngine<StdRng> {
    /// Create an engine seeded with `seed` and stamp the initial colonies.
    pub fn seeded(params: LifeParams, seed: u64) -> Self {
        let mut engine = Self::with_rng(params, StdRng::seed_from_u64(seed));
        engine.seed_initial_colonies();
        engine
    }
}

impl<R: Rng> LifeEngine<R> {
    /// Create an engine with an empty grid driven by `rng`.
    pub fn with_rng(params: LifeParams, rng: R) -> Self {
        let size = params.size;
        Self {
            params,
            current: LifeGrid::new(size),
            next: LifeGrid::new(size),
            colonies: Vec::new(),
            generation: 0,
            rng,
        }
    }

    /// Stamp `initial_colonies` classic colonies onto the current grid.
    pub fn seed_initial_colonies(&mut self) {
        let genomes = seed_colonies(&mut self.current, self.params.initial_colonies, &mut self.rng);
        self.refresh_colonies();
        info!(
            colonies = genomes.len(),
            population = self.current.population(),
            "Life grid seeded"
        );
    }

    /// The grid shown this generation.
    pub const fn grid(&self) -> &LifeGrid {
        &self.current
    }

    /// Mutable access to the current grid, for placing cells directly.
    pub const fn grid_mut(&mut self) -> &mut LifeGrid {
        &mut self.current
    }

    /// Colonies found after the last step, largest first.
    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    /// Generations computed so far.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        for pos in self.current.positions() {
            let cell = next_cell(&self.current, pos, &mut self.rng);
            self.next.set(pos, cell);
        }
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation = self.generation.saturating_add(1);
        self.refresh_colonies();
    }

    fn refresh_colonies(&mut self) {
        self.colonies = detect_colonies(
            &self.current,
            self.params.min_colony_size,
            self.params.max_colonies,
        );
    }

    /// Log a summary of every tracked colony.
    pub fn log_status(&self) {
        info!(
            generation = self.generation,
            population = self.current.population(),
            colonies = self.colonies.len(),
            "Colony status"
        );
        for (rank, colony) in self.colonies.iter().enumerate() {
            info!(
                rank = rank.saturating_add(1),
                size = colony.size(),
                hue = colony.genome.base_hue.round(),
                rules = %colony.genome,
                "Colony"
            );
        }
    }
}

/// Neighbor genomes grouped by identity, in first-seen order, most frequent
/// first (stable, so ties keep first-seen order).
fn neighbor_tally(grid: &LifeGrid, pos: Position) -> Vec<(Genome, usize)> {
    let size = grid.size();
    let mut tally: Vec<(Genome, usize)> = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
    for neighbor in pos.neighbors(size) {
        let Some(genome) = grid.genome(neighbor) else {
            continue;
        };
        match tally.iter_mut().find(|(g, _)| *g == genome) {
            Some((_, count)) => *count = count.saturating_add(1),
            None => tally.push((genome, 1)),
        }
    }
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}

/// Compute the next state of the cell at `pos`.
pub fn next_cell(grid: &LifeGrid, pos: Position, rng: &mut impl Rng) -> LifeCell {
    let cell = grid.get(pos);
    let tally = neighbor_tally(grid, pos);

    match cell.genome {
        None => {
            if let [(top, top_count), (second, _), ..] = tally.as_slice()
                && should_breed(*top_count, rng)
            {
                let child = breed(*top, *second, rng);
                debug!(
                    %pos,
                    hue = child.base_hue.round(),
                    rules = %child,
                    "Genome bred"
                );
                return LifeCell::born(child);
            }
            if let Some(&(dominant, count)) = tally.first()
                && dominant.birth.contains(count)
            {
                return LifeCell::born(mutate(dominant, rng));
            }
            LifeCell::DEAD
        }
        Some(genome) => {
            let count = tally
                .iter()
                .find(|(g, _)| *g == genome)
                .map_or(0, |&(_, n)| n);
            if genome.survival.contains(count) {
                cell.survived(mutate(genome, rng))
            } else {
                LifeCell::DEAD
            }
        }
    }
}
