//! The cellular grid.

use pixoo_types::Position;
use serde::{Deserialize, Serialize};

use crate::genome::Genome;

/// Brightness of a newly born cell.
pub const INITIAL_BRIGHTNESS: f64 = 0.3;

/// Brightness gained per surviving generation.
pub const BRIGHTNESS_STEP: f64 = 0.05;

/// Brightness ceiling.
pub const MAX_BRIGHTNESS: f64 = 0.9;

/// One cell of the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LifeCell {
    /// The genome of a live cell; `None` when dead.
    pub genome: Option<Genome>,
    /// Generations survived since birth.
    pub age: u64,
    /// Display lightness in `[0, 1]`.
    pub brightness: f64,
}

impl LifeCell {
    /// A dead cell.
    pub const DEAD: Self = Self {
        genome: None,
        age: 0,
        brightness: 0.0,
    };

    /// A newborn cell carrying `genome`.
    pub const fn born(genome: Genome) -> Self {
        Self {
            genome: Some(genome),
            age: 0,
            brightness: INITIAL_BRIGHTNESS,
        }
    }

    /// This cell one generation older, carrying `genome`.
    pub const fn survived(self, genome: Genome) -> Self {
        Self {
            genome: Some(genome),
            age: self.age.saturating_add(1),
            brightness: (self.brightness + BRIGHTNESS_STEP).min(MAX_BRIGHTNESS),
        }
    }

    /// Whether a genome occupies this cell.
    pub const fn is_alive(&self) -> bool {
        self.genome.is_some()
    }
}

/// A square toroidal grid of [`LifeCell`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeGrid {
    size: usize,
    cells: Vec<LifeCell>,
}

impl LifeGrid {
    /// An all-dead grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![LifeCell::DEAD; size.saturating_mul(size)],
        }
    }

    /// Edge length.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The cell at `pos`; dead outside the grid.
    pub fn get(&self, pos: Position) -> LifeCell {
        if pos.x >= self.size {
            return LifeCell::DEAD;
        }
        self.cells
            .get(pos.index(self.size))
            .copied()
            .unwrap_or(LifeCell::DEAD)
    }

    /// The genome at `pos`, if alive.
    pub fn genome(&self, pos: Position) -> Option<Genome> {
        self.get(pos).genome
    }

    /// Overwrite the cell at `pos`. Out-of-range writes are ignored.
    pub fn set(&mut self, pos: Position, cell: LifeCell) {
        if pos.x >= self.size {
            return;
        }
        if let Some(slot) = self.cells.get_mut(pos.index(self.size)) {
            *slot = cell;
        }
    }

    /// All positions in x-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size;
        (0..size).flat_map(move |x| (0..size).map(move |y| Position::new(x, y)))
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn brightness_is_capped() {
        let mut cell = LifeCell::born(Genome::classic(0.0));
        for _ in 0..30 {
            cell = cell.survived(Genome::classic(0.0));
        }
        assert_eq!(cell.brightness, MAX_BRIGHTNESS);
        assert_eq!(cell.age, 30);
    }

    #[test]
    fn age_saturates_instead_of_wrapping() {
        let old = LifeCell {
            age: u64::MAX,
            ..LifeCell::born(Genome::classic(0.0))
        };
        let next = old.survived(Genome::classic(0.0));
        assert_eq!(next.age, u64::MAX);
        assert!(next.is_alive());
    }

    #[test]
    fn out_of_range_reads_are_dead() {
        let grid = LifeGrid::new(4);
        assert!(!grid.get(Position::new(9, 1)).is_alive());
    }

    #[test]
    fn population_counts_live_cells() {
        let mut grid = LifeGrid::new(4);
        grid.set(Position::new(1, 1), LifeCell::born(Genome::classic(0.0)));
        grid.set(Position::new(2, 3), LifeCell::born(Genome::classic(0.0)));
        assert_eq!(grid.population(), 2);
    }
}
