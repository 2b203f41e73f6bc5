//! Colony detection: connected groups of cells sharing a genome.

use std::collections::{BTreeSet, VecDeque};

use pixoo_types::Position;

use crate::genome::Genome;
use crate::grid::LifeGrid;

/// A connected region of live cells with identical genomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colony {
    /// The shared genome.
    pub genome: Genome,
    /// Member positions.
    pub members: BTreeSet<Position>,
}

impl Colony {
    /// Number of member cells.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Find colonies by flood fill over the toroidal 8-neighborhood.
///
/// Components smaller than `min_size` are dropped. The rest are ordered
/// largest first (ties keep scan order) and truncated to `max_colonies`.
pub fn detect_colonies(grid: &LifeGrid, min_size: usize, max_colonies: usize) -> Vec<Colony> {
    let size = grid.size();
    let mut visited: BTreeSet<Position> = BTreeSet::new();
    let mut colonies = Vec::new();

    for start in grid.positions() {
        if visited.contains(&start) {
            continue;
        }
        let Some(genome) = grid.genome(start) else {
            continue;
        };

        visited.insert(start);
        let mut members = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for next in pos.neighbors(size) {
                if visited.contains(&next) || grid.genome(next) != Some(genome) {
                    continue;
                }
                visited.insert(next);
                members.insert(next);
                queue.push_back(next);
            }
        }

        if members.len() >= min_size {
            colonies.push(Colony { genome, members });
        }
    }

    colonies.sort_by(|a, b| b.size().cmp(&a.size()));
    colonies.truncate(max_colonies);
    colonies
}
