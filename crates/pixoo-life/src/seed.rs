//! Initial colony placement.

use pixoo_types::Position;
use rand::Rng;
use tracing::debug;

use crate::genome::Genome;
use crate::grid::{LifeCell, LifeGrid};

/// Distance kept between a seed center and the grid edge.
const EDGE_MARGIN: usize = 4;

/// Seed patterns as `(dx, dy)` offsets from the center, used round-robin.
pub const SEED_PATTERNS: [&[(i64, i64)]; 4] = [
    // Blinker.
    &[(0, -1), (0, 0), (0, 1)],
    // Block.
    &[(-1, -1), (-1, 0), (0, -1), (0, 0)],
    &[(0, -1), (0, 0), (-1, -1), (-1, 0), (-2, 0), (1, 0)],
    &[(0, 0), (-1, 0), (-2, 0), (0, -1), (-1, -2)],
];

/// Stamp `count` classic colonies with evenly spaced hues.
///
/// Colony `i` gets hue `i * 360 / count` and pattern `i % 4`, centered at a
/// random point at least four cells from each edge. Returns the seeded
/// genomes.
#[allow(clippy::cast_precision_loss)]
pub fn seed_colonies(grid: &mut LifeGrid, count: usize, rng: &mut impl Rng) -> Vec<Genome> {
    let size = grid.size();
    let mut genomes = Vec::with_capacity(count);
    if size == 0 {
        return genomes;
    }

    for i in 0..count {
        let hue = i as f64 * (360.0 / count as f64);
        let genome = Genome::classic(hue);
        let center = Position::new(random_axis(size, rng), random_axis(size, rng));
        let pattern = SEED_PATTERNS
            .get(i.checked_rem(SEED_PATTERNS.len()).unwrap_or_default())
            .copied()
            .unwrap_or_default();
        for &(dx, dy) in pattern {
            grid.set(center.offset(dx, dy, size), LifeCell::born(genome));
        }
        debug!(colony = i, %center, hue, "Colony seeded");
        genomes.push(genome);
    }
    genomes
}

/// Uniform coordinate in `[4, size - 4)`, or the midpoint on tiny grids.
fn random_axis(size: usize, rng: &mut impl Rng) -> usize {
    if size <= EDGE_MARGIN.saturating_mul(2) {
        return size / 2;
    }
    rng.random_range(EDGE_MARGIN..size.saturating_sub(EDGE_MARGIN))
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn seeds_distinct_hues() {
        let mut grid = LifeGrid::new(64);
        let mut rng = StdRng::seed_from_u64(42);
        let genomes = seed_colonies(&mut grid, 4, &mut rng);
        let hues: Vec<f64> = genomes.iter().map(|g| g.base_hue).collect();
        assert_eq!(hues, vec![0.0, 90.0, 180.0, 270.0]);
        assert!(grid.population() > 0);
        assert!(grid.population() <= 3 + 4 + 6 + 5);
    }

    #[test]
    fn cells_stay_away_from_edges() {
        for seed in 0..20 {
            let mut grid = LifeGrid::new(64);
            let mut rng = StdRng::seed_from_u64(seed);
            seed_colonies(&mut grid, 4, &mut rng);
            for pos in grid.positions() {
                if grid.get(pos).is_alive() {
                    assert!((2..=61).contains(&pos.x) && (2..=61).contains(&pos.y));
                }
            }
        }
    }

    #[test]
    fn tiny_grid_uses_midpoint() {
        let mut grid = LifeGrid::new(6);
        let mut rng = StdRng::seed_from_u64(1);
        seed_colonies(&mut grid, 1, &mut rng);
        assert_eq!(grid.population(), 3);
        assert!(grid.get(Position::new(3, 3)).is_alive());
    }
}
