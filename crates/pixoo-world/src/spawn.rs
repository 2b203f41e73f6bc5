//! Settlement site selection.

use pixoo_types::{Biome, Position};
use rand::Rng;

use crate::terrain::TerrainGrid;

/// Whether persons can stand on `biome`.
pub const fn is_walkable(biome: Biome) -> bool {
    biome.is_walkable()
}

/// Score contributed by each Plains, Forest, or Taiga cell in the 3x3
/// neighborhood.
const GOOD_LAND_SCORE: u32 = 2;

/// One-off bonus for a resource node in the 3x3 neighborhood.
const RESOURCE_NODE_BONUS: u32 = 3;

/// How many of the best-scoring candidates to choose among.
const TOP_CANDIDATES: usize = 3;

/// Pick a good settlement site within a square `radius` of `center`.
///
/// Every walkable cell in range is scored by its toroidal 3x3 neighborhood.
/// Candidates with a positive score are ranked (stable, best first) and one
/// of the top three is chosen uniformly. Returns `None` when nothing in
/// range qualifies.
#[allow(clippy::cast_possible_wrap)]
pub fn find_spawn_location(
    grid: &TerrainGrid,
    center: Position,
    radius: usize,
    rng: &mut impl Rng,
) -> Option<Position> {
    let size = grid.size();
    let r = radius as i64;
    let mut candidates: Vec<(Position, u32)> = Vec::new();

    for dx in r.saturating_neg()..=r {
        for dy in r.saturating_neg()..=r {
            let pos = center.offset(dx, dy, size);
            if !grid.terrain(pos).is_some_and(is_walkable) {
                continue;
            }
            let score = site_score(grid, pos);
            if score > 0 {
                candidates.push((pos, score));
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    let pick = rng.random_range(0..candidates.len().min(TOP_CANDIDATES));
    candidates.get(pick).map(|&(pos, _)| pos)
}

fn site_score(grid: &TerrainGrid, pos: Position) -> u32 {
    let size = grid.size();
    let mut score: u32 = 0;
    let mut has_node = false;
    for dx in -1..=1 {
        for dy in -1..=1 {
            match grid.terrain(pos.offset(dx, dy, size)) {
                Some(Biome::ResourceNode) => has_node = true,
                Some(Biome::Plains | Biome::Forest | Biome::Taiga) => {
                    score = score.saturating_add(GOOD_LAND_SCORE);
                }
                _ => {}
            }
        }
    }
    if has_node {
        score = score.saturating_add(RESOURCE_NODE_BONUS);
    }
    score
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn all_water_has_no_site() {
        let grid = TerrainGrid::uniform(16, Biome::Water, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(find_spawn_location(&grid, Position::new(8, 8), 4, &mut rng), None);
    }

    #[test]
    fn picks_the_only_land_cell() {
        let mut grid = TerrainGrid::uniform(16, Biome::Water, 0).unwrap();
        if let Some(cell) = grid.cell_mut(Position::new(3, 14)) {
            cell.terrain = Biome::Plains;
        }
        let mut rng = StdRng::seed_from_u64(2);
        // Wraps across the corner from (1, 1).
        let site = find_spawn_location(&grid, Position::new(1, 1), 3, &mut rng);
        assert_eq!(site, Some(Position::new(3, 14)));
    }

    #[test]
    fn desert_only_scores_zero() {
        let grid = TerrainGrid::uniform(8, Biome::Desert, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(find_spawn_location(&grid, Position::new(4, 4), 2, &mut rng), None);
    }

    #[test]
    fn prefers_sites_near_resource_nodes() {
        let mut grid = TerrainGrid::uniform(16, Biome::Plains, 0).unwrap();
        if let Some(cell) = grid.cell_mut(Position::new(8, 8)) {
            cell.terrain = Biome::ResourceNode;
        }
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..20 {
            let site = find_spawn_location(&grid, Position::new(8, 8), 3, &mut rng);
            // The best sites touch the node, and the scan reaches the
            // west column first.
            assert!(site.is_some_and(|s| s.x == 7 && s.y.abs_diff(8) <= 1));
        }
    }
}
