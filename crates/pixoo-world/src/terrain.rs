//! Terrain generation pipeline and the resulting cell grid.
//!
//! [`generate`] runs once per simulation:
//!
//! 1. Height from three fractal layers, contrast-shaped and blended with the
//!    continent mask.
//! 2. Main rivers and tributaries carved into the height field.
//! 3. One or more smoothing passes.
//! 4. Temperature (cooled by raw altitude) and moisture fields.
//! 5. Biome classification and resource seeding.
//! 6. Optional resource-node placement.
//!
//! All randomness after the noise lattice comes from one [`StdRng`] seeded
//! with the same seed, so `generate(params, seed)` is a pure function.

use std::collections::BTreeMap;

use pixoo_types::{Biome, Cell, GRID_SIZE, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biome::{classify, roll_resource_node, roll_resources};
use crate::error::WorldError;
use crate::field::Field;
use crate::mask::ContinentShape;
use crate::noise::NoiseState;
use crate::rivers::carve_rivers;

const HEIGHT_SCALE: f64 = 0.012;
const TEMPERATURE_SCALE: f64 = 0.014;
const MOISTURE_SCALE: f64 = 0.015;

/// Tunable knobs for terrain generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Edge length of the square grid.
    #[serde(default = "default_size")]
    pub size: usize,
    /// Number of main rivers. Twice as many tributaries are carved.
    #[serde(default = "default_river_count")]
    pub river_count: u32,
    /// Large-scale land layout.
    #[serde(default)]
    pub continent_shape: ContinentShape,
    /// Number of box-blur passes after carving.
    #[serde(default = "default_smoothing_passes")]
    pub smoothing_passes: u32,
    /// Whether to scatter resource nodes after classification.
    #[serde(default)]
    pub resource_nodes: bool,
}

const fn default_size() -> usize {
    GRID_SIZE
}

const fn default_river_count() -> u32 {
    12
}

const fn default_smoothing_passes() -> u32 {
    1
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            size: default_size(),
            river_count: default_river_count(),
            continent_shape: ContinentShape::default(),
            smoothing_passes: default_smoothing_passes(),
            resource_nodes: false,
        }
    }
}

/// A square grid of terrain cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl TerrainGrid {
    /// Build a grid from cells laid out row-major (`y * size + x`).
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, WorldError> {
        if size == 0 {
            return Err(WorldError::InvalidSize(size));
        }
        let expected = size.saturating_mul(size);
        if cells.len() != expected {
            return Err(WorldError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Build a grid where every cell has the same terrain and resources.
    pub fn uniform(size: usize, terrain: Biome, resource_amount: u32) -> Result<Self, WorldError> {
        Self::from_cells(size, vec![Cell::new(terrain, resource_amount); size.saturating_mul(size)])
    }

    /// Edge length.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The cell at `pos`, if on the grid.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if pos.x >= self.size {
            return None;
        }
        self.cells.get(pos.index(self.size))
    }

    /// Mutable access to the cell at `pos`, if on the grid.
    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if pos.x >= self.size {
            return None;
        }
        self.cells.get_mut(pos.index(self.size))
    }

    /// Terrain at `pos`, if on the grid.
    pub fn terrain(&self, pos: Position) -> Option<Biome> {
        self.cell(pos).map(|c| c.terrain)
    }

    /// All positions in x-major order (`for x { for y }`).
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size;
        (0..size).flat_map(move |x| (0..size).map(move |y| Position::new(x, y)))
    }

    /// Number of cells per biome.
    pub fn biome_counts(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            let count = counts.entry(cell.terrain).or_insert(0_usize);
            *count = count.saturating_add(1);
        }
        counts
    }
}

/// Generate a terrain grid from `params` and `seed`.
///
/// Identical inputs always produce identical grids.
#[allow(clippy::cast_precision_loss)]
pub fn generate(params: &TerrainParams, seed: u64) -> Result<TerrainGrid, WorldError> {
    let size = params.size;
    if size == 0 {
        return Err(WorldError::InvalidSize(size));
    }

    let noise = NoiseState::new(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = size as f64;

    let raw_height = Field::from_fn(size, |x, y| {
        height_value(&noise, params.continent_shape, x as f64, y as f64, extent)
    });

    let mut height = raw_height.clone();
    carve_rivers(&mut height, params.river_count, &mut rng);
    for _ in 0..params.smoothing_passes {
        height.box_blur();
    }

    let temperature = Field::from_fn(size, |x, y| {
        temperature_value(&noise, x as f64, y as f64, raw_height.get(x, y))
    });
    let moisture = Field::from_fn(size, |x, y| moisture_value(&noise, x as f64, y as f64));

    let mut cells = vec![Cell::new(Biome::Water, 0); size.saturating_mul(size)];
    for x in 0..size {
        for y in 0..size {
            let mut terrain = classify(height.get(x, y), temperature.get(x, y), moisture.get(x, y));
            let mut amount = roll_resources(terrain, &mut rng);
            if params.resource_nodes {
                (terrain, amount) = roll_resource_node(terrain, amount, &mut rng);
            }
            if let Some(cell) = cells.get_mut(Position::new(x, y).index(size)) {
                *cell = Cell::new(terrain, amount);
            }
        }
    }

    let grid = TerrainGrid::from_cells(size, cells)?;
    let counts = grid.biome_counts();
    info!(
        seed,
        size,
        shape = ?params.continent_shape,
        water = counts.get(&Biome::Water).copied().unwrap_or(0),
        biomes = ?counts,
        "Terrain generated"
    );
    Ok(grid)
}

/// Raw height in `[0, 1]` before carving and smoothing.
fn height_value(noise: &NoiseState, shape: ContinentShape, x: f64, y: f64, size: f64) -> f64 {
    let s = HEIGHT_SCALE;
    let mut v = noise.fractal(x * s, y * s, 6, 2.4, 0.5);
    v += 0.6 * noise.fractal(x * s * 4.0, y * s * 4.0, 4, 2.2, 0.5);
    v += 0.2 * noise.fractal(x * s * 12.0, y * s * 12.0, 2, 2.0, 0.5);

    let v = ((v + 1.5) / 3.0).clamp(0.0, 1.0).powf(1.3);
    let mask = shape.mask(noise, x, y, size).powf(0.6);
    v.mul_add(0.65, mask * 0.35)
}

fn temperature_value(noise: &NoiseState, x: f64, y: f64, raw_height: f64) -> f64 {
    let s = TEMPERATURE_SCALE;
    let t = noise.fractal(x * s, y * s, 4, 2.2, 0.5);
    let detail = 0.3 * noise.fractal(x * s * 3.0, y * s * 3.0, 2, 2.0, 0.5);
    let normalized = (t + detail + 1.0) / 2.0;
    0.3f64.mul_add(-raw_height, normalized).max(0.0).powf(1.2)
}

fn moisture_value(noise: &NoiseState, x: f64, y: f64) -> f64 {
    let s = MOISTURE_SCALE;
    let w = noise.fractal(x * s, y * s, 4, 2.2, 0.5);
    let detail = 0.3 * noise.fractal(x * s * 4.0, y * s * 4.0, 2, 2.0, 0.5);
    ((w + detail + 1.0) / 2.0).max(0.0).powf(1.1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        let params = TerrainParams {
            size: 0,
            ..TerrainParams::default()
        };
        assert!(matches!(generate(&params, 1), Err(WorldError::InvalidSize(0))));
    }

    #[test]
    fn grid_has_size_squared_cells() {
        let params = TerrainParams {
            size: 16,
            river_count: 2,
            ..TerrainParams::default()
        };
        let grid = generate(&params, 5).unwrap();
        assert_eq!(grid.biome_counts().values().sum::<usize>(), 256);
        assert_eq!(grid.positions().count(), 256);
    }

    #[test]
    fn height_is_bounded() {
        let noise = NoiseState::new(21);
        for shape in ContinentShape::ALL {
            for x in 0..64 {
                for y in (0..64).step_by(5) {
                    let h = height_value(&noise, shape, f64::from(x), f64::from(y), 64.0);
                    assert!((0.0..=1.0).contains(&h), "height {h} out of range");
                }
            }
        }
    }

    #[test]
    fn climate_fields_are_never_nan() {
        let noise = NoiseState::new(4);
        for x in 0..64 {
            for y in 0..64 {
                let t = temperature_value(&noise, f64::from(x), f64::from(y), 1.0);
                let m = moisture_value(&noise, f64::from(x), f64::from(y));
                assert!(t.is_finite() && t >= 0.0);
                assert!(m.is_finite() && m >= 0.0);
            }
        }
    }

    #[test]
    fn resources_only_on_food_biomes() {
        let params = TerrainParams {
            size: 32,
            ..TerrainParams::default()
        };
        let grid = generate(&params, 77).unwrap();
        for pos in grid.positions() {
            let cell = grid.cell(pos).unwrap();
            if cell.resource_amount > 0 {
                assert!(matches!(
                    cell.terrain,
                    Biome::Plains | Biome::Forest | Biome::Taiga
                ));
            }
        }
    }

    #[test]
    fn cell_lookup_outside_grid_is_none() {
        let grid = TerrainGrid::uniform(4, Biome::Plains, 0).unwrap();
        assert!(grid.cell(Position::new(4, 0)).is_none());
        assert!(grid.cell(Position::new(0, 4)).is_none());
        assert_eq!(grid.terrain(Position::new(3, 3)), Some(Biome::Plains));
    }

    #[test]
    fn params_parse_with_defaults() {
        let params: TerrainParams =
            serde_yml::from_str("continent_shape: island\n").unwrap();
        assert_eq!(params.continent_shape, ContinentShape::Island);
        assert_eq!(params.size, 64);
        assert_eq!(params.river_count, 12);
        assert!(!params.resource_nodes);
    }
}
