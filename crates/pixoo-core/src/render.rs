//! Drawing simulations into a display sink.
//!
//! [`Simulation`] is the seam between the tick loop and the two simulations:
//! the loop only needs to advance a state, draw it, and occasionally log it.

use pixoo_life::LifeEngine;
use pixoo_tribes::TribalWorld;
use pixoo_types::{Position, Rgb, hsl_to_rgb};
use rand::Rng;

use crate::display::DisplaySink;

/// Color of any terrain cell that still holds resources.
pub const RESOURCE_COLOR: Rgb = Rgb(255, 255, 150);

/// Saturation used for genome and tribe hues.
const SATURATION: f64 = 1.0;

/// Lightness of a person.
const PERSON_LIGHTNESS: f64 = 0.6;

/// A tickable, drawable simulation.
pub trait Simulation {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Advance one tick.
    fn step(&mut self);

    /// Draw the current state.
    fn draw(&self, sink: &mut impl DisplaySink);

    /// Log a status summary.
    fn log_status(&self);
}

#[allow(clippy::cast_possible_wrap)]
fn draw_at(sink: &mut impl DisplaySink, pos: Position, color: Rgb) {
    sink.draw_pixel(pos.x as i64, pos.y as i64, color);
}

impl<R: Rng> Simulation for LifeEngine<R> {
    fn name(&self) -> &'static str {
        "life"
    }

    fn step(&mut self) {
        Self::step(self);
    }

    /// Black background, live cells as `HSL(hue, 1, brightness)`.
    fn draw(&self, sink: &mut impl DisplaySink) {
        sink.clear(Rgb::BLACK);
        let grid = self.grid();
        for pos in grid.positions() {
            let cell = grid.get(pos);
            if let Some(genome) = cell.genome {
                draw_at(sink, pos, hsl_to_rgb(genome.base_hue, SATURATION, cell.brightness));
            }
        }
    }

    fn log_status(&self) {
        Self::log_status(self);
    }
}

impl<R: Rng> Simulation for TribalWorld<R> {
    fn name(&self) -> &'static str {
        "tribal"
    }

    fn step(&mut self) {
        Self::step(self);
    }

    /// Terrain first (resource-bearing cells highlighted), then persons in
    /// their tribe's hue on top.
    fn draw(&self, sink: &mut impl DisplaySink) {
        let grid = self.grid();
        for pos in grid.positions() {
            if let Some(cell) = grid.cell(pos) {
                let color = if cell.resource_amount > 0 {
                    RESOURCE_COLOR
                } else {
                    cell.terrain.color()
                };
                draw_at(sink, pos, color);
            }
        }
        for pos in grid.positions() {
            let hue = grid
                .cell(pos)
                .and_then(|c| c.occupant.as_ref())
                .and_then(|p| self.tribe(p.tribe_id))
                .map(|t| t.base_hue);
            if let Some(hue) = hue {
                draw_at(sink, pos, hsl_to_rgb(hue, SATURATION, PERSON_LIGHTNESS));
            }
        }
    }

    fn log_status(&self) {
        Self::log_status(self);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pixoo_life::{Genome, LifeCell, LifeParams};
    use pixoo_tribes::TribeConfig;
    use pixoo_types::{Biome, PersonRole};
    use pixoo_world::TerrainGrid;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::display::MemorySink;

    #[test]
    fn life_cells_use_genome_hue_and_brightness() {
        let params = LifeParams {
            size: 8,
            ..LifeParams::default()
        };
        let mut engine = LifeEngine::with_rng(params, StdRng::seed_from_u64(1));
        engine
            .grid_mut()
            .set(Position::new(2, 5), LifeCell::born(Genome::classic(120.0)));

        let mut sink = MemorySink::new(8);
        sink.clear(Rgb(9, 9, 9));
        engine.draw(&mut sink);

        assert_eq!(sink.frame().get(2, 5), Some(hsl_to_rgb(120.0, 1.0, 0.3)));
        assert_eq!(sink.frame().get(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn tribal_frame_layers_people_over_terrain() {
        let mut grid = TerrainGrid::uniform(8, Biome::Plains, 0).unwrap();
        grid.cell_mut(Position::new(1, 1)).unwrap().resource_amount = 4;
        let mut world = TribalWorld::new(grid, TribeConfig::default(), StdRng::seed_from_u64(2));
        let id = world.add_tribe(300.0);
        assert!(world.place_person(Position::new(3, 4), id, PersonRole::Gatherer));

        let mut sink = MemorySink::new(8);
        world.draw(&mut sink);

        assert_eq!(sink.frame().get(0, 0), Some(Biome::Plains.color()));
        assert_eq!(sink.frame().get(1, 1), Some(RESOURCE_COLOR));
        assert_eq!(sink.frame().get(3, 4), Some(hsl_to_rgb(300.0, 1.0, 0.6)));
    }
}
