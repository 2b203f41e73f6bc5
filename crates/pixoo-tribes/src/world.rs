//! The tribal world: terrain, persons standing on it, and their tribes.
//!
//! Each tick scans the grid x-major and updates every person it finds in
//! place. A person who moves to a cell later in scan order is visited again
//! in the same tick, and the first person to claim a free cell keeps it.

use std::collections::BTreeMap;

use pixoo_types::{
    Biome, NEIGHBOR_OFFSETS, Person, PersonId, PersonRole, Position, ResourceKind, TribeId,
};
use pixoo_world::{TerrainGrid, TerrainParams, find_spawn_location};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::TribeConfig;
use crate::error::TribeError;
use crate::tribe::Tribe;
use crate::vitals::apply_vital_tick;

/// Random draws made for a fertile fallback settlement.
const FALLBACK_ATTEMPTS: usize = 100;

/// Terrain plus tribes, advanced one tick at a time.
#[derive(Debug, Clone)]
pub struct TribalWorld<R = StdRng> {
    grid: TerrainGrid,
    tribes: BTreeMap<TribeId, Tribe>,
    config: TribeConfig,
    rng: R,
    tick: u64,
}

impl TribalWorld<StdRng> {
    /// Generate terrain from `seed` and settle the initial tribes.
    ///
    /// Terrain uses `seed` directly; the agent RNG is seeded with
    /// `seed + 1` so both streams stay independent.
    pub fn generate(
        params: &TerrainParams,
        config: TribeConfig,
        seed: u64,
    ) -> Result<Self, TribeError> {
        let grid = pixoo_world::generate(params, seed)?;
        let mut world = Self::new(grid, config, StdRng::seed_from_u64(seed.wrapping_add(1)));
        world.spawn_tribes();
        Ok(world)
    }
}

impl<R: Rng> TribalWorld<R> {
    /// Wrap an existing grid with no tribes.
    pub fn new(grid: TerrainGrid, config: TribeConfig, rng: R) -> Self {
        Self {
            grid,
            tribes: BTreeMap::new(),
            config,
            rng,
            tick: 0,
        }
    }

    /// The terrain and its occupants.
    pub const fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Mutable terrain access.
    pub const fn grid_mut(&mut self) -> &mut TerrainGrid {
        &mut self.grid
    }

    /// All registered tribes.
    pub const fn tribes(&self) -> &BTreeMap<TribeId, Tribe> {
        &self.tribes
    }

    /// One tribe by id.
    pub fn tribe(&self, id: TribeId) -> Option<&Tribe> {
        self.tribes.get(&id)
    }

    /// Ticks simulated so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Living persons across all tribes.
    pub fn population(&self) -> usize {
        self.tribes.values().map(|t| t.population.len()).sum()
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    /// Register an empty tribe with the next id. Ids start at 1.
    pub fn add_tribe(&mut self, base_hue: f64) -> TribeId {
        let next = self.tribes.keys().next_back().map_or(1, |id| id.0.saturating_add(1));
        let id = TribeId(next);
        self.tribes.insert(id, Tribe::new(id, base_hue));
        id
    }

    /// Put a new person of `tribe_id` on `pos`.
    ///
    /// Returns false when the cell is taken, unwalkable, or the tribe is
    /// unknown.
    pub fn place_person(&mut self, pos: Position, tribe_id: TribeId, role: PersonRole) -> bool {
        let Some(tribe) = self.tribes.get_mut(&tribe_id) else {
            return false;
        };
        let Some(cell) = self.grid.cell_mut(pos) else {
            return false;
        };
        if !cell.is_open() {
            return false;
        }
        cell.occupant = Some(Person::new(PersonId::random(&mut self.rng), tribe_id, role));
        tribe.population.insert(pos);
        true
    }

    /// Found the configured number of tribes. Returns how many settled.
    ///
    /// A tribe that places nobody is discarded.
    pub fn spawn_tribes(&mut self) -> usize {
        let mut settled: usize = 0;
        for index in 0..self.config.initial_tribes {
            let hue = self
                .config
                .hues
                .iter()
                .copied()
                .cycle()
                .nth(index)
                .unwrap_or(0.0);

            let Some(center) = self.settlement_site() else {
                warn!(index, "No fertile land left for tribe");
                continue;
            };

            let id = self.add_tribe(hue);
            let placed = self.populate(id, center);
            if placed == 0 {
                self.tribes.remove(&id);
                warn!(tribe = %id, %center, "Tribe could not settle");
                continue;
            }

            settled = settled.saturating_add(1);
            info!(tribe = %id, %center, hue, population = placed, "Tribe founded");
        }
        settled
    }

    /// Choose a settlement center.
    ///
    /// Scores the neighborhood of a random point first; if nothing there
    /// qualifies, falls back to that point when fertile, then to random
    /// fertile cells anywhere.
    fn settlement_site(&mut self) -> Option<Position> {
        let size = self.grid.size();
        if size == 0 {
            return None;
        }
        let probe = Position::new(self.rng.random_range(0..size), self.rng.random_range(0..size));
        if let Some(site) =
            find_spawn_location(&self.grid, probe, self.config.spawn_radius, &mut self.rng)
        {
            return Some(site);
        }
        if self.is_fertile(probe) {
            return Some(probe);
        }
        for _ in 0..FALLBACK_ATTEMPTS {
            let pos =
                Position::new(self.rng.random_range(0..size), self.rng.random_range(0..size));
            if self.is_fertile(pos) {
                return Some(pos);
            }
        }
        None
    }

    /// Place up to `initial_tribe_size` persons in the 3x3 around `center`.
    fn populate(&mut self, id: TribeId, center: Position) -> usize {
        let size = self.grid.size();
        let mut placed: usize = 0;
        for _ in 0..self.config.initial_tribe_size {
            let dx = self.rng.random_range(-1..=1);
            let dy = self.rng.random_range(-1..=1);
            let pos = center.offset(dx, dy, size);
            if !self.is_fertile(pos) {
                continue;
            }
            let role = self.pick_role(id);
            if self.place_person(pos, id, role) {
                placed = placed.saturating_add(1);
            }
        }
        placed
    }

    fn pick_role(&mut self, id: TribeId) -> PersonRole {
        if !self.config.mixed_roles {
            return PersonRole::Gatherer;
        }
        match self.tribes.get(&id) {
            Some(tribe) => tribe.behavior.pick_role(&mut self.rng),
            None => PersonRole::Gatherer,
        }
    }

    fn is_fertile(&self, pos: Position) -> bool {
        self.grid.terrain(pos).is_some_and(Biome::is_fertile)
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Advance every person by one tick.
    pub fn step(&mut self) {
        for pos in self.grid.positions() {
            self.update_person(pos);
        }
        self.tick = self.tick.saturating_add(1);
    }

    fn update_person(&mut self, pos: Position) {
        let Some(mut person) = self.grid.cell_mut(pos).and_then(|c| c.occupant.take()) else {
            return;
        };
        let tribe_id = person.tribe_id;

        let vitals = apply_vital_tick(
            &mut person,
            self.tribes.get_mut(&tribe_id),
            &self.config.vitals,
        );
        if vitals.died {
            if let Some(tribe) = self.tribes.get_mut(&tribe_id) {
                tribe.population.remove(&pos);
            }
            debug!(person = %person.id, tribe = %tribe_id, %pos, age = person.age, "Person died");
            return;
        }

        let dest = match person.role {
            PersonRole::Gatherer => self.gather(pos, &mut person),
            PersonRole::Warrior | PersonRole::Builder | PersonRole::Explorer => {
                self.random_step(pos)
            }
        };

        if dest != pos
            && let Some(tribe) = self.tribes.get_mut(&tribe_id)
        {
            tribe.relocate(pos, dest);
        }
        if let Some(cell) = self.grid.cell_mut(dest) {
            cell.occupant = Some(person);
        }
    }

    /// Harvest the current cell, else walk toward adjacent resources.
    fn gather(&mut self, pos: Position, person: &mut Person) -> Position {
        let rate = self.config.vitals.gather_rate;
        if let Some(cell) = self.grid.cell_mut(pos)
            && cell.resource_amount > 0
        {
            let harvested = cell.resource_amount.min(rate);
            cell.resource_amount = cell.resource_amount.saturating_sub(harvested);
            if let Some(tribe) = self.tribes.get_mut(&person.tribe_id) {
                tribe.deposit(ResourceKind::Food, harvested);
            }
            person.hunger = (person.hunger - self.config.vitals.gather_relief).max(0.0);
            return pos;
        }

        let size = self.grid.size();
        let nearby = pos.neighbors(size).find(|&n| {
            self.grid
                .cell(n)
                .is_some_and(|c| c.resource_amount > 0 && c.is_open())
        });
        match nearby {
            Some(next) => next,
            None => self.random_step(pos),
        }
    }

    /// Pick a random free neighbor, preferring resources or fertile land.
    fn random_step(&mut self, pos: Position) -> Position {
        let size = self.grid.size();
        let mut offsets = NEIGHBOR_OFFSETS;
        offsets.shuffle(&mut self.rng);

        let open: Vec<Position> = offsets
            .iter()
            .map(|&(dx, dy)| pos.offset(dx, dy, size))
            .filter(|&n| self.grid.cell(n).is_some_and(|c| c.is_open()))
            .collect();

        open.iter()
            .find(|&&n| {
                self.grid
                    .cell(n)
                    .is_some_and(|c| c.resource_amount > 0 || c.terrain.is_fertile())
            })
            .or_else(|| open.first())
            .copied()
            .unwrap_or(pos)
    }

    /// Log population and stockpiles of every tribe.
    pub fn log_status(&self) {
        info!(
            tick = self.tick,
            tribes = self.tribes.len(),
            population = self.population(),
            "Tribal world status"
        );
        for tribe in self.tribes.values() {
            info!(
                tribe = %tribe.id,
                population = tribe.population.len(),
                food = tribe.stock(ResourceKind::Food),
                wood = tribe.stock(ResourceKind::Wood),
                stone = tribe.stock(ResourceKind::Stone),
                iron = tribe.stock(ResourceKind::Iron),
                "Tribe status"
            );
        }
    }
}
