//! Tribes: shared stockpiles, a display hue, and member positions.

use std::collections::{BTreeMap, BTreeSet};

use pixoo_types::{PersonRole, Position, ResourceKind, TribeId};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Starting stock of every new tribe.
pub const STARTING_RESOURCES: [(ResourceKind, u32); 4] = [
    (ResourceKind::Food, 500),
    (ResourceKind::Wood, 200),
    (ResourceKind::Stone, 100),
    (ResourceKind::Iron, 50),
];

/// Weight of the builder role when roles are drawn from behavior.
const BUILDER_WEIGHT: f64 = 0.1;

/// Behavioral tendencies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    /// Likelihood of fighting.
    pub aggressiveness: f64,
    /// Likelihood of wandering far.
    pub exploration: f64,
    /// Focus on resource gathering.
    pub gathering: f64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            aggressiveness: 0.2,
            exploration: 0.5,
            gathering: 0.8,
        }
    }
}

impl Behavior {
    /// Draw a role weighted by these tendencies.
    ///
    /// Gathering weighs gatherers, aggressiveness warriors, exploration
    /// explorers; builders carry a small fixed weight.
    pub fn pick_role(&self, rng: &mut impl Rng) -> PersonRole {
        let weighted = [
            (PersonRole::Gatherer, self.gathering),
            (PersonRole::Warrior, self.aggressiveness),
            (PersonRole::Explorer, self.exploration),
            (PersonRole::Builder, BUILDER_WEIGHT),
        ];
        weighted
            .choose_weighted(rng, |&(_, weight)| weight.max(0.0))
            .map_or(PersonRole::Gatherer, |&(role, _)| role)
    }
}

/// A tribe and its stockpile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tribe {
    /// Identifier, numbered from 1.
    pub id: TribeId,
    /// Hue used to draw members.
    pub base_hue: f64,
    /// Positions of living members.
    pub population: BTreeSet<Position>,
    /// Stockpiled resources.
    pub resources: BTreeMap<ResourceKind, u32>,
    /// Behavioral tendencies.
    pub behavior: Behavior,
}

impl Tribe {
    /// Create an empty tribe with the starting stockpile.
    pub fn new(id: TribeId, base_hue: f64) -> Self {
        Self {
            id,
            base_hue,
            population: BTreeSet::new(),
            resources: STARTING_RESOURCES.into_iter().collect(),
            behavior: Behavior::default(),
        }
    }

    /// Current amount of `kind`.
    pub fn stock(&self, kind: ResourceKind) -> u32 {
        self.resources.get(&kind).copied().unwrap_or(0)
    }

    /// Current food stock.
    pub fn food(&self) -> u32 {
        self.stock(ResourceKind::Food)
    }

    /// Add `amount` of `kind` to the stockpile.
    pub fn deposit(&mut self, kind: ResourceKind, amount: u32) {
        let entry = self.resources.entry(kind).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Remove one unit of food. Returns false if there was none.
    pub fn consume_food(&mut self) -> bool {
        match self.resources.get_mut(&ResourceKind::Food) {
            Some(food) if *food > 0 => {
                *food = food.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Record a member moving between cells.
    pub fn relocate(&mut self, from: Position, to: Position) {
        self.population.remove(&from);
        self.population.insert(to);
    }
}
