//! Records stored on terrain cells.

use serde::{Deserialize, Serialize};

use crate::enums::{Biome, PersonRole, ResourceKind, StructureKind};
use crate::ids::{PersonId, TribeId};

/// Maximum value of the health and hunger stats.
pub const STAT_MAX: u32 = 100;

/// A member of a tribe, standing on exactly one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Identity.
    pub id: PersonId,
    /// The tribe this person belongs to.
    pub tribe_id: TribeId,
    /// Current job.
    pub role: PersonRole,
    /// Health in `[0, 100]`. The person dies at 0.
    pub health: u32,
    /// Hunger in `[0, 100]`. Grows by a fractional rate each tick.
    pub hunger: f32,
    /// Ticks lived.
    pub age: u64,
    /// Resource in hand, if any.
    pub carrying: Option<ResourceKind>,
}

impl Person {
    /// Create a healthy, fed person.
    pub const fn new(id: PersonId, tribe_id: TribeId, role: PersonRole) -> Self {
        Self {
            id,
            tribe_id,
            role,
            health: STAT_MAX,
            hunger: 0.0,
            age: 0,
            carrying: None,
        }
    }

    /// Whether health has been depleted.
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// A building owned by a tribe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// What was built.
    pub kind: StructureKind,
    /// Owning tribe.
    pub tribe_id: TribeId,
    /// Remaining durability.
    pub health: u32,
}

/// One coordinate of the terrain world.
///
/// `terrain` and `resource_amount` are fixed at generation (harvesting
/// drains `resource_amount`); `occupant` and `structure` change every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Biome classification.
    pub terrain: Biome,
    /// The person standing here, if any.
    pub occupant: Option<Person>,
    /// Harvestable resource units.
    pub resource_amount: u32,
    /// The structure built here, if any.
    pub structure: Option<Structure>,
}

impl Cell {
    /// Create an unoccupied cell.
    pub const fn new(terrain: Biome, resource_amount: u32) -> Self {
        Self {
            terrain,
            occupant: None,
            resource_amount,
            structure: None,
        }
    }

    /// Whether a person could move onto this cell right now.
    pub const fn is_open(&self) -> bool {
        self.occupant.is_none() && self.terrain.is_walkable()
    }
}
