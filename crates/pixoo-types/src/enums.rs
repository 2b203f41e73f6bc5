//! Enumeration types shared across the simulations.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Terrain classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Oceans, lakes, and carved rivers.
    Water,
    /// Temperate grassland.
    Plains,
    /// Dense woodland.
    Forest,
    /// Hot or dry barren land.
    Desert,
    /// High elevation rock.
    Mountain,
    /// Permanent snow. Blocks movement.
    SnowCap,
    /// A concentrated deposit of resources.
    ResourceNode,
    /// Cold, wet conifer forest.
    Taiga,
    /// Cold, dry steppe.
    Tundra,
}

impl Biome {
    /// All biome variants.
    pub const ALL: [Self; 9] = [
        Self::Water,
        Self::Plains,
        Self::Forest,
        Self::Desert,
        Self::Mountain,
        Self::SnowCap,
        Self::ResourceNode,
        Self::Taiga,
        Self::Tundra,
    ];

    /// Display color used when rendering the terrain map.
    pub const fn color(self) -> Rgb {
        match self {
            Self::Water => Rgb(48, 128, 255),
            Self::Plains => Rgb(126, 200, 80),
            Self::Forest => Rgb(38, 160, 49),
            Self::Desert => Rgb(255, 198, 91),
            Self::Mountain => Rgb(142, 129, 115),
            Self::SnowCap => Rgb(255, 255, 255),
            Self::ResourceNode => Rgb(255, 215, 0),
            Self::Taiga => Rgb(56, 125, 52),
            Self::Tundra => Rgb(134, 169, 83),
        }
    }

    /// Whether persons can stand on this terrain.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Water | Self::Mountain | Self::SnowCap)
    }

    /// Whether this terrain is preferred when wandering or settling.
    pub const fn is_fertile(self) -> bool {
        matches!(self, Self::Plains | Self::Forest)
    }
}

// ---------------------------------------------------------------------------
// Tribes
// ---------------------------------------------------------------------------

/// The job a person performs each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    /// Harvests resources into the tribe's food stock.
    Gatherer,
    /// Fighter. Currently only wanders.
    Warrior,
    /// Constructs structures. Currently only wanders.
    Builder,
    /// Scout. Currently only wanders.
    Explorer,
}

/// A stockpiled resource owned by a tribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Eaten by members to reduce hunger.
    Food,
    /// Lumber.
    Wood,
    /// Quarried stone.
    Stone,
    /// Smelted iron.
    Iron,
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Food => "food",
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Iron => "iron",
        };
        f.write_str(name)
    }
}

/// Kinds of structure a tribe can own on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Dwelling.
    Hut,
    /// Food production.
    Farm,
    /// Resource storage.
    Storehouse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_terrain() {
        let blocked: Vec<Biome> = Biome::ALL
            .into_iter()
            .filter(|b| !b.is_walkable())
            .collect();
        assert_eq!(blocked, vec![Biome::Water, Biome::Mountain, Biome::SnowCap]);
    }

    #[test]
    fn biome_serializes_snake_case() {
        let json = serde_json::to_string(&Biome::ResourceNode).unwrap_or_default();
        assert_eq!(json, "\"resource_node\"");
    }
}
