//! Biome classification and resource seeding.

use pixoo_types::Biome;
use rand::Rng;

/// Heights below this are water.
pub const SEA_LEVEL: f64 = 0.3;

/// Heights above this are mountains.
pub const MOUNTAIN_LEVEL: f64 = 0.88;

/// Classify a cell from its smoothed height, temperature, and moisture.
///
/// Precedence: water, mountain, cold band, hot band, temperate band.
pub const fn classify(height: f64, temperature: f64, moisture: f64) -> Biome {
    if height < SEA_LEVEL {
        return Biome::Water;
    }
    if height > MOUNTAIN_LEVEL {
        return Biome::Mountain;
    }

    if temperature < 0.25 {
        return if moisture > 0.5 { Biome::Taiga } else { Biome::Tundra };
    }

    if temperature > 0.65 {
        return if moisture < 0.2 {
            Biome::Desert
        } else if moisture > 0.5 {
            Biome::Forest
        } else {
            Biome::Plains
        };
    }

    if moisture > 0.6 {
        Biome::Forest
    } else if moisture > 0.3 {
        Biome::Plains
    } else {
        Biome::Desert
    }
}

/// Roll the starting food resources for a freshly classified cell.
pub fn roll_resources(biome: Biome, rng: &mut impl Rng) -> u32 {
    let (chance, low, high) = match biome {
        Biome::Plains => (0.4, 20, 49),
        Biome::Forest => (0.6, 25, 64),
        Biome::Taiga => (0.3, 15, 39),
        _ => return 0,
    };
    if rng.random::<f64>() < chance {
        rng.random_range(low..=high)
    } else {
        0
    }
}

/// Chance that a cell of `biome` becomes a resource node.
const fn node_chance(biome: Biome) -> f64 {
    match biome {
        Biome::Forest | Biome::Mountain | Biome::Taiga => 0.08,
        Biome::Plains | Biome::Tundra => 0.03,
        Biome::Desert => 0.01,
        _ => 0.0,
    }
}

/// Possibly convert a cell into a resource node.
///
/// Returns the new terrain and resource amount (50..=99 for nodes).
pub fn roll_resource_node(biome: Biome, amount: u32, rng: &mut impl Rng) -> (Biome, u32) {
    let chance = node_chance(biome);
    if chance > 0.0 && rng.random::<f64>() < chance {
        (Biome::ResourceNode, rng.random_range(50..=99))
    } else {
        (biome, amount)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn low_height_is_water_regardless_of_climate() {
        assert_eq!(classify(0.29, 0.9, 0.9), Biome::Water);
        assert_eq!(classify(0.0, 0.0, 0.0), Biome::Water);
    }

    #[test]
    fn high_height_is_mountain() {
        assert_eq!(classify(0.95, 0.5, 0.5), Biome::Mountain);
    }

    #[test]
    fn cold_band() {
        assert_eq!(classify(0.5, 0.1, 0.6), Biome::Taiga);
        assert_eq!(classify(0.5, 0.1, 0.4), Biome::Tundra);
    }

    #[test]
    fn hot_band() {
        assert_eq!(classify(0.5, 0.8, 0.1), Biome::Desert);
        assert_eq!(classify(0.5, 0.8, 0.6), Biome::Forest);
        assert_eq!(classify(0.5, 0.8, 0.3), Biome::Plains);
    }

    #[test]
    fn temperate_band() {
        assert_eq!(classify(0.5, 0.5, 0.7), Biome::Forest);
        assert_eq!(classify(0.5, 0.5, 0.4), Biome::Plains);
        assert_eq!(classify(0.5, 0.5, 0.2), Biome::Desert);
    }

    #[test]
    fn resource_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let plains = roll_resources(Biome::Plains, &mut rng);
            assert!(plains == 0 || (20..=49).contains(&plains));
            let forest = roll_resources(Biome::Forest, &mut rng);
            assert!(forest == 0 || (25..=64).contains(&forest));
            let taiga = roll_resources(Biome::Taiga, &mut rng);
            assert!(taiga == 0 || (15..=39).contains(&taiga));
            assert_eq!(roll_resources(Biome::Desert, &mut rng), 0);
            assert_eq!(roll_resources(Biome::Water, &mut rng), 0);
        }
    }

    #[test]
    fn water_never_becomes_a_node() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..500 {
            assert_eq!(roll_resource_node(Biome::Water, 0, &mut rng), (Biome::Water, 0));
        }
    }

    #[test]
    fn nodes_carry_large_deposits() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut seen = 0;
        for _ in 0..2000 {
            if let (Biome::ResourceNode, amount) = roll_resource_node(Biome::Forest, 10, &mut rng) {
                assert!((50..=99).contains(&amount));
                seen += 1;
            }
        }
        assert!(seen > 0);
    }
}
