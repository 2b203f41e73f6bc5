//! Vital mechanics applied to persons each tick.
//!
//! # Order of operations
//!
//! 1. Hunger rises by `hunger_rate`, capped at 100
//! 2. Health drops by `starvation_damage` above the starvation threshold,
//!    otherwise rises by `natural_heal_rate` (capped at 100) below the heal
//!    threshold
//! 3. Age increments by 1
//! 4. A hungry person eats one unit of tribe food if any is left
//!
//! Death is not decided here; the caller removes persons whose health hit 0.

use pixoo_types::{Person, STAT_MAX};

use crate::config::VitalsConfig;
use crate::tribe::Tribe;

/// Upper bound of hunger.
#[allow(clippy::cast_precision_loss)]
const HUNGER_MAX: f32 = STAT_MAX as f32;

/// Outcome of one vital tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalTickResult {
    /// Whether the person ate from the tribe stockpile.
    pub ate: bool,
    /// Whether health reached zero.
    pub died: bool,
}

/// Apply one tick of vital mechanics to `person`, drawing food from `tribe`.
///
/// `tribe` is `None` when the person's tribe no longer exists; they then
/// simply cannot eat.
pub fn apply_vital_tick(
    person: &mut Person,
    tribe: Option<&mut Tribe>,
    config: &VitalsConfig,
) -> VitalTickResult {
    // 1. Hunger
    person.hunger = (person.hunger + config.hunger_rate).min(HUNGER_MAX);

    // 2. Health
    if person.hunger > config.starvation_threshold {
        person.health = person.health.saturating_sub(config.starvation_damage);
    } else if person.hunger < config.heal_hunger_threshold {
        person.health = person
            .health
            .saturating_add(config.natural_heal_rate)
            .min(STAT_MAX);
    }

    // 3. Age
    person.age = person.age.saturating_add(1);

    // 4. Eat
    let ate = person.hunger > config.eat_threshold
        && tribe.is_some_and(Tribe::consume_food);
    if ate {
        person.hunger = (person.hunger - config.meal_relief).max(0.0);
    }

    VitalTickResult {
        ate,
        died: person.is_dead(),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use pixoo_types::{PersonId, PersonRole, ResourceKind, TribeId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn person_with(hunger: f32, health: u32) -> Person {
        let id = PersonId::random(&mut StdRng::seed_from_u64(0));
        let mut person = Person::new(id, TribeId(1), PersonRole::Gatherer);
        person.hunger = hunger;
        person.health = health;
        person
    }

    fn tribe_with_food(food: u32) -> Tribe {
        let mut tribe = Tribe::new(TribeId(1), 180.0);
        tribe.resources.insert(ResourceKind::Food, food);
        tribe
    }

    #[test]
    fn starving_person_without_food_loses_one_health() {
        let mut person = person_with(96.0, 50);
        let mut tribe = tribe_with_food(0);
        let result = apply_vital_tick(&mut person, Some(&mut tribe), &VitalsConfig::default());
        assert_eq!(person.health, 49);
        assert!(!result.ate);
        assert!(!result.died);
        assert_eq!(person.age, 1);
    }

    #[test]
    fn hungry_person_eats_one_unit() {
        let mut person = person_with(30.0, 100);
        let mut tribe = tribe_with_food(10);
        let result = apply_vital_tick(&mut person, Some(&mut tribe), &VitalsConfig::default());
        assert!(result.ate);
        assert_eq!(tribe.food(), 9);
        assert!(person.hunger < 30.0);
        assert!(person.hunger >= 0.0);
    }

    #[test]
    fn sated_person_does_not_eat() {
        let mut person = person_with(10.0, 100);
        let mut tribe = tribe_with_food(10);
        let result = apply_vital_tick(&mut person, Some(&mut tribe), &VitalsConfig::default());
        assert!(!result.ate);
        assert_eq!(tribe.food(), 10);
        assert!(person.hunger > 10.0);
    }

    #[test]
    fn fed_person_heals_up_to_cap() {
        let mut person = person_with(0.0, 99);
        apply_vital_tick(&mut person, None, &VitalsConfig::default());
        assert_eq!(person.health, 100);
        apply_vital_tick(&mut person, None, &VitalsConfig::default());
        assert_eq!(person.health, 100);
    }

    #[test]
    fn hunger_is_capped() {
        let mut person = person_with(99.99, 100);
        apply_vital_tick(&mut person, None, &VitalsConfig::default());
        assert_eq!(person.hunger, 100.0);
    }

    #[test]
    fn last_health_point_reports_death() {
        let mut person = person_with(99.0, 1);
        let result = apply_vital_tick(&mut person, None, &VitalsConfig::default());
        assert!(result.died);
        assert_eq!(person.health, 0);
    }
}
