//! Tunables for tribe setup and per-person vitals.
//!
//! [`TribeConfig`] is deserialized from the `tribes` section of
//! `pixoo-config.yaml`; every field has a default so a partial section is
//! enough.

use serde::{Deserialize, Serialize};

/// Per-tick vital mechanics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// Hunger added per tick (default: 0.02).
    #[serde(default = "default_hunger_rate")]
    pub hunger_rate: f32,

    /// Hunger above which health drains (default: 95).
    #[serde(default = "default_starvation_threshold")]
    pub starvation_threshold: f32,

    /// Health lost per starving tick (default: 1).
    #[serde(default = "default_starvation_damage")]
    pub starvation_damage: u32,

    /// Hunger below which health regenerates (default: 70).
    #[serde(default = "default_heal_hunger_threshold")]
    pub heal_hunger_threshold: f32,

    /// Health regained per fed tick (default: 1).
    #[serde(default = "default_natural_heal_rate")]
    pub natural_heal_rate: u32,

    /// Hunger above which a person eats from tribe stock (default: 20).
    #[serde(default = "default_eat_threshold")]
    pub eat_threshold: f32,

    /// Hunger removed by one meal (default: 30).
    #[serde(default = "default_meal_relief")]
    pub meal_relief: f32,

    /// Resource units harvested per gathering tick (default: 5).
    #[serde(default = "default_gather_rate")]
    pub gather_rate: u32,

    /// Hunger removed as a reward for gathering (default: 5).
    #[serde(default = "default_gather_relief")]
    pub gather_relief: f32,
}

const fn default_hunger_rate() -> f32 {
    0.02
}

const fn default_starvation_threshold() -> f32 {
    95.0
}

const fn default_starvation_damage() -> u32 {
    1
}

const fn default_heal_hunger_threshold() -> f32 {
    70.0
}

const fn default_natural_heal_rate() -> u32 {
    1
}

const fn default_eat_threshold() -> f32 {
    20.0
}

const fn default_meal_relief() -> f32 {
    30.0
}

const fn default_gather_rate() -> u32 {
    5
}

const fn default_gather_relief() -> f32 {
    5.0
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            hunger_rate: default_hunger_rate(),
            starvation_threshold: default_starvation_threshold(),
            starvation_damage: default_starvation_damage(),
            heal_hunger_threshold: default_heal_hunger_threshold(),
            natural_heal_rate: default_natural_heal_rate(),
            eat_threshold: default_eat_threshold(),
            meal_relief: default_meal_relief(),
            gather_rate: default_gather_rate(),
            gather_relief: default_gather_relief(),
        }
    }
}

/// Tribe creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribeConfig {
    /// Number of tribes attempted at startup (default: 3).
    #[serde(default = "default_initial_tribes")]
    pub initial_tribes: usize,

    /// Placement attempts per tribe (default: 10).
    #[serde(default = "default_initial_tribe_size")]
    pub initial_tribe_size: usize,

    /// Tribe hues, assigned in order and reused cyclically
    /// (default: 180, 300, 260, 30).
    #[serde(default = "default_hues")]
    pub hues: Vec<f64>,

    /// Search radius around a random point when choosing a settlement
    /// (default: 8).
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: usize,

    /// Draw roles from each tribe's behavior weights instead of making
    /// everyone a gatherer (default: false).
    #[serde(default)]
    pub mixed_roles: bool,

    /// Vital mechanics.
    #[serde(default)]
    pub vitals: VitalsConfig,
}

const fn default_initial_tribes() -> usize {
    3
}

const fn default_initial_tribe_size() -> usize {
    10
}

fn default_hues() -> Vec<f64> {
    vec![180.0, 300.0, 260.0, 30.0]
}

const fn default_spawn_radius() -> usize {
    8
}

impl Default for TribeConfig {
    fn default() -> Self {
        Self {
            initial_tribes: default_initial_tribes(),
            initial_tribe_size: default_initial_tribe_size(),
            hues: default_hues(),
            spawn_radius: default_spawn_radius(),
            mixed_roles: false,
            vitals: VitalsConfig::default(),
        }
    }
}
