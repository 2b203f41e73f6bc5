//! Whole-world runs on generated terrain.

#![allow(clippy::unwrap_used)]

use pixoo_tribes::{TribalWorld, TribeConfig};
use pixoo_world::TerrainParams;

#[test]
fn seeded_worlds_evolve_identically() {
    let params = TerrainParams::default();
    let mut a = TribalWorld::generate(&params, TribeConfig::default(), 2024).unwrap();
    let mut b = TribalWorld::generate(&params, TribeConfig::default(), 2024).unwrap();
    for _ in 0..25 {
        a.step();
        b.step();
    }
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.tribes(), b.tribes());
}

#[test]
fn settlers_stand_where_their_tribe_says() {
    let params = TerrainParams::default();
    let mut world = TribalWorld::generate(&params, TribeConfig::default(), 77).unwrap();
    assert!(world.tribes().len() <= 3);
    for tribe in world.tribes().values() {
        for &pos in &tribe.population {
            let cell = world.grid().cell(pos).unwrap();
            assert!(cell.terrain.is_fertile());
            assert_eq!(cell.occupant.as_ref().unwrap().tribe_id, tribe.id);
        }
    }

    for _ in 0..10 {
        world.step();
    }
    let occupied = world
        .grid()
        .positions()
        .filter(|&p| world.grid().cell(p).unwrap().occupant.is_some())
        .count();
    assert_eq!(occupied, world.population());
}

#[test]
fn hues_cycle_through_configured_list() {
    let params = TerrainParams::default();
    let config = TribeConfig {
        hues: vec![42.0],
        ..TribeConfig::default()
    };
    let world = TribalWorld::generate(&params, config, 5).unwrap();
    assert!(
        world
            .tribes()
            .values()
            .all(|t| (t.base_hue - 42.0).abs() < f64::EPSILON)
    );
}
