//! Full runs of both simulations against the in-memory sink.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use pixoo_core::{
    MemorySink, OperatorState, RunOptions, SimulationEndReason, run_simulation,
};
use pixoo_life::{LifeEngine, LifeParams};
use pixoo_tribes::{TribalWorld, TribeConfig};
use pixoo_types::{GRID_SIZE, Rgb};
use pixoo_world::TerrainParams;

fn options() -> RunOptions {
    RunOptions {
        handshake_pause: Duration::ZERO,
        status_interval_ticks: 5,
    }
}

#[tokio::test]
async fn life_run_pushes_one_frame_per_tick() {
    let mut engine = LifeEngine::seeded(LifeParams::default(), 11);
    let mut sink = MemorySink::new(GRID_SIZE).with_history();
    let operator = Arc::new(OperatorState::new(0, 12));

    let result = run_simulation(&mut engine, &mut sink, &operator, options())
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 12);
    assert_eq!(engine.generation(), 12);
    assert_eq!(sink.history().len(), 13);
    assert!(sink.history()[0].as_bytes().iter().all(|&b| b == 0));
}

#[tokio::test]
async fn tribal_run_draws_terrain_everywhere() {
    let mut world =
        TribalWorld::generate(&TerrainParams::default(), TribeConfig::default(), 3).unwrap();
    let mut sink = MemorySink::new(GRID_SIZE);
    let operator = Arc::new(OperatorState::new(0, 4));

    let result = run_simulation(&mut world, &mut sink, &operator, options())
        .await
        .unwrap();

    assert_eq!(result.total_ticks, 4);
    assert_eq!(world.tick(), 4);
    // Every biome color and the resource highlight are non-black.
    let frame = sink.frame();
    for x in 0..64 {
        for y in 0..64 {
            assert_ne!(frame.get(x, y), Some(Rgb::BLACK));
        }
    }
}

#[tokio::test]
async fn seeded_runs_render_identical_frames() {
    async fn last_frame(seed: u64) -> Vec<u8> {
        let mut engine = LifeEngine::seeded(LifeParams::default(), seed);
        let mut sink = MemorySink::new(GRID_SIZE);
        let operator = Arc::new(OperatorState::new(0, 8));
        run_simulation(&mut engine, &mut sink, &operator, options())
            .await
            .unwrap();
        sink.frame().as_bytes().to_vec()
    }

    assert_eq!(last_frame(21).await, last_frame(21).await);
}
