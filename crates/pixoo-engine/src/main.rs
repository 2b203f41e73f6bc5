//! Engine binary for the Pixoo simulations.
//!
//! Loads configuration, sets up logging and the display sink, builds the
//! selected simulation, and runs the tick loop until Ctrl+C, a tick limit,
//! or a display failure ends it.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pixoo-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Resolve the seed (random and logged if not configured)
//! 4. Create operator state and install the Ctrl+C handler
//! 5. Connect the display sink
//! 6. Build the simulation for the configured mode
//! 7. Run the simulation loop
//! 8. Log the result

mod device;
mod error;
mod simulator;
mod sink;

use std::path::Path;
use std::sync::Arc;

use pixoo_core::{
    LoggingConfig, OperatorState, RunOptions, Simulation, SimulationConfig, SimulationMode,
    SimulationResult, log_simulation_end, run_simulation,
};
use pixoo_life::LifeEngine;
use pixoo_tribes::TribalWorld;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::sink::EngineSink;

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "pixoo-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the handshake with the
/// display fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("pixoo-engine starting");
    info!(
        mode = ?config.simulation.mode,
        target = ?config.display.target,
        tick_interval_ms = config.simulation.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    // 3. Resolve the seed.
    let seed = resolve_seed(config.simulation.seed);

    // 4. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.simulation.tick_interval_ms,
        config.simulation.max_ticks,
    ));
    spawn_interrupt_handler(Arc::clone(&operator));

    // 5. Connect the display sink.
    let mut sink = EngineSink::connect(&config.display, grid_size(&config))
        .await
        .map_err(EngineError::from)?;
    info!(sink = sink.name(), address = %config.display.address, "Display sink connected");

    let options = RunOptions {
        status_interval_ticks: config.simulation.status_interval_ticks,
        ..RunOptions::default()
    };

    // 6-7. Build the simulation and run it.
    let result = match config.simulation.mode {
        SimulationMode::Life => {
            let mut engine = LifeEngine::seeded(config.life.clone(), seed);
            info!(
                size = config.life.size,
                colonies = engine.colonies().len(),
                "Life simulation seeded"
            );
            run(&mut engine, &mut sink, &operator, options).await?
        }
        SimulationMode::Tribal => {
            let mut world = TribalWorld::generate(&config.world, config.tribes.clone(), seed)
                .map_err(EngineError::from)?;
            info!(
                size = config.world.size,
                tribes = world.tribes().len(),
                population = world.population(),
                "Tribal world initialized"
            );
            if world.tribes().is_empty() {
                warn!("No tribe could settle; only terrain will be shown");
            }
            run(&mut world, &mut sink, &operator, options).await?
        }
    };

    // 8. Log results.
    log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "pixoo-engine shutdown complete"
    );

    Ok(())
}

async fn run<S: Simulation>(
    simulation: &mut S,
    sink: &mut EngineSink,
    operator: &Arc<OperatorState>,
    options: RunOptions,
) -> Result<SimulationResult, EngineError> {
    info!(simulation = simulation.name(), "Entering tick loop");
    Ok(run_simulation(simulation, sink, operator, options).await?)
}

/// Load the configuration from `pixoo-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// Environment overrides apply either way.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

fn resolve_seed(configured: Option<u64>) -> u64 {
    match configured {
        Some(seed) => {
            info!(seed, "Using configured seed");
            seed
        }
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "No seed configured, drew a random one");
            seed
        }
    }
}

const fn grid_size(config: &SimulationConfig) -> usize {
    match config.simulation.mode {
        SimulationMode::Life => config.life.size,
        SimulationMode::Tribal => config.world.size,
    }
}

/// Stop the loop after the current tick on Ctrl+C.
fn spawn_interrupt_handler(operator: Arc<OperatorState>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after the current tick");
                operator.request_stop();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });
}
