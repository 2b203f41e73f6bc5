//! Configuration loading and typed config structures.
//!
//! The configuration lives in `pixoo-config.yaml` in the working directory.
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a runnable life simulation rendered headless.

use std::path::Path;

use pixoo_life::LifeParams;
use pixoo_tribes::TribeConfig;
use pixoo_world::TerrainParams;
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `pixoo-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Which simulation runs and how fast.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Terrain generation (tribal mode).
    #[serde(default)]
    pub world: TerrainParams,

    /// Cellular automaton parameters (life mode).
    #[serde(default)]
    pub life: LifeParams,

    /// Tribe parameters (tribal mode).
    #[serde(default)]
    pub tribes: TribeConfig,

    /// Output target.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `PIXOO_ADDRESS` overrides `display.address`
    /// - `PIXOO_SEED` overrides `simulation.seed` (ignored unless numeric)
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string as written.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override fields with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("PIXOO_ADDRESS").ok(),
            std::env::var("PIXOO_SEED").ok(),
        );
    }

    fn apply_overrides(&mut self, address: Option<String>, seed: Option<String>) {
        if let Some(address) = address {
            self.display.address = address;
        }
        if let Some(seed) = seed.and_then(|s| s.trim().parse().ok()) {
            self.simulation.seed = Some(seed);
        }
    }
}

/// The simulation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Evolving cellular automaton.
    #[default]
    Life,
    /// Tribes on generated terrain.
    Tribal,
}

/// Run-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Which simulation runs (default: life).
    #[serde(default)]
    pub mode: SimulationMode,

    /// Seed for every random stream. A random seed is drawn and logged
    /// when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Milliseconds slept after each pushed frame (default: 300).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks; 0 runs until interrupted (default: 0).
    #[serde(default)]
    pub max_ticks: u64,

    /// Log simulation status every N ticks; 0 disables (default: 20).
    #[serde(default = "default_status_interval_ticks")]
    pub status_interval_ticks: u64,
}

const fn default_tick_interval_ms() -> u64 {
    300
}

const fn default_status_interval_ticks() -> u64 {
    20
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::default(),
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            status_interval_ticks: default_status_interval_ticks(),
        }
    }
}

/// Where frames go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTarget {
    /// A physical device on the local network.
    Device,
    /// The web simulator.
    Simulator,
    /// An in-memory frame buffer only.
    #[default]
    Headless,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output target (default: headless).
    #[serde(default)]
    pub target: DisplayTarget,

    /// Device IPv4 address, or simulator `host:port`
    /// (default: `localhost:3000`).
    #[serde(default = "default_address")]
    pub address: String,

    /// Pushes after which the device picture counter is reset
    /// (default: 32).
    #[serde(default = "default_refresh_counter_limit")]
    pub refresh_counter_limit: u32,

    /// Device brightness in `[0, 100]` set at startup, if any.
    #[serde(default)]
    pub brightness: Option<u8>,

    /// HTTP request timeout in milliseconds (default: 5000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_address() -> String {
    String::from("localhost:3000")
}

const fn default_refresh_counter_limit() -> u32 {
    32
}

const fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target: DisplayTarget::default(),
            address: default_address(),
            refresh_counter_limit: default_refresh_counter_limit(),
            brightness: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output (default: false).
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    String::from("info")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pixoo_world::ContinentShape;

    use super::*;

    #[test]
    fn default_config_is_headless_life() {
        let config = SimulationConfig::default();
        assert_eq!(config.simulation.mode, SimulationMode::Life);
        assert_eq!(config.simulation.tick_interval_ms, 300);
        assert_eq!(config.display.target, DisplayTarget::Headless);
        assert_eq!(config.display.refresh_counter_limit, 32);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  mode: tribal
  seed: 99
  tick_interval_ms: 100
  max_ticks: 500
  status_interval_ticks: 10

world:
  size: 32
  river_count: 4
  continent_shape: island
  resource_nodes: true

life:
  initial_colonies: 6

tribes:
  initial_tribes: 2
  mixed_roles: true
  vitals:
    hunger_rate: 0.1

display:
  target: device
  address: "192.168.1.40"
  brightness: 80

logging:
  level: "debug"
  json: true
"#;
        let config = SimulationConfig::parse_without_env(yaml).unwrap();
        assert_eq!(config.simulation.mode, SimulationMode::Tribal);
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.simulation.max_ticks, 500);
        assert_eq!(config.world.size, 32);
        assert_eq!(config.world.continent_shape, ContinentShape::Island);
        assert!(config.world.resource_nodes);
        assert_eq!(config.life.initial_colonies, 6);
        assert_eq!(config.life.max_colonies, 8);
        assert_eq!(config.tribes.initial_tribes, 2);
        assert!(config.tribes.mixed_roles);
        assert_eq!(config.tribes.initial_tribe_size, 10);
        assert_eq!(config.display.target, DisplayTarget::Device);
        assert_eq!(config.display.address, "192.168.1.40");
        assert_eq!(config.display.brightness, Some(80));
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse_without_env("simulation:\n  seed: 7\n").unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.status_interval_ticks, 20);
        assert_eq!(config.world, TerrainParams::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse_without_env("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = SimulationConfig::parse_without_env("simulation: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_address_and_numeric_seed() {
        let mut config = SimulationConfig::default();
        config.apply_overrides(Some(String::from("10.0.0.5")), Some(String::from(" 42 ")));
        assert_eq!(config.display.address, "10.0.0.5");
        assert_eq!(config.simulation.seed, Some(42));

        config.apply_overrides(None, Some(String::from("not-a-number")));
        assert_eq!(config.simulation.seed, Some(42));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("pixoo-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
