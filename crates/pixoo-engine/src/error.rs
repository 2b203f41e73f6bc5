//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the simulation run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: pixoo_core::ConfigError,
    },

    /// Building the tribal world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying tribe error.
        #[from]
        source: pixoo_tribes::TribeError,
    },

    /// The display sink could not be set up.
    #[error("display error: {source}")]
    Display {
        /// The underlying display error.
        #[from]
        source: pixoo_core::DisplayError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: pixoo_core::RunnerError,
    },
}
