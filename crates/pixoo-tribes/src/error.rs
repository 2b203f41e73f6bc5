//! Error types for the `pixoo-tribes` crate.

use pixoo_world::WorldError;

/// Errors that can occur while building a tribal world.
#[derive(Debug, thiserror::Error)]
pub enum TribeError {
    /// Terrain generation failed.
    #[error("terrain generation failed: {source}")]
    World {
        /// The underlying terrain error.
        #[from]
        source: WorldError,
    },
}
