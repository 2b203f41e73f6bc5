//! Error types for the `pixoo-world` crate.

/// Errors that can occur while building a terrain grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The requested grid has no cells.
    #[error("terrain size must be positive, got {0}")]
    InvalidSize(usize),

    /// A cell vector does not match the grid dimensions.
    #[error("expected {expected} cells, got {actual}")]
    CellCountMismatch {
        /// `size * size`.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
}
