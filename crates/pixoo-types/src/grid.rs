//! Toroidal grid coordinates.
//!
//! Every simulation grid wraps at its edges. All neighbor arithmetic goes
//! through [`wrap`] or [`Position::offset`], which use Euclidean remainder so
//! negative offsets land on the opposite edge instead of underflowing.

use serde::{Deserialize, Serialize};

/// The eight neighbor offsets in scan order (`dx` outer, `dy` inner).
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A coordinate on a square toroidal grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Position {
    /// Create a position.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Return the position shifted by `(dx, dy)`, wrapped onto a grid of
    /// edge length `size`.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn offset(self, dx: i64, dy: i64, size: usize) -> Self {
        Self {
            x: wrap((self.x as i64).saturating_add(dx), size),
            y: wrap((self.y as i64).saturating_add(dy), size),
        }
    }

    /// Iterate over the eight wrapped neighbors in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Self> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy, size))
    }

    /// Row-major index of this position on a grid of edge length `size`.
    pub const fn index(self, size: usize) -> usize {
        self.y.saturating_mul(size).saturating_add(self.x)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Wrap a signed coordinate onto `[0, size)`.
///
/// Returns 0 for an empty grid.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn wrap(coord: i64, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    coord.rem_euclid(size as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_negative_offsets() {
        assert_eq!(wrap(-1, 64), 63);
        assert_eq!(wrap(-65, 64), 63);
        assert_eq!(wrap(64, 64), 0);
        assert_eq!(wrap(130, 64), 2);
    }

    #[test]
    fn wrap_on_empty_grid_is_zero() {
        assert_eq!(wrap(-3, 0), 0);
    }

    #[test]
    fn corner_neighbors_wrap_around() {
        let corner = Position::new(0, 0);
        let neighbors: Vec<Position> = corner.neighbors(8).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.contains(&Position::new(7, 7)));
        assert!(neighbors.contains(&Position::new(1, 1)));
        assert!(neighbors.contains(&Position::new(0, 7)));
        assert!(!neighbors.contains(&corner));
    }

    #[test]
    fn index_is_row_major() {
        assert_eq!(Position::new(3, 2).index(10), 23);
    }
}
