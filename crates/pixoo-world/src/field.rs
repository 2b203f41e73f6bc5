//! Square scalar fields (height, temperature, moisture).

use pixoo_types::wrap;

/// A square grid of `f64` values addressed by `(x, y)` with toroidal
/// wrapping for signed lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    size: usize,
    values: Vec<f64>,
}

impl Field {
    /// Create a field by evaluating `f(x, y)` for every coordinate, x-major.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = vec![0.0; size.saturating_mul(size)];
        for x in 0..size {
            for y in 0..size {
                if let Some(slot) = values.get_mut(y.saturating_mul(size).saturating_add(x)) {
                    *slot = f(x, y);
                }
            }
        }
        Self { size, values }
    }

    /// Edge length.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Value at `(x, y)`; 0 outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.offset(x, y)
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Value at the wrapped signed coordinate.
    pub fn get_wrapped(&self, x: i64, y: i64) -> f64 {
        self.get(wrap(x, self.size), wrap(y, self.size))
    }

    /// Overwrite the value at `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        if let Some(slot) = self.offset(x, y).and_then(|i| self.values.get_mut(i)) {
            *slot = value;
        }
    }

    /// Overwrite the value at the wrapped signed coordinate.
    pub fn set_wrapped(&mut self, x: i64, y: i64, value: f64) {
        self.set(wrap(x, self.size), wrap(y, self.size), value);
    }

    /// Replace every value with the mean of its toroidal 3x3 neighborhood.
    ///
    /// Reads come from a snapshot, so the result does not depend on scan
    /// order.
    #[allow(clippy::cast_possible_wrap)]
    pub fn box_blur(&mut self) {
        let snapshot = self.clone();
        for x in 0..self.size {
            for y in 0..self.size {
                let (cx, cy) = (x as i64, y as i64);
                let mut sum = 0.0;
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        sum += snapshot.get_wrapped(cx.saturating_add(dx), cy.saturating_add(dy));
                    }
                }
                self.set(x, y, sum / 9.0);
            }
        }
    }

    const fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.size {
            return None;
        }
        match y.checked_mul(self.size) {
            Some(row) => row.checked_add(x),
            None => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_access() {
        let field = Field::from_fn(4, |x, y| (x * 10 + y) as f64);
        assert_eq!(field.get_wrapped(-1, 0), 30.0);
        assert_eq!(field.get_wrapped(4, 5), 1.0);
    }

    #[test]
    fn blur_of_constant_field_is_constant() {
        let mut field = Field::from_fn(5, |_, _| 0.4);
        field.box_blur();
        for x in 0..5 {
            for y in 0..5 {
                assert!((field.get(x, y) - 0.4).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn blur_uses_snapshot() {
        // A single spike spreads evenly over its 3x3 neighborhood.
        let mut field = Field::from_fn(5, |x, y| if (x, y) == (2, 2) { 9.0 } else { 0.0 });
        field.box_blur();
        for x in 1..=3 {
            for y in 1..=3 {
                assert!((field.get(x, y) - 1.0).abs() < 1e-12);
            }
        }
        assert!(field.get(0, 0).abs() < 1e-12);
    }
}
