//! River and tributary carving on the height field.
//!
//! Main rivers start high, walk downhill with a little randomness, and are
//! widened afterwards. Tributaries start anywhere and wander until they join
//! existing water.

use rand::Rng;
use tracing::debug;

use crate::field::Field;

/// Height written into carved channels.
pub const WATER_LEVEL: f64 = 0.25;

/// Upper bound written into river banks.
pub const BANK_LEVEL: f64 = 0.31;

/// Heights at or below this count as water when tracing rivers.
pub const WATER_THRESHOLD: f64 = 0.3;

/// Minimum height a main river should start from.
const SOURCE_HEIGHT: f64 = 0.7;

const SOURCE_ATTEMPTS: u32 = 100;
const MAX_RIVER_STEPS: u32 = 300;
const MAX_TRIBUTARY_STEPS: u32 = 100;
const TRIBUTARY_SEARCH_RADIUS: i64 = 4;
const PATH_JITTER: f64 = 0.1;

/// Carve `river_count` main rivers and twice as many tributaries.
pub fn carve_rivers(height: &mut Field, river_count: u32, rng: &mut impl Rng) {
    if height.size() == 0 {
        return;
    }
    for river in 0..river_count {
        let path = trace_river(height, rng);
        debug!(river, length = path.len(), "River carved");
        widen(height, &path, rng);
    }
    for tributary in 0..river_count.saturating_mul(2) {
        let steps = trace_tributary(height, rng);
        debug!(tributary, steps, "Tributary carved");
    }
}

#[allow(clippy::cast_possible_wrap)]
fn random_cell(size: usize, rng: &mut impl Rng) -> (i64, i64) {
    (rng.random_range(0..size) as i64, rng.random_range(0..size) as i64)
}

/// Walk one main river from a high source, returning the visited points.
fn trace_river(height: &mut Field, rng: &mut impl Rng) -> Vec<(i64, i64)> {
    let size = height.size();
    let (mut x, mut y) = random_cell(size, rng);
    for _ in 1..SOURCE_ATTEMPTS {
        if height.get_wrapped(x, y) >= SOURCE_HEIGHT {
            break;
        }
        (x, y) = random_cell(size, rng);
    }

    let mut path = Vec::new();
    for _ in 0..MAX_RIVER_STEPS {
        path.push((x, y));
        height.set_wrapped(x, y, WATER_LEVEL);

        let mut lowest = 1.0;
        let (mut nx, mut ny) = (x, y);
        for dx in -2..=2 {
            for dy in -2..=2 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (xx, yy) = wrapped(x.saturating_add(dx), y.saturating_add(dy), size);
                let candidate = height.get_wrapped(xx, yy) - rng.random::<f64>() * PATH_JITTER;
                if candidate < lowest {
                    lowest = candidate;
                    (nx, ny) = (xx, yy);
                }
            }
        }

        if height.get_wrapped(nx, ny) < WATER_THRESHOLD {
            break;
        }
        if (nx, ny) == (x, y) {
            break;
        }
        (x, y) = (nx, ny);
    }
    path
}

/// Widen each recorded river point into a channel of radius 2 or 3 with a
/// one-cell bank.
fn widen(height: &mut Field, path: &[(i64, i64)], rng: &mut impl Rng) {
    for &(rx, ry) in path {
        let width: i32 = rng.random_range(2..=3);
        let radius = f64::from(width);
        for dx in width.saturating_neg()..=width {
            for dy in width.saturating_neg()..=width {
                let dist = f64::from(dx).hypot(f64::from(dy));
                let (xx, yy) = (
                    rx.saturating_add(i64::from(dx)),
                    ry.saturating_add(i64::from(dy)),
                );
                if dist <= radius {
                    height.set_wrapped(xx, yy, WATER_LEVEL);
                } else if dist <= radius + 1.0 {
                    let current = height.get_wrapped(xx, yy);
                    height.set_wrapped(xx, yy, current.min(BANK_LEVEL));
                }
            }
        }
    }
}

/// Wander from a random start until existing water is adjacent, returning
/// the number of steps taken.
fn trace_tributary(height: &mut Field, rng: &mut impl Rng) -> u32 {
    let size = height.size();
    let (mut x, mut y) = random_cell(size, rng);

    for step in 0..MAX_TRIBUTARY_STEPS {
        let before = height.get_wrapped(x, y);
        height.set_wrapped(x, y, WATER_LEVEL);

        let next = match nearest_water(height, x, y) {
            Some((_, _, 1)) => return step,
            Some((dx, dy, _)) => Some(wrapped(
                x.saturating_add(dx.signum()),
                y.saturating_add(dy.signum()),
                size,
            )),
            None => lowest_neighbor(height, x, y, before),
        };
        match next {
            Some(cell) => (x, y) = cell,
            None => return step,
        }
    }
    MAX_TRIBUTARY_STEPS
}

/// The lowest 3x3 neighbor strictly below `ceiling`, if any.
fn lowest_neighbor(height: &Field, x: i64, y: i64, ceiling: f64) -> Option<(i64, i64)> {
    let mut lowest = ceiling;
    let mut next = None;
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x.saturating_add(dx), y.saturating_add(dy));
            let h = height.get_wrapped(nx, ny);
            if h < lowest {
                lowest = h;
                next = Some(wrapped(nx, ny, height.size()));
            }
        }
    }
    next
}

/// Search square rings of radius 1..=4 around `(x, y)` (excluding the center)
/// for water. Returns the offset and ring radius of the first hit.
fn nearest_water(height: &Field, x: i64, y: i64) -> Option<(i64, i64, i64)> {
    for radius in 1..=TRIBUTARY_SEARCH_RADIUS {
        for dx in radius.saturating_neg()..=radius {
            for dy in radius.saturating_neg()..=radius {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                if height.get_wrapped(x.saturating_add(dx), y.saturating_add(dy)) <= WATER_THRESHOLD {
                    return Some((dx, dy, radius));
                }
            }
        }
    }
    None
}

#[allow(clippy::cast_possible_wrap)]
const fn wrapped(x: i64, y: i64, size: usize) -> (i64, i64) {
    let s = size as i64;
    (x.rem_euclid(s), y.rem_euclid(s))
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn count_water(field: &Field) -> usize {
        let size = field.size();
        (0..size)
            .flat_map(|x| (0..size).map(move |y| (x, y)))
            .filter(|&(x, y)| field.get(x, y) <= WATER_THRESHOLD)
            .count()
    }

    #[test]
    fn rivers_carve_water_into_dry_land() {
        // A slope from high (left) to low (right), all above water.
        let mut field = Field::from_fn(32, |x, _| 0.95 - x as f64 * 0.01);
        assert_eq!(count_water(&field), 0);
        let mut rng = StdRng::seed_from_u64(42);
        carve_rivers(&mut field, 3, &mut rng);
        assert!(count_water(&field) > 0);
    }

    #[test]
    fn carving_never_raises_height() {
        let original = Field::from_fn(24, |x, y| 0.4 + ((x * 7 + y * 3) % 10) as f64 * 0.05);
        let mut carved = original.clone();
        let mut rng = StdRng::seed_from_u64(9);
        carve_rivers(&mut carved, 4, &mut rng);
        for x in 0..24 {
            for y in 0..24 {
                assert!(carved.get(x, y) <= original.get(x, y) + 1e-12);
            }
        }
    }

    #[test]
    fn tributary_joins_adjacent_water_immediately() {
        let mut field = Field::from_fn(8, |_, _| 0.8);
        // Everything except one column is water, so any start sees water
        // within one cell.
        for x in 0..8 {
            for y in 0..8 {
                if x != 4 {
                    field.set(x, y, 0.2);
                }
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(trace_tributary(&mut field, &mut rng), 0);
    }

    #[test]
    fn nearest_water_excludes_center() {
        let mut field = Field::from_fn(9, |_, _| 0.8);
        field.set(4, 4, 0.1);
        assert_eq!(nearest_water(&field, 4, 4), None);
        field.set(7, 4, 0.1);
        assert_eq!(nearest_water(&field, 4, 4), Some((3, 0, 3)));
    }

    #[test]
    fn same_seed_same_channels() {
        let base = Field::from_fn(32, |x, y| 0.5 + ((x + 2 * y) % 9) as f64 * 0.05);
        let mut a = base.clone();
        let mut b = base;
        carve_rivers(&mut a, 5, &mut StdRng::seed_from_u64(77));
        carve_rivers(&mut b, 5, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
