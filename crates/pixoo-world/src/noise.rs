//! Seeded 2D gradient noise and fractal composition.
//!
//! The lattice is built once per seed. A Park-Miller LCG
//! (`x = x * 16807 mod 2^31 - 1`) drives a Fisher-Yates shuffle of the
//! permutation table and then draws one gradient angle per lattice slot, so a
//! seed fully determines every sample.

use std::f64::consts::TAU;

/// Number of distinct lattice entries.
const TABLE_SIZE: usize = 256;

/// Modulus of the Park-Miller generator.
const LCG_MODULUS: u64 = 2_147_483_647;

/// Multiplier of the Park-Miller generator.
const LCG_MULTIPLIER: u64 = 16_807;

/// Seed substituted for seeds that would make the generator degenerate.
pub const DEFAULT_NOISE_SEED: u64 = 1337;

/// Minimal Park-Miller generator producing values in `[0, 1)`.
struct Lcg {
    state: u64,
}

impl Lcg {
    const fn new(seed: u64) -> Self {
        let state = match seed.rem_euclid(LCG_MODULUS) {
            0 => DEFAULT_NOISE_SEED,
            s => s,
        };
        Self { state }
    }

    /// `state < 2^31`, so the product fits in 64 bits.
    #[allow(clippy::cast_precision_loss)]
    fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).rem_euclid(LCG_MODULUS);
        self.state as f64 / LCG_MODULUS as f64
    }
}

/// Immutable permutation table and gradient vectors for one seed.
#[derive(Debug, Clone)]
pub struct NoiseState {
    perm: [u8; TABLE_SIZE * 2],
    grad_x: [f64; TABLE_SIZE * 2],
    grad_y: [f64; TABLE_SIZE * 2],
}

impl NoiseState {
    /// Build the lattice for `seed`.
    ///
    /// Seeds congruent to zero modulo `2^31 - 1` fall back to
    /// [`DEFAULT_NOISE_SEED`].
    #[allow(
        clippy::indexing_slicing,
        clippy::arithmetic_side_effects,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn new(seed: u64) -> Self {
        let mut lcg = Lcg::new(seed);

        let mut base = [0_u8; TABLE_SIZE];
        for (slot, value) in base.iter_mut().zip(0..=u8::MAX) {
            *slot = value;
        }
        for i in (1..TABLE_SIZE).rev() {
            // next_f64 < 1, so j <= i.
            let j = (lcg.next_f64() * (i + 1) as f64).floor() as usize;
            base.swap(i, j.min(i));
        }

        let mut perm = [0_u8; TABLE_SIZE * 2];
        let mut grad_x = [0.0; TABLE_SIZE * 2];
        let mut grad_y = [0.0; TABLE_SIZE * 2];
        for i in 0..TABLE_SIZE {
            perm[i] = base[i];
            perm[i + TABLE_SIZE] = base[i];
        }
        for i in 0..TABLE_SIZE {
            let angle = lcg.next_f64() * TAU;
            let (sin, cos) = angle.sin_cos();
            grad_x[i] = cos;
            grad_y[i] = sin;
            grad_x[i + TABLE_SIZE] = cos;
            grad_y[i + TABLE_SIZE] = sin;
        }

        Self {
            perm,
            grad_x,
            grad_y,
        }
    }

    /// Sample gradient noise at `(x, y)`.
    ///
    /// Output lies approximately in `[-1, 1]` and is exactly zero on integer
    /// lattice points.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let ix = (x0 as i64 & 255) as usize;
        let iy = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;

        let bottom_left = self.grad_dot(ix, iy, xf, yf);
        let (ix1, iy1) = (ix.saturating_add(1), iy.saturating_add(1));
        let bottom_right = self.grad_dot(ix1, iy, xf - 1.0, yf);
        let top_left = self.grad_dot(ix, iy1, xf, yf - 1.0);
        let top_right = self.grad_dot(ix1, iy1, xf - 1.0, yf - 1.0);

        let u = fade(xf);
        let v = fade(yf);
        let bottom = lerp(bottom_left, bottom_right, u);
        let top = lerp(top_left, top_right, u);
        lerp(bottom, top, v)
    }

    /// Fractal sum of `octaves` noise layers.
    ///
    /// Each octave multiplies frequency by `lacunarity` and amplitude by
    /// `gain`. The sum is normalized by total amplitude. Zero octaves yield 0.
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut sum = 0.0;
        let mut total_amplitude = 0.0;

        for _ in 0..octaves {
            sum += self.sample(x * frequency, y * frequency) * amplitude;
            total_amplitude += amplitude;
            frequency *= lacunarity;
            amplitude *= gain;
        }

        if total_amplitude > 0.0 {
            sum / total_amplitude
        } else {
            0.0
        }
    }

    /// Dot product of the gradient at lattice `(ix, iy)` with the offset.
    ///
    /// `ix, iy <= 256`, so every lookup stays inside the doubled tables.
    fn grad_dot(&self, ix: usize, iy: usize, dx: f64, dy: f64) -> f64 {
        let row = self.perm.get(iy).copied().map_or(0, usize::from);
        let idx = self.perm.get(ix.saturating_add(row)).copied().map_or(0, usize::from);
        let gx = self.grad_x.get(idx).copied().unwrap_or(0.0);
        let gy = self.grad_y.get(idx).copied().unwrap_or(0.0);
        gx.mul_add(dx, gy * dy)
    }
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
fn fade(t: f64) -> f64 {
    t * t * t * t.mul_add(t.mul_add(6.0, -15.0), 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    t.mul_add(b - a, a)
}
