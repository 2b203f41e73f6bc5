//! Continent masks: large-scale land/ocean falloffs applied to the height
//! field.
//!
//! Every shape is a falloff in `[0, 1]` perturbed by low-frequency fractal
//! noise, clamped, then raised to a shaping exponent. Shapes dispatch through
//! [`ContinentShape::mask_fn`].

use serde::{Deserialize, Serialize};

use crate::noise::NoiseState;

/// Signature shared by all mask functions: `(noise, x, y, size)`.
pub type MaskFn = fn(&NoiseState, f64, f64, f64) -> f64;

/// Overall layout of land on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinentShape {
    /// A single round island in the center.
    Island,
    /// A curved landmass reaching in from the right edge.
    #[default]
    Peninsula,
    /// Land everywhere except a thin ocean border.
    Inland,
    /// Five small islands.
    Archipelago,
    /// Land concentrated along the left edge.
    Coastal,
}

impl ContinentShape {
    /// All shapes.
    pub const ALL: [Self; 5] = [
        Self::Island,
        Self::Peninsula,
        Self::Inland,
        Self::Archipelago,
        Self::Coastal,
    ];

    /// The mask function implementing this shape.
    pub const fn mask_fn(self) -> MaskFn {
        match self {
            Self::Island => island,
            Self::Peninsula => peninsula,
            Self::Inland => inland,
            Self::Archipelago => archipelago,
            Self::Coastal => coastal,
        }
    }

    /// Evaluate the mask at `(x, y)` on a grid of edge length `size`.
    pub fn mask(self, noise: &NoiseState, x: f64, y: f64, size: f64) -> f64 {
        (self.mask_fn())(noise, x, y, size)
    }
}

/// Low-frequency coastline perturbation.
fn edge_noise(noise: &NoiseState, x: f64, y: f64, scale: f64, strength: f64) -> f64 {
    noise.fractal(x * scale, y * scale, 3, 2.0, 0.5) * strength
}

fn shape(value: f64, exponent: f64) -> f64 {
    value.clamp(0.0, 1.0).powf(exponent)
}

fn island(noise: &NoiseState, x: f64, y: f64, size: f64) -> f64 {
    let half = size / 2.0;
    let dist = (x - half).hypot(y - half);
    let falloff = (1.0 - dist / (size * 0.3)).max(0.0);
    shape(falloff + edge_noise(noise, x, y, 0.02, 0.3), 0.7)
}

fn peninsula(noise: &NoiseState, x: f64, y: f64, size: f64) -> f64 {
    let half = size / 2.0;
    let dx = x - half * 1.7;
    let dy = (x * 0.05).sin().mul_add(size * 0.2, y - half);
    let dist = dx.hypot(dy);
    let falloff = (1.0 - dist / (size * 0.5)).max(0.0);
    let bias = (x / size * 1.2).max(0.0);
    shape(falloff.mul_add(bias, edge_noise(noise, x, y, 0.03, 0.4)), 0.8)
}

fn inland(noise: &NoiseState, x: f64, y: f64, size: f64) -> f64 {
    let edge_distance = x.min(size - x).min(y.min(size - y)) / size;
    let falloff = (edge_distance * 4.0).min(1.0);
    shape(falloff + edge_noise(noise, x, y, 0.02, 0.3), 0.7)
}

fn archipelago(noise: &NoiseState, x: f64, y: f64, size: f64) -> f64 {
    const CENTERS: [(f64, f64); 5] = [(0.3, 0.3), (0.7, 0.4), (0.5, 0.6), (0.2, 0.7), (0.8, 0.7)];
    let radius = size * 0.15;
    let falloff = CENTERS
        .iter()
        .map(|&(cx, cy)| {
            let dist = (x - cx * size).hypot(y - cy * size);
            (1.0 - dist / radius).max(0.0)
        })
        .fold(0.0, f64::max);
    shape(falloff + edge_noise(noise, x, y, 0.02, 0.3), 0.7)
}

fn coastal(noise: &NoiseState, x: f64, y: f64, size: f64) -> f64 {
    let falloff = (1.0 - x / size * 2.0).max(0.0);
    shape(falloff + edge_noise(noise, x, y, 0.02, 0.3), 0.7)
}
