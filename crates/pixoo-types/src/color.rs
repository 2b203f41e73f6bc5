//! Pixel colors.
//!
//! The display consumes 8-bit RGB triples. Simulations think in HSL (a hue
//! per genome or tribe, a lightness per cell), so [`hsl_to_rgb`] bridges the
//! two.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black, used to clear the display between frames.
    pub const BLACK: Self = Self(0, 0, 0);

    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Return the components as a byte array in `[r, g, b]` order.
    pub const fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self(r, g, b)
    }
}

/// Convert an HSL color to RGB.
///
/// `hue` is in degrees `[0, 360)`, `saturation` and `lightness` in `[0, 1]`.
/// Out-of-range inputs are clamped.
#[allow(clippy::many_single_char_names)]
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 1.0 / 6.0 {
        (c, x, 0.0)
    } else if h < 2.0 / 6.0 {
        (x, c, 0.0)
    } else if h < 3.0 / 6.0 {
        (0.0, c, x)
    } else if h < 4.0 / 6.0 {
        (0.0, x, c)
    } else if h < 5.0 / 6.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u8 {
    // Clamped to [0, 255] before the cast, so truncation cannot occur.
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb(0, 0, 255));
    }

    #[test]
    fn lightness_extremes() {
        assert_eq!(hsl_to_rgb(200.0, 1.0, 0.0), Rgb::BLACK);
        assert_eq!(hsl_to_rgb(200.0, 1.0, 1.0), Rgb(255, 255, 255));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5));
        assert_eq!(hsl_to_rgb(-120.0, 1.0, 0.5), hsl_to_rgb(240.0, 1.0, 0.5));
    }

    #[test]
    fn dim_cells_are_darker_than_bright_cells() {
        let dim = hsl_to_rgb(90.0, 1.0, 0.3);
        let bright = hsl_to_rgb(90.0, 1.0, 0.9);
        let sum = |c: Rgb| u32::from(c.0) + u32::from(c.1) + u32::from(c.2);
        assert!(sum(dim) < sum(bright));
    }
}
