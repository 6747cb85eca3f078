//! Utility functions for hoopshot

use rand::Rng;

/// Uniform draw in [min, max); returns `min` when the range is empty or inverted
pub fn uniform_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Uniform draw in [-spread, spread]; zero spread yields 0
pub fn symmetric_noise(rng: &mut impl Rng, spread: f32) -> f32 {
    let spread = spread.abs();
    if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    }
}
