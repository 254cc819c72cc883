use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoiseError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Filter graph validation failed: {0}")]
    FilterGraph(String),
    #[error("Raster buffer of {len} bytes does not match {width}x{height} RGBA")]
    RasterSize { width: u32, height: u32, len: usize },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(pub u64);

/// A continuous 2D scalar field normalized to `[0, 1]`.
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<T: NoiseSource + ?Sized> NoiseSource for &T {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

/// Inclusive slider range surfaced to the user interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn inclusive(&self) -> std::ops::RangeInclusive<f64> {
        self.min..=self.max
    }
}

pub mod ranges {
    use super::ParamRange;

    pub const SCALE: ParamRange = ParamRange::new(0.001, 0.1, 0.001);
    pub const OCTAVES: ParamRange = ParamRange::new(1.0, 8.0, 1.0);
    pub const PERSISTENCE: ParamRange = ParamRange::new(0.1, 1.0, 0.05);
    pub const LACUNARITY: ParamRange = ParamRange::new(1.1, 4.0, 0.1);
    pub const CANVAS_SIZE: ParamRange = ParamRange::new(200.0, 800.0, 50.0);

    pub const NOISE_FREQUENCY: ParamRange = ParamRange::new(0.01, 1.0, 0.001);
    pub const BASE_FREQUENCY: ParamRange = ParamRange::new(0.001, 1.0, 0.001);
    pub const OPACITY: ParamRange = ParamRange::new(0.0, 1.0, 0.01);
    pub const PAPER_FREQUENCY: ParamRange = ParamRange::new(0.01, 0.2, 0.001);
    pub const SURFACE_SCALE: ParamRange = ParamRange::new(0.0, 10.0, 0.1);
    pub const ELEVATION: ParamRange = ParamRange::new(0.0, 90.0, 1.0);
    pub const AZIMUTH: ParamRange = ParamRange::new(0.0, 360.0, 1.0);
    pub const LINE_FREQUENCY: ParamRange = ParamRange::new(0.001, 0.05, 0.001);
    pub const DISPLACEMENT_SCALE: ParamRange = ParamRange::new(0.0, 100.0, 1.0);
    pub const LINE_WIDTH: ParamRange = ParamRange::new(1.0, 10.0, 1.0);
    pub const ANIMATION_SPEED: ParamRange = ParamRange::new(0.0, 5.0, 0.1);
    pub const ANIMATED_FREQUENCY: ParamRange = ParamRange::new(0.001, 0.05, 0.001);
    pub const ANIMATED_SPEED: ParamRange = ParamRange::new(1.0, 100.0, 1.0);
}

#[cfg(test)]
mod tests {
    use super::ranges::*;
    use super::*;

    #[test]
    fn clamp_pulls_values_into_range() {
        assert_eq!(OCTAVES.clamp(0.0), 1.0);
        assert_eq!(OCTAVES.clamp(12.0), 8.0);
        assert_eq!(SCALE.clamp(0.05), 0.05);
        assert_eq!(LACUNARITY.clamp(f64::NAN), 1.1);
    }

    #[test]
    fn canvas_range_matches_slider() {
        assert!(CANVAS_SIZE.contains(400.0));
        assert!(!CANVAS_SIZE.contains(850.0));
        assert_eq!(CANVAS_SIZE.step, 50.0);
    }
}
