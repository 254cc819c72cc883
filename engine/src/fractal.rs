//! Octave summation of the base field.

use serde::{Deserialize, Serialize};

use crate::api::{NoiseError, NoiseSource};
use crate::perlin::NoiseField;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalSettings {
    /// Multiplier applied to raw pixel coordinates.
    pub scale: f64,
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl Default for FractalSettings {
    fn default() -> Self {
        Self { scale: 0.02, octaves: 4, persistence: 0.5, lacunarity: 2.0 }
    }
}

impl FractalSettings {
    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.octaves < 1 {
            return Err(NoiseError::InvalidSettings("octaves must be at least 1".into()));
        }
        if !(self.scale > 0.0) {
            return Err(NoiseError::InvalidSettings(format!("scale must be positive, got {}", self.scale)));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(NoiseError::InvalidSettings(format!(
                "persistence must be in (0, 1], got {}",
                self.persistence
            )));
        }
        if !(self.lacunarity > 1.0) {
            return Err(NoiseError::InvalidSettings(format!(
                "lacunarity must be greater than 1, got {}",
                self.lacunarity
            )));
        }
        Ok(())
    }
}

/// Weighted average of `octaves` samples at growing frequency.
///
/// Requires `settings.octaves >= 1`; with zero octaves the amplitude sum is
/// zero and the result is NaN.
pub fn fractal_sample<S: NoiseSource + ?Sized>(source: &S, x: f64, y: f64, settings: &FractalSettings) -> f64 {
    debug_assert!(settings.octaves >= 1, "fractal_sample needs at least one octave");
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut total = 0.0;
    let mut amplitude_sum = 0.0;
    for _ in 0..settings.octaves {
        let sx = x * settings.scale * frequency;
        let sy = y * settings.scale * frequency;
        total += source.sample(sx, sy) * amplitude;
        amplitude_sum += amplitude;
        amplitude *= settings.persistence;
        frequency *= settings.lacunarity;
    }
    total / amplitude_sum
}

/// A field paired with octave settings, sampled in pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Fractal<'a> {
    pub field: NoiseField<'a>,
    pub settings: FractalSettings,
}

impl<'a> Fractal<'a> {
    pub fn new(field: NoiseField<'a>, settings: FractalSettings) -> Self {
        Self { field, settings }
    }
}

impl NoiseSource for Fractal<'_> {
    fn sample(&self, x: f64, y: f64) -> f64 {
        fractal_sample(&self.field, x, y, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutation::PermutationTable;

    struct Constant(f64);

    impl NoiseSource for Constant {
        fn sample(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn constant_source_survives_normalization() {
        let settings = FractalSettings { octaves: 6, persistence: 0.7, ..Default::default() };
        let v = fractal_sample(&Constant(0.3), 10.0, 20.0, &settings);
        assert!((v - 0.3).abs() < 1e-12);
    }

    #[test]
    fn single_octave_is_the_base_field() {
        let table = PermutationTable::identity();
        let field = NoiseField::new(&table);
        let settings = FractalSettings { scale: 0.037, octaves: 1, persistence: 0.3, lacunarity: 3.5 };
        for &(x, y) in &[(0.0, 0.0), (13.0, 7.5), (-40.2, 99.9), (321.0, -0.01)] {
            assert_eq!(field.fractal_sample(x, y, &settings), field.sample(x * 0.037, y * 0.037));
        }
    }

    #[test]
    fn validate_rejects_out_of_domain_settings() {
        assert!(FractalSettings::default().validate().is_ok());
        let bad = [
            FractalSettings { octaves: 0, ..Default::default() },
            FractalSettings { scale: 0.0, ..Default::default() },
            FractalSettings { persistence: 1.5, ..Default::default() },
            FractalSettings { persistence: 0.0, ..Default::default() },
            FractalSettings { lacunarity: 1.0, ..Default::default() },
            FractalSettings { scale: f64::NAN, ..Default::default() },
        ];
        for s in bad {
            assert!(matches!(s.validate(), Err(NoiseError::InvalidSettings(_))), "{s:?}");
        }
    }
}
