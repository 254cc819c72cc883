//! Explicit per-frame drivers for the animated pages.
//!
//! The caller owns the driver, feeds it frame deltas and re-samples with the
//! updated value; nothing here schedules frames.

use serde::{Deserialize, Serialize};

pub trait FrameDriver {
    fn tick(&mut self, delta_ms: f64);
    fn reset(&mut self);
}

/// `-(cos(pi x) - 1) / 2`
pub fn ease_in_out_sine(x: f64) -> f64 {
    -((std::f64::consts::PI * x).cos() - 1.0) / 2.0
}

/// Turbulence seed advancing `speed` units per second, wrapping at 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedDriver {
    pub seed: f64,
    pub speed: f64,
    #[serde(skip)]
    started: bool,
}

impl SeedDriver {
    pub const WRAP: f64 = 100.0;

    pub fn new(speed: f64) -> Self {
        Self { seed: 0.0, speed, started: false }
    }
}

impl FrameDriver for SeedDriver {
    /// The first frame only establishes the time base.
    fn tick(&mut self, delta_ms: f64) {
        if !self.started {
            self.started = true;
            return;
        }
        self.seed = (self.seed + delta_ms * self.speed / 1000.0) % Self::WRAP;
    }

    fn reset(&mut self) {
        self.seed = 0.0;
        self.started = false;
    }
}

/// Line wobble: seed drifts while the noise frequency swells and recedes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSweep {
    pub seed: f64,
    /// Goes 0 -> 2 and wraps; the frequency peaks at 1.
    pub progress: f64,
    pub frequency: f64,
    pub speed: f64,
}

impl LineSweep {
    pub fn new(frequency: f64, speed: f64) -> Self {
        Self { seed: 0.0, progress: 0.0, frequency, speed }
    }

    pub fn current_frequency(&self) -> f64 {
        let p = if self.progress < 1.0 { self.progress } else { 2.0 - self.progress };
        self.frequency * ease_in_out_sine(p)
    }
}

impl FrameDriver for LineSweep {
    fn tick(&mut self, delta_ms: f64) {
        self.seed += delta_ms * 0.02 * self.speed;
        self.progress = (self.progress + delta_ms * 0.0005 * self.speed) % 2.0;
    }

    fn reset(&mut self) {
        self.seed = 0.0;
        self.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_in_out_sine(0.0), 0.0);
        assert!((ease_in_out_sine(1.0) - 1.0).abs() < 1e-12);
        assert!((ease_in_out_sine(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn seed_driver_skips_first_frame_and_wraps() {
        let mut driver = SeedDriver::new(30.0);
        driver.tick(500.0);
        assert_eq!(driver.seed, 0.0);
        driver.tick(1000.0);
        assert!((driver.seed - 30.0).abs() < 1e-9);
        driver.tick(3000.0);
        assert!((driver.seed - 20.0).abs() < 1e-9);
        driver.reset();
        driver.tick(1000.0);
        assert_eq!(driver.seed, 0.0);
    }

    #[test]
    fn line_sweep_rises_then_falls() {
        let mut sweep = LineSweep::new(0.01, 1.0);
        assert_eq!(sweep.current_frequency(), 0.0);
        sweep.tick(2000.0); // progress 1.0
        assert!((sweep.current_frequency() - 0.01).abs() < 1e-12);
        assert!((sweep.seed - 40.0).abs() < 1e-9);
        sweep.tick(1000.0); // progress 1.5
        assert!((sweep.current_frequency() - 0.005).abs() < 1e-12);
        sweep.tick(1000.0); // wraps to 0
        assert!(sweep.progress.abs() < 1e-12);
    }
}
