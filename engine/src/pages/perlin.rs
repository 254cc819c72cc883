use serde::{Deserialize, Serialize};

use crate::fractal::{Fractal, FractalSettings};
use crate::perlin::NoiseField;
use crate::raster::{self, Raster};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinPage {
    pub scale: f64,
    pub size: u32,
}

impl Default for PerlinPage {
    fn default() -> Self {
        Self { scale: 0.02, size: 400 }
    }
}

impl PerlinPage {
    /// `size x size` image of `sample(x * scale, y * scale)`.
    pub fn render(&self, field: NoiseField<'_>) -> Raster {
        let settings = FractalSettings { scale: self.scale, octaves: 1, ..Default::default() };
        raster::render(&Fractal::new(field, settings), self.size, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalPage {
    pub settings: FractalSettings,
    pub size: u32,
}

impl Default for FractalPage {
    fn default() -> Self {
        Self { settings: FractalSettings::default(), size: 400 }
    }
}

impl FractalPage {
    pub fn render(&self, field: NoiseField<'_>) -> Raster {
        raster::render(&Fractal::new(field, self.settings), self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Seed;
    use crate::perlin::PerlinGenerator;
    use crate::raster::to_gray;

    #[test]
    fn perlin_page_pixels_follow_scaled_samples() {
        let gen = PerlinGenerator::from_seed(Seed(11));
        let page = PerlinPage { scale: 0.05, size: 16 };
        let image = page.render(gen.field());
        assert_eq!((image.width(), image.height()), (16, 16));
        for &(x, y) in &[(0u32, 0u32), (7, 3), (15, 15)] {
            let g = to_gray(gen.field().sample(x as f64 * 0.05, y as f64 * 0.05));
            assert_eq!(image.pixel(x, y), [g, g, g, 255]);
        }
    }

    #[test]
    fn fractal_page_renders_requested_size() {
        let gen = PerlinGenerator::from_seed(Seed(2));
        let page = FractalPage { size: 20, ..Default::default() };
        let image = page.render(gen.field());
        assert_eq!(image.as_bytes().len(), 20 * 20 * 4);
        assert!(image.as_bytes().chunks(4).all(|p| p[3] == 255));
    }
}
