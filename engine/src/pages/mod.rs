//! Settings and outputs for each gallery page.

mod animated;
mod frosted;
mod noise;
mod paper;
mod perlin;
mod svg_fractal;
mod turbulence;
mod line;

pub use animated::AnimatedNoisePage;
pub use frosted::FrostedGlassPage;
pub use line::LineAnimationPage;
pub use noise::NoisePage;
pub use paper::PaperPage;
pub use perlin::{FractalPage, PerlinPage};
pub use svg_fractal::{FractalSvgPage, FractalSvgPreset};
pub use turbulence::{TurbulencePage, TurbulencePreset};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::filter::{BlendMode, FilterGraph, Primitive};
use crate::preview::{composite_over, diffuse_light, shade, ScalarMap, TurbulencePreview};
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Perlin,
    Fractal,
    SvgFractal,
    SvgTurbulence,
    Noise,
    FrostedGlass,
    PaperTexture,
    LineAnimation,
    AnimatedNoise,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Perlin,
        Page::Fractal,
        Page::SvgFractal,
        Page::SvgTurbulence,
        Page::Noise,
        Page::FrostedGlass,
        Page::PaperTexture,
        Page::LineAnimation,
        Page::AnimatedNoise,
    ];

    /// Locale key segment, also used for export file names.
    pub fn key(&self) -> &'static str {
        match self {
            Page::Perlin => "perlin",
            Page::Fractal => "fractal",
            Page::SvgFractal => "svgFractal",
            Page::SvgTurbulence => "svgTurbulence",
            Page::Noise => "noise",
            Page::FrostedGlass => "frostedGlass",
            Page::PaperTexture => "paperTexture",
            Page::LineAnimation => "lineAnimation",
            Page::AnimatedNoise => "animatedNoise",
        }
    }

    pub fn title_key(&self) -> String {
        format!("common.demos.{}.title", self.key())
    }

    pub fn description_key(&self) -> String {
        format!("common.demos.{}.description", self.key())
    }

    /// Pages drawn by the Perlin rasterizer rather than an SVG filter.
    pub fn is_raster(&self) -> bool {
        matches!(self, Page::Perlin | Page::Fractal)
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Page::LineAnimation | Page::AnimatedNoise)
    }
}

/// Random turbulence seed in `0..1000`, what the Regenerate buttons draw.
pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(0..1000)
}

/// Approximates a filter page: the first feTurbulence provides the noise,
/// feDiffuseLighting (if any) shades it, otherwise it is blended over the
/// background.
pub(crate) fn preview_filter(graph: &FilterGraph, background: Rgb, blend: BlendMode, size: u32) -> Raster {
    let noise = match graph.find(|p| matches!(p, Primitive::Turbulence { .. })).and_then(TurbulencePreview::from_primitive) {
        Some(preview) => ScalarMap::sample(&preview, size, size),
        None => return Raster::filled(size, size, background.to_rgba()),
    };
    match graph.find(|p| matches!(p, Primitive::DiffuseLighting { .. })) {
        Some(Primitive::DiffuseLighting { surface_scale, diffuse_constant, lighting_color, light }) => {
            let lit = diffuse_light(&noise, *surface_scale, diffuse_constant.unwrap_or(1.0), *light);
            shade(background, &lit, *lighting_color)
        }
        _ => composite_over(background, &noise, 1.0, blend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_page_has_distinct_keys() {
        let mut keys: Vec<String> = Page::ALL.iter().map(Page::title_key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Page::ALL.len());
        assert_eq!(Page::Perlin.title_key(), "common.demos.perlin.title");
        assert_eq!(Page::PaperTexture.description_key(), "common.demos.paperTexture.description");
    }

    #[test]
    fn random_seed_is_below_one_thousand() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!((0..200).all(|_| random_seed(&mut rng) < 1000));
    }
}
