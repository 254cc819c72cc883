use serde::{Deserialize, Serialize};

use crate::animation::SeedDriver;
use crate::color::Rgb;
use crate::filter::{
    BaseFrequency, BlendMode, Element, FilterGraph, FilterNode, Layer, Primitive, SvgDocument, TurbulenceKind,
};
use crate::preview::{composite_over, ScalarMap, TurbulencePreview};
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatedNoisePage {
    pub kind: TurbulenceKind,
    pub frequency: f64,
    pub num_octaves: u32,
    /// Seed units per second.
    pub speed: f64,
}

impl Default for AnimatedNoisePage {
    fn default() -> Self {
        let (frequency, num_octaves) = Self::kind_defaults(TurbulenceKind::FractalNoise);
        Self { kind: TurbulenceKind::FractalNoise, frequency, num_octaves, speed: 30.0 }
    }
}

impl AnimatedNoisePage {
    fn kind_defaults(kind: TurbulenceKind) -> (f64, u32) {
        match kind {
            TurbulenceKind::FractalNoise => (0.02, 4),
            TurbulenceKind::Turbulence => (0.02, 4),
        }
    }

    /// Changing the noise type restores that type's frequency and octaves.
    pub fn set_kind(&mut self, kind: TurbulenceKind) {
        let (frequency, num_octaves) = Self::kind_defaults(kind);
        self.kind = kind;
        self.frequency = frequency;
        self.num_octaves = num_octaves;
    }

    pub fn driver(&self) -> SeedDriver {
        SeedDriver::new(self.speed)
    }

    pub fn filter_graph(&self, seed: f64) -> FilterGraph {
        FilterGraph::new("noise").push(FilterNode::new(Primitive::Turbulence {
            kind: self.kind,
            base_frequency: BaseFrequency::Uniform(self.frequency),
            num_octaves: self.num_octaves,
            seed: Some(seed),
            stitch_tiles: None,
        }))
    }

    pub fn svg(&self, seed: f64) -> SvgDocument {
        SvgDocument::new(self.filter_graph(seed)).layer(Layer::filtered(Element::full_rect(Some(Rgb::WHITE))))
    }

    pub fn preview(&self, seed: f64, size: u32) -> Raster {
        let preview = TurbulencePreview::new(self.kind, BaseFrequency::Uniform(self.frequency), self.num_octaves, seed.floor() as i32);
        composite_over(Rgb::WHITE, &ScalarMap::sample(&preview, size, size), 1.0, BlendMode::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_kind_restores_defaults() {
        let mut page = AnimatedNoisePage { frequency: 0.045, num_octaves: 7, ..Default::default() };
        page.set_kind(TurbulenceKind::Turbulence);
        assert_eq!(page.kind, TurbulenceKind::Turbulence);
        assert_eq!(page.frequency, 0.02);
        assert_eq!(page.num_octaves, 4);
    }

    #[test]
    fn seed_is_written_into_markup() {
        let svg = AnimatedNoisePage::default().svg(12.5).to_svg();
        assert!(svg.contains("<feTurbulence type=\"fractalNoise\" baseFrequency=\"0.02\" numOctaves=\"4\" seed=\"12.5\" />"));
        assert!(svg.contains("fill=\"#ffffff\" filter=\"url(#noise)\""));
    }

    #[test]
    fn driver_uses_page_speed() {
        let page = AnimatedNoisePage { speed: 50.0, ..Default::default() };
        assert_eq!(page.driver().speed, 50.0);
    }
}
