use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::filter::{
    BaseFrequency, BlendMode, Element, FilterGraph, FilterNode, Layer, Primitive, StitchTiles, SvgDocument,
    TurbulenceKind,
};
use crate::preview::{composite_over, ScalarMap, TurbulencePreview};
use crate::raster::Raster;

/// Fractal-noise grain over a flat background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoisePage {
    pub frequency: f64,
    pub opacity: f64,
    pub background: Rgb,
    pub num_octaves: u32,
    pub blend_mode: BlendMode,
}

impl Default for NoisePage {
    fn default() -> Self {
        Self { frequency: 0.65, opacity: 0.5, background: Rgb::WHITE, num_octaves: 1, blend_mode: BlendMode::Normal }
    }
}

impl NoisePage {
    pub fn filter_graph(&self) -> FilterGraph {
        FilterGraph::new("noise")
            .push(FilterNode::new(Primitive::Turbulence {
                kind: TurbulenceKind::FractalNoise,
                base_frequency: BaseFrequency::Uniform(self.frequency),
                num_octaves: self.num_octaves,
                seed: None,
                stitch_tiles: Some(StitchTiles::Stitch),
            }))
            .push(FilterNode::new(Primitive::ComponentTransfer { alpha_slope: self.opacity }))
    }

    pub fn svg(&self) -> SvgDocument {
        SvgDocument::new(self.filter_graph())
            .layer(Layer::plain(Element::full_rect(Some(self.background))))
            .layer(Layer::filtered(Element::full_rect(None)).blended(self.blend_mode))
    }

    pub fn preview(&self, size: u32) -> Raster {
        let preview = TurbulencePreview::new(
            TurbulenceKind::FractalNoise,
            BaseFrequency::Uniform(self.frequency),
            self.num_octaves,
            0,
        );
        let noise = ScalarMap::sample(&preview, size, size);
        composite_over(self.background, &noise, self.opacity, self.blend_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_svg_matches_page_defaults() {
        let svg = NoisePage::default().svg().to_svg();
        assert!(svg.contains(
            "<feTurbulence type=\"fractalNoise\" baseFrequency=\"0.65\" numOctaves=\"1\" stitchTiles=\"stitch\" />"
        ));
        assert!(svg.contains("<feFuncA type=\"linear\" slope=\"0.5\" />"));
        assert!(svg.contains("style=\"mix-blend-mode: normal\""));
    }

    #[test]
    fn filter_graph_is_valid() {
        assert!(NoisePage::default().filter_graph().validate().is_ok());
    }

    #[test]
    fn transparent_noise_shows_background() {
        let page = NoisePage { opacity: 0.0, background: Rgb::new(10, 20, 30), ..Default::default() };
        let image = page.preview(4);
        assert!(image.as_bytes().chunks(4).all(|p| p == [10, 20, 30, 255]));
    }
}
