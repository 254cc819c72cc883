use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::filter::{
    BaseFrequency, BlendMode, DistantLight, Element, FilterGraph, FilterInput, FilterNode, FilterRegion, Layer,
    Primitive, StitchTiles, SvgDocument, TurbulenceKind,
};
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperPage {
    pub frequency: f64,
    pub num_octaves: u32,
    pub surface_scale: f64,
    /// Degrees above the surface.
    pub elevation: f64,
    /// Degrees around the surface.
    pub azimuth: f64,
    pub background: Rgb,
}

impl Default for PaperPage {
    fn default() -> Self {
        Self { frequency: 0.04, num_octaves: 5, surface_scale: 2.0, elevation: 60.0, azimuth: 45.0, background: Rgb::WHITE }
    }
}

impl PaperPage {
    pub fn filter_graph(&self) -> FilterGraph {
        FilterGraph::new("paper")
            .with_region(FilterRegion::new("0", "0", "100%", "100%"))
            .push(
                FilterNode::new(Primitive::Turbulence {
                    kind: TurbulenceKind::FractalNoise,
                    base_frequency: BaseFrequency::Uniform(self.frequency),
                    num_octaves: self.num_octaves,
                    seed: Some(1.0),
                    stitch_tiles: Some(StitchTiles::NoStitch),
                })
                .result("noise"),
            )
            .push(
                FilterNode::new(Primitive::DiffuseLighting {
                    surface_scale: self.surface_scale,
                    diffuse_constant: None,
                    lighting_color: Rgb::WHITE,
                    light: DistantLight { azimuth: self.azimuth, elevation: self.elevation },
                })
                .input(FilterInput::result("noise"))
                .result("lighting"),
            )
            .push(
                FilterNode::new(Primitive::Blend { mode: BlendMode::Multiply })
                    .input(FilterInput::SourceGraphic)
                    .input2(FilterInput::result("lighting")),
            )
    }

    pub fn svg(&self) -> SvgDocument {
        SvgDocument::new(self.filter_graph()).layer(Layer::filtered(Element::full_rect(Some(self.background))))
    }

    pub fn preview(&self, size: u32) -> Raster {
        super::preview_filter(&self.filter_graph(), self.background, BlendMode::Multiply, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_angles_reach_the_markup() {
        let page = PaperPage { azimuth: 120.0, elevation: 15.0, surface_scale: 3.5, ..Default::default() };
        let svg = page.svg().to_svg();
        assert!(svg.contains("<feDistantLight azimuth=\"120\" elevation=\"15\" />"));
        assert!(svg.contains("surfaceScale=\"3.5\""));
        assert!(svg.contains("<feBlend in=\"SourceGraphic\" in2=\"lighting\" mode=\"multiply\" />"));
        assert!(svg.contains("<filter id=\"paper\" x=\"0\" y=\"0\" width=\"100%\" height=\"100%\">"));
    }

    #[test]
    fn graph_has_no_dead_primitives() {
        assert!(PaperPage::default().filter_graph().compile().unwrap().unused().is_empty());
    }

    #[test]
    fn overhead_light_on_flat_paper_keeps_background() {
        let page = PaperPage { surface_scale: 0.0, elevation: 90.0, background: Rgb::new(200, 180, 160), ..Default::default() };
        let image = page.preview(4);
        assert!(image.as_bytes().chunks(4).all(|p| p == [200, 180, 160, 255]));
    }
}
