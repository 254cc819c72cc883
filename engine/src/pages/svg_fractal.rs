use rand::Rng;
use serde::{Deserialize, Serialize};

use super::turbulence::{arithmetic, blend, blur, color_matrix};
use crate::color::Rgb;
use crate::filter::{
    BaseFrequency, BlendMode, DistantLight, Element, FilterGraph, FilterInput, FilterNode, FilterRegion, Layer,
    Primitive, StitchTiles, SvgDocument, TurbulenceKind,
};
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalSvgPreset {
    #[default]
    Default,
    Clouds,
    Terrain,
    Paper,
}

impl FractalSvgPreset {
    pub const ALL: [FractalSvgPreset; 4] =
        [FractalSvgPreset::Default, FractalSvgPreset::Clouds, FractalSvgPreset::Terrain, FractalSvgPreset::Paper];

    pub fn label_key(&self) -> &'static str {
        match self {
            FractalSvgPreset::Default => "svgFractal.defaultEffect",
            FractalSvgPreset::Clouds => "svgFractal.cloudsEffect",
            FractalSvgPreset::Terrain => "svgFractal.terrainEffect",
            FractalSvgPreset::Paper => "svgFractal.paperEffect",
        }
    }

    fn defaults(&self) -> (f64, u32, Rgb, BlendMode) {
        match self {
            FractalSvgPreset::Default => (0.02, 4, Rgb::WHITE, BlendMode::Multiply),
            FractalSvgPreset::Clouds => (0.01, 5, Rgb::new(0xbf, 0xdb, 0xfe), BlendMode::SoftLight),
            FractalSvgPreset::Terrain => (0.008, 8, Rgb::new(0xe5, 0xe7, 0xeb), BlendMode::Multiply),
            FractalSvgPreset::Paper => (0.04, 5, Rgb::new(0xff, 0xfb, 0xeb), BlendMode::Normal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalSvgPage {
    pub preset: FractalSvgPreset,
    pub base_frequency: f64,
    pub num_octaves: u32,
    pub seed: u32,
    pub background: Rgb,
    pub blend_mode: BlendMode,
}

impl Default for FractalSvgPage {
    fn default() -> Self {
        let (base_frequency, num_octaves, background, blend_mode) = FractalSvgPreset::Default.defaults();
        Self { preset: FractalSvgPreset::Default, base_frequency, num_octaves, seed: 0, background, blend_mode }
    }
}

impl FractalSvgPage {
    pub fn apply_preset(&mut self, preset: FractalSvgPreset) {
        let (base_frequency, num_octaves, background, blend_mode) = preset.defaults();
        self.preset = preset;
        self.base_frequency = base_frequency;
        self.num_octaves = num_octaves;
        self.background = background;
        self.blend_mode = blend_mode;
    }

    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seed = super::random_seed(rng);
    }

    fn turbulence(&self, stitch: StitchTiles) -> FilterNode {
        FilterNode::new(Primitive::Turbulence {
            kind: TurbulenceKind::FractalNoise,
            base_frequency: BaseFrequency::Uniform(self.base_frequency),
            num_octaves: self.num_octaves,
            seed: Some(self.seed as f64),
            stitch_tiles: Some(stitch),
        })
    }

    pub fn filter_graph(&self) -> FilterGraph {
        let graph = FilterGraph::new("noise");
        let noise = || FilterInput::result("noise");
        let over_source = || blend(self.blend_mode).input2(FilterInput::SourceGraphic);
        match self.preset {
            FractalSvgPreset::Default => graph.push(self.turbulence(StitchTiles::NoStitch)),
            FractalSvgPreset::Clouds => graph
                .push(self.turbulence(StitchTiles::Stitch).result("noise"))
                .push(
                    color_matrix(&[0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 1.2, 0.2])
                        .input(noise())
                        .result("cloudOpacity"),
                )
                .push(over_source()),
            FractalSvgPreset::Terrain => graph
                .with_region(FilterRegion::new("-20%", "-20%", "140%", "140%"))
                .push(self.turbulence(StitchTiles::Stitch).result("noise"))
                .push(blur(0.5).input(noise()).result("blurredNoise"))
                .push(
                    color_matrix(&[
                        0.33, 0.33, 0.33, 0., 0., 0.33, 0.33, 0.33, 0., 0., 0.33, 0.33, 0.33, 0., 0., 0., 0., 0., 3., -0.6,
                    ])
                    .input(FilterInput::result("blurredNoise"))
                    .result("contrast"),
                )
                .push(
                    FilterNode::new(Primitive::DiffuseLighting {
                        surface_scale: 20.0,
                        diffuse_constant: Some(1.5),
                        lighting_color: Rgb::WHITE,
                        light: DistantLight { azimuth: 135.0, elevation: 25.0 },
                    })
                    .input(FilterInput::result("contrast"))
                    .result("lighting"),
                )
                .push(
                    arithmetic(2.0, 0.5, 0.0, 0.0)
                        .input(FilterInput::result("lighting"))
                        .input2(FilterInput::result("contrast"))
                        .result("terrain"),
                )
                .push(over_source()),
            FractalSvgPreset::Paper => graph
                .push(self.turbulence(StitchTiles::Stitch).result("noise"))
                .push(
                    FilterNode::new(Primitive::DiffuseLighting {
                        surface_scale: 2.0,
                        diffuse_constant: None,
                        lighting_color: Rgb::WHITE,
                        light: DistantLight { azimuth: 45.0, elevation: 60.0 },
                    })
                    .input(noise())
                    .result("lighting"),
                )
                .push(over_source()),
        }
    }

    pub fn svg(&self) -> SvgDocument {
        SvgDocument::new(self.filter_graph()).layer(Layer::filtered(Element::full_rect(Some(self.background))))
    }

    pub fn preview(&self, size: u32) -> Raster {
        super::preview_filter(&self.filter_graph(), self.background, self.blend_mode, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        let mut page = FractalSvgPage::default();
        for preset in FractalSvgPreset::ALL {
            page.apply_preset(preset);
            let compiled = page.filter_graph().compile().unwrap();
            assert!(compiled.unused().is_empty(), "{preset:?}");
        }
    }

    #[test]
    fn terrain_expands_the_filter_region() {
        let mut page = FractalSvgPage::default();
        page.apply_preset(FractalSvgPreset::Terrain);
        assert_eq!(page.num_octaves, 8);
        let svg = page.svg().to_svg();
        assert!(svg.contains("<filter id=\"noise\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\">"));
        assert!(svg.contains("<feDistantLight azimuth=\"135\" elevation=\"25\" />"));
        assert!(svg.contains("<feBlend in2=\"SourceGraphic\" mode=\"multiply\" />"));
    }

    #[test]
    fn default_preset_does_not_stitch() {
        let svg = FractalSvgPage::default().svg().to_svg();
        assert!(svg.contains("stitchTiles=\"noStitch\""));
        assert!(svg.contains("seed=\"0\""));
    }

    #[test]
    fn blend_mode_flows_into_markup() {
        let mut page = FractalSvgPage::default();
        page.apply_preset(FractalSvgPreset::Clouds);
        assert!(page.svg().to_svg().contains("mode=\"soft-light\""));
    }

    #[test]
    fn lit_preset_preview_uses_background_tint() {
        let mut page = FractalSvgPage::default();
        page.apply_preset(FractalSvgPreset::Paper);
        let image = page.preview(6);
        // multiply never brightens past the background
        assert!(image.as_bytes().chunks(4).all(|p| p[2] <= 0xeb));
    }
}
