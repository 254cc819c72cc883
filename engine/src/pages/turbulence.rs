use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::filter::{
    BaseFrequency, BlendMode, Channel, DistantLight, Element, FilterGraph, FilterInput, FilterNode, Layer,
    Primitive, StitchTiles, SvgDocument, TurbulenceKind,
};
use crate::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurbulencePreset {
    #[default]
    Default,
    Fire,
    Smoke,
    Water,
    Electricity,
    Lightning,
}

impl TurbulencePreset {
    pub const ALL: [TurbulencePreset; 6] = [
        TurbulencePreset::Default,
        TurbulencePreset::Fire,
        TurbulencePreset::Smoke,
        TurbulencePreset::Water,
        TurbulencePreset::Electricity,
        TurbulencePreset::Lightning,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            TurbulencePreset::Default => "svgTurbulence.defaultEffect",
            TurbulencePreset::Fire => "svgTurbulence.fireEffect",
            TurbulencePreset::Smoke => "svgTurbulence.smokeEffect",
            TurbulencePreset::Water => "svgTurbulence.waterEffect",
            TurbulencePreset::Electricity => "svgTurbulence.electricityEffect",
            TurbulencePreset::Lightning => "svgTurbulence.lightningEffect",
        }
    }

    fn defaults(&self) -> (BaseFrequency, u32, Rgb, BlendMode) {
        match self {
            TurbulencePreset::Default => (BaseFrequency::Uniform(0.02), 4, Rgb::WHITE, BlendMode::Multiply),
            TurbulencePreset::Fire => (BaseFrequency::Pair(0.009, 0.001), 5, Rgb::new(0xff, 0x44, 0x44), BlendMode::Screen),
            TurbulencePreset::Smoke => (BaseFrequency::Pair(0.008, 0.04), 5, Rgb::new(0x1f, 0x29, 0x37), BlendMode::Screen),
            TurbulencePreset::Water => (BaseFrequency::Pair(0.015, 0.015), 5, Rgb::new(0x0e, 0xa5, 0xe9), BlendMode::Multiply),
            TurbulencePreset::Electricity => (BaseFrequency::Pair(0.05, 0.005), 1, Rgb::new(0x6b, 0x21, 0xa8), BlendMode::Screen),
            TurbulencePreset::Lightning => (BaseFrequency::Pair(0.005, 0.2), 2, Rgb::new(0x1e, 0x3a, 0x8a), BlendMode::Screen),
        }
    }
}

/// Turbulence page: a preset filter chain driven by frequency, octaves and seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbulencePage {
    pub preset: TurbulencePreset,
    pub base_frequency: BaseFrequency,
    pub num_octaves: u32,
    pub seed: u32,
    pub background: Rgb,
    pub blend_mode: BlendMode,
}

impl Default for TurbulencePage {
    fn default() -> Self {
        let mut page = Self {
            preset: TurbulencePreset::Default,
            base_frequency: BaseFrequency::Uniform(0.02),
            num_octaves: 4,
            seed: 0,
            background: Rgb::WHITE,
            blend_mode: BlendMode::Multiply,
        };
        page.apply_preset(TurbulencePreset::Default);
        page
    }
}

impl TurbulencePage {
    /// Switches preset and loads its frequency, octaves, colour and blend; the seed is kept.
    pub fn apply_preset(&mut self, preset: TurbulencePreset) {
        let (base_frequency, num_octaves, background, blend_mode) = preset.defaults();
        self.preset = preset;
        self.base_frequency = base_frequency;
        self.num_octaves = num_octaves;
        self.background = background;
        self.blend_mode = blend_mode;
    }

    /// Editing one axis turns the frequency into an `x y` pair.
    pub fn set_frequency_x(&mut self, x: f64) {
        self.base_frequency = BaseFrequency::Pair(x, self.base_frequency.y());
    }

    pub fn set_frequency_y(&mut self, y: f64) {
        self.base_frequency = BaseFrequency::Pair(self.base_frequency.x(), y);
    }

    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seed = super::random_seed(rng);
    }

    fn turbulence(&self, kind: TurbulenceKind, result: Option<&str>) -> FilterNode {
        let node = FilterNode::new(Primitive::Turbulence {
            kind,
            base_frequency: self.base_frequency,
            num_octaves: self.num_octaves,
            seed: Some(self.seed as f64),
            stitch_tiles: Some(StitchTiles::Stitch),
        });
        match result {
            Some(name) => node.result(name),
            None => node,
        }
    }

    pub fn filter_graph(&self) -> FilterGraph {
        let graph = FilterGraph::new("turbulence");
        let noise = || FilterInput::result("noise");
        match self.preset {
            TurbulencePreset::Default => graph.push(self.turbulence(TurbulenceKind::Turbulence, None)),
            TurbulencePreset::Fire => graph
                .push(self.turbulence(TurbulenceKind::FractalNoise, Some("noise")))
                .push(color_matrix(&[4., 0., 0., 0., -1., 0., 2., 0., 0., -0.5, 0., 0., 0.5, 0., -0.5, 0., 0., 0., 1., 0.]).result("colorized"))
                .push(blur(3.0).result("blurred"))
                .push(displacement(15.0, Channel::R, Channel::G).input(FilterInput::result("blurred")).input2(noise()).result("displaced"))
                .push(arithmetic(0.5, 0.5, 0.0, 0.0).input(FilterInput::result("displaced")).input2(FilterInput::result("blurred")).result("composed"))
                .push(blend(BlendMode::Screen).input(FilterInput::result("composed")).input2(FilterInput::SourceGraphic)),
            TurbulencePreset::Smoke => graph
                .push(self.turbulence(TurbulenceKind::FractalNoise, Some("noise")))
                .push(color_matrix(&[1.3, 0., 0., 0., -0.15, 0., 1.3, 0., 0., -0.15, 0., 0., 1.3, 0., -0.15, 0., 0., 0., 0.7, -0.1]).result("colored"))
                .push(blur(12.0).result("blurred"))
                .push(displacement(40.0, Channel::R, Channel::G).input(FilterInput::result("blurred")).input2(noise()).result("displaced"))
                .push(arithmetic(1.2, 0.3, -0.2, 0.0).input(FilterInput::result("displaced")).input2(noise()).result("composed"))
                .push(blur(4.0).result("finalBlur"))
                .push(blend(BlendMode::Screen).input(FilterInput::result("finalBlur")).input2(FilterInput::SourceGraphic)),
            TurbulencePreset::Water => graph
                .push(self.turbulence(TurbulenceKind::Turbulence, Some("noise")))
                .push(displacement(80.0, Channel::R, Channel::G).input(FilterInput::SourceGraphic).input2(noise()).result("displaced"))
                .push(blur(1.5).result("blurred"))
                .push(
                    FilterNode::new(Primitive::DiffuseLighting {
                        surface_scale: 10.0,
                        diffuse_constant: Some(1.2),
                        lighting_color: Rgb::WHITE,
                        light: DistantLight { azimuth: 45.0, elevation: 35.0 },
                    })
                    .input(FilterInput::result("blurred"))
                    .result("diffuse"),
                )
                .push(arithmetic(1.0, 0.5, 0.5, 0.0).input(FilterInput::result("diffuse")).input2(FilterInput::result("displaced")).result("composed"))
                .push(color_matrix(&[1., 0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 2., 0., 0., 0., 0., 0., 0.7, 0.]).result("colored"))
                .push(blend(BlendMode::Multiply).input(FilterInput::result("colored")).input2(FilterInput::SourceGraphic)),
            TurbulencePreset::Electricity => graph
                .push(self.turbulence(TurbulenceKind::Turbulence, Some("noise")))
                .push(color_matrix(&[1., 0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 15., -6.]))
                .push(blur(0.5).result("blurred"))
                .push(blend(BlendMode::Screen).input2(FilterInput::SourceGraphic)),
            TurbulencePreset::Lightning => graph
                .push(self.turbulence(TurbulenceKind::Turbulence, Some("noise")))
                .push(color_matrix(&[1., 0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 20., -10.]))
                .push(blur(0.3))
                .push(blend(BlendMode::Screen).input2(FilterInput::SourceGraphic)),
        }
    }

    pub fn svg(&self) -> SvgDocument {
        SvgDocument::new(self.filter_graph()).layer(Layer::filtered(Element::full_rect(Some(self.background))))
    }

    pub fn preview(&self, size: u32) -> Raster {
        let graph = self.filter_graph();
        // the water chain lights the noise; skip that for a flat turbulence look
        let graph = match self.preset {
            TurbulencePreset::Water => FilterGraph::new(graph.id).push(self.turbulence(TurbulenceKind::Turbulence, None)),
            _ => graph,
        };
        super::preview_filter(&graph, self.background, self.blend_mode, size)
    }
}

pub(super) fn color_matrix(values: &[f64]) -> FilterNode {
    FilterNode::new(Primitive::ColorMatrix { values: values.to_vec() })
}

pub(super) fn blur(std_deviation: f64) -> FilterNode {
    FilterNode::new(Primitive::GaussianBlur { std_deviation })
}

pub(super) fn displacement(scale: f64, x_channel: Channel, y_channel: Channel) -> FilterNode {
    FilterNode::new(Primitive::DisplacementMap { scale, x_channel, y_channel })
}

pub(super) fn arithmetic(k1: f64, k2: f64, k3: f64, k4: f64) -> FilterNode {
    FilterNode::new(Primitive::Composite { k1, k2, k3, k4 })
}

pub(super) fn blend(mode: BlendMode) -> FilterNode {
    FilterNode::new(Primitive::Blend { mode })
}
