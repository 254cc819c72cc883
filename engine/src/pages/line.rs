use serde::{Deserialize, Serialize};

use crate::animation::LineSweep;
use crate::color::Rgb;
use crate::filter::{
    BaseFrequency, Channel, Element, FilterGraph, FilterInput, FilterNode, FilterRegion, Layer, Primitive,
    StitchTiles, SvgDocument, TurbulenceKind,
};
use crate::preview::{displace, line_source, turbulence_channels, LineDirection};
use crate::raster::Raster;

const CANVAS: f64 = 400.0;

/// A straight line wobbled by animated displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineAnimationPage {
    /// Peak noise frequency reached mid-sweep.
    pub frequency: f64,
    pub scale: f64,
    pub line_color: Rgb,
    pub line_width: f64,
    pub animation_speed: f64,
    pub direction: LineDirection,
}

impl Default for LineAnimationPage {
    fn default() -> Self {
        Self {
            frequency: 0.01,
            scale: 25.0,
            line_color: Rgb::BLACK,
            line_width: 4.0,
            animation_speed: 1.0,
            direction: LineDirection::Horizontal,
        }
    }
}

impl LineAnimationPage {
    pub fn sweep(&self) -> LineSweep {
        LineSweep::new(self.frequency, self.animation_speed)
    }

    pub fn filter_graph(&self, sweep: &LineSweep) -> FilterGraph {
        let region = match self.direction {
            LineDirection::Horizontal => FilterRegion::new(0, -200, CANVAS, CANVAS),
            LineDirection::Vertical => FilterRegion::new(-200, 0, CANVAS, CANVAS),
        };
        FilterGraph::new(format!("noise-{}", sweep.seed.floor() as i64))
            .with_region(region)
            .push(
                FilterNode::new(Primitive::Turbulence {
                    kind: TurbulenceKind::FractalNoise,
                    base_frequency: BaseFrequency::Uniform(sweep.current_frequency()),
                    num_octaves: 1,
                    seed: Some(sweep.seed.floor()),
                    stitch_tiles: Some(StitchTiles::NoStitch),
                })
                .result("turbulence"),
            )
            .push(
                FilterNode::new(Primitive::DisplacementMap { scale: self.scale, x_channel: Channel::R, y_channel: Channel::G })
                    .input(FilterInput::SourceGraphic)
                    .input2(FilterInput::result("turbulence")),
            )
    }

    pub fn svg(&self, sweep: &LineSweep) -> SvgDocument {
        let offset = (CANVAS / 2.0 - self.line_width / 2.0).to_string();
        let (x, y, width, height) = match self.direction {
            LineDirection::Horizontal => ("0".to_string(), offset, CANVAS.to_string(), self.line_width.to_string()),
            LineDirection::Vertical => (offset, "0".to_string(), self.line_width.to_string(), CANVAS.to_string()),
        };
        SvgDocument::new(self.filter_graph(sweep))
            .view_box([0.0, 0.0, CANVAS, CANVAS])
            .layer(Layer::filtered(Element::Rect { x: Some(x), y: Some(y), width, height, fill: Some(self.line_color) }))
    }

    pub fn preview(&self, sweep: &LineSweep, size: u32) -> Raster {
        let line = line_source(size, self.line_width, self.line_color, self.direction);
        let map = turbulence_channels(
            TurbulenceKind::FractalNoise,
            BaseFrequency::Uniform(sweep.current_frequency()),
            1,
            sweep.seed.floor() as i32,
            size,
            size,
        );
        displace(&line, &map, self.scale, Channel::R, Channel::G)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FrameDriver;

    #[test]
    fn horizontal_line_is_centered() {
        let page = LineAnimationPage::default();
        let svg = page.svg(&page.sweep()).to_svg();
        assert!(svg.contains("<rect x=\"0\" y=\"198\" width=\"400\" height=\"4\" fill=\"#000000\" filter=\"url(#noise-0)\" />"));
        assert!(svg.contains("<filter id=\"noise-0\" x=\"0\" y=\"-200\" width=\"400\" height=\"400\">"));
    }

    #[test]
    fn vertical_line_swaps_axes() {
        let page = LineAnimationPage { direction: LineDirection::Vertical, line_width: 6.0, ..Default::default() };
        let svg = page.svg(&page.sweep()).to_svg();
        assert!(svg.contains("<rect x=\"197\" y=\"0\" width=\"6\" height=\"400\""));
        assert!(svg.contains("x=\"-200\" y=\"0\""));
    }

    #[test]
    fn sweep_advances_filter_seed_and_frequency() {
        let page = LineAnimationPage::default();
        let mut sweep = page.sweep();
        sweep.tick(1000.0);
        let graph = page.filter_graph(&sweep);
        assert_eq!(graph.id, "noise-20");
        match &graph.nodes[0].primitive {
            Primitive::Turbulence { base_frequency, .. } => {
                assert!((base_frequency.x() - 0.005).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_scale_preview_is_the_plain_line() {
        let page = LineAnimationPage { scale: 0.0, ..Default::default() };
        let sweep = page.sweep();
        let out = page.preview(&sweep, 32);
        assert_eq!(out, line_source(32, 4.0, Rgb::BLACK, LineDirection::Horizontal));
    }
}
