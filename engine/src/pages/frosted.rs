use serde::{Deserialize, Serialize};

use crate::filter::{
    BaseFrequency, Channel, Element, FilterGraph, FilterInput, FilterNode, FilterRegion, Layer, Primitive,
    SvgDocument, TurbulenceKind,
};
use crate::preview::{displace, turbulence_channels};
use crate::raster::Raster;

/// Stretched turbulence displacing an image, like ribbed glass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrostedGlassPage {
    pub enabled: bool,
    pub base_frequency: BaseFrequency,
    pub num_octaves: u32,
    /// Displacement strength.
    pub scale: f64,
    pub image_href: String,
}

impl Default for FrostedGlassPage {
    fn default() -> Self {
        Self {
            enabled: true,
            base_frequency: BaseFrequency::Pair(0.01, 0.4),
            num_octaves: 2,
            scale: 20.0,
            image_href: "demo.jpg".to_string(),
        }
    }
}

impl FrostedGlassPage {
    pub fn filter_graph(&self) -> FilterGraph {
        FilterGraph::new("noise")
            .with_region(FilterRegion::new("0%", "0%", "100%", "100%"))
            .push(
                FilterNode::new(Primitive::Turbulence {
                    kind: TurbulenceKind::Turbulence,
                    base_frequency: self.base_frequency,
                    num_octaves: self.num_octaves,
                    seed: None,
                    stitch_tiles: None,
                })
                .result("NOISE"),
            )
            .push(
                FilterNode::new(Primitive::DisplacementMap { scale: self.scale, x_channel: Channel::R, y_channel: Channel::R })
                    .input(FilterInput::SourceGraphic)
                    .input2(FilterInput::result("NOISE")),
            )
    }

    /// Image fitted to at most 640 px wide, keeping its aspect ratio.
    pub fn svg(&self, image_width: u32, image_height: u32) -> SvgDocument {
        let width = image_width.clamp(1, 640);
        let height = ((width as f64) * image_height as f64 / image_width.max(1) as f64).round() as u32;
        let layer = Element::Image { href: self.image_href.clone() };
        let layer = if self.enabled { Layer::filtered(layer) } else { Layer::plain(layer) };
        SvgDocument::new(self.filter_graph())
            .size(width, height)
            .view_box([0.0, 0.0, 100.0, height as f64 / width as f64 * 100.0])
            .layer(layer)
    }

    pub fn preview(&self, source: &Raster) -> Raster {
        if !self.enabled {
            return source.clone();
        }
        let map = turbulence_channels(
            TurbulenceKind::Turbulence,
            self.base_frequency,
            self.num_octaves,
            0,
            source.width(),
            source.height(),
        );
        displace(source, &map, self.scale, Channel::R, Channel::R)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::preview::checkerboard;

    #[test]
    fn disabled_effect_leaves_image_untouched() {
        let source = checkerboard(16, 16, 4, Rgb::BLACK, Rgb::WHITE);
        let page = FrostedGlassPage { enabled: false, ..Default::default() };
        assert_eq!(page.preview(&source), source);
        assert!(!page.svg(16, 16).to_svg().contains("filter=\"url(#noise)\""));
    }

    #[test]
    fn wide_images_are_fitted() {
        let doc = FrostedGlassPage::default().svg(1280, 960);
        assert_eq!((doc.width, doc.height), (640, 480));
        assert!(doc.to_svg().contains("viewBox=\"0 0 100 75\""));
        assert!(doc.to_svg().contains("xChannelSelector=\"R\" yChannelSelector=\"R\""));
    }

    #[test]
    fn enabled_preview_keeps_size() {
        let source = checkerboard(12, 9, 3, Rgb::BLACK, Rgb::WHITE);
        let out = FrostedGlassPage::default().preview(&source);
        assert_eq!((out.width(), out.height()), (12, 9));
    }
}
