//! Whole-gallery settings persisted as RON.

use std::fs;
use std::path::Path;

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{NoiseError, Seed};
use crate::pages::{
    AnimatedNoisePage, FractalPage, FractalSvgPage, FrostedGlassPage, LineAnimationPage, NoisePage, Page, PaperPage,
    PerlinPage, TurbulencePage,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySnapshot {
    pub page: Page,
    /// Seed of the permutation table; `None` means a fresh random table.
    pub seed: Option<Seed>,
    pub perlin: PerlinPage,
    pub fractal: FractalPage,
    pub svg_fractal: FractalSvgPage,
    pub turbulence: TurbulencePage,
    pub noise: NoisePage,
    pub frosted_glass: FrostedGlassPage,
    pub paper: PaperPage,
    pub line: LineAnimationPage,
    pub animated: AnimatedNoisePage,
}

impl GallerySnapshot {
    pub fn to_ron(&self) -> Result<String, NoiseError> {
        ron::ser::to_string_pretty(self, PrettyConfig::default()).map_err(|e| NoiseError::Snapshot(e.to_string()))
    }

    pub fn from_ron(text: &str) -> Result<Self, NoiseError> {
        ron::from_str(text).map_err(|e| NoiseError::Snapshot(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NoiseError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ron()?)?;
        info!(path = %path.display(), "saved gallery snapshot");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NoiseError> {
        let path = path.as_ref();
        let snapshot = Self::from_ron(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), page = ?snapshot.page, "loaded gallery snapshot");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{BaseFrequency, TurbulenceKind};
    use crate::pages::TurbulencePreset;

    #[test]
    fn survives_a_file_round_trip() {
        let mut snapshot = GallerySnapshot { page: Page::SvgTurbulence, seed: Some(Seed(77)), ..Default::default() };
        snapshot.turbulence.apply_preset(TurbulencePreset::Smoke);
        snapshot.fractal.settings.octaves = 6;
        snapshot.frosted_glass.base_frequency = BaseFrequency::Pair(0.02, 0.3);
        snapshot.animated.set_kind(TurbulenceKind::Turbulence);

        let path = std::env::temp_dir().join(format!("noise_gallery_snapshot_{}.ron", std::process::id()));
        snapshot.save(&path).unwrap();
        let loaded = GallerySnapshot::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let loaded = GallerySnapshot::from_ron("(page: Noise, noise: (opacity: 0.25))").unwrap();
        assert_eq!(loaded.page, Page::Noise);
        assert_eq!(loaded.noise.opacity, 0.25);
        assert_eq!(loaded.noise.frequency, NoisePage::default().frequency);
        assert_eq!(loaded.perlin, PerlinPage::default());
    }

    #[test]
    fn malformed_text_is_a_snapshot_error() {
        let err = GallerySnapshot::from_ron("(page: Nowhere)").unwrap_err();
        assert!(matches!(err, NoiseError::Snapshot(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GallerySnapshot::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, NoiseError::Io(_)));
    }
}
