use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy::log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "NOISE_GALLERY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "gallery.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// `en-US` or `zh-CN`.
    pub locale: String,
    /// Directory holding `<locale>.json` string overrides.
    pub localization_dir: Option<PathBuf>,
    pub export_dir: PathBuf,
    /// Edge length of the SVG page previews, in pixels.
    pub preview_size: u32,
    pub snapshot_path: PathBuf,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            localization_dir: Some(PathBuf::from("locales")),
            export_dir: PathBuf::from("exports"),
            preview_size: 256,
            snapshot_path: PathBuf::from("gallery_snapshot.ron"),
        }
    }
}

/// Where the active configuration came from, reported once logging is up.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Missing(PathBuf),
    Invalid(PathBuf, String),
}

impl GalleryConfig {
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self = ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Never fails: a missing or broken file yields the defaults.
    pub fn load() -> (Self, ConfigSource) {
        let path = Self::path();
        if !path.exists() {
            return (Self::default(), ConfigSource::Missing(path));
        }
        match Self::load_from(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(err) => (Self::default(), ConfigSource::Invalid(path, format!("{err:#}"))),
        }
    }

    pub fn report(&self, source: &ConfigSource) {
        match source {
            ConfigSource::File(path) => info!("Loaded config from {}: {:?}", path.display(), self),
            ConfigSource::Missing(path) => info!("No config at {}, using defaults", path.display()),
            ConfigSource::Invalid(path, err) => warn!("Invalid config {}: {err}; using defaults", path.display()),
        }
    }

    fn sanitized(mut self) -> Self {
        self.preview_size = self.preview_size.clamp(64, 1024);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = std::env::temp_dir().join(format!("noise_gallery_config_{}.ron", std::process::id()));
        std::fs::write(&path, "(locale: \"zh-CN\", preview_size: 5000)").unwrap();
        let config = GalleryConfig::load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.preview_size, 1024);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("noise_gallery_bad_config_{}.ron", std::process::id()));
        std::fs::write(&path, "(locale: 7").unwrap();
        let result = GalleryConfig::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
    }
}
