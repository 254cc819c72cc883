use std::path::PathBuf;

use anyhow::Context;
use bevy::log::{error, info, warn};
use bevy::prelude::*;
use bevy_egui::egui;
use noise_gallery_engine::animation::{FrameDriver, LineSweep, SeedDriver};
use noise_gallery_engine::filter::SvgDocument;
use noise_gallery_engine::pages::Page;
use noise_gallery_engine::preview::checkerboard;
use noise_gallery_engine::{GallerySnapshot, PerlinGenerator, Raster, Rgb, Seed};
use rand::Rng;

use crate::config::{ConfigSource, GalleryConfig};
use crate::preview;
use crate::ui_strings::{Locale, UiStrings};

/// Image the frosted-glass page distorts.
pub struct FrostedSource {
    pub path: String,
    pub raster: Raster,
}

impl Default for FrostedSource {
    fn default() -> Self {
        let light = Rgb::new(0xe5, 0xe7, 0xeb);
        let dark = Rgb::new(0x37, 0x41, 0x51);
        Self { path: String::new(), raster: checkerboard(320, 240, 20, light, dark) }
    }
}

#[derive(Resource)]
pub struct EditorState {
    pub config: GalleryConfig,
    pub config_source: Option<ConfigSource>,
    pub locale: Locale,
    pub ui: UiStrings,
    /// Every page's settings plus the current page and table seed.
    pub settings: GallerySnapshot,
    pub generator: PerlinGenerator,
    pub seed_driver: SeedDriver,
    pub line_sweep: LineSweep,
    pub frosted: FrostedSource,
    pub preview: Option<Raster>,
    pub texture: Option<egui::TextureHandle>,
    pub svg: Option<String>,
    pub status: Option<String>,
    pub dirty: bool,
}

impl EditorState {
    pub fn new(config: GalleryConfig, source: ConfigSource) -> Self {
        let locale = Locale::from_code(&config.locale).unwrap_or_default();
        let seed = Seed(rand::thread_rng().gen());
        let settings = GallerySnapshot { seed: Some(seed), ..Default::default() };
        Self {
            locale,
            ui: UiStrings::builtin(locale),
            generator: PerlinGenerator::from_seed(seed),
            seed_driver: settings.animated.driver(),
            line_sweep: settings.line.sweep(),
            settings,
            frosted: FrostedSource::default(),
            preview: None,
            texture: None,
            svg: None,
            status: None,
            dirty: true,
            config,
            config_source: Some(source),
        }
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.ui = UiStrings::for_locale(locale, self.config.localization_dir.as_deref());
        info!("Switched locale to {}", locale.code());
    }

    pub fn set_page(&mut self, page: Page) {
        if self.settings.page == page {
            return;
        }
        self.settings.page = page;
        match page {
            Page::AnimatedNoise => self.seed_driver.reset(),
            Page::LineAnimation => self.line_sweep.reset(),
            _ => {}
        }
        self.status = None;
        self.dirty = true;
    }

    /// Advances the current page's animation, if it has one.
    pub fn tick(&mut self, delta_ms: f64) {
        match self.settings.page {
            Page::AnimatedNoise => self.seed_driver.tick(delta_ms),
            Page::LineAnimation => self.line_sweep.tick(delta_ms),
            _ => return,
        }
        self.dirty = true;
    }

    pub fn can_regenerate(&self) -> bool {
        matches!(self.settings.page, Page::Perlin | Page::Fractal | Page::SvgFractal | Page::SvgTurbulence)
    }

    pub fn regenerate(&mut self) {
        let mut rng = rand::thread_rng();
        match self.settings.page {
            Page::Perlin | Page::Fractal => {
                let seed = Seed(rng.gen());
                self.generator = PerlinGenerator::from_seed(seed);
                self.settings.seed = Some(seed);
            }
            Page::SvgFractal => self.settings.svg_fractal.regenerate(&mut rng),
            Page::SvgTurbulence => self.settings.turbulence.regenerate(&mut rng),
            _ => return,
        }
        self.dirty = true;
    }

    /// Speed and frequency edits apply to running animations without a restart.
    fn sync_drivers(&mut self) {
        self.seed_driver.speed = self.settings.animated.speed;
        self.line_sweep.frequency = self.settings.line.frequency;
        self.line_sweep.speed = self.settings.line.animation_speed;
    }

    pub fn svg_document(&self) -> Option<SvgDocument> {
        let s = &self.settings;
        let doc = match s.page {
            Page::Perlin | Page::Fractal => return None,
            Page::SvgFractal => s.svg_fractal.svg(),
            Page::SvgTurbulence => s.turbulence.svg(),
            Page::Noise => s.noise.svg(),
            Page::FrostedGlass => s.frosted_glass.svg(self.frosted.raster.width(), self.frosted.raster.height()),
            Page::PaperTexture => s.paper.svg(),
            Page::LineAnimation => s.line.svg(&self.line_sweep),
            Page::AnimatedNoise => s.animated.svg(self.seed_driver.seed),
        };
        Some(doc)
    }

    fn render_preview(&self) -> Raster {
        let s = &self.settings;
        let size = self.config.preview_size;
        match s.page {
            Page::Perlin => s.perlin.render(self.generator.field()),
            Page::Fractal => s.fractal.render(self.generator.field()),
            Page::SvgFractal => s.svg_fractal.preview(size),
            Page::SvgTurbulence => s.turbulence.preview(size),
            Page::Noise => s.noise.preview(size),
            Page::FrostedGlass => s.frosted_glass.preview(&self.frosted.raster),
            Page::PaperTexture => s.paper.preview(size),
            Page::LineAnimation => s.line.preview(&self.line_sweep, size),
            Page::AnimatedNoise => s.animated.preview(self.seed_driver.seed, size),
        }
    }

    /// Re-renders the preview and SVG text when something changed.
    pub fn refresh(&mut self, ctx: &egui::Context) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        self.sync_drivers();
        let raster = self.render_preview();
        preview::upload(ctx, &mut self.texture, &raster);
        self.preview = Some(raster);
        self.svg = self.svg_document().map(|doc| {
            // animated pages rebuild every frame; only check the static ones
            if !self.settings.page.is_animated() {
                if let Err(err) = doc.filter.validate() {
                    warn!("Filter for {:?} is invalid: {err}", self.settings.page);
                }
            }
            doc.to_svg()
        });
    }

    fn export_path(&self, extension: &str) -> PathBuf {
        self.config.export_dir.join(format!("{}.{extension}", self.settings.page.key()))
    }

    fn ensure_export_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.config.export_dir)
            .with_context(|| format!("creating {}", self.config.export_dir.display()))
    }

    pub fn export_png(&self) -> anyhow::Result<PathBuf> {
        let raster = self.preview.as_ref().context("nothing rendered yet")?;
        self.ensure_export_dir()?;
        let path = self.export_path("png");
        raster.save_png(&path)?;
        Ok(path)
    }

    pub fn save_svg(&self) -> anyhow::Result<PathBuf> {
        let svg = self.svg.as_ref().context("this page has no SVG output")?;
        self.ensure_export_dir()?;
        let path = self.export_path("svg");
        std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn save_snapshot(&self) -> anyhow::Result<PathBuf> {
        let path = self.config.snapshot_path.clone();
        self.settings.save(&path)?;
        Ok(path)
    }

    pub fn load_snapshot(&mut self) -> anyhow::Result<PathBuf> {
        let path = self.config.snapshot_path.clone();
        let snapshot = GallerySnapshot::load(&path)?;
        if let Some(seed) = snapshot.seed {
            self.generator = PerlinGenerator::from_seed(seed);
        }
        self.settings = snapshot;
        self.seed_driver = self.settings.animated.driver();
        self.line_sweep = self.settings.line.sweep();
        self.dirty = true;
        Ok(path)
    }

    pub fn load_frosted_image(&mut self) -> anyhow::Result<()> {
        let path = self.frosted.path.trim().to_string();
        let raster = Raster::open(&path).with_context(|| format!("opening {path}"))?;
        self.settings.frosted_glass.image_href =
            PathBuf::from(&path).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or(path);
        self.frosted.raster = raster;
        self.dirty = true;
        Ok(())
    }

    /// Logs the outcome of a file action and shows it in the status line.
    pub fn report(&mut self, action: &str, result: anyhow::Result<PathBuf>) {
        self.status = Some(match result {
            Ok(path) => {
                info!("{action}: {}", path.display());
                format!("{action}: {}", path.display())
            }
            Err(err) => {
                error!("{action} failed: {err:#}");
                format!("{action} {}: {err:#}", self.ui.preview.failed)
            }
        });
    }
}
