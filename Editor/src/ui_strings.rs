use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use bevy::log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    EnUs,
    ZhCn,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::EnUs, Locale::ZhCn];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::ZhCn => "zh-CN",
        }
    }

    /// Exact codes first, then the language prefix (`zh-TW` -> Chinese).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Locale::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
            .or_else(|| match code.get(..2).map(str::to_ascii_lowercase).as_deref() {
                Some("zh") => Some(Locale::ZhCn),
                Some("en") => Some(Locale::EnUs),
                _ => None,
            })
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::EnUs => "English",
            Locale::ZhCn => "简体中文",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UiStrings {
    #[serde(default)]
    pub app: AppStrings,
    #[serde(default)]
    pub menu: MenuStrings,
    #[serde(default)]
    pub preview: PreviewStrings,
    /// Page texts keyed by dotted path, e.g. `paper.frequency`.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppStrings {
    pub window_title: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MenuStrings {
    pub regenerate: String,
    pub export_png: String,
    pub save_svg: String,
    pub save_snapshot: String,
    pub load_snapshot: String,
    pub copy_code: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PreviewStrings {
    pub title: String,
    pub svg_code: String,
    pub copied: String,
    pub failed: String,
}

impl UiStrings {
    pub fn builtin(locale: Locale) -> Self {
        match locale {
            Locale::EnUs => en_us(),
            Locale::ZhCn => zh_cn(),
        }
    }

    /// Built-in table for `locale`, overlaid with `<dir>/<code>.json` when
    /// that file exists.
    pub fn for_locale(locale: Locale, localization_dir: Option<&Path>) -> Self {
        let base = Self::builtin(locale);
        let Some(dir) = localization_dir else {
            return base;
        };
        let path = dir.join(format!("{}.json", locale.code()));
        if !path.exists() {
            return base;
        }
        match load_from_file(&path) {
            Ok(overrides) => {
                info!("Loaded UI strings from {}", path.display());
                base.overlay(overrides)
            }
            Err(err) => {
                warn!("Ignoring UI strings in {}: {err:#}", path.display());
                base
            }
        }
    }

    /// Text for a dotted key; the key itself when nothing matches.
    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Replaces every entry that `other` sets to a non-empty string.
    pub fn overlay(mut self, other: UiStrings) -> Self {
        fn pick(base: &mut String, over: String) {
            if !over.is_empty() {
                *base = over;
            }
        }
        pick(&mut self.app.window_title, other.app.window_title);
        pick(&mut self.menu.regenerate, other.menu.regenerate);
        pick(&mut self.menu.export_png, other.menu.export_png);
        pick(&mut self.menu.save_svg, other.menu.save_svg);
        pick(&mut self.menu.save_snapshot, other.menu.save_snapshot);
        pick(&mut self.menu.load_snapshot, other.menu.load_snapshot);
        pick(&mut self.menu.copy_code, other.menu.copy_code);
        pick(&mut self.preview.title, other.preview.title);
        pick(&mut self.preview.svg_code, other.preview.svg_code);
        pick(&mut self.preview.copied, other.preview.copied);
        pick(&mut self.preview.failed, other.preview.failed);
        self.messages.extend(other.messages.into_iter().filter(|(_, v)| !v.is_empty()));
        self
    }
}

pub fn load_from_file(path: &Path) -> anyhow::Result<UiStrings> {
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let ui: UiStrings = serde_json::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
    Ok(ui)
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn en_us() -> UiStrings {
    UiStrings {
        app: AppStrings { window_title: "Noise Gallery".to_string() },
        menu: MenuStrings {
            regenerate: "Regenerate".to_string(),
            export_png: "Export PNG".to_string(),
            save_svg: "Save SVG".to_string(),
            save_snapshot: "Save Settings".to_string(),
            load_snapshot: "Load Settings".to_string(),
            copy_code: "Copy".to_string(),
        },
        preview: PreviewStrings {
            title: "Preview".to_string(),
            svg_code: "SVG Code".to_string(),
            copied: "Copied to clipboard".to_string(),
            failed: "Failed".to_string(),
        },
        messages: table(&[
            ("common.title", "Demo Projects"),
            ("common.language", "Language"),
            ("common.demos.perlin.title", "Perlin Noise"),
            ("common.demos.perlin.description", "Generate grayscale patterns using Perlin Noise algorithm"),
            ("common.demos.fractal.title", "Fractal Noise"),
            ("common.demos.fractal.description", "Generate rich fractal textures based on Perlin Noise"),
            ("common.demos.svgFractal.title", "SVG Fractal"),
            ("common.demos.svgFractal.description", "Generate fractal noise effect using SVG feTurbulence filter"),
            ("common.demos.svgTurbulence.title", "SVG Turbulence"),
            ("common.demos.svgTurbulence.description", "Generate turbulence noise effect using SVG feTurbulence filter"),
            ("common.demos.noise.title", "SVG Noise"),
            ("common.demos.noise.description", "Generate basic noise effect using SVG feTurbulence filter"),
            ("common.demos.frostedGlass.title", "SVG Frosted Glass"),
            ("common.demos.frostedGlass.description", "Generate frosted glass effect using SVG feTurbulence filter"),
            ("common.demos.paperTexture.title", "SVG Paper Texture"),
            (
                "common.demos.paperTexture.description",
                "Generate paper texture effect using SVG feTurbulence and feDiffuseLighting filters",
            ),
            ("common.demos.lineAnimation.title", "SVG Line Animation"),
            ("common.demos.lineAnimation.description", "Create line animation effect using SVG filters"),
            ("common.demos.animatedNoise.title", "SVG Animated Noise"),
            ("common.demos.animatedNoise.description", "Animate the feTurbulence seed over time"),
            ("perlin.scale", "Scale"),
            ("perlin.size", "Canvas Size"),
            ("fractal.scale", "Scale"),
            ("fractal.octaves", "Octaves"),
            ("fractal.persistence", "Persistence"),
            ("fractal.lacunarity", "Lacunarity"),
            ("fractal.size", "Canvas Size"),
            ("paper.frequency", "Texture Frequency"),
            ("paper.octaves", "Octaves"),
            ("paper.surfaceScale", "Surface Scale"),
            ("paper.elevation", "Light Elevation"),
            ("paper.azimuth", "Light Azimuth"),
            ("paper.backgroundColor", "Background Color"),
            ("frostedGlass.switch", "Effect Switch"),
            ("frostedGlass.enableEffect", "Enable Frosted Glass Effect"),
            ("frostedGlass.frequencyX", "X-axis Frequency"),
            ("frostedGlass.frequencyY", "Y-axis Frequency"),
            ("frostedGlass.octaves", "Octaves"),
            ("frostedGlass.scale", "Displacement Scale"),
            ("frostedGlass.image", "Image File"),
            ("frostedGlass.loadImage", "Load Image"),
            ("svgTurbulence.preset", "Preset Effects"),
            ("svgTurbulence.defaultEffect", "Default Effect"),
            ("svgTurbulence.fireEffect", "Fire Effect"),
            ("svgTurbulence.smokeEffect", "Smoke Effect"),
            ("svgTurbulence.waterEffect", "Water Effect"),
            ("svgTurbulence.electricityEffect", "Electricity Effect"),
            ("svgTurbulence.lightningEffect", "Lightning Effect"),
            ("svgTurbulence.frequencyX", "X-axis Base Frequency"),
            ("svgTurbulence.frequencyY", "Y-axis Base Frequency"),
            ("svgTurbulence.octaves", "Octaves"),
            ("svgTurbulence.backgroundColor", "Background Color"),
            ("svgTurbulence.blendMode", "Blend Mode"),
            ("svgFractal.preset", "Preset Effects"),
            ("svgFractal.defaultEffect", "Default Effect"),
            ("svgFractal.cloudsEffect", "Clouds Effect"),
            ("svgFractal.terrainEffect", "Terrain Effect"),
            ("svgFractal.paperEffect", "Paper Texture"),
            ("svgFractal.frequency", "Base Frequency"),
            ("svgFractal.octaves", "Octaves"),
            ("svgFractal.backgroundColor", "Background Color"),
            ("svgFractal.blendMode", "Blend Mode"),
            ("noise.frequency", "Base Frequency"),
            ("noise.opacity", "Opacity"),
            ("noise.octaves", "Octaves"),
            ("noise.backgroundColor", "Background Color"),
            ("noise.blendMode", "Blend Mode"),
            ("lineAnimation.horizontalLine", "Horizontal Line"),
            ("lineAnimation.verticalLine", "Vertical Line"),
            ("lineAnimation.frequency", "Noise Frequency"),
            ("lineAnimation.scale", "Displacement Scale"),
            ("lineAnimation.lineColor", "Line Color"),
            ("lineAnimation.lineWidth", "Line Width"),
            ("lineAnimation.animationSpeed", "Animation Speed"),
            ("lineAnimation.direction", "Line Direction"),
            ("animatedNoise.type", "Noise Type"),
            ("animatedNoise.fractalNoise", "Fractal Noise"),
            ("animatedNoise.turbulence", "Turbulence"),
            ("animatedNoise.frequency", "Base Frequency"),
            ("animatedNoise.octaves", "Octaves"),
            ("animatedNoise.speed", "Speed"),
        ]),
    }
}

fn zh_cn() -> UiStrings {
    UiStrings {
        app: AppStrings { window_title: "噪音演示".to_string() },
        menu: MenuStrings {
            regenerate: "重新生成".to_string(),
            export_png: "导出 PNG".to_string(),
            save_svg: "保存 SVG".to_string(),
            save_snapshot: "保存设置".to_string(),
            load_snapshot: "读取设置".to_string(),
            copy_code: "复制".to_string(),
        },
        preview: PreviewStrings {
            title: "预览".to_string(),
            svg_code: "SVG 代码".to_string(),
            copied: "已复制到剪贴板".to_string(),
            failed: "失败".to_string(),
        },
        messages: table(&[
            ("common.title", "演示项目集"),
            ("common.language", "语言"),
            ("common.demos.perlin.title", "Perlin 噪音"),
            ("common.demos.perlin.description", "使用 Perlin 噪音算法生成随机的灰度图案"),
            ("common.demos.fractal.title", "分形噪点"),
            ("common.demos.fractal.description", "基于 Perlin 噪音叠加生成更丰富的分形纹理"),
            ("common.demos.svgFractal.title", "SVG 分形噪点"),
            ("common.demos.svgFractal.description", "使用 SVG feTurbulence 滤镜生成分形噪点效果"),
            ("common.demos.svgTurbulence.title", "SVG 湍流噪点"),
            ("common.demos.svgTurbulence.description", "使用 SVG feTurbulence 滤镜生成湍流噪点效果"),
            ("common.demos.noise.title", "SVG 噪点"),
            ("common.demos.noise.description", "使用 SVG feTurbulence 滤镜生成基础噪点效果"),
            ("common.demos.frostedGlass.title", "SVG 毛玻璃"),
            ("common.demos.frostedGlass.description", "使用 SVG feTurbulence 滤镜生成毛玻璃效果"),
            ("common.demos.paperTexture.title", "SVG 纸张纹理"),
            ("common.demos.paperTexture.description", "使用 SVG feTurbulence 和 feDiffuseLighting 滤镜生成纸张纹理效果"),
            ("common.demos.lineAnimation.title", "SVG 线条动画"),
            ("common.demos.lineAnimation.description", "使用 SVG 滤镜制作线条跳动动画效果"),
            ("common.demos.animatedNoise.title", "SVG 动态噪点"),
            ("common.demos.animatedNoise.description", "随时间改变 feTurbulence 的种子"),
            ("perlin.scale", "缩放"),
            ("perlin.size", "画布尺寸"),
            ("fractal.scale", "缩放"),
            ("fractal.octaves", "叠加次数"),
            ("fractal.persistence", "持续度"),
            ("fractal.lacunarity", "频率倍增"),
            ("fractal.size", "画布尺寸"),
            ("paper.frequency", "纹理频率"),
            ("paper.octaves", "叠加次数"),
            ("paper.surfaceScale", "纹理深度"),
            ("paper.elevation", "光源高度"),
            ("paper.azimuth", "光源角度"),
            ("paper.backgroundColor", "背景颜色"),
            ("frostedGlass.switch", "效果开关"),
            ("frostedGlass.enableEffect", "启用毛玻璃效果"),
            ("frostedGlass.frequencyX", "X轴频率"),
            ("frostedGlass.frequencyY", "Y轴频率"),
            ("frostedGlass.octaves", "叠加次数"),
            ("frostedGlass.scale", "偏移系数"),
            ("frostedGlass.image", "图片文件"),
            ("frostedGlass.loadImage", "载入图片"),
            ("svgTurbulence.preset", "预设效果"),
            ("svgTurbulence.defaultEffect", "默认效果"),
            ("svgTurbulence.fireEffect", "火焰效果"),
            ("svgTurbulence.smokeEffect", "烟雾效果"),
            ("svgTurbulence.waterEffect", "水波效果"),
            ("svgTurbulence.electricityEffect", "电流效果"),
            ("svgTurbulence.lightningEffect", "闪电效果"),
            ("svgTurbulence.frequencyX", "X轴基础频率"),
            ("svgTurbulence.frequencyY", "Y轴基础频率"),
            ("svgTurbulence.octaves", "叠加次数"),
            ("svgTurbulence.backgroundColor", "背景颜色"),
            ("svgTurbulence.blendMode", "混合模式"),
            ("svgFractal.preset", "预设效果"),
            ("svgFractal.defaultEffect", "默认效果"),
            ("svgFractal.cloudsEffect", "云雾效果"),
            ("svgFractal.terrainEffect", "地形起伏"),
            ("svgFractal.paperEffect", "纸张纹理"),
            ("svgFractal.frequency", "基础频率"),
            ("svgFractal.octaves", "叠加次数"),
            ("svgFractal.backgroundColor", "背景颜色"),
            ("svgFractal.blendMode", "混合模式"),
            ("noise.frequency", "基础频率"),
            ("noise.opacity", "不透明度"),
            ("noise.octaves", "叠加次数"),
            ("noise.backgroundColor", "背景颜色"),
            ("noise.blendMode", "混合模式"),
            ("lineAnimation.horizontalLine", "水平线条"),
            ("lineAnimation.verticalLine", "垂直线条"),
            ("lineAnimation.frequency", "噪声频率"),
            ("lineAnimation.scale", "位移幅度"),
            ("lineAnimation.lineColor", "线条颜色"),
            ("lineAnimation.lineWidth", "线条宽度"),
            ("lineAnimation.animationSpeed", "动画速度"),
            ("lineAnimation.direction", "线条方向"),
            ("animatedNoise.type", "噪点类型"),
            ("animatedNoise.fractalNoise", "分形噪点"),
            ("animatedNoise.turbulence", "湍流"),
            ("animatedNoise.frequency", "基础频率"),
            ("animatedNoise.octaves", "叠加次数"),
            ("animatedNoise.speed", "速度"),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise_gallery_engine::pages::Page;

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let ui = UiStrings::builtin(Locale::EnUs);
        assert_eq!(ui.lookup("paper.frequency"), "Texture Frequency");
        assert_eq!(ui.lookup("paper.nope"), "paper.nope");
    }

    #[test]
    fn both_tables_cover_the_same_keys() {
        let en = UiStrings::builtin(Locale::EnUs);
        let zh = UiStrings::builtin(Locale::ZhCn);
        assert_eq!(en.messages.keys().collect::<Vec<_>>(), zh.messages.keys().collect::<Vec<_>>());
        for page in Page::ALL {
            assert!(zh.messages.contains_key(&page.title_key()), "{page:?}");
            assert!(en.messages.contains_key(&page.description_key()), "{page:?}");
        }
    }

    #[test]
    fn locale_codes_resolve_by_prefix() {
        assert_eq!(Locale::from_code("zh-CN"), Some(Locale::ZhCn));
        assert_eq!(Locale::from_code("zh-TW"), Some(Locale::ZhCn));
        assert_eq!(Locale::from_code("en-GB"), Some(Locale::EnUs));
        assert_eq!(Locale::from_code("fr-FR"), None);
    }

    #[test]
    fn json_overrides_only_replace_what_they_set() {
        let dir = std::env::temp_dir().join(format!("noise_gallery_strings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("en-US.json"),
            r#"{ "app": { "window_title": "My Gallery" }, "messages": { "paper.octaves": "Layers" } }"#,
        )
        .unwrap();
        let ui = UiStrings::for_locale(Locale::EnUs, Some(&dir));
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(ui.app.window_title, "My Gallery");
        assert_eq!(ui.lookup("paper.octaves"), "Layers");
        assert_eq!(ui.lookup("paper.azimuth"), "Light Azimuth");
        assert_eq!(ui.menu.regenerate, "Regenerate");
    }
}
