use bevy_egui::egui;
use noise_gallery_engine::api::ranges;
use noise_gallery_engine::filter::{BaseFrequency, BlendMode, TurbulenceKind};
use noise_gallery_engine::pages::{FractalSvgPreset, Page, TurbulencePreset};
use noise_gallery_engine::preview::LineDirection;
use noise_gallery_engine::{GallerySnapshot, ParamRange, Rgb};

use crate::state::{EditorState, FrostedSource};
use crate::ui_strings::UiStrings;

fn slider(ui: &mut egui::Ui, value: &mut f64, range: ParamRange, label: &str) -> bool {
    let changed = ui.add(egui::Slider::new(value, range.inclusive()).step_by(range.step).text(label)).changed();
    *value = range.clamp(*value);
    changed
}

fn int_slider(ui: &mut egui::Ui, value: &mut u32, range: ParamRange, label: &str) -> bool {
    let bounds = range.min as u32..=range.max as u32;
    let changed = ui.add(egui::Slider::new(value, bounds).text(label)).changed();
    *value = range.clamp(*value as f64) as u32;
    changed
}

fn color(ui: &mut egui::Ui, value: &mut Rgb, label: &str) -> bool {
    ui.horizontal(|ui| {
        let changed = ui.color_edit_button_srgb(&mut value.0).changed();
        ui.label(label);
        changed
    })
    .inner
}

fn blend_mode(ui: &mut egui::Ui, id: &str, value: &mut BlendMode, label: &str) -> bool {
    let before = *value;
    egui::ComboBox::from_id_source(id).selected_text(value.as_str()).show_ui(ui, |ui| {
        for mode in BlendMode::ALL {
            ui.selectable_value(value, mode, mode.as_str());
        }
    });
    ui.label(label);
    *value != before
}

/// Controls for the current page; returns whether any setting changed.
pub fn page_controls(ui: &mut egui::Ui, t: &UiStrings, s: &mut GallerySnapshot, frosted: &mut FrostedSource) -> bool {
    match s.page {
        Page::Perlin => {
            let p = &mut s.perlin;
            let mut changed = slider(ui, &mut p.scale, ranges::SCALE, t.lookup("perlin.scale"));
            changed |= int_slider(ui, &mut p.size, ranges::CANVAS_SIZE, t.lookup("perlin.size"));
            changed
        }
        Page::Fractal => {
            let f = &mut s.fractal;
            let mut changed = slider(ui, &mut f.settings.scale, ranges::SCALE, t.lookup("fractal.scale"));
            changed |= int_slider(ui, &mut f.settings.octaves, ranges::OCTAVES, t.lookup("fractal.octaves"));
            changed |= slider(ui, &mut f.settings.persistence, ranges::PERSISTENCE, t.lookup("fractal.persistence"));
            changed |= slider(ui, &mut f.settings.lacunarity, ranges::LACUNARITY, t.lookup("fractal.lacunarity"));
            changed |= int_slider(ui, &mut f.size, ranges::CANVAS_SIZE, t.lookup("fractal.size"));
            changed
        }
        Page::SvgFractal => {
            let p = &mut s.svg_fractal;
            let mut changed = false;
            ui.horizontal(|ui| {
                ui.label(t.lookup("svgFractal.preset"));
                for preset in FractalSvgPreset::ALL {
                    if ui.selectable_label(p.preset == preset, t.lookup(preset.label_key())).clicked() {
                        p.apply_preset(preset);
                        changed = true;
                    }
                }
            });
            changed |= slider(ui, &mut p.base_frequency, ranges::BASE_FREQUENCY, t.lookup("svgFractal.frequency"));
            changed |= int_slider(ui, &mut p.num_octaves, ranges::OCTAVES, t.lookup("svgFractal.octaves"));
            changed |= color(ui, &mut p.background, t.lookup("svgFractal.backgroundColor"));
            changed |= blend_mode(ui, "svg_fractal_blend", &mut p.blend_mode, t.lookup("svgFractal.blendMode"));
            changed
        }
        Page::SvgTurbulence => {
            let p = &mut s.turbulence;
            let mut changed = false;
            ui.label(t.lookup("svgTurbulence.preset"));
            ui.horizontal_wrapped(|ui| {
                for preset in TurbulencePreset::ALL {
                    if ui.selectable_label(p.preset == preset, t.lookup(preset.label_key())).clicked() {
                        p.apply_preset(preset);
                        changed = true;
                    }
                }
            });
            let mut x = p.base_frequency.x();
            let mut y = p.base_frequency.y();
            if slider(ui, &mut x, ranges::BASE_FREQUENCY, t.lookup("svgTurbulence.frequencyX")) {
                p.set_frequency_x(x);
                changed = true;
            }
            if slider(ui, &mut y, ranges::BASE_FREQUENCY, t.lookup("svgTurbulence.frequencyY")) {
                p.set_frequency_y(y);
                changed = true;
            }
            changed |= int_slider(ui, &mut p.num_octaves, ranges::OCTAVES, t.lookup("svgTurbulence.octaves"));
            changed |= color(ui, &mut p.background, t.lookup("svgTurbulence.backgroundColor"));
            changed |= blend_mode(ui, "turbulence_blend", &mut p.blend_mode, t.lookup("svgTurbulence.blendMode"));
            changed
        }
        Page::Noise => {
            let p = &mut s.noise;
            let mut changed = slider(ui, &mut p.frequency, ranges::NOISE_FREQUENCY, t.lookup("noise.frequency"));
            changed |= slider(ui, &mut p.opacity, ranges::OPACITY, t.lookup("noise.opacity"));
            changed |= int_slider(ui, &mut p.num_octaves, ranges::OCTAVES, t.lookup("noise.octaves"));
            changed |= color(ui, &mut p.background, t.lookup("noise.backgroundColor"));
            changed |= blend_mode(ui, "noise_blend", &mut p.blend_mode, t.lookup("noise.blendMode"));
            changed
        }
        Page::FrostedGlass => {
            let p = &mut s.frosted_glass;
            let mut changed = ui.checkbox(&mut p.enabled, t.lookup("frostedGlass.enableEffect")).changed();
            let mut x = p.base_frequency.x();
            let mut y = p.base_frequency.y();
            let x_changed = slider(ui, &mut x, ranges::BASE_FREQUENCY, t.lookup("frostedGlass.frequencyX"));
            let y_changed = slider(ui, &mut y, ranges::BASE_FREQUENCY, t.lookup("frostedGlass.frequencyY"));
            if x_changed || y_changed {
                p.base_frequency = BaseFrequency::Pair(x, y);
                changed = true;
            }
            changed |= int_slider(ui, &mut p.num_octaves, ranges::OCTAVES, t.lookup("frostedGlass.octaves"));
            changed |= slider(ui, &mut p.scale, ranges::DISPLACEMENT_SCALE, t.lookup("frostedGlass.scale"));
            ui.horizontal(|ui| {
                ui.label(t.lookup("frostedGlass.image"));
                ui.text_edit_singleline(&mut frosted.path);
            });
            changed
        }
        Page::PaperTexture => {
            let p = &mut s.paper;
            let mut changed = slider(ui, &mut p.frequency, ranges::PAPER_FREQUENCY, t.lookup("paper.frequency"));
            changed |= int_slider(ui, &mut p.num_octaves, ranges::OCTAVES, t.lookup("paper.octaves"));
            changed |= slider(ui, &mut p.surface_scale, ranges::SURFACE_SCALE, t.lookup("paper.surfaceScale"));
            changed |= slider(ui, &mut p.elevation, ranges::ELEVATION, t.lookup("paper.elevation"));
            changed |= slider(ui, &mut p.azimuth, ranges::AZIMUTH, t.lookup("paper.azimuth"));
            changed |= color(ui, &mut p.background, t.lookup("paper.backgroundColor"));
            changed
        }
        Page::LineAnimation => {
            let p = &mut s.line;
            let mut changed = false;
            ui.horizontal(|ui| {
                ui.label(t.lookup("lineAnimation.direction"));
                changed |= ui
                    .selectable_value(&mut p.direction, LineDirection::Horizontal, t.lookup("lineAnimation.horizontalLine"))
                    .changed();
                changed |= ui
                    .selectable_value(&mut p.direction, LineDirection::Vertical, t.lookup("lineAnimation.verticalLine"))
                    .changed();
            });
            changed |= slider(ui, &mut p.frequency, ranges::LINE_FREQUENCY, t.lookup("lineAnimation.frequency"));
            changed |= slider(ui, &mut p.scale, ranges::DISPLACEMENT_SCALE, t.lookup("lineAnimation.scale"));
            changed |= color(ui, &mut p.line_color, t.lookup("lineAnimation.lineColor"));
            changed |= slider(ui, &mut p.line_width, ranges::LINE_WIDTH, t.lookup("lineAnimation.lineWidth"));
            changed |= slider(ui, &mut p.animation_speed, ranges::ANIMATION_SPEED, t.lookup("lineAnimation.animationSpeed"));
            changed
        }
        Page::AnimatedNoise => {
            let p = &mut s.animated;
            let mut changed = false;
            ui.horizontal(|ui| {
                ui.label(t.lookup("animatedNoise.type"));
                for kind in TurbulenceKind::ALL {
                    let label = match kind {
                        TurbulenceKind::FractalNoise => t.lookup("animatedNoise.fractalNoise"),
                        TurbulenceKind::Turbulence => t.lookup("animatedNoise.turbulence"),
                    };
                    if ui.selectable_label(p.kind == kind, label).clicked() && p.kind != kind {
                        p.set_kind(kind);
                        changed = true;
                    }
                }
            });
            changed |= slider(ui, &mut p.frequency, ranges::ANIMATED_FREQUENCY, t.lookup("animatedNoise.frequency"));
            changed |= int_slider(ui, &mut p.num_octaves, ranges::OCTAVES, t.lookup("animatedNoise.octaves"));
            changed |= slider(ui, &mut p.speed, ranges::ANIMATED_SPEED, t.lookup("animatedNoise.speed"));
            changed
        }
    }
}

/// Regenerate, export and snapshot buttons under the controls.
pub fn actions_ui(ui: &mut egui::Ui, state: &mut EditorState) {
    ui.horizontal_wrapped(|ui| {
        if state.can_regenerate() && ui.button(&state.ui.menu.regenerate).clicked() {
            state.regenerate();
        }
        if state.settings.page == Page::FrostedGlass
            && ui.button(state.ui.lookup("frostedGlass.loadImage")).clicked()
        {
            let action = state.ui.lookup("frostedGlass.loadImage").to_string();
            let result = state.load_frosted_image().map(|_| state.frosted.path.clone().into());
            state.report(&action, result);
        }
        if ui.button(&state.ui.menu.export_png).clicked() {
            let action = state.ui.menu.export_png.clone();
            let result = state.export_png();
            state.report(&action, result);
        }
        if state.svg.is_some() && ui.button(&state.ui.menu.save_svg).clicked() {
            let action = state.ui.menu.save_svg.clone();
            let result = state.save_svg();
            state.report(&action, result);
        }
        if ui.button(&state.ui.menu.save_snapshot).clicked() {
            let action = state.ui.menu.save_snapshot.clone();
            let result = state.save_snapshot();
            state.report(&action, result);
        }
        if ui.button(&state.ui.menu.load_snapshot).clicked() {
            let action = state.ui.menu.load_snapshot.clone();
            let result = state.load_snapshot();
            state.report(&action, result);
        }
    });
    if let Some(status) = &state.status {
        ui.small(status);
    }
}
