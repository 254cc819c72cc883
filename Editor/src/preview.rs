use bevy_egui::egui;
use noise_gallery_engine::Raster;

use crate::state::EditorState;

pub fn color_image(raster: &Raster) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied([raster.width() as usize, raster.height() as usize], raster.as_bytes())
}

/// Reuses the existing texture so animated pages don't allocate per frame.
pub fn upload(ctx: &egui::Context, texture: &mut Option<egui::TextureHandle>, raster: &Raster) {
    let image = color_image(raster);
    match texture {
        Some(tex) => tex.set(image, egui::TextureOptions::NEAREST),
        None => *texture = Some(ctx.load_texture("preview", image, egui::TextureOptions::NEAREST)),
    }
}

pub fn preview_ui(ui: &mut egui::Ui, state: &EditorState) {
    ui.heading(&state.ui.preview.title);
    let Some(tex) = &state.texture else {
        ui.spinner();
        return;
    };
    let tex_size = tex.size_vec2();
    let available = ui.available_size_before_wrap();
    let scale = (available.x / tex_size.x).min(1.0);
    ui.image(egui::load::SizedTexture::new(tex.id(), tex_size * scale));
}

/// Read-only code box with a copy button.
pub fn svg_code_ui(ui: &mut egui::Ui, state: &mut EditorState) {
    let Some(svg) = &state.svg else {
        return;
    };
    ui.separator();
    let mut copied = false;
    ui.horizontal(|ui| {
        ui.strong(&state.ui.preview.svg_code);
        if ui.button(&state.ui.menu.copy_code).clicked() {
            ui.output_mut(|o| o.copied_text = svg.clone());
            copied = true;
        }
    });
    egui::ScrollArea::vertical().id_source("svg_code").max_height(240.0).show(ui, |ui| {
        ui.add(
            egui::TextEdit::multiline(&mut svg.as_str())
                .code_editor()
                .desired_width(f32::INFINITY),
        );
    });
    if copied {
        state.status = Some(state.ui.preview.copied.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_image_keeps_dimensions_and_pixels() {
        let mut raster = Raster::new(3, 2);
        raster.put_pixel(2, 1, [10, 20, 30, 255]);
        let image = color_image(&raster);
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[5], egui::Color32::from_rgb(10, 20, 30));
        assert_eq!(image.pixels[0], egui::Color32::TRANSPARENT);
    }
}
