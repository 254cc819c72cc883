use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPlugin};
use noise_gallery_engine::pages::Page;

mod config;
mod pages_ui;
mod preview;
mod state;
mod ui_strings;

use config::GalleryConfig;
use state::EditorState;
use ui_strings::Locale;

fn setup(mut commands: Commands, mut state: ResMut<EditorState>) {
    commands.spawn(Camera2dBundle::default());
    if let Some(source) = state.config_source.take() {
        state.config.report(&source);
    }
    // reload now that logging is up, so override problems are reported
    let locale = state.locale;
    state.set_locale(locale);
}

fn animation_system(time: Res<Time>, mut state: ResMut<EditorState>) {
    if state.settings.page.is_animated() {
        state.tick(time.delta_seconds_f64() * 1000.0);
    }
}

fn page_list_ui(ui: &mut egui::Ui, state: &mut EditorState) {
    ui.heading(state.ui.lookup("common.title"));
    ui.separator();
    for page in Page::ALL {
        let title_key = page.title_key();
        let selected = state.settings.page == page;
        let response = ui.selectable_label(selected, state.ui.lookup(&title_key));
        let response = response.on_hover_text(state.ui.lookup(&page.description_key()).to_string());
        if response.clicked() {
            state.set_page(page);
        }
    }
    ui.separator();
    let mut locale = state.locale;
    egui::ComboBox::from_id_source("locale")
        .selected_text(locale.native_name())
        .show_ui(ui, |ui| {
            for l in Locale::ALL {
                ui.selectable_value(&mut locale, l, l.native_name());
            }
        });
    ui.label(state.ui.lookup("common.language"));
    if locale != state.locale {
        state.set_locale(locale);
    }
}

fn ui_system(mut contexts: EguiContexts, mut state: ResMut<EditorState>) {
    let ctx = contexts.ctx_mut().clone();
    let state = &mut *state;

    egui::SidePanel::left("pages").resizable(false).show(&ctx, |ui| page_list_ui(ui, state));

    egui::CentralPanel::default().show(&ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            let title_key = state.settings.page.title_key();
            let description_key = state.settings.page.description_key();
            ui.heading(state.ui.lookup(&title_key));
            ui.label(state.ui.lookup(&description_key));
            ui.separator();
            if pages_ui::page_controls(ui, &state.ui, &mut state.settings, &mut state.frosted) {
                state.dirty = true;
            }
            pages_ui::actions_ui(ui, state);
            ui.separator();
            preview::preview_ui(ui, state);
            preview::svg_code_ui(ui, state);
        });
    });

    state.refresh(&ctx);
    if state.settings.page.is_animated() {
        ctx.request_repaint();
    }
}

fn window_title_system(state: Res<EditorState>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in &mut windows {
        if window.title != state.ui.app.window_title {
            window.title = state.ui.app.window_title.clone();
        }
    }
}

fn main() {
    let (config, source) = GalleryConfig::load();
    let state = EditorState::new(config, source);
    let title = state.ui.app.window_title.clone();
    App::new()
        .insert_resource(state)
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window { title, ..default() }),
                ..default()
            }),
            EguiPlugin,
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, (animation_system, ui_system, window_title_system).chain())
        .run();
}
