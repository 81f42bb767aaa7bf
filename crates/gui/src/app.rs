//! Main application state and UI layout.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use eframe::egui;
use sonoview_core::config::Settings;
use sonoview_core::pitch::DisplayMode;
use sonoview_core::view::ViewEvent;

use crate::editor::{pitch_panel, timeline, SelectionCell, Session};

const MIN_RESOLUTION: f32 = 10.0;
const MAX_RESOLUTION: f32 = 4000.0;

pub struct SonoviewApp {
    settings: Settings,
    session: Option<Session>,
    /// Updated by the controller's selection notification.
    selection: SelectionCell,
    error: Option<String>,
}

impl SonoviewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::from_env().unwrap_or_else(|e| {
            log::warn!("Using default settings: {:#}", e);
            Settings::default()
        });

        Self {
            settings,
            session: None,
            selection: Rc::new(Cell::new(None)),
            error: None,
        }
    }

    fn open(&mut self, path: &Path) {
        match Session::open(path, &self.settings, self.selection.clone()) {
            Ok(session) => {
                log::info!("Opened {}", path.display());
                self.session = Some(session);
                self.error = None;
            }
            Err(e) => {
                log::error!("Open failed: {:#}", e);
                self.error = Some(format!("{:#}", e));
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.label(egui::RichText::new("Sonoview").strong());
            ui.separator();

            if ui.button("Open WAV...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("WAV audio", &["wav"])
                    .pick_file()
                {
                    self.open(&path);
                }
            }

            let has_selection = self.selection.get().is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Clear selection"))
                .clicked()
            {
                if let Some(session) = &mut self.session {
                    session.handle(ViewEvent::ClearSelection);
                }
            }

            ui.separator();

            let mut resolution = self.settings.view.resolution;
            let slider = egui::Slider::new(&mut resolution, MIN_RESOLUTION..=MAX_RESOLUTION)
                .logarithmic(true)
                .text("Resolution");
            if ui.add(slider).changed() {
                self.settings.view.resolution = resolution;
                if let Some(session) = &mut self.session {
                    session.view.set_options(self.settings.view.clone());
                }
            }

            ui.separator();

            let mode = &mut self.settings.pitch.mode;
            ui.selectable_value(mode, DisplayMode::Note, "Notes");
            ui.selectable_value(mode, DisplayMode::Frequency, "Hz");

            if let Some(err) = &self.error {
                ui.separator();
                ui.colored_label(egui::Color32::RED, err);
            }
        });
    }
}

impl eframe::App for SonoviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.show_toolbar(ui));

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.session {
                Some(session) => {
                    let range = session.view.range();
                    ui.label(session.file_name());
                    ui.separator();
                    ui.label(format!(
                        "{} ch | {} Hz | {} samples",
                        session.view.buffer().channel_count(),
                        session.view.buffer().sample_rate(),
                        session.view.buffer_len()
                    ));
                    ui.separator();
                    ui.label(format!("view {}..{}", range.start, range.end));
                    if let Some(sel) = self.selection.get() {
                        let sel = sel.normalized();
                        ui.separator();
                        ui.label(format!("selection {}..{}", sel.start, sel.end));
                    }
                }
                None => {
                    ui.weak("No file loaded");
                }
            });
        });

        if let Some(session) = &mut self.session {
            let options = &self.settings.pitch;
            egui::TopBottomPanel::bottom("pitch_panel")
                .resizable(true)
                .min_height(100.0)
                .default_height(180.0)
                .show(ctx, |ui| pitch_panel::show_pitch_panel(ui, session, options));
        }

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.session {
            Some(session) => {
                timeline::show_waveform(ui, session);
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("Open a WAV file to begin");
                    ui.weak("Drag to select, scroll vertically to zoom, horizontally to pan");
                });
            }
        });
    }
}
