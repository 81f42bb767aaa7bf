//! Live pitch bars for the sample under focus.

use eframe::egui;
use sonoview_core::pitch::render::bin_label;
use sonoview_core::pitch::{render_pitch_bars, PitchDisplayOptions};
use sonoview_core::view::render::format_seconds;

use super::waveform_painter::PainterSurface;
use super::Session;

/// Re-analyse and paint every frame; the panel drives its own repaints.
pub fn show_pitch_panel(ui: &mut egui::Ui, session: &mut Session, options: &PitchDisplayOptions) {
    let table = session.pitch_table();
    let position = session.focus_sample();
    let sample_rate = session.view.buffer().sample_rate();

    ui.horizontal(|ui| {
        ui.label(format!(
            "Pitch at sample {} ({})",
            position,
            format_seconds(position, sample_rate)
        ));
        if let Some((index, _)) = table.peak() {
            ui.separator();
            ui.label(egui::RichText::new(bin_label(index, options.mode)).strong());
        }
    });

    let size = egui::vec2(ui.available_width(), ui.available_height().max(60.0));
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect);
        render_pitch_bars(&table, options, &mut surface);
    }

    ui.ctx().request_repaint();
}
