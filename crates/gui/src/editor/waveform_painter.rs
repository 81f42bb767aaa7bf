//! `Surface` implementation on top of an `egui::Painter`.

use eframe::egui;
use sonoview_core::surface::{Rect, Rgba, Surface};

const LABEL_FONT_SIZE: f32 = 10.0;

pub fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Surface rectangle translated into screen space at `origin`.
pub fn to_screen(origin: egui::Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x, rect.y),
        egui::vec2(rect.width.max(0.0), rect.height.max(0.0)),
    )
}

/// Draws into `rect` of the painter; surface coordinates start at the
/// rect's top-left corner.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    font: egui::FontId,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect) -> Self {
        Self {
            painter,
            rect,
            font: egui::FontId::proportional(LABEL_FONT_SIZE),
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> (f32, f32) {
        (self.rect.width(), self.rect.height())
    }

    fn fill_background(&mut self, rect: Rect, color: Rgba) {
        self.painter
            .rect_filled(to_screen(self.rect.min, rect), 0.0, color32(color));
    }

    fn fill_bar(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        let rect = to_screen(self.rect.min, Rect::new(x, y, width, height));
        self.painter.rect_filled(rect, 0.0, color32(color));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgba) {
        let color = color32(color);
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), self.font.clone(), color);
        self.painter
            .galley(self.rect.min + egui::vec2(x, y), galley, color);
    }
}
