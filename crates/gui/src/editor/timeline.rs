//! Waveform canvas: turns egui pointer input into view events and paints
//! the current view.

use eframe::egui;
use sonoview_core::view::{render_waveform, ViewEvent, Viewport};

use super::waveform_painter::PainterSurface;
use super::Session;

/// Pointer input for one frame, in canvas-local coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasInput {
    pub size: egui::Vec2,
    pub press: Option<f32>,
    pub drag_to: Option<f32>,
    pub release: bool,
    pub left: bool,
    pub hover_x: Option<f32>,
    /// egui scroll delta (positive y is scrolling up).
    pub scroll: egui::Vec2,
}

impl CanvasInput {
    fn read(ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) -> Self {
        let local = |pos: egui::Pos2| pos.x - rect.left();
        let primary = egui::PointerButton::Primary;
        let pointer = response.interact_pointer_pos().map(local);

        Self {
            size: rect.size(),
            press: if response.drag_started_by(primary) { pointer } else { None },
            drag_to: if response.dragged_by(primary) { pointer } else { None },
            release: response.drag_stopped_by(primary),
            left: !response.contains_pointer(),
            hover_x: response.hover_pos().map(local),
            scroll: if response.hovered() {
                ui.input(|i| i.raw_scroll_delta)
            } else {
                egui::Vec2::ZERO
            },
        }
    }
}

/// Events for one frame of canvas input, in the order they happened.
pub fn translate(input: &CanvasInput, viewport: Viewport, dragging: bool) -> Vec<ViewEvent> {
    let mut events = Vec::new();

    if input.size.x != viewport.width || input.size.y != viewport.height {
        events.push(ViewEvent::Resize {
            width: input.size.x,
            height: input.size.y,
        });
    }

    if let Some(x) = input.press {
        events.push(ViewEvent::PointerPress { x, y: 0.0 });
    }
    let dragging = dragging || input.press.is_some();
    if let Some(x) = input.drag_to {
        if dragging && !input.left {
            events.push(ViewEvent::PointerMove { x, y: 0.0 });
        }
    }
    if dragging {
        if input.release {
            events.push(ViewEvent::PointerRelease);
        } else if input.left {
            events.push(ViewEvent::PointerLeave);
        }
    }

    if input.scroll != egui::Vec2::ZERO {
        // Wheel deltas are positive when scrolling down/right
        events.push(ViewEvent::Wheel {
            delta_x: -input.scroll.x,
            delta_y: -input.scroll.y,
            x: input.hover_x.unwrap_or(0.0),
        });
    }

    events
}

/// Feed one frame of input to the session, then map the hover position
/// against the viewport those events leave behind.
pub fn apply_input(session: &mut Session, input: &CanvasInput) {
    for event in translate(input, session.view.viewport(), session.view.is_dragging()) {
        session.handle(event);
    }
    session.hovered_sample = input.hover_x.map(|x| session.view.sample_at(x));
}

/// Show the waveform canvas filling the available space.
pub fn show_waveform(ui: &mut egui::Ui, session: &mut Session) -> egui::Response {
    let size = egui::vec2(ui.available_width(), ui.available_height().max(80.0));
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

    let input = CanvasInput::read(ui, &response, rect);
    apply_input(session, &input);

    if ui.is_rect_visible(rect) {
        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect);
        render_waveform(&session.view, &mut surface);
    }
    if session.view.take_dirty() {
        ui.ctx().request_repaint();
    }

    response
}
