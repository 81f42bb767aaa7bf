//! Interaction controller: turns input events into view state updates.
//!
//! The controller is the only writer of a [`ViewState`]. It never draws;
//! it reports through [`Update`] whether a redraw is due and notifies
//! registered listeners when the selection changes.

use serde::{Deserialize, Serialize};

use super::state::ViewState;
use super::types::{Selection, Viewport};

/// Keeps the wheel axis ratio defined when both deltas are zero.
const AXIS_EPSILON: f32 = 1e-6;

/// A wheel gesture is a pan when `|dx|/|dy|` exceeds this.
const PAN_AXIS_RATIO: f32 = 0.5;

/// Input in surface-pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    PointerPress { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerRelease,
    PointerLeave,
    Wheel { delta_x: f32, delta_y: f32, x: f32 },
    Resize { width: f32, height: f32 },
    ClearSelection,
}

/// What an event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Update {
    pub redraw: bool,
    pub selection_changed: bool,
}

impl Update {
    fn redraw() -> Self {
        Self {
            redraw: true,
            selection_changed: false,
        }
    }

    fn selection() -> Self {
        Self {
            redraw: true,
            selection_changed: true,
        }
    }

    pub fn merge(self, other: Update) -> Update {
        Update {
            redraw: self.redraw || other.redraw,
            selection_changed: self.selection_changed || other.selection_changed,
        }
    }
}

type SelectionListener = Box<dyn FnMut(Option<Selection>)>;

/// Routes events into a [`ViewState`].
#[derive(Default)]
pub struct InteractionController {
    listeners: Vec<SelectionListener>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `listener` with the new selection every time it changes.
    pub fn on_selection_change(&mut self, listener: impl FnMut(Option<Selection>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply one event. Rendering is left to the caller.
    pub fn handle(&mut self, state: &mut ViewState, event: ViewEvent) -> Update {
        let update = match event {
            ViewEvent::PointerPress { x, .. } => {
                state.begin_drag(x);
                Update::selection()
            }
            ViewEvent::PointerMove { x, .. } => {
                if state.drag_to(x) {
                    Update::selection()
                } else {
                    Update::default()
                }
            }
            ViewEvent::PointerRelease | ViewEvent::PointerLeave => {
                if state.end_drag() {
                    Update::redraw()
                } else {
                    Update::default()
                }
            }
            ViewEvent::Wheel { delta_x, delta_y, x } => {
                if is_pan_gesture(delta_x, delta_y) {
                    state.pan(delta_x);
                } else {
                    state.zoom(delta_y, x);
                }
                Update::redraw()
            }
            ViewEvent::Resize { width, height } => {
                state.resize(Viewport::new(width, height));
                Update::redraw()
            }
            ViewEvent::ClearSelection => {
                if state.clear_selection() {
                    Update::selection()
                } else {
                    Update::default()
                }
            }
        };

        if update.selection_changed {
            let selection = state.selection();
            for listener in &mut self.listeners {
                listener(selection);
            }
        }
        update
    }

    /// Apply a batch of events, reporting the combined update.
    pub fn handle_all(
        &mut self,
        state: &mut ViewState,
        events: impl IntoIterator<Item = ViewEvent>,
    ) -> Update {
        events
            .into_iter()
            .fold(Update::default(), |acc, event| acc.merge(self.handle(state, event)))
    }
}

/// Whether a wheel gesture pans (horizontal) rather than zooms (vertical).
pub fn is_pan_gesture(delta_x: f32, delta_y: f32) -> bool {
    (delta_x.abs() + AXIS_EPSILON) / (delta_y.abs() + AXIS_EPSILON) > PAN_AXIS_RATIO
}
