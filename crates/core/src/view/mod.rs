//! Waveform view engine: visible range, selection drag, downsample rendering.

pub mod controller;
pub mod mapping;
pub mod render;
pub mod state;
pub mod types;

pub use controller::{InteractionController, Update, ViewEvent};
pub use mapping::PixelMap;
pub use render::{compute_columns, render_waveform, Column};
pub use state::{DragState, ViewState};
pub use types::*;
