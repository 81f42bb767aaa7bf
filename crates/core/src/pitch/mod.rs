//! Pitch mapping: linear FFT bins onto a quarter-tone-wide musical scale.

pub mod mapper;
pub mod render;

pub use mapper::{note_name, pitch_frequency, pitch_span, PitchBinTable, PitchMapper};
pub use render::{render_pitch_bars, DisplayMode, PitchDisplayOptions};
