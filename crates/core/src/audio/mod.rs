//! Sample buffers, WAV I/O and spectral analysis.

pub mod buffer;
pub mod io;
pub mod spectrum;

pub use buffer::SampleBuffer;
pub use spectrum::{FrequencyFrame, SpectrumAnalyser};
