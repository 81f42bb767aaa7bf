//! Sonoview core: waveform view engine and pitch mapping.
//!
//! The waveform side maps a zoomable, pannable sample range onto a raster
//! surface and tracks a drag selection. The pitch side redistributes linear
//! FFT bin energy onto a logarithmic musical scale.

pub mod audio;
pub mod config;
pub mod error;
pub mod pitch;
pub mod surface;
pub mod view;

pub use audio::buffer::SampleBuffer;
pub use error::Error;
