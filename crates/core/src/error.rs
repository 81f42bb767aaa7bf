//! Typed errors raised when constructing core values.
//!
//! The engines themselves never fail on numeric edge cases; they clamp.
//! Only constructors and settings validation report problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("sample buffer has no channels")]
    EmptyBuffer,

    #[error("channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("resolution must be positive, got {0}")]
    InvalidResolution(f32),

    #[error("FFT size must be a power of two between 32 and 32768, got {0}")]
    InvalidFftSize(usize),

    #[error("smoothing must be in [0, 1), got {0}")]
    InvalidSmoothing(f32),

    #[error("invalid color '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),
}
