//! Immutable multi-channel sample storage shared by a view session.

use crate::error::Error;

/// Decoded audio: one `Vec<f32>` per channel, all of equal length.
///
/// Owned by whoever decoded it and shared read-only (usually behind an
/// `Arc`) with the view engine and the analyser.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors.
    ///
    /// Channels may be empty, but they must all have the same length.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, Error> {
        if channels.is_empty() {
            return Err(Error::EmptyBuffer);
        }
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate);
        }
        let expected = channels[0].len();
        for (channel, data) in channels.iter().enumerate().skip(1) {
            if data.len() != expected {
                return Err(Error::ChannelLengthMismatch {
                    channel,
                    expected,
                    found: data.len(),
                });
            }
        }
        Ok(Self { channels, sample_rate })
    }

    /// Build a buffer from frame-ordered interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: usize,
        sample_rate: u32,
    ) -> Result<Self, Error> {
        if channel_count == 0 {
            return Err(Error::EmptyBuffer);
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &s) in channels.iter_mut().zip(frame) {
                channel.push(s);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration_s(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Channel-averaged window of `len` samples starting at `start`.
    ///
    /// Positions past the end of the buffer read as silence.
    pub fn mono_window(&self, start: usize, len: usize) -> Vec<f32> {
        let mut window = vec![0.0f32; len];
        let available = self.len().saturating_sub(start).min(len);
        if available == 0 {
            return window;
        }
        for channel in &self.channels {
            for (out, &s) in window.iter_mut().zip(&channel[start..start + available]) {
                *out += s;
            }
        }
        let norm = 1.0 / self.channels.len() as f32;
        for s in window.iter_mut().take(available) {
            *s *= norm;
        }
        window
    }

    /// Copy of the samples in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> SampleBuffer {
        let end = end.min(self.len());
        let start = start.min(end);
        SampleBuffer {
            channels: self
                .channels
                .iter()
                .map(|c| c[start..end].to_vec())
                .collect(),
            sample_rate: self.sample_rate,
        }
    }
}
