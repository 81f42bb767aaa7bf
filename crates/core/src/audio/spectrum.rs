//! Windowed FFT analyser producing decibel frames for the pitch mapper.

use std::sync::Arc;

use apodize::blackman_iter;
use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use serde::Serialize;

use super::buffer::SampleBuffer;
use crate::error::Error;

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32768;
pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING: f32 = 0.8;

/// Floor applied before the log so silence maps to a finite value.
pub const MIN_DECIBELS: f32 = -200.0;

/// One analysis frame: `fft_size / 2` magnitudes in dB covering 0 Hz up to
/// Nyquist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyFrame {
    pub magnitudes_db: Vec<f32>,
    pub sample_rate: u32,
}

impl FrequencyFrame {
    pub fn bin_width(&self) -> f64 {
        if self.magnitudes_db.is_empty() {
            return 0.0;
        }
        self.sample_rate as f64 / 2.0 / self.magnitudes_db.len() as f64
    }
}

pub struct SpectrumAnalyser {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    input: Vec<f32>,
    output: Vec<Complex32>,
    // Linear magnitudes of the previous frame
    smoothed: Vec<f32>,
    smoothing: f32,
    size: usize,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize, smoothing: f32) -> Result<Self, Error> {
        if !fft_size.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
            return Err(Error::InvalidFftSize(fft_size));
        }
        if !(0.0..1.0).contains(&smoothing) {
            return Err(Error::InvalidSmoothing(smoothing));
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let window: Vec<f32> = blackman_iter(fft_size).map(|w| w as f32).collect();
        let input = fft.make_input_vec();
        let output = fft.make_output_vec();
        log::debug!("Spectrum analyser: fft_size={fft_size}, smoothing={smoothing}");

        Ok(Self {
            fft,
            window,
            input,
            output,
            smoothed: vec![0.0; fft_size / 2],
            smoothing,
            size: fft_size,
        })
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.size / 2
    }

    /// Forget the previous frame so the next one is unsmoothed.
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|m| *m = 0.0);
    }

    /// Analyse `fft_size` mono samples starting at `position`.
    pub fn analyse(&mut self, buffer: &SampleBuffer, position: usize) -> FrequencyFrame {
        let samples = buffer.mono_window(position, self.size);
        self.analyse_samples(&samples, buffer.sample_rate())
    }

    /// Analyse a raw mono block; shorter blocks are zero-padded.
    pub fn analyse_samples(&mut self, samples: &[f32], sample_rate: u32) -> FrequencyFrame {
        for (i, slot) in self.input.iter_mut().enumerate() {
            *slot = samples.get(i).copied().unwrap_or(0.0) * self.window[i];
        }

        if let Err(e) = self.fft.process(&mut self.input, &mut self.output) {
            log::warn!("FFT failed: {e}");
            return FrequencyFrame {
                magnitudes_db: vec![MIN_DECIBELS; self.frequency_bin_count()],
                sample_rate,
            };
        }

        let scale = 1.0 / self.size as f32;
        let tau = self.smoothing;
        let magnitudes_db = self
            .smoothed
            .iter_mut()
            .zip(&self.output)
            .map(|(prev, bin)| {
                let current = bin.norm() * scale;
                *prev = tau * *prev + (1.0 - tau) * current;
                if *prev > 0.0 {
                    (20.0 * prev.log10()).max(MIN_DECIBELS)
                } else {
                    MIN_DECIBELS
                }
            })
            .collect();

        FrequencyFrame {
            magnitudes_db,
            sample_rate,
        }
    }
}
