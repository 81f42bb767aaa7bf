//! Audio I/O: multi-channel WAV read/write.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

use super::buffer::SampleBuffer;

/// Read a WAV file into a [`SampleBuffer`].
///
/// - Normalizes integer PCM to f32 in [-1, 1]
/// - Passes through float WAVs unchanged
/// - Keeps every channel
pub fn read_wav(path: &Path) -> Result<SampleBuffer> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to read WAV samples")?
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read WAV samples")?,
    };

    let buffer = SampleBuffer::from_interleaved(&interleaved, channels, spec.sample_rate)
        .with_context(|| format!("Invalid audio in {}", path.display()))?;

    log::info!(
        "Loaded {} ({} ch, {} Hz, {:.2}s)",
        path.display(),
        buffer.channel_count(),
        buffer.sample_rate(),
        buffer.duration_s()
    );
    Ok(buffer)
}

/// Write a buffer to a 16-bit PCM WAV file.
///
/// Clips values to [-1, 1] before conversion.
/// Creates parent directories if needed.
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let spec = WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for i in 0..buffer.len() {
        for channel in buffer.channels() {
            let clipped = channel[i].clamp(-1.0, 1.0);
            writer.write_sample((clipped * 32767.0) as i16)?;
        }
    }

    writer.finalize().context("Failed to finalize WAV file")?;
    log::info!("Wrote {} ({} samples)", path.display(), buffer.len());
    Ok(())
}
