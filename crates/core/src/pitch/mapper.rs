//! Overlap sweep from uniform frequency bins to logarithmic pitch bins.
//!
//! Pitch bin `i` is centred on the 12-TET pitch `440 * 2^((i - 57) / 12)`
//! and spans a quarter tone either side, so consecutive pitch bins tile the
//! frequency axis without gaps. Each frequency bin's weight is spread over
//! the pitch bins it overlaps in proportion to the overlapping width.

use serde::Serialize;

/// Pitch bins per table.
pub const PITCH_BIN_COUNT: usize = 1000;

pub const REFERENCE_PITCH_HZ: f64 = 440.0;

/// Table index of the reference pitch (a4).
pub const REFERENCE_PITCH_INDEX: i64 = 57;

/// 2^(1/24), one quarter tone.
pub const QUARTER_STEP: f64 = 1.029_302_236_643_492;

/// Rebases decibel magnitudes into non-negative weights.
pub const DB_OFFSET: f64 = 140.0;

pub const NOTE_NAMES: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// Centre frequency of pitch bin `index`, in Hz.
pub fn pitch_frequency(index: usize) -> f64 {
    REFERENCE_PITCH_HZ * 2f64.powf((index as i64 - REFERENCE_PITCH_INDEX) as f64 / 12.0)
}

/// `(start, end)` frequencies covered by pitch bin `index`.
pub fn pitch_span(index: usize) -> (f64, f64) {
    let f = pitch_frequency(index);
    (f / QUARTER_STEP, f * QUARTER_STEP)
}

/// Note name with octave, e.g. `a4` or `c#1`.
pub fn note_name(index: usize) -> String {
    format!("{}{}", NOTE_NAMES[index % 12], index / 12)
}

/// Accumulated intensity per pitch bin for one analysis frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchBinTable {
    bins: Vec<f64>,
}

impl PitchBinTable {
    pub fn zeroed(len: usize) -> Self {
        Self { bins: vec![0.0; len] }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.bins.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.bins
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.bins.iter().copied().enumerate()
    }

    /// Strongest bin, if any bin holds energy.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.iter()
            .filter(|&(_, v)| v > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn total(&self) -> f64 {
        self.bins.iter().sum()
    }
}

/// Stateless mapper from a decibel frequency frame to a [`PitchBinTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchMapper {
    bin_count: usize,
}

impl Default for PitchMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchMapper {
    pub fn new() -> Self {
        Self::with_bin_count(PITCH_BIN_COUNT)
    }

    pub fn with_bin_count(bin_count: usize) -> Self {
        Self { bin_count }
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Redistribute `magnitudes_db` (one value per frequency bin, covering
    /// 0 Hz to Nyquist) onto pitch bins.
    ///
    /// Two cursors walk the pitch and frequency axes once each, so the cost
    /// is linear in `bin_count + magnitudes_db.len()`.
    pub fn map(&self, magnitudes_db: &[f32], sample_rate: u32) -> PitchBinTable {
        let mut table = PitchBinTable::zeroed(self.bin_count);
        let freq_count = magnitudes_db.len();
        if freq_count == 0 || sample_rate == 0 || self.bin_count == 0 {
            return table;
        }

        let bin_width = sample_rate as f64 / 2.0 / freq_count as f64;
        let mut pitch_idx = 0usize;
        let mut freq_idx = 0usize;

        while pitch_idx < self.bin_count && freq_idx < freq_count {
            let (pitch_start, pitch_end) = pitch_span(pitch_idx);
            let freq_start = freq_idx as f64 * bin_width;
            let freq_end = (freq_idx + 1) as f64 * bin_width;

            let overlap = (pitch_end.min(freq_end) - pitch_start.max(freq_start)).max(0.0);
            let weight = (DB_OFFSET + magnitudes_db[freq_idx] as f64).max(0.0);
            table.bins[pitch_idx] += overlap * weight;

            if pitch_end < freq_end {
                pitch_idx += 1;
            } else {
                freq_idx += 1;
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44_100;
    const FREQ_BINS: usize = 1024;

    #[test]
    fn test_quarter_step_constant() {
        assert!((QUARTER_STEP - 2f64.powf(1.0 / 24.0)).abs() < 1e-15);
    }

    #[test]
    fn test_reference_pitch() {
        assert!((pitch_frequency(57) - 440.0).abs() < 1e-9);
        assert!((pitch_frequency(69) - 880.0).abs() < 1e-9);
        assert!((pitch_frequency(45) - 220.0).abs() < 1e-9);
        // c0
        assert!((pitch_frequency(0) - 16.3516).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_spans_tile_the_axis() {
        for i in 0..200 {
            let (start, end) = pitch_span(i);
            let (next_start, _) = pitch_span(i + 1);
            assert!(start < end);
            assert!((end - next_start).abs() < 1e-9 * end, "gap after bin {i}");
        }
    }

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(0), "c0");
        assert_eq!(note_name(13), "c#1");
        assert_eq!(note_name(57), "a4");
        assert_eq!(note_name(59), "b4");
        assert_eq!(note_name(60), "c5");
    }

    #[test]
    fn test_energy_at_440_lands_in_bin_57() {
        let bin_width = SR as f64 / 2.0 / FREQ_BINS as f64;
        let hot = (440.0 / bin_width) as usize;
        let mut frame = vec![-200.0f32; FREQ_BINS];
        frame[hot] = 0.0;

        let table = PitchMapper::new().map(&frame, SR);
        let (peak, value) = table.peak().unwrap();
        assert_eq!(peak, 57);
        assert!((value - bin_width * DB_OFFSET).abs() < 1e-6);
        assert!(table.get(56).unwrap() < 1e-9 * value);
        assert!(table.get(58).unwrap() < 1e-9 * value);
    }

    #[test]
    fn test_overlap_conservation() {
        let m = -40.0f32;
        let frame = vec![m; FREQ_BINS];
        let table = PitchMapper::new().map(&frame, SR);

        let nyquist = SR as f64 / 2.0;
        // Everything below the first pitch bin is uncovered
        let covered = nyquist - pitch_span(0).0;
        let summed = table.total() / (DB_OFFSET + m as f64);
        assert!(
            (summed - covered).abs() < 1e-6 * covered,
            "summed {summed} covered {covered}"
        );
    }

    #[test]
    fn test_conservation_with_short_pitch_axis() {
        // 60 bins stop at b4; the frequency tail above is uncovered
        let frame = vec![0.0f32; 256];
        let mapper = PitchMapper::with_bin_count(60);
        let table = mapper.map(&frame, 8000);
        let covered = pitch_span(59).1 - pitch_span(0).0;
        let summed = table.total() / DB_OFFSET;
        assert!((summed - covered).abs() < 1e-6 * covered);
    }

    #[test]
    fn test_very_quiet_bins_contribute_nothing() {
        let frame = vec![-140.0f32; FREQ_BINS];
        let table = PitchMapper::new().map(&frame, SR);
        assert_eq!(table.total(), 0.0);
        assert!(table.peak().is_none());

        let frame = vec![f32::NEG_INFINITY; 16];
        assert_eq!(PitchMapper::new().map(&frame, SR).total(), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let table = PitchMapper::new().map(&[], SR);
        assert_eq!(table.len(), PITCH_BIN_COUNT);
        assert_eq!(table.total(), 0.0);
        assert_eq!(PitchMapper::new().map(&[0.0; 8], 0).total(), 0.0);
    }

    #[test]
    fn test_bins_above_nyquist_stay_empty() {
        let frame = vec![0.0f32; 512];
        let table = PitchMapper::new().map(&frame, 8000);
        let first_above = (0..PITCH_BIN_COUNT)
            .find(|&i| pitch_span(i).0 > 4000.0)
            .unwrap();
        assert!(table.as_slice()[first_above..].iter().all(|&v| v == 0.0));
        assert!(table.get(first_above - 1).unwrap() > 0.0);
    }
}
