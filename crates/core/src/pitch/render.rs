//! Bar rendering for a [`PitchBinTable`].

use serde::{Deserialize, Serialize};

use super::mapper::{note_name, pitch_frequency, pitch_span, PitchBinTable, DB_OFFSET};
use crate::surface::{Rect, Rgba, Surface};

/// Height reserved above each bar for its label.
const LABEL_HEIGHT: f32 = 12.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Note,
    Frequency,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PitchDisplayOptions {
    pub mode: DisplayMode,
    /// Bins at or below this accumulated intensity are not drawn.
    pub noise_floor: f64,
    pub first_bin: usize,
    /// Exclusive.
    pub last_bin: usize,
    pub bar_color: Rgba,
    pub label_color: Rgba,
    pub background_color: Rgba,
}

impl Default for PitchDisplayOptions {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Note,
            noise_floor: 10.0,
            first_bin: 0,
            last_bin: 108,
            bar_color: Rgba::rgb(50, 170, 120),
            label_color: Rgba::BLACK,
            background_color: Rgba::rgb(240, 240, 240),
        }
    }
}

/// Compressive strength of a bin: intensity normalised by the bin's
/// frequency width, then `sqrt(base^(base/100))`.
pub fn bar_strength(intensity: f64, window: f64) -> f64 {
    if window <= 0.0 || intensity <= 0.0 {
        return 0.0;
    }
    let base = intensity / window;
    base.powf(base / 100.0).sqrt()
}

/// Bar height in pixels; a full-scale (0 dB) bin reaches `max_height`.
pub fn bar_height(strength: f64, max_height: f32) -> f32 {
    let full = bar_strength(DB_OFFSET, 1.0);
    ((strength / full) as f32 * max_height).clamp(0.0, max_height.max(0.0))
}

pub fn bin_label(index: usize, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Note => note_name(index),
        DisplayMode::Frequency => format!("{}Hz", pitch_frequency(index).round()),
    }
}

/// Draw one bar per pitch bin in `first_bin..last_bin`, bottom-aligned, each
/// with its label just above the bar.
pub fn render_pitch_bars<S: Surface + ?Sized>(
    table: &PitchBinTable,
    options: &PitchDisplayOptions,
    surface: &mut S,
) {
    let (width, height) = surface.size();
    surface.fill_background(Rect::new(0.0, 0.0, width, height), options.background_color);

    let last = options.last_bin.min(table.len());
    if last <= options.first_bin || width <= 0.0 || height <= 0.0 {
        return;
    }
    let count = last - options.first_bin;
    let bar_width = width / count as f32;
    let max_height = (height - LABEL_HEIGHT).max(0.0);

    for (slot, index) in (options.first_bin..last).enumerate() {
        let intensity = table.as_slice()[index];
        if intensity <= options.noise_floor {
            continue;
        }
        let (start, end) = pitch_span(index);
        let h = bar_height(bar_strength(intensity, end - start), max_height);
        let x = slot as f32 * bar_width;
        surface.fill_bar(x, height - h, bar_width, h, options.bar_color);
        surface.fill_text(
            &bin_label(index, options.mode),
            x,
            (height - h - LABEL_HEIGHT).max(0.0),
            options.label_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchMapper;
    use crate::surface::RecordingSurface;

    fn a4_table() -> PitchBinTable {
        let bin_width = 44_100.0 / 2.0 / 1024.0;
        let mut frame = vec![-200.0f32; 1024];
        frame[(440.0 / bin_width) as usize] = 0.0;
        PitchMapper::new().map(&frame, 44_100)
    }

    #[test]
    fn test_defaults() {
        let opts = PitchDisplayOptions::default();
        assert_eq!(opts.mode, DisplayMode::Note);
        assert_eq!(opts.noise_floor, 10.0);
        assert_eq!((opts.first_bin, opts.last_bin), (0, 108));
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&DisplayMode::Frequency).unwrap(), "\"frequency\"");
        let opts: PitchDisplayOptions = serde_json::from_str(r#"{"mode":"frequency"}"#).unwrap();
        assert_eq!(opts.mode, DisplayMode::Frequency);
        assert_eq!(opts.last_bin, 108);
    }

    #[test]
    fn test_strength_is_monotonic_above_unity() {
        let mut last = 0.0;
        for base in [1.0, 10.0, 50.0, 100.0, 140.0, 200.0] {
            let s = bar_strength(base, 1.0);
            assert!(s >= last, "strength dropped at base {base}");
            last = s;
        }
        assert_eq!(bar_strength(5.0, 0.0), 0.0);
        assert_eq!(bar_strength(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_height_is_clamped() {
        assert_eq!(bar_height(bar_strength(140.0, 1.0), 100.0), 100.0);
        assert_eq!(bar_height(bar_strength(1000.0, 1.0), 100.0), 100.0);
        let half = bar_height(bar_strength(100.0, 1.0), 100.0);
        assert!(half > 0.0 && half < 100.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(bin_label(57, DisplayMode::Note), "a4");
        assert_eq!(bin_label(57, DisplayMode::Frequency), "440Hz");
        assert_eq!(bin_label(0, DisplayMode::Frequency), "16Hz");
    }

    #[test]
    fn test_render_single_peak() {
        let table = a4_table();
        let mut surface = RecordingSurface::new(1080.0, 200.0);
        render_pitch_bars(&table, &PitchDisplayOptions::default(), &mut surface);

        let bars: Vec<_> = surface.bars().collect();
        assert_eq!(bars.len(), 1);
        let (rect, _) = bars[0];
        assert!((rect.x - 570.0).abs() < 1e-3);
        assert!((rect.width - 10.0).abs() < 1e-3);
        assert!((rect.bottom() - 200.0).abs() < 1e-3);
        assert!(rect.height > 0.0 && rect.height <= 188.0);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["a4"]);
    }

    #[test]
    fn test_render_frequency_mode_and_window() {
        let table = a4_table();
        let opts = PitchDisplayOptions {
            mode: DisplayMode::Frequency,
            first_bin: 50,
            last_bin: 60,
            ..Default::default()
        };
        let mut surface = RecordingSurface::new(100.0, 50.0);
        render_pitch_bars(&table, &opts, &mut surface);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["440Hz"]);
        let (rect, _) = surface.bars().next().unwrap();
        assert!((rect.x - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_noise_floor_and_empty_window() {
        let table = a4_table();
        let opts = PitchDisplayOptions {
            noise_floor: 1e9,
            ..Default::default()
        };
        let mut surface = RecordingSurface::new(100.0, 50.0);
        render_pitch_bars(&table, &opts, &mut surface);
        assert_eq!(surface.bars().count(), 0);

        let opts = PitchDisplayOptions {
            first_bin: 20,
            last_bin: 20,
            ..Default::default()
        };
        surface.clear();
        render_pitch_bars(&table, &opts, &mut surface);
        assert_eq!(surface.bars().count(), 0);
        assert_eq!(surface.commands.len(), 1);
    }
}
