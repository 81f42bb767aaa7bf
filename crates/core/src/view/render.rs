//! Aggregating downsample renderer for the waveform view.
//!
//! Each output column covers `samples_per_column` samples of the visible
//! range and is summarized by the mean absolute amplitude of at most
//! [`SUBSAMPLES_PER_COLUMN`] evenly spaced sub-samples, so the cost of a
//! frame depends on the resolution and not on how many samples are visible.

use crate::surface::{Rect, Surface};

use super::state::ViewState;

/// Narrowest column, in pixels.
pub const MIN_WAVE_WIDTH: f32 = 0.001;

/// Sub-samples read per column when a column spans many samples.
pub const SUBSAMPLES_PER_COLUMN: f64 = 10.0;

/// Relative slack when flooring the column count.
const COLUMN_COUNT_TOLERANCE: f64 = 1e-6;

/// Horizontal offset of marker labels from the marker line.
const LABEL_OFFSET_X: f32 = 5.0;
const LABEL_LINE_Y: [f32; 2] = [10.0, 22.0];

/// One aggregated bar for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub channel: usize,
    pub x: f32,
    pub width: f32,
    /// First sample covered (absolute index).
    pub sample_start: usize,
    /// One past the last sample covered.
    pub sample_end: usize,
    /// Mean absolute amplitude of the sub-samples.
    pub intensity: f32,
    /// Drawn in the wave color: inside the selection, or no selection.
    pub highlighted: bool,
}

/// Downsample the visible range of every channel into columns for a surface
/// `width` pixels wide.
///
/// Returns nothing for a zero width, a non-positive resolution or an empty
/// range.
pub fn compute_columns(state: &ViewState, width: f32) -> Vec<Column> {
    let range = state.range();
    let resolution = state.options().resolution;
    if !(width > 0.0) || !(resolution > 0.0) || range.is_empty() {
        return Vec::new();
    }

    let wave_width = (width / resolution).max(MIN_WAVE_WIDTH) as f64;
    let effective_resolution = width as f64 / wave_width;
    let samples_per_column = (range.len() as f64 / effective_resolution).max(0.0);
    if samples_per_column <= 0.0 {
        return Vec::new();
    }
    // A stride under one sample would re-read the same index
    let stride = (samples_per_column / SUBSAMPLES_PER_COLUMN).max(1.0);
    // floor(W / waveWidth); the tolerance absorbs the f32 rounding of waveWidth
    let column_count = (effective_resolution * (1.0 + COLUMN_COUNT_TOLERANCE)).floor() as usize;

    let selection = state.selection();
    let mut columns = Vec::new();

    for (channel, data) in state.buffer().channels().enumerate() {
        let stop = range.end.min(data.len()) as f64;
        for index in 0..column_count {
            let from = range.start as f64 + index as f64 * samples_per_column;
            if from >= stop {
                break;
            }
            let x = index as f64 * wave_width;
            let to = (from + samples_per_column).min(stop);

            let mut sum = 0.0f32;
            let mut count = 0usize;
            let mut k = from;
            while k < to {
                sum += data[k as usize].abs();
                count += 1;
                k += stride;
            }
            let intensity = if count > 0 { sum / count as f32 } else { 0.0 };

            let sample_start = from as usize;
            let sample_end = (to.ceil() as usize).max(sample_start + 1);
            let highlighted = selection
                .map(|s| s.intersects(sample_start, sample_end))
                .unwrap_or(true);

            columns.push(Column {
                channel,
                x: x as f32,
                width: (wave_width.min(width as f64 - x)).max(0.0) as f32,
                sample_start,
                sample_end,
                intensity,
                highlighted,
            });
        }
    }

    columns
}

/// Draw the current view: background, one bar per column with channels
/// stacked top to bottom, then selection markers.
pub fn render_waveform<S: Surface + ?Sized>(state: &ViewState, surface: &mut S) {
    let (width, height) = surface.size();
    let options = state.options();
    surface.fill_background(Rect::new(0.0, 0.0, width, height), options.background_color);

    let channels = state.buffer().channel_count();
    if !(width > 0.0) || !(height > 0.0) || channels == 0 {
        return;
    }

    let columns = compute_columns(state, width);
    if columns.is_empty() {
        log::trace!("nothing to render for range {:?}", state.range());
        return;
    }

    let channel_height = height / channels as f32;
    for column in &columns {
        let center = channel_height * (column.channel as f32 + 0.5);
        let bar_height = column.intensity * channel_height;
        let color = if column.highlighted {
            options.wave_color
        } else {
            options.alternate_color
        };
        surface.fill_bar(
            column.x,
            center - bar_height / 2.0,
            column.width,
            bar_height,
            color,
        );
    }

    if let Some(selection) = state.selection() {
        let selection = selection.normalized();
        for sample in [selection.start, selection.end] {
            draw_marker(state, surface, sample, width, height);
        }
    }
}

fn draw_marker<S: Surface + ?Sized>(
    state: &ViewState,
    surface: &mut S,
    sample: usize,
    width: f32,
    height: f32,
) {
    let range = state.range();
    let map = super::mapping::PixelMap::new(width, range.len());
    let x = map.pixel_of(sample as f64 - range.start as f64);
    if !(0.0..=width).contains(&x) {
        return;
    }

    let color = state.options().marker_color;
    surface.fill_bar(x, 0.0, 1.0, height, color);
    surface.fill_text(
        &format!("sample {}", sample),
        x + LABEL_OFFSET_X,
        LABEL_LINE_Y[0],
        color,
    );
    surface.fill_text(
        &format_seconds(sample, state.buffer().sample_rate()),
        x + LABEL_OFFSET_X,
        LABEL_LINE_Y[1],
        color,
    );
}

/// Time label for a sample index, truncated (not rounded) to hundredths.
pub fn format_seconds(sample: usize, sample_rate: u32) -> String {
    if sample_rate == 0 {
        return "0.00s".to_string();
    }
    let seconds = (sample as f64 / sample_rate as f64 * 100.0).trunc() / 100.0;
    format!("{:.2}s", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::buffer::SampleBuffer;
    use crate::surface::{RecordingSurface, Rgba};
    use crate::view::types::{Selection, ViewOptions, Viewport};
    use std::sync::Arc;

    fn make_state(channels: Vec<Vec<f32>>, sample_rate: u32, resolution: f32, width: f32) -> ViewState {
        let buffer = SampleBuffer::new(channels, sample_rate).unwrap();
        ViewState::new(
            Arc::new(buffer),
            ViewOptions::with_resolution(resolution).unwrap(),
            Viewport::new(width, 100.0),
        )
    }

    #[test]
    fn test_full_buffer_view_column_count() {
        let state = make_state(vec![vec![0.5; 1000]], 44100, 100.0, 500.0);
        let columns = compute_columns(&state, 500.0);
        assert_eq!(columns.len(), 100);
        assert_eq!(columns[0].sample_start, 0);
        assert_eq!(columns.last().unwrap().sample_end, 1000);
        for c in &columns {
            assert!(c.x >= 0.0 && c.x + c.width <= 500.0 + 1e-3, "{:?}", c);
            assert!((c.width - 5.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_columns_stay_on_surface_for_odd_widths() {
        let cases = [
            (333.0f32, 100.0f32),
            (500.0, 300.0),
            (1000.0, 300.0),
            (700.0, 300.0),
            (17.0, 7.0),
            (640.0, 1000.0),
        ];
        for &(width, resolution) in &cases {
            let state = make_state(vec![vec![0.1; 12_345]], 8000, resolution, width);
            let columns = compute_columns(&state, width);
            // W / (W / r) is exactly r for these whole resolutions
            assert_eq!(columns.len(), resolution as usize, "w={width} r={resolution}");
            let last = columns.last().unwrap();
            assert!(last.width > 0.5 * width / resolution, "sliver column {:?}", last);
            assert!(last.sample_start < 12_344);
            for c in &columns {
                assert!(c.x >= 0.0 && c.x + c.width <= width + 1e-3, "w={width} r={resolution} {:?}", c);
            }
        }
    }

    #[test]
    fn test_intensity_is_mean_absolute() {
        let state = make_state(vec![vec![-0.5; 1000]], 44100, 100.0, 500.0);
        for c in compute_columns(&state, 500.0) {
            assert!((c.intensity - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_subsampling_uses_coarse_stride() {
        // 100 samples per column, stride 10: only multiples of 10 are read
        let data: Vec<f32> = (0..10_000).map(|i| if i % 10 == 0 { 0.0 } else { 1.0 }).collect();
        let state = make_state(vec![data], 44100, 100.0, 100.0);
        let columns = compute_columns(&state, 100.0);
        assert_eq!(columns.len(), 100);
        assert!(columns.iter().all(|c| c.intensity == 0.0));
    }

    #[test]
    fn test_high_zoom_samples_every_index() {
        let data: Vec<f32> = (0..1000).map(|i| i as f32 / 1000.0).collect();
        let mut state = make_state(vec![data], 44100, 500.0, 800.0);
        state.set_range(400, 402);
        let columns = compute_columns(&state, 800.0);
        assert_eq!(columns.len(), 500);
        assert!(columns.iter().all(|c| c.sample_start == 400 || c.sample_start == 401));
        assert!((columns[0].intensity - 0.4).abs() < 1e-6);
        assert!((columns[499].intensity - 0.401).abs() < 1e-6);
    }

    #[test]
    fn test_multichannel_rows_are_stacked() {
        let state = make_state(vec![vec![0.2; 1000], vec![0.8; 1000]], 44100, 10.0, 100.0);
        let mut surface = RecordingSurface::new(100.0, 200.0);
        render_waveform(&state, &mut surface);

        let bars: Vec<_> = surface.bars().collect();
        assert_eq!(bars.len(), 20);
        // Channel 0 centred at y=50 with height 0.2 * 100
        let (first, _) = bars[0];
        assert!((first.y + first.height / 2.0 - 50.0).abs() < 1e-4);
        assert!((first.height - 20.0).abs() < 1e-4);
        // Channel 1 centred at y=150 with height 0.8 * 100
        let (last, _) = bars[19];
        assert!((last.y + last.height / 2.0 - 150.0).abs() < 1e-4);
        assert!((last.height - 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_color_without_selection() {
        let state = make_state(vec![vec![0.3; 1000]], 44100, 50.0, 100.0);
        let mut surface = RecordingSurface::new(100.0, 50.0);
        render_waveform(&state, &mut surface);
        let wave = state.options().wave_color;
        assert!(surface.bars().all(|(_, c)| *c == wave));
        assert_eq!(surface.texts().count(), 0);
    }

    #[test]
    fn test_selection_colors_and_markers() {
        let mut state = make_state(vec![vec![0.3; 1000]], 100, 10.0, 100.0);
        state.set_selection(Some(Selection::new(450, 250)));
        let mut surface = RecordingSurface::new(100.0, 50.0);
        render_waveform(&state, &mut surface);

        let wave = state.options().wave_color;
        let alt = state.options().alternate_color;
        let colors: Vec<Rgba> = surface.bars().take(10).map(|(_, c)| *c).collect();
        // Columns of 100 samples: [200,300), [300,400), [400,500) touch 250..450
        assert_eq!(colors[1], alt);
        assert_eq!(colors[2], wave);
        assert_eq!(colors[3], wave);
        assert_eq!(colors[4], wave);
        assert_eq!(colors[5], alt);

        // Two 1px marker lines over the full height
        let markers: Vec<_> = surface.bars().skip(10).collect();
        assert_eq!(markers.len(), 2);
        assert!((markers[0].0.x - 25.0).abs() < 1e-4);
        assert!((markers[1].0.x - 45.0).abs() < 1e-4);
        assert_eq!(markers[0].0.width, 1.0);
        assert_eq!(markers[0].0.height, 50.0);

        let texts: Vec<&str> = surface.texts().collect();
        assert_eq!(texts, vec!["sample 250", "2.50s", "sample 450", "4.50s"]);
    }

    #[test]
    fn test_selection_outside_range_draws_no_markers() {
        let mut state = make_state(vec![vec![0.3; 10_000]], 100, 10.0, 100.0);
        state.set_range(5000, 6000);
        state.set_selection(Some(Selection::new(100, 200)));
        let mut surface = RecordingSurface::new(100.0, 50.0);
        render_waveform(&state, &mut surface);
        let alt = state.options().alternate_color;
        assert_eq!(surface.bars().count(), 10);
        assert!(surface.bars().all(|(_, c)| *c == alt));
        assert_eq!(surface.texts().count(), 0);
    }

    #[test]
    fn test_degenerate_inputs_draw_background_only() {
        let empty = make_state(vec![vec![]], 44100, 100.0, 100.0);
        let mut surface = RecordingSurface::new(100.0, 50.0);
        render_waveform(&empty, &mut surface);
        assert_eq!(surface.commands.len(), 1);

        let state = make_state(vec![vec![0.5; 100]], 44100, 100.0, 0.0);
        let mut surface = RecordingSurface::new(0.0, 50.0);
        render_waveform(&state, &mut surface);
        assert_eq!(surface.commands.len(), 1);

        let mut state = make_state(vec![vec![0.5; 100]], 44100, 100.0, 100.0);
        let mut options = state.options().clone();
        options.resolution = 0.0;
        state.set_options(options);
        assert!(compute_columns(&state, 100.0).is_empty());
    }

    #[test]
    fn test_format_seconds_truncates() {
        assert_eq!(format_seconds(4410, 44100), "0.10s");
        assert_eq!(format_seconds(44_099, 44_100), "0.99s");
        assert_eq!(format_seconds(0, 44_100), "0.00s");
        assert_eq!(format_seconds(441_000, 44_100), "10.00s");
    }
}
