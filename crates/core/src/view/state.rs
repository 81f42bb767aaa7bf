//! Owned view state and the zoom/pan/drag math that mutates it.
//!
//! Every operation here is plain arithmetic on an explicit [`ViewState`];
//! nothing needs a surface. Mutations set a dirty flag instead of drawing,
//! so callers can batch several changes into one redraw.

use std::sync::Arc;

use crate::audio::buffer::SampleBuffer;

use super::mapping::PixelMap;
use super::types::{SampleRange, Selection, ViewOptions, Viewport};

/// Smallest visible range, in samples.
pub const MIN_VISIBLE_SAMPLES: usize = 2;

/// Wheel delta that would collapse the range to zero width.
pub const ZOOM_SENSITIVITY: f64 = 1000.0;

/// Horizontal wheel delta that pans by one full range width.
pub const PAN_SENSITIVITY: f64 = 400.0;

/// Selection drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Everything the waveform view knows about one loaded buffer.
#[derive(Debug, Clone)]
pub struct ViewState {
    buffer: Arc<SampleBuffer>,
    range: SampleRange,
    options: ViewOptions,
    selection: Option<Selection>,
    drag: DragState,
    viewport: Viewport,
    dirty: bool,
}

impl ViewState {
    /// Fresh state showing the whole buffer.
    pub fn new(buffer: Arc<SampleBuffer>, options: ViewOptions, viewport: Viewport) -> Self {
        let range = SampleRange::new(0, buffer.len());
        Self {
            buffer,
            range,
            options,
            selection: None,
            drag: DragState::Idle,
            viewport,
            dirty: true,
        }
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn range(&self) -> SampleRange {
        self.range
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Mapping for the current viewport width and range.
    pub fn pixel_map(&self) -> PixelMap {
        PixelMap::new(self.viewport.width, self.range.len())
    }

    /// Absolute sample index under a pointer x position.
    pub fn sample_at(&self, pixel: f32) -> usize {
        (self.range.start + self.pixel_map().sample_of(pixel)).min(self.buffer_len())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn min_range(&self) -> usize {
        MIN_VISIBLE_SAMPLES.min(self.buffer_len())
    }

    /// Zoom around the pointer. Positive `delta_y` zooms in.
    ///
    /// The sample under `pointer_x` stays under the pointer; the range is
    /// clamped to `[MIN_VISIBLE_SAMPLES, buffer length]`.
    pub fn zoom(&mut self, delta_y: f32, pointer_x: f32) {
        let len = self.buffer_len();
        let current = self.range.len();
        if current == 0 || len == 0 || !delta_y.is_finite() {
            return;
        }

        let min_range = self.min_range();
        let offset = self.pixel_map().sample_of(pointer_x);
        let fraction = offset as f64 / current as f64;
        let target = (current as f64 * (1.0 - delta_y as f64 / ZOOM_SENSITIVITY))
            .clamp(min_range as f64, len as f64);

        let anchor = (self.range.start + offset) as f64;
        let start = (anchor - target * fraction).max(0.0).floor() as usize;
        let end = (anchor + target * (1.0 - fraction)).min(len as f64).floor() as usize;

        self.range = widen(SampleRange::new(start, end), min_range, len);
        log::debug!(
            "zoom dy={} at x={} -> {}..{} ({} samples)",
            delta_y,
            pointer_x,
            self.range.start,
            self.range.end,
            self.range.len()
        );
        self.dirty = true;
    }

    /// Scroll horizontally. The range width never changes.
    pub fn pan(&mut self, delta_x: f32) {
        let len = self.buffer_len();
        let current = self.range.len();
        if !delta_x.is_finite() {
            return;
        }

        let target = self.range.start as f64 + delta_x as f64 * (current as f64 / PAN_SENSITIVITY);
        let start = if target + current as f64 > len as f64 {
            len.saturating_sub(current)
        } else if target < 0.0 {
            0
        } else {
            target.floor() as usize
        };

        self.range = SampleRange::new(start, start + current);
        log::debug!("pan dx={} -> {}..{}", delta_x, self.range.start, self.range.end);
        self.dirty = true;
    }

    /// Replace the visible range, clamped into the buffer.
    pub fn set_range(&mut self, start: usize, end: usize) {
        let len = self.buffer_len();
        let end = end.min(len);
        let start = start.min(end);
        self.range = widen(SampleRange::new(start, end), self.min_range(), len);
        self.dirty = true;
    }

    /// Press: start a zero-width selection under the pointer.
    pub fn begin_drag(&mut self, pixel: f32) -> Selection {
        let s = self.sample_at(pixel);
        let selection = Selection::new(s, s);
        self.selection = Some(selection);
        self.drag = DragState::Dragging;
        log::debug!("drag start at sample {}", s);
        self.dirty = true;
        selection
    }

    /// Move while dragging: push whichever edge the pointer is beyond.
    ///
    /// Edges are updated independently and the press point is not
    /// remembered, so moving back past it leaves the far edge where it was.
    /// Returns whether the selection changed.
    pub fn drag_to(&mut self, pixel: f32) -> bool {
        if self.drag != DragState::Dragging {
            return false;
        }
        let target = self.sample_at(pixel);
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };

        let before = *selection;
        if target <= selection.start {
            selection.start = target;
        }
        if target >= selection.end {
            selection.end = target;
        }

        let changed = *selection != before;
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Release or leave: stop dragging. The selection stays.
    pub fn end_drag(&mut self) -> bool {
        if self.drag == DragState::Idle {
            return false;
        }
        self.drag = DragState::Idle;
        log::debug!("drag end, selection {:?}", self.selection);
        self.dirty = true;
        true
    }

    /// Drop the selection. Returns whether there was one.
    pub fn clear_selection(&mut self) -> bool {
        let had = self.selection.take().is_some();
        if had {
            self.dirty = true;
        }
        had
    }

    /// Set the selection directly, clamped into the buffer.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        let len = self.buffer_len();
        self.selection = selection.map(|s| Selection::new(s.start.min(len), s.end.min(len)));
        self.dirty = true;
    }

    /// Surface size changed. The range is untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.dirty = true;
    }

    pub fn set_options(&mut self, options: ViewOptions) {
        self.options = options;
        self.dirty = true;
    }
}

/// Grow `range` to at least `min` samples without leaving `[0, len]`.
fn widen(range: SampleRange, min: usize, len: usize) -> SampleRange {
    if range.len() >= min {
        return range;
    }
    let end = (range.start + min).min(len);
    SampleRange::new(end.saturating_sub(min), end)
}
