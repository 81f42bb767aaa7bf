//! Plain data types shared by the view state, renderer and controller.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::surface::Rgba;

/// Visible sample window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub start: usize,
    pub end: usize,
}

impl SampleRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// User-marked sample interval.
///
/// Edges are stored as dragged and may be out of order; call
/// [`Selection::normalized`] before range tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Same interval with `start <= end`.
    pub fn normalized(&self) -> Self {
        Self {
            start: self.start.min(self.end),
            end: self.start.max(self.end),
        }
    }

    pub fn len(&self) -> usize {
        let n = self.normalized();
        n.end - n.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the half-open sample interval `[from, to)` touches the
    /// (inclusive) selection.
    pub fn intersects(&self, from: usize, to: usize) -> bool {
        let n = self.normalized();
        from <= n.end && to > n.start
    }
}

/// Rendering configuration for the waveform view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Target number of output columns.
    pub resolution: f32,
    pub background_color: Rgba,
    pub wave_color: Rgba,
    /// Dimmed color for columns outside an active selection.
    pub alternate_color: Rgba,
    pub marker_color: Rgba,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            resolution: 500.0,
            background_color: Rgba::rgb(240, 240, 240),
            wave_color: Rgba::rgb(50, 170, 120),
            alternate_color: Rgba::rgba(50, 170, 120, 128),
            marker_color: Rgba::BLACK,
        }
    }
}

impl ViewOptions {
    /// Default colors at the given resolution.
    pub fn with_resolution(resolution: f32) -> Result<Self, Error> {
        let options = Self {
            resolution,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.resolution > 0.0) || !self.resolution.is_finite() {
            return Err(Error::InvalidResolution(self.resolution));
        }
        Ok(())
    }
}

/// Pixel size of the surface the view is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
