//! Abstract raster surface the renderers draw onto.
//!
//! Backends (an egui painter, a text grid, a recorder) implement
//! [`Surface`]; the engines only ever fill rectangles and place text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Axis-aligned rectangle in surface pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Drawing primitives required by the renderers.
pub trait Surface {
    /// Current pixel size as `(width, height)`.
    fn size(&self) -> (f32, f32);

    fn fill_background(&mut self, rect: Rect, color: Rgba);

    fn fill_bar(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);

    /// Place `text` with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgba);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Background { rect: Rect, color: Rgba },
    Bar { rect: Rect, color: Rgba },
    Text { text: String, x: f32, y: f32, color: Rgba },
}

/// A [`Surface`] that stores every call instead of rasterizing it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Rectangles of every recorded bar.
    pub fn bars(&self) -> impl Iterator<Item = (&Rect, &Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Bar { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    /// Every recorded text label.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_background(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Background { rect, color });
    }

    fn fill_bar(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.commands.push(DrawCommand::Bar {
            rect: Rect::new(x, y, width, height),
            color,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}
