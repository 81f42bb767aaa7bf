//! Character-raster surface for terminal output.
//!
//! One cell is one surface pixel. Bars are painted with the glyph mapped to
//! their color, so wave, dimmed and marker bars stay distinguishable.

use std::fmt;

use sonoview_core::surface::{Rect, Rgba, Surface};

const DEFAULT_GLYPH: char = '#';

pub struct AsciiSurface {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    palette: Vec<(Rgba, char)>,
}

impl AsciiSurface {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
            palette: Vec::new(),
        }
    }

    /// Paint bars of `color` with `glyph`. Later entries win on duplicates.
    pub fn with_glyph(mut self, color: Rgba, glyph: char) -> Self {
        self.palette.insert(0, (color, glyph));
        self
    }

    fn glyph_for(&self, color: Rgba) -> char {
        self.palette
            .iter()
            .find(|(c, _)| *c == color)
            .map(|(_, g)| *g)
            .unwrap_or(DEFAULT_GLYPH)
    }

    fn put(&mut self, col: usize, row: usize, ch: char) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = ch;
        }
    }

    pub fn row(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .collect()
    }
}

/// Clamp a pixel coordinate to a cell index in `[0, limit]`.
fn cell(v: f32, limit: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        (v as usize).min(limit)
    }
}

impl Surface for AsciiSurface {
    fn size(&self) -> (f32, f32) {
        (self.cols as f32, self.rows as f32)
    }

    fn fill_background(&mut self, rect: Rect, _color: Rgba) {
        for row in cell(rect.y, self.rows)..cell(rect.bottom(), self.rows) {
            for col in cell(rect.x, self.cols)..cell(rect.right(), self.cols) {
                self.put(col, row, ' ');
            }
        }
    }

    fn fill_bar(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        if !(width > 0.0) || !(height > 0.0) {
            return;
        }
        let glyph = self.glyph_for(color);
        let c0 = cell(x.round(), self.cols);
        let c1 = cell((x + width).round(), self.cols).max(c0 + 1);
        let r0 = cell(y.floor(), self.rows);
        let r1 = cell((y + height).ceil(), self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, glyph);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, _color: Rgba) {
        let row = cell(y.round(), self.rows);
        let start = cell(x.round(), self.cols);
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i, row, ch);
        }
    }
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            writeln!(f, "{}", self.row(row).trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    #[test]
    fn test_bar_uses_palette_glyph() {
        let mut s = AsciiSurface::new(10, 4).with_glyph(RED, '+');
        s.fill_bar(2.0, 1.0, 2.0, 2.0, RED);
        s.fill_bar(6.0, 0.0, 1.0, 4.0, Rgba::BLACK);
        assert_eq!(s.row(0), "      #   ");
        assert_eq!(s.row(1), "  ++  #   ");
        assert_eq!(s.row(2), "  ++  #   ");
    }

    #[test]
    fn test_thin_bar_covers_one_cell() {
        let mut s = AsciiSurface::new(5, 1);
        s.fill_bar(1.98, 0.0, 1.0, 0.2, Rgba::BLACK);
        assert_eq!(s.row(0), "  #  ");
        s.fill_bar(0.0, 0.0, 3.0, 0.0, Rgba::BLACK);
        assert_eq!(s.row(0), "  #  ");
    }

    #[test]
    fn test_text_is_clipped() {
        let mut s = AsciiSurface::new(6, 2);
        s.fill_text("sample 12", 2.0, 1.0, Rgba::BLACK);
        assert_eq!(s.row(1), "  samp");
        s.fill_text("off", 0.0, 5.0, Rgba::BLACK);
        assert_eq!(s.row(0), "      ");
    }

    #[test]
    fn test_background_clears_and_display_trims() {
        let mut s = AsciiSurface::new(4, 2);
        s.fill_bar(0.0, 0.0, 4.0, 2.0, Rgba::BLACK);
        s.fill_background(Rect::new(0.0, 0.0, 4.0, 1.0), Rgba::WHITE);
        assert_eq!(s.to_string(), "\n####\n");
    }
}
