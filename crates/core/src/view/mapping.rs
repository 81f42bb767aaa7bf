//! Pixel <-> sample coordinate mapping for a visible range.

/// Linear mapping between `[0, width]` pixels and `[0, range_len]` sample
/// offsets of the visible range.
///
/// Built fresh for every render or event: width and range length change
/// independently under resize and zoom, so nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMap {
    width: f64,
    range_len: f64,
}

impl PixelMap {
    pub fn new(width: f32, range_len: usize) -> Self {
        Self {
            width: width.max(0.0) as f64,
            range_len: range_len as f64,
        }
    }

    /// Pixel x of a sample offset relative to the range start.
    ///
    /// Offsets outside the range map outside `[0, width]`.
    pub fn pixel_of(&self, sample_offset: f64) -> f32 {
        if self.range_len <= 0.0 {
            return 0.0;
        }
        (self.width * (sample_offset / self.range_len)) as f32
    }

    /// Sample offset under pixel x, truncated toward zero.
    ///
    /// The pixel is clamped to the surface first, so the result is always in
    /// `[0, range_len]`.
    pub fn sample_of(&self, pixel: f32) -> usize {
        if self.width <= 0.0 || self.range_len <= 0.0 {
            return 0;
        }
        let p = (pixel as f64).clamp(0.0, self.width);
        ((p / self.width) * self.range_len).floor() as usize
    }

    /// Pixels covered by one sample.
    pub fn pixels_per_sample(&self) -> f64 {
        if self.range_len <= 0.0 {
            return 0.0;
        }
        self.width / self.range_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_pixel_of_edges() {
        let map = PixelMap::new(800.0, 1000);
        assert_eq!(map.pixel_of(0.0), 0.0);
        assert_eq!(map.pixel_of(1000.0), 800.0);
        assert_eq!(map.pixel_of(500.0), 400.0);
        assert!(map.pixel_of(-100.0) < 0.0);
    }

    #[test]
    fn test_sample_of_truncates() {
        let map = PixelMap::new(100.0, 1000);
        assert_eq!(map.sample_of(0.0), 0);
        assert_eq!(map.sample_of(0.99), 9);
        assert_eq!(map.sample_of(50.0), 500);
    }

    #[test]
    fn test_sample_of_clamps_pointer() {
        let map = PixelMap::new(100.0, 1000);
        assert_eq!(map.sample_of(-20.0), 0);
        assert_eq!(map.sample_of(250.0), 1000);
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert_eq!(PixelMap::new(0.0, 1000).sample_of(10.0), 0);
        assert_eq!(PixelMap::new(100.0, 0).sample_of(10.0), 0);
        assert_eq!(PixelMap::new(100.0, 0).pixel_of(10.0), 0.0);
    }

    #[test]
    fn test_sample_pixel_sample_roundtrip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let width = rng.gen_range(1.0f32..4000.0);
            let len = rng.gen_range(1usize..2_000_000);
            let map = PixelMap::new(width, len);
            let x = rng.gen_range(0..len);
            let back = map.sample_of(map.pixel_of(x as f64));
            assert!(
                back.abs_diff(x) <= 1,
                "x={x} back={back} width={width} len={len}"
            );
        }
    }

    #[test]
    fn test_pixel_sample_pixel_roundtrip() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let width = rng.gen_range(1.0f32..4000.0);
            let len = rng.gen_range(1usize..2_000_000);
            let map = PixelMap::new(width, len);
            let p = rng.gen_range(0.0..width);
            let back = map.pixel_of(map.sample_of(p) as f64);
            let tolerance = map.pixels_per_sample() as f32 + 1e-3;
            assert!(
                (back - p).abs() <= tolerance,
                "p={p} back={back} width={width} len={len}"
            );
        }
    }
}
