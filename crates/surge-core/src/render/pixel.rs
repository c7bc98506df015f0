//! Software RGBA raster implementing [`Canvas`].

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};

use super::{Canvas, Color};

/// Largest accepted width or height.
const MAX_SIDE: usize = 8192;

/// Owned RGBA8 image with alpha-blended drawing.
///
/// Lines are stroked with a square brush of the current line width.
///
/// # Example
///
/// ```rust
/// use surge_core::{Canvas, Color, PixelCanvas};
///
/// let mut canvas = PixelCanvas::new();
/// assert!(canvas.init(4, 2));
/// canvas.set_color(Color::WHITE);
/// canvas.paint();
/// assert_eq!(canvas.pixel(3, 1), Some([255, 255, 255, 255]));
/// ```
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
    color: Color,
    line_width: f32,
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelCanvas {
    /// Empty canvas; call [`Canvas::init`] before drawing.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
            color: Color::BACKGROUND,
            line_width: 1.0,
        }
    }

    /// RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let p = &self.data[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Binary PPM (P6) encoding; alpha is dropped.
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.width * self.height * 3);
        out.extend_from_slice(header.as_bytes());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }

    /// Character preview, one glyph per `cell_w` × `cell_h` block, by luminance.
    pub fn to_ascii(&self, cell_w: usize, cell_h: usize) -> String {
        const RAMP: &[u8] = b" .:-=+*#%@";
        let cell_w = cell_w.max(1);
        let cell_h = cell_h.max(1);
        let mut out = String::new();
        for by in (0..self.height).step_by(cell_h) {
            for bx in (0..self.width).step_by(cell_w) {
                let mut sum = 0.0_f32;
                let mut count = 0.0_f32;
                for y in by..(by + cell_h).min(self.height) {
                    for x in bx..(bx + cell_w).min(self.width) {
                        let i = (y * self.width + x) * 4;
                        let p = &self.data[i..i + 3];
                        sum += 0.2126 * f32::from(p[0])
                            + 0.7152 * f32::from(p[1])
                            + 0.0722 * f32::from(p[2]);
                        count += 1.0;
                    }
                }
                let lum = sum / (count * 255.0);
                let k = ((lum * (RAMP.len() - 1) as f32) + 0.5) as usize;
                out.push(char::from(RAMP[k.min(RAMP.len() - 1)]));
            }
            out.push('\n');
        }
        out
    }

    fn blend(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        let c = self.color;
        let a = c.a.clamp(0.0, 1.0);
        for (dst, src) in self.data[i..i + 3].iter_mut().zip([c.r, c.g, c.b]) {
            let v = f32::from(*dst) * (1.0 - a) + src.clamp(0.0, 1.0) * 255.0 * a;
            *dst = libm::roundf(v) as u8;
        }
        self.data[i + 3] = 255;
    }

    fn stamp(&mut self, x: f32, y: f32) {
        let half = libm::floorf((self.line_width.max(1.0) - 1.0) / 2.0) as i64;
        let cx = libm::roundf(x) as i64;
        let cy = libm::roundf(y) as i64;
        for py in cy - half..=cy + half {
            for px in cx - half..=cx + half {
                self.blend(px, py);
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn init(&mut self, width: usize, height: usize) -> bool {
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height * 4, 0);
        true
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn paint(&mut self) {
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                self.blend(x, y);
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        // Keep the step count bounded for far off-canvas points.
        let lim_x = |v: f32| v.clamp(-1.0, self.width as f32 + 1.0);
        let lim_y = |v: f32| v.clamp(-1.0, self.height as f32 + 1.0);
        let (x0, y0, x1, y1) = (lim_x(x0), lim_y(y0), lim_x(x1), lim_y(y1));

        let steps = libm::ceilf((x1 - x0).abs().max((y1 - y0).abs())).max(1.0) as usize;
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            self.stamp(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
        }
    }

    fn draw_lines(&mut self, xs: &[f32], ys: &[f32]) {
        let n = xs.len().min(ys.len());
        for i in 1..n {
            self.line(xs[i - 1], ys[i - 1], xs[i], ys[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_empty_surfaces() {
        let mut canvas = PixelCanvas::new();
        assert!(!canvas.init(0, 10));
        assert!(!canvas.init(10, 0));
        assert!(!canvas.init(MAX_SIDE + 1, 10));
        assert!(canvas.init(3, 2));
        assert_eq!(canvas.data().len(), 24);
    }

    #[test]
    fn horizontal_line_covers_its_row() {
        let mut canvas = PixelCanvas::new();
        canvas.init(8, 4);
        canvas.set_color(Color::WHITE);
        canvas.line(0.0, 2.0, 7.0, 2.0);
        for x in 0..8 {
            assert_eq!(canvas.pixel(x, 2), Some([255, 255, 255, 255]));
            assert_eq!(canvas.pixel(x, 1), Some([0, 0, 0, 0]));
        }
    }

    #[test]
    fn half_alpha_blends() {
        let mut canvas = PixelCanvas::new();
        canvas.init(1, 1);
        canvas.set_color(Color::WHITE.with_alpha(0.5));
        canvas.paint();
        assert_eq!(canvas.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn wide_lines_are_thicker() {
        let mut canvas = PixelCanvas::new();
        canvas.init(8, 8);
        canvas.set_color(Color::WHITE);
        canvas.set_line_width(3.0);
        canvas.line(4.0, 0.0, 4.0, 7.0);
        assert_eq!(canvas.pixel(3, 4).map(|p| p[0]), Some(255));
        assert_eq!(canvas.pixel(5, 4).map(|p| p[0]), Some(255));
        assert_eq!(canvas.pixel(1, 4).map(|p| p[0]), Some(0));
    }

    #[test]
    fn non_finite_lines_are_skipped() {
        let mut canvas = PixelCanvas::new();
        canvas.init(4, 4);
        canvas.set_color(Color::WHITE);
        canvas.line(0.0, f32::INFINITY, 3.0, 0.0);
        assert!(canvas.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn ppm_layout() {
        let mut canvas = PixelCanvas::new();
        canvas.init(4, 2);
        let ppm = canvas.to_ppm();
        assert!(ppm.starts_with(b"P6\n4 2\n255\n"));
        assert_eq!(ppm.len(), b"P6\n4 2\n255\n".len() + 4 * 2 * 3);
    }

    #[test]
    fn ascii_preview_shape() {
        let mut canvas = PixelCanvas::new();
        canvas.init(4, 4);
        canvas.set_color(Color::WHITE);
        canvas.line(0.0, 0.0, 3.0, 0.0);
        let text = canvas.to_ascii(1, 2);
        assert_eq!(text, "++++\n    \n");
    }
}
