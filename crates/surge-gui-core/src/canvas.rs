//! egui painter adapter for the inline display.

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, pos2, vec2};
use surge_core::{Canvas, Color};

/// Convert a display color to egui.
pub fn color32(color: Color) -> Color32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    Color32::from_rgba_unmultiplied(c(color.r), c(color.g), c(color.b), c(color.a))
}

/// [`Canvas`] that paints through an egui [`Painter`].
///
/// Canvas coordinates are offset by `origin`, so the renderer can draw into
/// any rectangle of a larger UI.
pub struct EguiCanvas<'p> {
    painter: &'p Painter,
    origin: Pos2,
    width: usize,
    height: usize,
    color: Color32,
    line_width: f32,
}

impl<'p> EguiCanvas<'p> {
    /// Canvas drawing at `origin` through `painter`.
    pub fn new(painter: &'p Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin,
            width: 0,
            height: 0,
            color: Color32::WHITE,
            line_width: 1.0,
        }
    }

    /// Area covered after [`Canvas::init`].
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.origin, vec2(self.width as f32, self.height as f32))
    }

    fn at(&self, x: f32, y: f32) -> Pos2 {
        pos2(self.origin.x + x, self.origin.y + y)
    }

    fn stroke(&self) -> Stroke {
        Stroke::new(self.line_width, self.color)
    }
}

impl Canvas for EguiCanvas<'_> {
    fn init(&mut self, width: usize, height: usize) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_color(&mut self, color: Color) {
        self.color = color32(color);
    }

    fn paint(&mut self) {
        self.painter.rect_filled(self.rect(), 0.0, self.color);
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.painter
            .line_segment([self.at(x0, y0), self.at(x1, y1)], self.stroke());
    }

    fn draw_lines(&mut self, xs: &[f32], ys: &[f32]) {
        let points: Vec<Pos2> = xs.iter().zip(ys).map(|(&x, &y)| self.at(x, y)).collect();
        if points.len() >= 2 {
            self.painter.add(Shape::line(points, self.stroke()));
        }
    }
}
