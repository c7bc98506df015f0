//! Inline display rendering.
//!
//! [`InlineRenderer`] draws the committed graph state of a
//! [`SurgeFilter`](crate::SurgeFilter) onto any [`Canvas`]: a log-amplitude
//! plot of the last [`MESH_TIME`] seconds with the newest sample on the right.
//!
//! Draw order: background, time grid, level grid, channel inputs, channel
//! outputs, envelope, gain. While bypassing, the background switches to
//! [`Color::DISABLED`] and every series is drawn in [`Color::SILVER`].
//!
//! The renderer only reads a [`GraphView`]; it never touches audio state.

mod pixel;

pub use pixel::PixelCanvas;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::math::{GAIN_AMP_M_144_DB, GAIN_AMP_P_24_DB};
use crate::pipeline::{GraphView, MESH_TIME};

/// Largest height/width ratio of the inline display.
pub const GOLDEN_RATIO_INV: f32 = 0.618_034;

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Color {
    /// Opaque color from 8-bit components.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with opacity `a`.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Display background.
    pub const BACKGROUND: Self = Self::rgb8(0x00, 0x00, 0x00);
    /// Display background while bypassing.
    pub const DISABLED: Self = Self::rgb8(0x44, 0x44, 0x44);
    /// Time grid.
    pub const YELLOW: Self = Self::rgb8(0xff, 0xff, 0x00);
    /// Level grid.
    pub const WHITE: Self = Self::rgb8(0xff, 0xff, 0xff);
    /// Every series while bypassing.
    pub const SILVER: Self = Self::rgb8(0xc0, 0xc0, 0xc0);
    /// Envelope series.
    pub const BRIGHT_MAGENTA: Self = Self::rgb8(0xff, 0x00, 0xff);
    /// Gain series.
    pub const BRIGHT_BLUE: Self = Self::rgb8(0x00, 0x80, 0xff);
    /// Mono output.
    pub const MIDDLE_CHANNEL: Self = Self::rgb8(0x00, 0xff, 0x00);
    /// Left output.
    pub const LEFT_CHANNEL: Self = Self::rgb8(0xff, 0x00, 0x00);
    /// Right output.
    pub const RIGHT_CHANNEL: Self = Self::rgb8(0x00, 0x88, 0xff);
    /// Mono input.
    pub const MIDDLE_CHANNEL_IN: Self = Self::rgb8(0x00, 0x88, 0x00);
    /// Left input.
    pub const LEFT_CHANNEL_IN: Self = Self::rgb8(0x88, 0x00, 0x00);
    /// Right input.
    pub const RIGHT_CHANNEL_IN: Self = Self::rgb8(0x00, 0x44, 0x88);
}

// Indexed by (channels - 1) * 2 + channel.
const INPUT_COLORS: [Color; 4] = [
    Color::MIDDLE_CHANNEL_IN,
    Color::MIDDLE_CHANNEL_IN,
    Color::LEFT_CHANNEL_IN,
    Color::RIGHT_CHANNEL_IN,
];
const OUTPUT_COLORS: [Color; 4] = [
    Color::MIDDLE_CHANNEL,
    Color::MIDDLE_CHANNEL,
    Color::LEFT_CHANNEL,
    Color::RIGHT_CHANNEL,
];

/// Minimal 2D drawing surface.
///
/// Coordinates are in pixels with the origin at the top-left corner.
pub trait Canvas {
    /// Resize and prepare for a new frame. `false` if the surface is unusable.
    fn init(&mut self, width: usize, height: usize) -> bool;

    /// Actual width after [`init`](Self::init).
    fn width(&self) -> usize;

    /// Actual height after [`init`](Self::init).
    fn height(&self) -> usize;

    /// Color for subsequent operations.
    fn set_color(&mut self, color: Color);

    /// Fill the whole surface with the current color.
    fn paint(&mut self);

    /// Stroke width for subsequent lines.
    fn set_line_width(&mut self, width: f32);

    /// Straight segment.
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32);

    /// Polyline through `(xs[i], ys[i])`, `min(xs.len(), ys.len())` points.
    fn draw_lines(&mut self, xs: &[f32], ys: &[f32]);
}

/// Draws a [`GraphView`] onto a [`Canvas`].
///
/// Holds per-column scratch rows that are reused between frames.
#[derive(Debug, Default, Clone)]
pub struct InlineRenderer {
    index: Vec<usize>,
    xs: Vec<f32>,
    ys: Vec<f32>,
}

/// Plot scale shared by the grid and every series.
#[derive(Debug, Clone, Copy)]
struct Axis {
    height: f32,
    zy: f32,
    dy: f32,
}

impl Axis {
    #[inline]
    fn y(&self, v: f32) -> f32 {
        self.height + self.dy * libm::logf((v * self.zy).max(f32::MIN_POSITIVE))
    }
}

impl InlineRenderer {
    /// Renderer with empty scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `view` at up to `width` × `height` pixels.
    ///
    /// The height is reduced to at most `width * GOLDEN_RATIO_INV`. Returns
    /// `false` only when the canvas refuses to initialize.
    pub fn render<C: Canvas + ?Sized>(
        &mut self,
        view: &GraphView<'_>,
        canvas: &mut C,
        width: usize,
        height: usize,
    ) -> bool {
        let max_height = (GOLDEN_RATIO_INV * width as f32) as usize;
        if !canvas.init(width, height.min(max_height)) {
            return false;
        }
        let width = canvas.width();
        let height = canvas.height();
        let w = width as f32;
        let h = height as f32;

        canvas.set_color(if view.bypassing {
            Color::DISABLED
        } else {
            Color::BACKGROUND
        });
        canvas.paint();

        let dx = -(w / MESH_TIME);
        let axis = Axis {
            height: h,
            zy: 1.0 / GAIN_AMP_M_144_DB,
            dy: h / libm::logf(GAIN_AMP_M_144_DB / GAIN_AMP_P_24_DB),
        };

        canvas.set_line_width(1.0);
        canvas.set_color(Color::YELLOW.with_alpha(0.5));
        for t in (1..).map(|i| i as f32).take_while(|&t| t < MESH_TIME - 0.1) {
            let ax = w + dx * t;
            canvas.line(ax, 0.0, ax, h);
        }

        canvas.set_color(Color::WHITE.with_alpha(0.5));
        for db in (0..).map(|k| -144.0 + 24.0 * k as f32).take_while(|&db| db < 24.0) {
            let ay = axis.y(crate::math::db_to_linear(db));
            canvas.line(0.0, ay, w, ay);
        }

        let len = view.time.len();
        if len == 0 || width == 0 {
            return true;
        }

        let r = len as f32 / w;
        self.index.clear();
        self.index
            .extend((0..width).map(|j| (libm::roundf(r * j as f32) as usize).min(len - 1)));
        self.xs.clear();
        self.xs
            .extend(self.index.iter().map(|&k| w + dx * view.time[k]));

        canvas.set_line_width(2.0);
        let channels = view.channels();
        let base = channels.len().saturating_sub(1) * 2;
        let bypass = view.bypassing;
        let pick = |color: Color| if bypass { Color::SILVER } else { color };

        for (i, ch) in channels.iter().enumerate() {
            if let Some(data) = ch.input {
                let color = INPUT_COLORS.get(base + i).copied().unwrap_or(Color::WHITE);
                self.series(canvas, &axis, data, pick(color));
            }
        }
        for (i, ch) in channels.iter().enumerate() {
            if let Some(data) = ch.output {
                let color = OUTPUT_COLORS.get(base + i).copied().unwrap_or(Color::WHITE);
                self.series(canvas, &axis, data, pick(color));
            }
        }
        if let Some(data) = view.envelope {
            self.series(canvas, &axis, data, pick(Color::BRIGHT_MAGENTA));
        }
        if let Some(data) = view.gain {
            self.series(canvas, &axis, data, pick(Color::BRIGHT_BLUE));
        }
        true
    }

    fn series<C: Canvas + ?Sized>(&mut self, canvas: &mut C, axis: &Axis, data: &[f32], color: Color) {
        if data.is_empty() {
            return;
        }
        let last = data.len() - 1;
        self.ys.clear();
        self.ys
            .extend(self.index.iter().map(|&k| axis.y(data[k.min(last)])));
        canvas.set_color(color);
        canvas.draw_lines(&self.xs, &self.ys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ChannelView, MESH_POINTS};
    use crate::MAX_CHANNELS;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Init(usize, usize),
        Color(Color),
        Paint,
        Width(f32),
        Line,
        Lines(Vec<f32>, Vec<f32>),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        size: (usize, usize),
        refuse: bool,
    }

    impl Canvas for Recorder {
        fn init(&mut self, width: usize, height: usize) -> bool {
            self.ops.push(Op::Init(width, height));
            self.size = (width, height);
            !self.refuse
        }
        fn width(&self) -> usize {
            self.size.0
        }
        fn height(&self) -> usize {
            self.size.1
        }
        fn set_color(&mut self, color: Color) {
            self.ops.push(Op::Color(color));
        }
        fn paint(&mut self) {
            self.ops.push(Op::Paint);
        }
        fn set_line_width(&mut self, width: f32) {
            self.ops.push(Op::Width(width));
        }
        fn line(&mut self, _: f32, _: f32, _: f32, _: f32) {
            self.ops.push(Op::Line);
        }
        fn draw_lines(&mut self, xs: &[f32], ys: &[f32]) {
            self.ops.push(Op::Lines(xs.to_vec(), ys.to_vec()));
        }
    }

    fn time_axis() -> Vec<f32> {
        let step = MESH_TIME / (MESH_POINTS - 1) as f32;
        (0..MESH_POINTS).map(|i| MESH_TIME - i as f32 * step).collect()
    }

    fn view<'a>(time: &'a [f32], data: &'a [f32], bypassing: bool) -> GraphView<'a> {
        let mut channels = [ChannelView::default(); MAX_CHANNELS];
        channels[0] = ChannelView {
            input: Some(data),
            output: Some(data),
        };
        channels[1] = ChannelView {
            input: None,
            output: Some(data),
        };
        GraphView {
            bypassing,
            time,
            channel_count: 2,
            channels,
            envelope: Some(data),
            gain: Some(data),
        }
    }

    fn colors_of_series(ops: &[Op]) -> Vec<Color> {
        let mut last = None;
        let mut out = Vec::new();
        for op in ops {
            match op {
                Op::Color(c) => last = Some(*c),
                Op::Lines(..) => out.extend(last),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn refused_canvas_returns_false() {
        let time = time_axis();
        let data = vec![0.5; MESH_POINTS];
        let mut canvas = Recorder {
            refuse: true,
            ..Recorder::default()
        };
        assert!(!InlineRenderer::new().render(&view(&time, &data, false), &mut canvas, 100, 50));
        assert_eq!(canvas.ops, vec![Op::Init(100, 50)]);
    }

    #[test]
    fn height_is_limited_by_golden_ratio() {
        let time = time_axis();
        let data = vec![0.5; MESH_POINTS];
        let mut canvas = Recorder::default();
        assert!(InlineRenderer::new().render(&view(&time, &data, false), &mut canvas, 100, 100));
        assert_eq!(canvas.ops[0], Op::Init(100, 61));
    }

    #[test]
    fn draw_order_and_colors() {
        let time = time_axis();
        let data = vec![0.5; MESH_POINTS];
        let mut canvas = Recorder::default();
        InlineRenderer::new().render(&view(&time, &data, false), &mut canvas, 160, 90);

        assert_eq!(canvas.ops[1], Op::Color(Color::BACKGROUND));
        assert_eq!(canvas.ops[2], Op::Paint);
        let grid = canvas.ops.iter().filter(|op| **op == Op::Line).count();
        assert_eq!(grid, 4 + 7);
        assert_eq!(
            colors_of_series(&canvas.ops),
            vec![
                Color::LEFT_CHANNEL_IN,
                Color::LEFT_CHANNEL,
                Color::RIGHT_CHANNEL,
                Color::BRIGHT_MAGENTA,
                Color::BRIGHT_BLUE,
            ]
        );
    }

    #[test]
    fn bypass_mutes_colors() {
        let time = time_axis();
        let data = vec![0.5; MESH_POINTS];
        let mut canvas = Recorder::default();
        InlineRenderer::new().render(&view(&time, &data, true), &mut canvas, 160, 90);
        assert_eq!(canvas.ops[1], Op::Color(Color::DISABLED));
        assert!(colors_of_series(&canvas.ops).iter().all(|&c| c == Color::SILVER));
    }

    #[test]
    fn series_geometry() {
        let time = time_axis();
        let data = vec![1.0; MESH_POINTS];
        let mut canvas = Recorder::default();
        let mut v = view(&time, &data, false);
        v.channels = [ChannelView::default(); MAX_CHANNELS];
        v.envelope = None;
        InlineRenderer::new().render(&v, &mut canvas, 200, 100);

        let Some(Op::Lines(xs, ys)) = canvas.ops.last() else {
            panic!("no series drawn");
        };
        assert_eq!(xs.len(), 200);
        // Oldest sample at the left edge, newest next to the right edge.
        assert!(xs[0].abs() < 1e-3);
        assert!(xs.windows(2).all(|w| w[1] >= w[0]));
        // 0 dB sits 24/168 of the height below the top.
        let expected = 100.0 * 24.0 / 168.0;
        assert!(ys.iter().all(|&y| (y - expected).abs() < 0.05), "{}", ys[0]);
    }

    #[test]
    fn empty_view_draws_only_the_grid() {
        let mut canvas = Recorder::default();
        let v = GraphView {
            bypassing: false,
            time: &[],
            channel_count: 0,
            channels: [ChannelView::default(); MAX_CHANNELS],
            envelope: None,
            gain: None,
        };
        assert!(InlineRenderer::new().render(&v, &mut canvas, 50, 20));
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Lines(..))));
    }
}
