//! Inline display widget.

use crate::EguiCanvas;
use egui::{Response, Sense, Ui, Widget, vec2};
use surge_core::{GOLDEN_RATIO_INV, GraphView, InlineRenderer};

/// Draws a filter's [`GraphView`] the same way a host's inline display would.
///
/// The widget reserves `width` × `min(max_height, width × 0.618)` points and
/// hands that area to an [`InlineRenderer`] through [`EguiCanvas`].
pub struct InlineDisplay<'a> {
    view: GraphView<'a>,
    renderer: &'a mut InlineRenderer,
    width: f32,
    max_height: f32,
}

impl<'a> InlineDisplay<'a> {
    /// Display of `view`, reusing `renderer`'s scratch rows.
    pub fn new(view: GraphView<'a>, renderer: &'a mut InlineRenderer) -> Self {
        Self {
            view,
            renderer,
            width: 320.0,
            max_height: 320.0,
        }
    }

    /// Width in points.
    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Height limit in points.
    pub fn max_height(mut self, height: f32) -> Self {
        self.max_height = height;
        self
    }
}

impl Widget for InlineDisplay<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let width = self.width.max(0.0) as usize;
        let height = (self.max_height.max(0.0) as usize)
            .min((GOLDEN_RATIO_INV * width as f32) as usize);

        let (rect, response) =
            ui.allocate_exact_size(vec2(width as f32, height as f32), Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let mut canvas = EguiCanvas::new(&painter, rect.min);
            self.renderer.render(&self.view, &mut canvas, width, height);
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{CentralPanel, Context, RawInput, Rect};
    use surge_core::SurgeFilter;

    fn show(filter: &SurgeFilter, width: f32, max_height: f32) -> Rect {
        let ctx = Context::default();
        let mut renderer = InlineRenderer::new();
        let mut rect = Rect::NOTHING;
        let _ = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                rect = ui
                    .add(
                        InlineDisplay::new(filter.graph_view(), &mut renderer)
                            .width(width)
                            .max_height(max_height),
                    )
                    .rect;
            });
        });
        rect
    }

    #[test]
    fn height_follows_golden_ratio() {
        let filter = SurgeFilter::mono(8000.0).unwrap();
        let rect = show(&filter, 200.0, 400.0);
        assert_eq!(rect.width(), 200.0);
        assert_eq!(rect.height(), 123.0);
    }

    #[test]
    fn max_height_wins_when_smaller() {
        let filter = SurgeFilter::stereo(8000.0).unwrap();
        let rect = show(&filter, 300.0, 50.0);
        assert_eq!(rect.width(), 300.0);
        assert_eq!(rect.height(), 50.0);
    }
}
