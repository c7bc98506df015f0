//! Peak meters and the activity indicator.

use crate::Theme;
use egui::{Response, Sense, Ui, Widget, pos2, vec2};
use surge_core::linear_to_db;

/// Bottom of the meter scale, dBFS.
const METER_FLOOR_DB: f32 = -60.0;
/// Top of the meter scale, dBFS.
const METER_CEIL_DB: f32 = 6.0;

/// Fraction of the meter lit for a linear peak value.
pub fn meter_fraction(linear: f32) -> f32 {
    let db = linear_to_db(linear.abs());
    ((db - METER_FLOOR_DB) / (METER_CEIL_DB - METER_FLOOR_DB)).clamp(0.0, 1.0)
}

/// Vertical peak meter.
///
/// Reads a linear value such as
/// [`SurgeShared::output_meter`](surge_core::SurgeShared::output_meter); the
/// bar is drawn on a dB scale from −60 to +6 dBFS.
pub struct LevelMeter<'t> {
    level: f32,
    theme: &'t Theme,
    size: egui::Vec2,
}

impl<'t> LevelMeter<'t> {
    /// Meter showing `level`.
    pub fn new(level: f32, theme: &'t Theme) -> Self {
        Self {
            level,
            theme,
            size: vec2(10.0, 120.0),
        }
    }

    /// Widget size in points.
    pub fn size(mut self, size: egui::Vec2) -> Self {
        self.size = size;
        self
    }
}

impl Widget for LevelMeter<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::hover());
        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 2.0, self.theme.meter_track);

            let fraction = meter_fraction(self.level);
            if fraction > 0.0 {
                let top = rect.bottom() - rect.height() * fraction;
                let lit = egui::Rect::from_min_max(pos2(rect.left(), top), rect.max);
                painter.rect_filled(lit, 2.0, self.theme.meter_color(fraction));
            }

            // 0 dBFS tick.
            let zero = rect.bottom() - rect.height() * meter_fraction(1.0);
            painter.hline(
                rect.x_range(),
                zero,
                egui::Stroke::new(1.0, self.theme.text_secondary),
            );
        }
        response.on_hover_text(format!("{:.1} dB", linear_to_db(self.level.abs()).max(-144.0)))
    }
}

/// Gate activity indicator.
pub struct ActivityLed<'t> {
    lit: bool,
    theme: &'t Theme,
    radius: f32,
}

impl<'t> ActivityLed<'t> {
    /// LED lit while `activity` is non-zero.
    pub fn new(activity: f32, theme: &'t Theme) -> Self {
        Self {
            lit: activity > 0.0,
            theme,
            radius: 5.0,
        }
    }
}

impl Widget for ActivityLed<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(vec2(self.radius * 2.0, self.radius * 2.0), Sense::hover());
        let color = if self.lit {
            self.theme.activity_on
        } else {
            self.theme.activity_off
        };
        ui.painter().circle_filled(rect.center(), self.radius, color);
        response
    }
}
