//! Visual styling for surge displays.

use crate::color32;
use egui::{Color32, CornerRadius, Stroke, Style, Visuals};
use surge_core::Color;

/// Theme colors for the GUI.
///
/// Series colors default to the inline display palette so a plot and the
/// inline display of the same filter look alike.
pub struct Theme {
    /// Plot background color.
    pub background: Color32,
    /// Panel/card background color.
    pub panel_bg: Color32,
    /// Primary accent color for active elements.
    pub accent: Color32,
    /// Primary text color.
    pub text_primary: Color32,
    /// Secondary/muted text color.
    pub text_secondary: Color32,
    /// Meter color for safe signal levels.
    pub meter_green: Color32,
    /// Meter color for hot signal levels.
    pub meter_yellow: Color32,
    /// Meter color for clipping signal levels.
    pub meter_red: Color32,
    /// Unlit meter background.
    pub meter_track: Color32,
    /// Gain-control series.
    pub gain: Color32,
    /// Envelope series.
    pub envelope: Color32,
    /// Input series: mono, left, right.
    pub input: [Color32; 3],
    /// Output series: mono, left, right.
    pub output: [Color32; 3],
    /// Activity indicator while the gate passes signal.
    pub activity_on: Color32,
    /// Activity indicator at rest.
    pub activity_off: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: color32(Color::BACKGROUND),
            panel_bg: Color32::from_rgb(35, 35, 42),
            accent: Color32::from_rgb(100, 180, 255),
            text_primary: Color32::from_rgb(230, 230, 235),
            text_secondary: Color32::from_rgb(150, 150, 160),
            meter_green: Color32::from_rgb(80, 200, 80),
            meter_yellow: Color32::from_rgb(220, 200, 60),
            meter_red: Color32::from_rgb(220, 60, 60),
            meter_track: Color32::from_rgb(50, 50, 60),
            gain: color32(Color::BRIGHT_BLUE),
            envelope: color32(Color::BRIGHT_MAGENTA),
            input: [
                color32(Color::MIDDLE_CHANNEL_IN),
                color32(Color::LEFT_CHANNEL_IN),
                color32(Color::RIGHT_CHANNEL_IN),
            ],
            output: [
                color32(Color::MIDDLE_CHANNEL),
                color32(Color::LEFT_CHANNEL),
                color32(Color::RIGHT_CHANNEL),
            ],
            activity_on: Color32::from_rgb(80, 200, 80),
            activity_off: Color32::from_rgb(80, 80, 90),
        }
    }
}

/// Palette slot: 0 for mono, 1/2 for left/right.
fn slot(channel: usize, channels: usize) -> usize {
    if channels <= 1 { 0 } else { (channel + 1).min(2) }
}

impl Theme {
    /// Apply the theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = Style::default();

        let mut visuals = Visuals::dark();

        visuals.window_fill = self.panel_bg;
        visuals.panel_fill = self.panel_bg;
        visuals.extreme_bg_color = self.background;

        visuals.widgets.noninteractive.bg_fill = self.panel_bg;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);

        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, self.accent);
        visuals.widgets.active.fg_stroke = Stroke::new(2.0, self.accent);

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.override_text_color = Some(self.text_primary);

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(6.0, 4.0);

        ctx.set_style(style);
    }

    /// Get meter color based on the lit fraction (0.0 to 1.0).
    pub fn meter_color(&self, fraction: f32) -> Color32 {
        // 0 dBFS sits at 60/66 of the scale.
        if fraction > 0.9 {
            self.meter_red
        } else if fraction > 0.75 {
            self.meter_yellow
        } else {
            self.meter_green
        }
    }

    /// Input series color of `channel` out of `channels`.
    pub fn channel_in(&self, channel: usize, channels: usize) -> Color32 {
        self.input[slot(channel, channels)]
    }

    /// Output series color of `channel` out of `channels`.
    pub fn channel_out(&self, channel: usize, channels: usize) -> Color32 {
        self.output[slot(channel, channels)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_uses_middle_colors() {
        let theme = Theme::default();
        assert_eq!(theme.channel_out(0, 1), color32(Color::MIDDLE_CHANNEL));
        assert_eq!(theme.channel_in(0, 1), color32(Color::MIDDLE_CHANNEL_IN));
    }

    #[test]
    fn stereo_uses_left_and_right() {
        let theme = Theme::default();
        assert_eq!(theme.channel_out(0, 2), color32(Color::LEFT_CHANNEL));
        assert_eq!(theme.channel_out(1, 2), color32(Color::RIGHT_CHANNEL));
        assert_eq!(theme.channel_in(1, 2), color32(Color::RIGHT_CHANNEL_IN));
    }

    #[test]
    fn meter_color_thresholds() {
        let theme = Theme::default();
        assert_eq!(theme.meter_color(0.5), theme.meter_green);
        assert_eq!(theme.meter_color(0.8), theme.meter_yellow);
        assert_eq!(theme.meter_color(0.95), theme.meter_red);
    }
}
