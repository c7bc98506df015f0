//! Surge filter widgets.
//!
//! - [`InlineDisplay`] - the inline display drawn through [`EguiCanvas`](crate::EguiCanvas)
//! - [`MeshPlot`] - UI-side mesh consumer and plot
//! - [`LevelMeter`] - vertical peak meter fed from shared meter values
//! - [`ActivityLed`] - gate activity indicator

mod inline_display;
mod level_meter;
mod mesh_plot;

pub use inline_display::InlineDisplay;
pub use level_meter::{ActivityLed, LevelMeter, meter_fraction};
pub use mesh_plot::{MeshPlot, pad_closed, sync_redraw};
