//! egui front end pieces for the surge filter.
//!
//! Everything here runs on the UI thread and only reads
//! [`SurgeShared`](surge_core::SurgeShared) or a borrowed
//! [`GraphView`](surge_core::GraphView); nothing touches audio state.
//!
//! # Modules
//!
//! - [`canvas`] - egui painter as a [`Canvas`](surge_core::Canvas) for the inline display
//! - [`theme`] - Visual styling constants and egui theme application
//! - [`widgets`] - Inline display, mesh plots and level meters

pub mod canvas;
pub mod theme;
pub mod widgets;

pub use canvas::{EguiCanvas, color32};
pub use theme::Theme;
pub use widgets::{
    ActivityLed, InlineDisplay, LevelMeter, MeshPlot, meter_fraction, pad_closed, sync_redraw,
};
