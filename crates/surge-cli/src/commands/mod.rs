//! CLI subcommands.

pub mod common;
pub mod params;
pub mod presets;
pub mod process;
pub mod render;
pub mod simulate;
