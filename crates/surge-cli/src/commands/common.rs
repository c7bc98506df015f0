//! Shared CLI helpers used across multiple commands.

use clap::Args;
use surge_config::{Preset, resolve_preset};
use surge_core::{SurgeFilter, SurgeSettings};

/// Filter settings from an optional preset plus `--set` overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Preset name, factory preset or path to a TOML file
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Override a setting (e.g., "fadein=20ms", "modeout=sine"); repeatable
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl SettingsArgs {
    /// Preset with overrides applied; the default preset when none was named.
    pub fn preset(&self) -> anyhow::Result<Preset> {
        let mut preset = match &self.preset {
            Some(name) => load_preset(name)?,
            None => Preset::default(),
        };
        for assignment in &self.overrides {
            preset.apply_override(assignment)?;
        }
        Ok(preset)
    }

    /// Resolved filter settings.
    pub fn settings(&self) -> anyhow::Result<SurgeSettings> {
        Ok(self.preset()?.to_settings()?)
    }
}

/// Load a preset by name or path.
///
/// Files (direct path, user and system preset directories) take precedence
/// over factory presets of the same name.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    resolve_preset(name).map_err(|e| {
        anyhow::anyhow!("{e}. Use 'surge presets list' to see available presets.")
    })
}

/// Build a filter for `channels` channels with `settings` applied.
pub fn build_filter(
    channels: usize,
    sample_rate: u32,
    settings: &SurgeSettings,
) -> anyhow::Result<SurgeFilter> {
    let mut filter = SurgeFilter::new(channels, sample_rate as f32)?;
    anyhow::ensure!(!filter.is_inert(), "could not allocate filter buffers");
    filter.update_settings(settings);
    tracing::debug!(
        channels,
        sample_rate,
        latency = filter.latency(),
        "filter ready"
    );
    Ok(filter)
}

/// Feed whole buffers through the filter in `block_size` blocks.
///
/// `on_block` runs after each block with the block's end frame.
pub fn run_blocks(
    filter: &mut SurgeFilter,
    inputs: &[Vec<f32>],
    block_size: usize,
    mut on_block: impl FnMut(&SurgeFilter, usize),
) -> Vec<Vec<f32>> {
    let frames = inputs.first().map_or(0, Vec::len);
    let mut outputs = vec![vec![0.0; frames]; inputs.len()];
    let block_size = block_size.max(1);

    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let ins: Vec<&[f32]> = inputs.iter().map(|b| &b[start..end]).collect();
        let mut outs: Vec<&mut [f32]> = outputs.iter_mut().map(|b| &mut b[start..end]).collect();
        filter.process(&ins, &mut outs);
        on_block(filter, end);
        start = end;
    }
    outputs
}

/// Linear amplitude in dBFS, floored at -144.
pub fn to_db(linear: f32) -> f32 {
    surge_core::linear_to_db(linear.abs()).max(-144.0)
}
