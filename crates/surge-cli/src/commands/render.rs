//! Inline display rendering command.

use super::common::{SettingsArgs, build_filter, run_blocks};
use crate::signal::{SignalArgs, transport_signal};
use crate::wav::read_wav;
use clap::Args;
use std::path::PathBuf;
use surge_core::{Canvas, InlineRenderer, MAX_CHANNELS, PixelCanvas, SurgeFilter};

#[derive(Args)]
pub struct RenderArgs {
    /// Render after processing this WAV file instead of the synthetic signal
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[command(flatten)]
    signal: SignalArgs,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Number of channels for the synthetic signal (1 or 2)
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=2))]
    channels: u8,

    /// Display width in pixels
    #[arg(long, default_value = "320")]
    width: usize,

    /// Maximum display height in pixels (the display keeps a golden-ratio aspect)
    #[arg(long, default_value = "320")]
    height: usize,

    /// Write a binary PPM image here instead of printing a preview
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preview columns when printing to the terminal
    #[arg(long, default_value = "80")]
    columns: usize,
}

/// Run the input through a filter and return it for drawing.
fn processed_filter(args: &RenderArgs) -> anyhow::Result<SurgeFilter> {
    let settings = args.settings.settings()?;
    let (inputs, sample_rate) = match &args.input {
        Some(path) => {
            let audio = read_wav(path, MAX_CHANNELS)?;
            anyhow::ensure!(!audio.channels.is_empty(), "input has no channels");
            (audio.channels, audio.sample_rate)
        }
        None => {
            let mono = transport_signal(&args.signal);
            (vec![mono; usize::from(args.channels)], args.signal.sample_rate)
        }
    };

    let mut filter = build_filter(inputs.len(), sample_rate, &settings)?;
    run_blocks(&mut filter, &inputs, 512, |_, _| {});
    Ok(filter)
}

/// Draw the filter's inline display.
pub fn render_display(
    filter: &SurgeFilter,
    width: usize,
    height: usize,
) -> anyhow::Result<PixelCanvas> {
    let mut canvas = PixelCanvas::new();
    let mut renderer = InlineRenderer::new();
    anyhow::ensure!(
        renderer.render(&filter.graph_view(), &mut canvas, width, height),
        "cannot draw a {width}x{height} display"
    );
    Ok(canvas)
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let filter = processed_filter(&args)?;
    let canvas = render_display(&filter, args.width, args.height)?;
    tracing::debug!(
        width = canvas.width(),
        height = canvas.height(),
        "rendered inline display"
    );

    match &args.output {
        Some(path) => {
            std::fs::write(path, canvas.to_ppm())?;
            println!("Wrote {}", path.display());
        }
        None => {
            // Terminal cells are roughly twice as tall as wide.
            let cell_w = canvas.width().div_ceil(args.columns.max(1));
            print!("{}", canvas.to_ascii(cell_w, cell_w * 2));
        }
    }
    Ok(())
}
