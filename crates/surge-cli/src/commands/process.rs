//! File-based processing command.

use super::common::{SettingsArgs, build_filter, run_blocks, to_db};
use crate::signal::max_step;
use crate::wav::{Audio, read_wav, write_wav};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use surge_core::MAX_CHANNELS;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo; extra channels are dropped)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Drop the filter latency from the start of the output and pad the end
    #[arg(long)]
    compensate: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let audio = read_wav(&args.input, MAX_CHANNELS)?;
    let frames = audio.frames();
    let channels = audio.channels.len();
    anyhow::ensure!(channels > 0, "input has no channels");

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        channels,
        audio.sample_rate,
        frames as f32 / audio.sample_rate as f32
    );

    let preset = args.settings.preset()?;
    let settings = preset.to_settings()?;
    let mut filter = build_filter(channels, audio.sample_rate, &settings)?;
    let latency = filter.latency();
    println!("Settings: {} (latency {} samples)", preset.name, latency);

    // Extra input so the compensated output keeps its length.
    let tail = if args.compensate { latency } else { 0 };
    let inputs: Vec<Vec<f32>> = audio
        .channels
        .iter()
        .map(|ch| {
            let mut buf = ch.clone();
            buf.resize(frames + tail, 0.0);
            buf
        })
        .collect();

    let pb = ProgressBar::new((frames + tail) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut outputs = run_blocks(&mut filter, &inputs, args.block_size, |_, end| {
        pb.set_position(end as u64);
    });
    pb.finish_with_message("done");

    if args.compensate {
        for ch in &mut outputs {
            ch.drain(..latency.min(ch.len()));
        }
    }

    println!("\nLargest step:");
    for (i, (input, output)) in audio.channels.iter().zip(&outputs).enumerate() {
        println!(
            "  ch{}: input {:.1} dB, output {:.1} dB",
            i,
            to_db(max_step(input)),
            to_db(max_step(output))
        );
    }

    println!("\nWriting {}...", args.output.display());
    let out = Audio {
        channels: outputs,
        sample_rate: audio.sample_rate,
    };
    write_wav(&args.output, &out, args.bit_depth)?;
    println!("Done!");

    Ok(())
}
