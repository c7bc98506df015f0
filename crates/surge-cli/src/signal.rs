//! Synthetic transport signals.
//!
//! A transport start or stop cuts a running signal at an arbitrary phase,
//! which is exactly the discontinuity the filter is there to smooth. The
//! generator produces bursts of a sine tone separated by digital silence,
//! each burst starting and ending mid-cycle.

use clap::Args;

/// Shape of the synthetic signal.
#[derive(Args, Debug, Clone)]
pub struct SignalArgs {
    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    pub sample_rate: u32,

    /// Silence before the first burst, ms
    #[arg(long, default_value = "100")]
    pub lead: f32,

    /// Length of each burst, ms
    #[arg(long, default_value = "500")]
    pub burst: f32,

    /// Silence between bursts, ms
    #[arg(long, default_value = "300")]
    pub gap: f32,

    /// Number of bursts
    #[arg(long, default_value = "2")]
    pub bursts: usize,

    /// Tone frequency in Hz
    #[arg(long, default_value = "440")]
    pub freq: f32,

    /// Tone level in dBFS
    #[arg(long, default_value = "-6", allow_hyphen_values = true)]
    pub level: f32,

    /// Start phase of each burst in degrees (90 starts at the crest)
    #[arg(long, default_value = "90")]
    pub phase: f32,
}

fn ms_to_samples(sample_rate: u32, ms: f32) -> usize {
    (sample_rate as f32 * ms.max(0.0) / 1000.0).round() as usize
}

/// Generate one channel of the transport signal.
pub fn transport_signal(args: &SignalArgs) -> Vec<f32> {
    let sr = args.sample_rate as f32;
    let lead = ms_to_samples(args.sample_rate, args.lead);
    let burst = ms_to_samples(args.sample_rate, args.burst);
    let gap = ms_to_samples(args.sample_rate, args.gap);
    let amplitude = surge_core::db_to_linear(args.level);
    let phase = args.phase.to_radians();
    let w = std::f32::consts::TAU * args.freq / sr;

    let mut out = vec![0.0; lead];
    for b in 0..args.bursts {
        out.extend((0..burst).map(|i| amplitude * (phase + w * i as f32).sin()));
        let tail = if b + 1 == args.bursts { lead } else { gap };
        out.resize(out.len() + tail, 0.0);
    }
    out
}

/// Largest absolute difference between consecutive samples.
///
/// Clicks show up as jumps far larger than the tone's own slope.
pub fn max_step(samples: &[f32]) -> f32 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f32::max)
}
