//! Transport start/stop simulation command.

use super::common::{SettingsArgs, build_filter, run_blocks, to_db};
use crate::signal::{SignalArgs, max_step, transport_signal};
use crate::wav::{Audio, write_wav};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use surge_core::SurgeFilter;

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    signal: SignalArgs,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Number of channels (1 or 2)
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=2))]
    channels: u8,

    /// Processing block size
    #[arg(long, default_value = "256")]
    block_size: usize,

    /// Meter report interval, ms
    #[arg(long, default_value = "50")]
    report_ms: f32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Also write the filtered signal to a WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Meter readings over one report interval.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeterRow {
    /// End of the interval, ms.
    pub time_ms: f32,
    /// Peak input level per channel, dBFS.
    pub input_db: Vec<f32>,
    /// Peak output level per channel, dBFS.
    pub output_db: Vec<f32>,
    /// Smallest gain-control value seen.
    pub gain: f32,
    /// Peak envelope level, dBFS.
    pub envelope_db: f32,
    /// Activity indicator was lit.
    pub active: bool,
}

/// Whole-run summary.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Reported filter latency, samples.
    pub latency: usize,
    /// Largest sample-to-sample jump at the input, dBFS.
    pub input_step_db: f32,
    /// Largest sample-to-sample jump at the output, dBFS.
    pub output_step_db: f32,
    /// Meter rows.
    pub meters: Vec<MeterRow>,
}

/// Accumulates meter readings between report rows.
struct MeterWindow {
    channels: usize,
    input: Vec<f32>,
    output: Vec<f32>,
    gain: f32,
    envelope: f32,
    active: bool,
}

impl MeterWindow {
    fn new(channels: usize) -> Self {
        Self {
            channels,
            input: vec![0.0; channels],
            output: vec![0.0; channels],
            gain: f32::MAX,
            envelope: 0.0,
            active: false,
        }
    }

    fn observe(&mut self, filter: &SurgeFilter) {
        let shared = filter.shared();
        for ch in 0..self.channels {
            self.input[ch] = self.input[ch].max(shared.input_meter(ch));
            self.output[ch] = self.output[ch].max(shared.output_meter(ch));
        }
        self.gain = self.gain.min(shared.gain_meter());
        self.envelope = self.envelope.max(shared.envelope_meter());
        self.active |= shared.activity() > 0.0;
    }

    fn flush(&mut self, time_ms: f32) -> MeterRow {
        let row = MeterRow {
            time_ms,
            input_db: self.input.iter().map(|&v| to_db(v)).collect(),
            output_db: self.output.iter().map(|&v| to_db(v)).collect(),
            gain: if self.gain == f32::MAX { 0.0 } else { self.gain },
            envelope_db: to_db(self.envelope),
            active: self.active,
        };
        *self = Self::new(self.channels);
        row
    }
}

/// Run the simulation and collect the report.
pub fn simulate(
    signal: &SignalArgs,
    settings: &SettingsArgs,
    channels: usize,
    block_size: usize,
    report_ms: f32,
) -> anyhow::Result<(Report, Vec<Vec<f32>>)> {
    let settings = settings.settings()?;
    let mut filter = build_filter(channels, signal.sample_rate, &settings)?;

    let mono = transport_signal(signal);
    let inputs = vec![mono; channels];
    let sr = signal.sample_rate as f32;
    let report_every = ((sr * report_ms / 1000.0) as usize).max(1);

    let mut window = MeterWindow::new(channels);
    let mut meters = Vec::new();
    let mut next_report = report_every;
    let frames = inputs[0].len();

    let outputs = run_blocks(&mut filter, &inputs, block_size, |filter, end| {
        window.observe(filter);
        if end >= next_report || end == frames {
            meters.push(window.flush(end as f32 * 1000.0 / sr));
            next_report = end + report_every;
        }
    });

    let report = Report {
        sample_rate: signal.sample_rate,
        latency: filter.latency(),
        input_step_db: to_db(max_step(&inputs[0])),
        output_step_db: to_db(max_step(&outputs[0])),
        meters,
    };
    Ok((report, outputs))
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let channels = usize::from(args.channels);
    let (report, outputs) = simulate(
        &args.signal,
        &args.settings,
        channels,
        args.block_size,
        args.report_ms,
    )?;

    if let Some(path) = &args.output {
        let audio = Audio {
            channels: outputs,
            sample_rate: args.signal.sample_rate,
        };
        write_wav(path, &audio, 32)?;
        tracing::info!(path = %path.display(), "wrote filtered signal");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, channels);
    Ok(())
}

fn print_report(report: &Report, channels: usize) {
    println!(
        "Latency: {} samples ({:.2} ms)",
        report.latency,
        report.latency as f32 * 1000.0 / report.sample_rate as f32
    );
    println!();

    let mut header = format!("{:>9}", "time ms");
    for ch in 0..channels {
        header.push_str(&format!("  {:>8}  {:>8}", format!("in{ch} dB"), format!("out{ch} dB")));
    }
    header.push_str(&format!("  {:>6}  {:>8}  {}", "gain", "env dB", "act"));
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for row in &report.meters {
        let mut line = format!("{:>9.1}", row.time_ms);
        for (i, o) in row.input_db.iter().zip(&row.output_db) {
            line.push_str(&format!("  {:>8.1}  {:>8.1}", i, o));
        }
        line.push_str(&format!(
            "  {:>6.3}  {:>8.1}  {}",
            row.gain,
            row.envelope_db,
            if row.active { "*" } else { "" }
        ));
        println!("{line}");
    }

    println!();
    println!(
        "Largest step: input {:.1} dB, output {:.1} dB ({:+.1} dB)",
        report.input_step_db,
        report.output_step_db,
        report.output_step_db - report.input_step_db
    );
}
