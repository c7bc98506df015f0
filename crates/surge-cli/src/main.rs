//! Surge CLI - command-line front end for the surge anti-pop filter.

mod commands;
mod signal;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surge")]
#[command(author, version, about = "Surge anti-pop filter CLI", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a synthetic transport start/stop signal through the filter
    Simulate(commands::simulate::SimulateArgs),

    /// Process a WAV file through the filter
    Process(commands::process::ProcessArgs),

    /// Render the inline display to an image or ASCII preview
    Render(commands::render::RenderArgs),

    /// List filter parameters
    Params(commands::params::ParamsArgs),

    /// List and manage presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Process(args) => commands::process::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
