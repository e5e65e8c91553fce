//! Headless driver for the spinning-ball trajectory core.
//!
//! Stands in for the rendering loop: fires one ball and ticks it at a fixed
//! frame rate, writing the trajectory instead of drawing it.
//!
//! # Usage
//!
//! ```bash
//! # Fly a launch preset and print the trajectory as CSV
//! spinball run --preset backspin_lob
//!
//! # Describe a launch on the command line, JSON output
//! spinball run --ball volleyball --velocity 1,6,12 --spin 0,80,0 --format json
//!
//! # Random launch in the preset format
//! spinball random --seed 7
//!
//! # List presets
//! spinball presets
//! ```

mod commands;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "spinball")]
#[command(author, version, about = "Spinning ball trajectories: gravity, drag and Magnus force", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fire one ball and record its flight
    Run(commands::run::Args),

    /// Generate a random launch
    Random(commands::random::Args),

    /// List ball and launch presets
    Presets(commands::presets::Args),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the trajectory, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("spinball v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run(args) => commands::run::run(&args),
        Commands::Random(args) => commands::random::run(&args),
        Commands::Presets(args) => commands::presets::run(&args),
    }
}
