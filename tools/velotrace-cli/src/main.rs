//! Velotrace CLI — replay and analyze recorded pointer streams.
//!
//! Usage:
//!   velotrace replay <PATH>    Replay a JSONL sample stream and report velocities
//!   velotrace synth            Generate a synthetic sample stream
//!   velotrace strategies       List available strategy names

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "velotrace",
    about = "Pointer velocity estimation over recorded sample streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL sample stream through a velocity tracker
    Replay {
        /// Path to the JSONL sample file (one PointerSample per line)
        path: PathBuf,

        /// Strategy to use: default|lsq1|lsq2|lsq3|wlsq2-delta|wlsq2-central|
        /// wlsq2-recent|int1|int2|legacy|impulse
        #[arg(short, long, default_value = "default")]
        strategy: String,

        /// Report only this pointer id (default: every id seen)
        #[arg(long)]
        id: Option<u32>,

        /// Print a velocity after every sample instead of only at the end
        #[arg(long)]
        per_sample: bool,
    },

    /// Generate a synthetic constant-velocity sample stream on stdout
    Synth {
        /// Velocity along x in units/second
        #[arg(long, default_value = "1000.0")]
        vx: f32,

        /// Velocity along y in units/second
        #[arg(long, default_value = "0.0")]
        vy: f32,

        /// Number of samples
        #[arg(long, default_value = "20")]
        samples: u32,

        /// Sample interval in milliseconds
        #[arg(long, default_value = "8")]
        interval_ms: u64,

        /// Pointer id to emit
        #[arg(long, default_value = "0")]
        id: u32,
    },

    /// List the available strategy names
    Strategies,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = velotrace_common::config::LoggingConfig::default();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    velotrace_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            path,
            strategy,
            id,
            per_sample,
        } => commands::replay::run(path, &strategy, id, per_sample),
        Commands::Synth {
            vx,
            vy,
            samples,
            interval_ms,
            id,
        } => commands::synth::run(vx, vy, samples, interval_ms, id),
        Commands::Strategies => {
            for name in commands::STRATEGY_NAMES {
                println!("{name}");
            }
            Ok(())
        }
    }
}
