//! drape CLI: run, validate and inspect cloth simulations.

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod scenario;

#[derive(Parser)]
#[command(name = "drape")]
#[command(version, about = "drape: position-based dynamics cloth solver")]
struct Cli {
    /// Log solver internals (repeat for per-tick detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario (TOML) or the built-in hanging sheet.
    Simulate {
        /// Path to a scenario file (TOML). Omit for the hanging sheet.
        #[arg(short, long)]
        config: Option<String>,

        /// Override the scenario's tick count.
        #[arg(short, long)]
        ticks: Option<u32>,

        /// Override the projection mode (direct, colored_sequential, colored_parallel).
        #[arg(short, long)]
        mode: Option<String>,

        /// Write telemetry events as JSON lines to this file.
        #[arg(short, long)]
        events: Option<String>,
    },

    /// Validate a scenario/config (.toml) or a mesh (.json).
    Validate {
        /// Path to config or mesh file.
        path: String,
    },

    /// Print edge, hinge and color-class statistics for a quad grid.
    Topology {
        /// Quads along X.
        #[arg(long, default_value_t = 20)]
        cols: usize,

        /// Quads along Z.
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Simulate {
            config,
            ticks,
            mode,
            events,
        } => commands::simulate(config.as_deref(), ticks, mode.as_deref(), events.as_deref()),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Topology { cols, rows } => commands::topology(cols, rows),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
