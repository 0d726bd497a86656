//! campusnav CLI - Command-line interface
//!
//! Front end to the campusnav library: inspect the destination registry,
//! test points against boundaries and replay recorded tracks through the
//! location tracker.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "campusnav", version = campusnav::VERSION)]
#[command(about = "Geofenced arrival detection for campus destinations", long_about = None)]
struct Cli {
    /// Boundary registry JSON file (overrides geofence.boundaries_file)
    #[arg(long, global = true, value_name = "FILE")]
    boundaries: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List registered destinations
    Destinations,

    /// Check whether a point lies inside destination boundaries
    #[command(allow_negative_numbers = true)]
    Check {
        /// Latitude in degrees
        latitude: f64,

        /// Longitude in degrees
        longitude: f64,

        /// Only test this destination
        #[arg(short, long)]
        destination: Option<String>,
    },

    /// Replay a recorded track and report arrivals
    Replay {
        /// CSV track file (latitude,longitude[,heading] per line)
        file: PathBuf,

        /// Destination to navigate to
        #[arg(short, long)]
        destination: String,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        boundaries,
        verbose,
        command,
    } = cli;
    let context = || commands::common::CliContext::new(boundaries.clone(), verbose);

    match command {
        Commands::Destinations => commands::destinations::run(&context()?),
        Commands::Check {
            latitude,
            longitude,
            destination,
        } => commands::check::run(&context()?, latitude, longitude, destination.as_deref()),
        Commands::Replay { file, destination } => {
            commands::replay::run(&context()?, ReplayArgs { file, destination })
        }
        // Does not load the config up front so a broken file can be repaired
        Commands::Config { command } => commands::config::run(command),
    }
}
