use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smartgrow", version, about = "Greenhouse actuator controller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Decide actuator levels for one reading without touching stored state
    Evaluate {
        /// Air temperature in °C
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Soil moisture in percent
        #[arg(long)]
        soil_moisture: f64,
        /// Ambient light in percent (fuzzy lighting only)
        #[arg(long)]
        light: Option<f64>,
        /// Local hour to evaluate at (defaults to now)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
    /// Print stored readings, newest first
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Validate config, rule base and database
    Check,
    /// Re-run interactive setup
    Init,
}
