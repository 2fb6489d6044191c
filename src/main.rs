mod cli;

use anyhow::Context;
use chrono::{Local, Timelike};
use clap::Parser;
use cli::{Cli, Commands};
use smartgrow::config::Config;
use smartgrow::db::Database;
use smartgrow::logic::{ActuatorController, DecisionEngine};
use smartgrow::models::SensorReading;
use smartgrow::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let Cli {
        command,
        config,
        data_dir,
        verbose,
    } = Cli::parse();

    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match command.unwrap_or(Commands::Serve) {
        Commands::Init => {
            Config::setup_interactive()?;
        }
        Commands::Serve => {
            let config = Config::load_or_default(config.as_ref())?;
            serve(config, data_dir.as_ref()).await?;
        }
        Commands::Evaluate {
            temperature,
            soil_moisture,
            light,
            hour,
        } => {
            let config = Config::load_or_default(config.as_ref())?;
            let engine = build_engine(&config)?;
            let reading = SensorReading {
                temperature,
                soil_moisture,
                light,
            };
            let hour = hour.unwrap_or_else(|| Local::now().hour());
            let decision = engine.process_at(&reading, hour)?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::History { limit } => {
            let config = Config::load_or_default(config.as_ref())?;
            let db = open_db(&config, data_dir.as_ref())?;
            for r in db.recent_readings(limit)? {
                let light = r.light.map(|l| format!("{:.1}%", l)).unwrap_or_else(|| "-".into());
                println!(
                    "{}  temp={:.1}°C  soil={:.1}%  light={}",
                    r.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    r.temperature,
                    r.soil_moisture,
                    light
                );
            }
        }
        Commands::Check => {
            let config = Config::load_or_default(config.as_ref())?;
            println!("Config: OK");
            let engine = build_engine(&config)?;
            println!("Rule base: OK (lighting policy: {})", engine.lighting_policy());
            let db = open_db(&config, data_dir.as_ref())?;
            println!(
                "Database: OK ({} readings at {})",
                db.count_readings()?,
                db.path().display()
            );
        }
    }

    Ok(())
}

fn build_engine(config: &Config) -> anyhow::Result<DecisionEngine> {
    let controller = Arc::new(ActuatorController::new(config.control.reset_level_on_manual));
    let lighting = config.lighting.build_policy()?;
    Ok(DecisionEngine::new(lighting, controller)?)
}

fn open_db(config: &Config, data_dir: Option<&PathBuf>) -> anyhow::Result<Database> {
    let path = config.db_path(data_dir)?;
    Database::open(&path).with_context(|| format!("opening database at {}", path.display()))
}

async fn serve(config: Config, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let engine = build_engine(&config)?;
    let db = open_db(&config, data_dir)?;
    tracing::info!(
        lighting = engine.lighting_policy(),
        reset_level_on_manual = config.control.reset_level_on_manual,
        database = %db.path().display(),
        "Starting SmartGrow"
    );

    let state = AppState {
        engine: Arc::new(engine),
        db,
    };
    server::run_server(&config.server, state).await
}
