//! Main entry point for the habit tracker API server
//!
//! Sets up logging, parses command line arguments (with environment
//! fallbacks), resolves the data-file location, and starts the HTTP
//! server. Invalid configuration halts startup.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_tracker_api::{AppConfig, HabitApiServer, StorageMode};

/// Command line arguments for the habit tracker API server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Storage backend: 'memory' (no persistence, seeded demo data) or
    /// 'file' (JSON document on disk)
    #[arg(long, env = "REPOSITORY_TYPE", default_value = "memory")]
    storage: String,

    /// Path to the habits JSON file (file backend only)
    /// If not provided, a default location in the user's data directory is used
    #[arg(long, env = "HABITS_FILE_PATH")]
    data_file: Option<PathBuf>,

    /// Frontend origin allowed by CORS
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    frontend_origin: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

/// Pick a writable default location for the habits file, preferring the
/// platform data directory and falling back to the working directory.
fn default_data_file_path() -> PathBuf {
    let candidates = [
        dirs::data_dir().map(|p| p.join("habit-tracker")),
        dirs::home_dir().map(|p| p.join(".habit-tracker")),
    ];

    for dir in candidates.into_iter().flatten() {
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join("habits.json");
        }
    }

    PathBuf::from("habits.json")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "habit_tracker_api={log_level},tower_http={log_level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting habit tracker API server");

    // Invalid storage mode is fatal, before anything else is wired up.
    let storage_mode = StorageMode::parse(&args.storage)?;

    let data_file = match args.data_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_data_file_path(),
    };

    let config = AppConfig {
        port: args.port,
        storage_mode,
        data_file,
        frontend_origin: args.frontend_origin,
    };

    info!(
        port = config.port,
        storage = config.storage_mode.as_str(),
        data_file = %config.data_file.display(),
        "configuration resolved"
    );

    let server = HabitApiServer::new(config).await?;
    server.run().await?;

    info!("Habit tracker API server shutdown complete");
    Ok(())
}
