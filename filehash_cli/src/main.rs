use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use crate::commands::App;
use crate::config::ConfigManager;

#[derive(Parser)]
#[command(name = "filehash")]
#[command(version, about = "File hashing and duplicate detection", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Digest database location (overrides configuration)
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate digests for files or directories
    Generate {
        /// Files or directories to hash
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Recompute digests that are already stored
        #[arg(long)]
        force: bool,

        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,
    },

    /// Check a file for duplicates against the stored digests
    Check {
        /// File to check
        path: PathBuf,

        /// Include in-progress uploads in the search
        #[arg(long)]
        strict: bool,
    },

    /// List supported hash algorithms
    Algos {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: commands::algos::OutputFormat,
    },

    /// Drop stored digests for algorithms that are no longer enabled
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("filehash_core", log::LevelFilter::Debug)
            .filter_module("filehash_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let app_config = ConfigManager::new(cli.config.clone())
        .load()
        .context("Failed to load configuration")?;
    let db_path = cli
        .db
        .or(app_config.database.path.clone())
        .unwrap_or_else(|| PathBuf::from("filehash.db"));

    match cli.command {
        Commands::Generate {
            paths,
            force,
            no_progress,
        } => {
            let app = App::open(app_config.hash, &db_path).await?;
            commands::generate::run(&app, &paths, force, no_progress).await?;
        }
        Commands::Check { path, strict } => {
            let app = App::open(app_config.hash, &db_path).await?;
            let duplicate = commands::check::run(&app, &path, strict).await?;
            if duplicate {
                std::process::exit(1);
            }
        }
        Commands::Algos { format } => {
            commands::algos::run(&app_config.hash, format)?;
        }
        Commands::Clean => {
            let app = App::open(app_config.hash, &db_path).await?;
            commands::clean::run(&app).await?;
        }
    }

    Ok(())
}
