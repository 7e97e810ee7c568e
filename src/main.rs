//! Main entry point for the Pulseball rankings tool
//!
//! Loads configuration, restores the persisted rankings table and runs one
//! command against it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulseball::config::{validate_config, AppConfig, StorageBackend};
use pulseball::sample::{sample_match, sample_rankings};
use pulseball::{MatchApplication, MatchRecord, RankingError, RankingStore, Rankings, StandingEntry};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Pulseball - margin-adjusted team rankings
#[derive(Parser)]
#[command(
    name = "pulseball",
    version,
    about = "Maintain a team rankings table from completed match results",
    long_about = "Pulseball keeps a table of teams ordered by points, applies completed matches \
                 with a capped ranking-difference formula, persists the table between runs and \
                 renders it as an HTML table."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Storage directory override
    #[arg(long, value_name = "DIR", help = "Directory the rankings are persisted in")]
    storage_dir: Option<PathBuf>,

    /// Keep the table in memory only
    #[arg(long, help = "Do not persist rankings between runs")]
    memory: bool,

    /// HTML output override
    #[arg(long, value_name = "FILE", help = "Write the rendered rankings table to this file")]
    html_out: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace the rankings with the table in a JSON file
    Init {
        /// JSON array of {team, pos, pts} entries
        file: PathBuf,
    },
    /// Apply one or more match files (each a match object or an array of them)
    Apply {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the current rankings
    Show {
        /// Print the persisted JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Load the bundled five-team table and apply the bundled France v England result
    Demo,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(dir) = &args.storage_dir {
        config.storage.backend = StorageBackend::File;
        config.storage.directory = dir.clone();
    }

    if args.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    if let Some(path) = &args.html_out {
        config.render.output_path = Some(path.clone());
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// A match file holds either one match object or an array of them
fn read_matches(path: &Path) -> Result<Vec<MatchRecord>> {
    let value = read_json(path)?;
    let records = if value.is_array() {
        serde_json::from_value::<Vec<MatchRecord>>(value)
    } else {
        serde_json::from_value::<MatchRecord>(value).map(|record| vec![record])
    }
    .with_context(|| format!("{} does not contain match records", path.display()))?;

    Ok(records)
}

fn print_table(rankings: &[StandingEntry]) {
    println!("{:>4}  {:<24} {:>8}", "Pos", "Team", "Pts");
    for entry in rankings {
        println!(
            "{:>4}  {:<24} {:>8.2}",
            entry.position, entry.team.name, entry.points
        );
    }
}

fn apply_all(store: &mut RankingStore, records: &[MatchRecord]) -> (usize, usize) {
    let mut applied = 0;
    let mut rejected = 0;

    for record in records {
        match store.apply_match(record) {
            Ok(MatchApplication::Updated { .. }) => applied += 1,
            Ok(MatchApplication::NoResult) => {}
            // Already logged by the store; pending matches are expected in a feed
            Err(e) => match e.downcast_ref::<RankingError>() {
                Some(err) if err.is_warning() => {}
                _ => rejected += 1,
            },
        }
    }

    (applied, rejected)
}

fn run(args: Args, config: AppConfig) -> Result<()> {
    let mut store = RankingStore::from_config(&config)?;

    match args.command {
        Command::Init { file } => {
            let rankings: Rankings = serde_json::from_value(read_json(&file)?)
                .with_context(|| format!("{} does not contain a rankings table", file.display()))?;
            let stored = store.initialize(rankings)?;
            print_table(stored);
        }
        Command::Apply { files } => {
            let mut applied = 0;
            let mut rejected = 0;
            for file in &files {
                let records = read_matches(file)?;
                let (a, r) = apply_all(&mut store, &records);
                applied += a;
                rejected += r;
            }

            info!("{} matches applied, {} rejected", applied, rejected);
            if rejected > 0 {
                warn!("Some matches were rejected; see the log above");
            }
            print_table(store.rankings());
        }
        Command::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.rankings())?);
            } else {
                print_table(store.rankings());
            }
        }
        Command::Demo => {
            store.initialize(sample_rankings())?;
            store.apply_match(&sample_match())?;
            print_table(store.rankings());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} (storage: {:?}, key: '{}')",
        config.service.name,
        pulseball::VERSION,
        config.storage.backend,
        config.storage.key
    );

    if let Err(e) = run(args, config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
