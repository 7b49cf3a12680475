//! Sumi-Drift main entry point
//!
//! This is the command-line interface for the Sumi-Drift random walker.

use clap::Parser;
use std::path::PathBuf;
use sumi_drift::config::{load_config_with_hash, validate, Config};
use sumi_drift::crawler::Driver;
use tracing_subscriber::EnvFilter;

/// Sumi-Drift: a random-walk web crawler
///
/// Sumi-Drift wanders the web by following random links from a seed page,
/// restarting each leg from a page drawn out of a bounded, randomly
/// resampled history. It keeps nothing but that history.
#[derive(Parser, Debug)]
#[command(name = "sumi-drift")]
#[command(version)]
#[command(about = "A random-walk web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the seed URL from the configuration
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Stop after this many legs instead of walking forever
    #[arg(long, value_name = "N")]
    legs: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(seed) = cli.seed {
        config.walker.seed = seed;
        validate(&config)?;
    }

    // Any -v also turns on per-hop progress lines.
    if cli.verbose > 0 {
        config.walker.verbose = true;
    }

    handle_walk(config, cli.legs).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_drift=info,warn"),
            1 => EnvFilter::new("sumi_drift=debug,info"),
            2 => EnvFilter::new("sumi_drift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the walk, bounded or forever
async fn handle_walk(config: Config, legs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Walking from {} (history: {}, steps per leg: {}, link policy: {:?})",
        config.walker.seed,
        config.walker.history_size,
        config.walker.steps_per_leg,
        config.walker.link_policy()
    );

    let mut driver = Driver::from_config(&config)?;

    match legs {
        Some(n) => {
            let stats = driver.run_legs(n).await?;
            tracing::info!(
                "Walk finished: {} ({} legs, {:.1}% failed)",
                stats,
                stats.legs(),
                stats.failure_rate() * 100.0
            );
            Ok(())
        }
        None => match driver.run_forever().await {
            Ok(never) => match never {},
            Err(e) => {
                tracing::error!("Walk stopped: {}", e);
                Err(e.into())
            }
        },
    }
}
