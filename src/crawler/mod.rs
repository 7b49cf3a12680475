//! Crawler module for the random walk
//!
//! This module contains the walking logic, including:
//! - HTTP fetching with cookies, redirects and a body cap
//! - HTML link extraction
//! - Next-hop selection
//! - Single steps and legs of the walk
//! - The supervised driver loop

/// Logs walk progress at info level when verbose, debug otherwise
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

mod driver;
mod fetcher;
mod parser;
mod policy;
mod walker;


pub use driver::{Driver, LegOutcome};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory};
pub use parser::{extract_links, LinkSet};
pub use policy::LinkPolicy;
pub use walker::RandomWalker;

use crate::config::Config;
use crate::DriftError;
use std::convert::Infallible;

/// Walks forever from the configured seed
///
/// This is the main entry point for a production walk. It will:
/// 1. Build the HTTP fetcher factory and the first fetcher
/// 2. Seed the history
/// 3. Run supervised legs until the process is stopped
///
/// # Returns
///
/// Only returns on a fatal error; crawl errors are logged and skipped.
///
/// # Example
///
/// ```no_run
/// use sumi_drift::config::load_config;
/// use sumi_drift::crawler::walk;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("drift.toml"))?;
/// walk(&config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn walk(config: &Config) -> Result<Infallible, DriftError> {
    let mut driver = Driver::from_config(config)?;
    driver.run_forever().await
}
