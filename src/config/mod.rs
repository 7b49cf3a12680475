//! Configuration module for Sumi-Drift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_drift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("drift.toml")).unwrap();
//! println!("Walking from: {}", config.walker.seed);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, LinkPolicyKind, UserAgentConfig, WalkerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
