//! Sumi-Drift: a random-walk web crawler
//!
//! This crate walks the hyperlink graph at random from a seed URL, keeping a
//! bounded, randomly resampled history of visited pages that serves both as
//! a restart pool and as a forgetting mechanism. It stores no page content.

pub mod config;
pub mod crawler;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Drift operations
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("No usable links on {url}")]
    EmptyLinkSet { url: String },

    #[error("History is empty")]
    EmptyHistory,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Invalid leg transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WalkPhase,
        to: state::WalkPhase,
    },
}

impl DriftError {
    /// Returns true if the error should stop the driver loop
    ///
    /// Everything a leg can raise is recoverable: the driver logs it and
    /// starts the next leg.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidTransition { .. })
    }

    /// Returns true if the error came from the network layer
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Timeout { .. } | Self::HttpStatus { .. } | Self::RedirectLimit { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Sumi-Drift operations
pub type Result<T> = std::result::Result<T, DriftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Driver, RandomWalker};
pub use state::{BoundedHistory, WalkPhase};
pub use crate::url::{domain_key, parse_walk_url, same_site, strip_fragment};
