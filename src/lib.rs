//! Spidy: a polite breadth-first web crawler
//!
//! This crate implements a sequential crawler that starts from a seed URL,
//! follows every URL-shaped link it finds in page text, and stops once its
//! page budget is spent or no work remains.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Spidy operations
#[derive(Debug, Error)]
pub enum SpidyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Malformed URL: {url}")]
    MalformedUrl { url: String },

    #[error("Crawl interrupted during request delay")]
    Interrupted,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
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
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Spidy operations
pub type Result<T> = std::result::Result<T, SpidyError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Engine, Frontier};
pub use state::{PageOutcome, RunState};
pub use crate::url::{extract_links, parse_target, resolve_link};
