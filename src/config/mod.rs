//! Configuration module for Spidy
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the defaults
//! (1000 page budget, 1000ms request delay, 10 redirect hops).
//!
//! # Example
//!
//! ```no_run
//! use spidy::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spidy.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages_to_crawl);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HeaderConfig, IoErrorPolicy, LinkExtraction,
    DEFAULT_MAX_PAGES_TO_CRAWL, DEFAULT_MAX_REDIRECTS, DEFAULT_REQUEST_DELAY_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
