//! Output module for crawl results
//!
//! This module handles:
//! - The `CrawlReport` returned by a run
//! - Printing the end-of-run summary

mod summary;

pub use summary::{print_summary, CrawlReport};
