//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The FIFO frontier with its visited set
//! - HTTP fetching with manual redirect resolution
//! - Link extraction from page bodies
//! - The sequential crawl loop with its politeness delay

mod engine;
mod fetcher;
mod frontier;
mod parser;
#[cfg(test)]
mod testing;
mod transport;

pub use engine::Engine;
pub use fetcher::{fetch_page, request_headers, FetchError, FetchedPage};
pub use frontier::Frontier;
pub use parser::{extract_html_links, extract_page_links};
pub use transport::{
    build_http_client, ReqwestTransport, Transport, TransportError, TransportResponse,
};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::SpidyError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Admit the seed to a fresh frontier
/// 3. Fetch pages and follow links breadth-first
/// 4. Stop at the page budget or when no work remains
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - URL to start from
///
/// # Example
///
/// ```no_run
/// use spidy::config::Config;
/// use spidy::crawler::crawl;
///
/// # async fn example() -> Result<(), spidy::SpidyError> {
/// let report = crawl(Config::default(), "https://example.com/").await?;
/// println!("Discovered {} URLs", report.discovered_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, SpidyError> {
    let mut engine = Engine::from_config(config)?;
    engine.run(seed).await
}
