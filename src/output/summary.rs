//! Crawl report and summary printing
//!
//! The engine hands back a `CrawlReport` when a run ends (or, after an
//! interrupt, whatever it had gathered so far). Printing is kept separate
//! so the binary decides how results are shown.

use crate::state::{PageReport, RunState};
use crate::url::extract_host;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

/// Everything a finished (or interrupted) run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Seed URL the run started from
    pub seed: String,

    /// Terminal state of the run
    pub state: RunState,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// One entry per processed frontier URL, in processing order
    pub pages: Vec<PageReport>,

    /// Every distinct URL admitted to the frontier, in admission order
    pub discovered: Vec<String>,

    /// URLs still waiting when the run ended
    pub pending: usize,
}

impl CrawlReport {
    /// Number of frontier entries that were fetched successfully
    pub fn pages_fetched(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_success()).count()
    }

    /// Number of frontier entries whose fetch failed
    pub fn failures(&self) -> usize {
        self.pages.len() - self.pages_fetched()
    }

    /// Failure counts grouped by kind
    pub fn failures_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for error in self.pages.iter().filter_map(|p| p.outcome.error()) {
            *counts.entry(error.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Total distinct URLs discovered
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Distinct hosts among discovered URLs
    pub fn unique_hosts(&self) -> usize {
        self.discovered
            .iter()
            .filter_map(|url| extract_host(url))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Wall-clock duration, if the run has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the crawl summary to stdout
///
/// # Arguments
///
/// * `report` - The report to display
/// * `list_urls` - Whether to list every discovered URL
pub fn print_summary(report: &CrawlReport, list_urls: bool) {
    println!("=== Crawl Results ===\n");

    println!("Overview:");
    println!("  Seed: {}", report.seed);
    println!("  Finished as: {}", report.state);
    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Pages processed: {}", report.pages.len());
    println!("  Pages fetched: {}", report.pages_fetched());
    println!("  Still pending: {}", report.pending);
    println!("  Unique hosts: {}", report.unique_hosts());
    println!();

    let failures = report.failures_by_kind();
    if !failures.is_empty() {
        println!("Failures ({}):", report.failures());
        for (kind, count) in &failures {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!("Total sites crawled: {}", report.discovered_count());
    if list_urls {
        for url in &report.discovered {
            println!("  {}", url);
        }
    }
}
