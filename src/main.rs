//! Spidy main entry point
//!
//! This is the command-line interface for the Spidy crawler.

use anyhow::{bail, Context};
use clap::Parser;
use spidy::config::{load_config_with_hash, validate, Config};
use spidy::crawler::Engine;
use spidy::output::print_summary;
use spidy::SpidyError;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Spidy: a polite breadth-first web crawler
///
/// Spidy starts at a seed URL, follows every URL it finds in page text,
/// and stops when its page budget is spent or nothing is left to visit.
#[derive(Parser, Debug)]
#[command(name = "spidy")]
#[command(version = "1.0.0")]
#[command(about = "A polite breadth-first web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from (prompted for when omitted)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the page budget
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Override the delay between requests, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// List every discovered URL in the summary
    #[arg(long)]
    list: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let seed = match cli.seed.clone() {
        Some(seed) => seed,
        None => prompt_for_seed().await?,
    };

    let mut engine = Engine::from_config(config).context("Failed to build HTTP client")?;

    // Ctrl-C cancels the run at the next request delay
    let token = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            token.cancel();
        }
    });

    match engine.run(&seed).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&report, cli.list);
            Ok(())
        }
        Err(SpidyError::Interrupted) => {
            print_summary(&engine.report(), cli.list);
            bail!("Crawl interrupted");
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spidy=info,warn"),
            1 => EnvFilter::new("spidy=debug,info"),
            2 => EnvFilter::new("spidy=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages_to_crawl = max_pages;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.request_delay = delay_ms;
    }

    validate(&config).context("Invalid command-line override")?;
    Ok(config)
}

/// Asks for the seed URL on stdin
async fn prompt_for_seed() -> anyhow::Result<String> {
    println!("Enter the URL to start crawling:");

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read seed URL from stdin")?;

    let seed = line.trim().to_string();
    if seed.is_empty() {
        bail!("No seed URL given");
    }
    Ok(seed)
}
