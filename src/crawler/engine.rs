//! Crawl engine - the main crawl loop
//!
//! Each iteration:
//! 1. Stop as `BudgetExhausted` once the enqueued set has reached the budget
//! 2. Dequeue the next URL; stop as `FrontierEmpty` if there is none
//! 3. Fetch it (following redirects), extract links, admit new ones
//! 4. Pause for the request delay; a cancellation here ends the run with
//!    `SpidyError::Interrupted`
//!
//! Fetch failures are recorded and never end the run.

use crate::config::{Config, IoErrorPolicy};
use crate::crawler::fetcher::{fetch_page, FetchedPage};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_page_links;
use crate::crawler::transport::{ReqwestTransport, Transport};
use crate::output::CrawlReport;
use crate::state::{PageOutcome, PageReport, RunState};
use crate::url::parse_target;
use crate::SpidyError;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Owns one crawl run: its frontier, its outcomes, and its transport
pub struct Engine<T: Transport> {
    config: Config,
    transport: T,
    frontier: Frontier,
    state: RunState,
    pages: Vec<PageReport>,
    seed: Option<String>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    cancel: CancellationToken,
}

impl Engine<ReqwestTransport> {
    /// Creates an engine that fetches over HTTP
    pub fn from_config(config: Config) -> Result<Self, SpidyError> {
        let transport = ReqwestTransport::from_config(&config.crawler)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> Engine<T> {
    /// Creates a new engine with an empty frontier
    pub fn new(config: Config, transport: T) -> Self {
        Self {
            config,
            transport,
            frontier: Frontier::new(),
            state: RunState::Running,
            pages: Vec::new(),
            seed: None,
            started_at: Utc::now(),
            finished_at: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that interrupts this run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Outcomes recorded so far, in processing order
    pub fn pages(&self) -> &[PageReport] {
        &self.pages
    }

    /// Validates the seed and admits it to the frontier
    ///
    /// The seed counts against the budget like any other admitted URL, so a
    /// page linking back to the seed never re-enqueues it.
    pub fn seed(&mut self, url: &str) -> Result<(), SpidyError> {
        let target = parse_target(url).map_err(|e| {
            tracing::error!("Invalid seed URL {}: {}", url, e);
            SpidyError::MalformedUrl {
                url: url.to_string(),
            }
        })?;

        // Keep the caller's spelling so the seed dedups against identical links
        let seed = url.trim().to_string();
        tracing::debug!("Seeding frontier with {} (parsed as {})", seed, target);

        self.frontier.enqueue(seed.clone());
        self.seed.get_or_insert(seed);
        self.started_at = Utc::now();
        self.state = RunState::Running;
        Ok(())
    }

    /// Runs a crawl from `seed` until a terminal state
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Run ended as `BudgetExhausted` or `FrontierEmpty`
    /// * `Err(SpidyError::MalformedUrl)` - The seed is not an http/https URL
    /// * `Err(SpidyError::Interrupted)` - Cancelled; partial results remain
    ///   available through [`Engine::report`] and [`Engine::frontier`]
    pub async fn run(&mut self, seed: &str) -> Result<CrawlReport, SpidyError> {
        self.seed(seed)?;
        self.resume().await
    }

    /// Drives the loop from whatever state the frontier is in
    ///
    /// A run that already ended is not restarted: a completed run returns
    /// its report again and an interrupted run returns
    /// `SpidyError::Interrupted`. `Interrupted` is final.
    pub async fn resume(&mut self) -> Result<CrawlReport, SpidyError> {
        match self.state {
            RunState::Interrupted => return Err(SpidyError::Interrupted),
            state if state.is_terminal() => return Ok(self.report()),
            _ => {}
        }

        tracing::info!(
            "Starting crawl: budget {}, delay {}ms",
            self.config.crawler.max_pages_to_crawl,
            self.config.crawler.request_delay
        );

        loop {
            match self.step().await {
                Ok(RunState::Running) => continue,
                Ok(terminal) => {
                    self.finish(terminal);
                    return Ok(self.report());
                }
                Err(e) => {
                    if matches!(e, SpidyError::Interrupted) {
                        tracing::warn!(
                            "Crawl interrupted with {} URLs pending",
                            self.frontier.pending_count()
                        );
                        self.finish(RunState::Interrupted);
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Executes one iteration of the crawl loop
    ///
    /// Returns the state after the iteration; `Running` means call again.
    pub async fn step(&mut self) -> Result<RunState, SpidyError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        if self.cancel.is_cancelled() {
            return Err(SpidyError::Interrupted);
        }

        if self.budget_reached() {
            tracing::info!("Reached maximum crawl limit. Exiting.");
            self.state = RunState::BudgetExhausted;
            return Ok(self.state);
        }

        let url = match self.frontier.dequeue() {
            Some(url) => url,
            None => {
                tracing::info!("Frontier is empty, crawl complete");
                self.state = RunState::FrontierEmpty;
                return Ok(self.state);
            }
        };

        self.process_url(url).await;

        if self.pages.len() % 10 == 0 {
            tracing::info!(
                "Progress: {} pages processed, {} pending, {} discovered",
                self.pages.len(),
                self.frontier.pending_count(),
                self.frontier.enqueued_count()
            );
        }

        self.pause().await?;
        Ok(self.state)
    }

    /// Snapshot of the run so far
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            seed: self.seed.clone().unwrap_or_default(),
            state: self.state,
            started_at: self.started_at,
            finished_at: self.finished_at,
            pages: self.pages.clone(),
            discovered: self.frontier.admitted().to_vec(),
            pending: self.frontier.pending_count(),
        }
    }

    /// Fetches one frontier entry and records its outcome
    ///
    /// Under `IoErrorPolicy::SubstituteNext`, a transport failure pulls the
    /// next pending URL and fetches it in place of the failed one, repeating
    /// until a fetch gets past the transport or the frontier runs dry.
    async fn process_url(&mut self, url: String) {
        let mut target = url;

        loop {
            tracing::info!("Crawling site: {}", target);

            let result = fetch_page(
                &self.transport,
                &self.config.headers,
                &target,
                self.config.crawler.max_redirects,
            )
            .await;

            let substitute = self.config.crawler.on_io_error == IoErrorPolicy::SubstituteNext
                && matches!(&result, Err(e) if e.is_io());

            let outcome = match result {
                Ok(page) => self.absorb(page),
                Err(e) => {
                    tracing::warn!("Failed to crawl {}: {}", target, e);
                    PageOutcome::Failed(e)
                }
            };
            self.pages.push(PageReport {
                url: target,
                outcome,
            });

            if !substitute {
                return;
            }

            match self.frontier.dequeue() {
                Some(next) => {
                    tracing::info!("Substituting next pending URL {}", next);
                    target = next;
                }
                None => return,
            }
        }
    }

    /// Extracts links from a fetched page and admits the new ones
    fn absorb(&mut self, page: FetchedPage) -> PageOutcome {
        let base = page.final_url.as_str();
        let links = extract_page_links(self.config.crawler.link_extraction, &page.body, base);

        let mut added = 0;
        for link in &links {
            if self.budget_reached() {
                tracing::debug!("Budget reached, not admitting {}", link);
                break;
            }

            if self.frontier.enqueue(link.as_str()) {
                tracing::info!("Added for crawling: {}", link);
                added += 1;
            }
        }

        tracing::info!("Total URLs found on page: {} ({} new)", links.len(), added);

        PageOutcome::Crawled {
            final_url: page.final_url.to_string(),
            redirects: page.redirects,
            links_found: links.len(),
            links_added: added,
        }
    }

    fn budget_reached(&self) -> bool {
        self.frontier.enqueued_count() >= self.config.crawler.max_pages_to_crawl
    }

    /// Waits out the request delay unless the run is cancelled first
    async fn pause(&self) -> Result<(), SpidyError> {
        let delay = Duration::from_millis(self.config.crawler.request_delay);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!("Thread was interrupted during delay");
                Err(SpidyError::Interrupted)
            }
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    fn finish(&mut self, state: RunState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
        tracing::info!(
            "Crawl finished as {}: {} pages processed, {} distinct URLs discovered",
            state,
            self.pages.len(),
            self.frontier.enqueued_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkExtraction;
    use crate::crawler::testing::ScriptedTransport;
    use crate::crawler::transport::{TransportError, TransportResponse};
    use crate::crawler::FetchError;

    fn test_config(budget: usize) -> Config {
        let mut config = Config::default();
        config.crawler.max_pages_to_crawl = budget;
        config.crawler.request_delay = 0;
        config
    }

    fn engine(transport: ScriptedTransport) -> Engine<ScriptedTransport> {
        Engine::new(test_config(1000), transport)
    }

    #[tokio::test]
    async fn test_self_link_not_requeued() {
        let transport = ScriptedTransport::new().page(
            "http://a.test/",
            r#"<a href="http://a.test/">home</a> <a href="http://b.test/">b</a>"#,
        );
        let mut engine = engine(transport);

        engine.seed("http://a.test/").unwrap();
        let state = engine.step().await.unwrap();

        assert_eq!(state, RunState::Running);
        let pending: Vec<&str> = engine.frontier().pending().collect();
        assert_eq!(pending, vec!["http://b.test/"]);
        assert_eq!(engine.frontier().enqueued_count(), 2);
    }

    #[tokio::test]
    async fn test_runs_until_frontier_empty() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://b.test/ http://c.test/")
            .page("http://b.test/", "http://a.test/ http://c.test/")
            .page("http://c.test/", "nothing here");
        let mut engine = engine(transport);

        let report = engine.run("http://a.test/").await.unwrap();

        assert_eq!(report.state, RunState::FrontierEmpty);
        assert_eq!(report.pages_fetched(), 3);
        assert_eq!(
            report.discovered,
            vec!["http://a.test/", "http://b.test/", "http://c.test/"]
        );
        assert!(report.finished_at.is_some());
        assert_eq!(report.pending, 0);
    }

    #[tokio::test]
    async fn test_fifo_visit_order() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://b.test/ http://c.test/")
            .page("http://b.test/", "http://d.test/")
            .page("http://c.test/", "http://e.test/");
        let mut engine = engine(transport);

        engine.run("http://a.test/").await.unwrap();

        let visited: Vec<&str> = engine.pages().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            visited,
            vec![
                "http://a.test/",
                "http://b.test/",
                "http://c.test/",
                "http://d.test/",
                "http://e.test/"
            ]
        );
    }

    #[tokio::test]
    async fn test_budget_caps_admissions() {
        let body: String = (0..50).map(|i| format!("http://p{}.test/ ", i)).collect();
        let transport = ScriptedTransport::new().page("http://a.test/", &body);
        let mut engine = Engine::new(test_config(5), transport);

        let report = engine.run("http://a.test/").await.unwrap();

        assert_eq!(report.state, RunState::BudgetExhausted);
        assert_eq!(report.discovered_count(), 5);
        // Only the seed was fetched before the budget check stopped the loop
        assert_eq!(report.pages.len(), 1);
        match &report.pages[0].outcome {
            PageOutcome::Crawled {
                links_found,
                links_added,
                ..
            } => {
                assert_eq!(*links_found, 50);
                assert_eq!(*links_added, 4);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_budget_of_one_stops_before_fetching() {
        let transport = ScriptedTransport::new().page("http://a.test/", "http://b.test/");
        let mut engine = Engine::new(test_config(1), transport);

        let report = engine.run("http://a.test/").await.unwrap();

        assert_eq!(report.state, RunState::BudgetExhausted);
        assert!(report.pages.is_empty());
        assert_eq!(report.pending, 1);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://gone.test/ http://err.test/ http://ok.test/")
            .respond("http://err.test/", TransportResponse::status(500))
            .fail("http://ok.test/", TransportError::Io("reset".to_string()));
        let mut engine = engine(transport);

        let report = engine.run("http://a.test/").await.unwrap();

        assert_eq!(report.state, RunState::FrontierEmpty);
        assert_eq!(report.pages.len(), 4);
        assert_eq!(report.pages_fetched(), 1);
        let kinds = report.failures_by_kind();
        assert_eq!(kinds.get("non_ok_status"), Some(&2));
        assert_eq!(kinds.get("io_error"), Some(&1));
    }

    #[tokio::test]
    async fn test_redirect_not_counted_as_separate_entry() {
        let transport = ScriptedTransport::new()
            .respond("http://a.test/", TransportResponse::redirect(301, "http://www.a.test/"))
            .page("http://www.a.test/", "<a href=\"/about\">about</a> http://b.test/");
        let mut config = test_config(1000);
        config.crawler.link_extraction = LinkExtraction::Html;
        let mut engine = Engine::new(config, transport);

        engine.seed("http://a.test/").unwrap();
        engine.step().await.unwrap();

        // Relative links resolve against the post-redirect URL
        let pending: Vec<&str> = engine.frontier().pending().collect();
        assert_eq!(pending, vec!["http://www.a.test/about"]);
        assert!(!engine.frontier().contains("http://www.a.test/"));
        assert_eq!(
            engine.pages()[0].outcome,
            PageOutcome::Crawled {
                final_url: "http://www.a.test/".to_string(),
                redirects: 1,
                links_found: 1,
                links_added: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_io_error_skip_policy() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://down.test/ http://b.test/")
            .fail("http://down.test/", TransportError::Io("refused".to_string()))
            .page("http://b.test/", "");
        let mut engine = engine(transport);

        engine.seed("http://a.test/").unwrap();
        engine.step().await.unwrap();
        engine.step().await.unwrap();

        // The failed entry consumed only itself
        assert_eq!(engine.pages().len(), 2);
        assert!(engine.pages()[1].outcome.error().unwrap().is_io());
        assert_eq!(engine.frontier().pending_count(), 1);
    }

    #[tokio::test]
    async fn test_io_error_substitute_policy() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://down.test/ http://down2.test/ http://b.test/ http://c.test/")
            .fail("http://down.test/", TransportError::Io("refused".to_string()))
            .fail("http://down2.test/", TransportError::Io("refused".to_string()))
            .page("http://b.test/", "");
        let mut config = test_config(1000);
        config.crawler.on_io_error = IoErrorPolicy::SubstituteNext;
        let mut engine = Engine::new(config, transport);

        engine.seed("http://a.test/").unwrap();
        engine.step().await.unwrap();
        engine.step().await.unwrap();

        let processed: Vec<&str> = engine.pages().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            processed,
            vec![
                "http://a.test/",
                "http://down.test/",
                "http://down2.test/",
                "http://b.test/"
            ]
        );
        assert!(engine.pages()[3].outcome.is_success());
        let pending: Vec<&str> = engine.frontier().pending().collect();
        assert_eq!(pending, vec!["http://c.test/"]);
    }

    #[tokio::test]
    async fn test_substitute_stops_on_non_io_failure() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://down.test/ http://missing.test/ http://c.test/")
            .fail("http://down.test/", TransportError::Io("refused".to_string()));
        let mut config = test_config(1000);
        config.crawler.on_io_error = IoErrorPolicy::SubstituteNext;
        let mut engine = Engine::new(config, transport);

        engine.seed("http://a.test/").unwrap();
        engine.step().await.unwrap();
        engine.step().await.unwrap();

        assert_eq!(engine.pages().len(), 3);
        assert_eq!(
            engine.pages()[2].outcome,
            PageOutcome::Failed(FetchError::NonOkStatus {
                url: "http://missing.test/".to_string(),
                status: 404
            })
        );
        assert_eq!(engine.frontier().pending_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_discovered_link_is_skipped() {
        // Absolute links are kept as-is by extraction and rejected at fetch time
        let transport =
            ScriptedTransport::new().page("http://a.test/", "<a href=\"http://[oops/\">x</a>");
        let mut config = test_config(1000);
        config.crawler.link_extraction = LinkExtraction::Html;
        let mut engine = Engine::new(config, transport);

        let report = engine.run("http://a.test/").await.unwrap();

        assert_eq!(report.state, RunState::FrontierEmpty);
        assert_eq!(report.pages.len(), 2);
        assert_eq!(
            report.pages[1].outcome.error().map(|e| e.kind()),
            Some("malformed_url")
        );
        assert_eq!(report.discovered[1], "http://[oops/");
    }

    #[tokio::test]
    async fn test_invalid_seed_rejected() {
        let mut engine = engine(ScriptedTransport::new());

        let result = engine.run("not a url").await;
        assert!(matches!(result, Err(SpidyError::MalformedUrl { .. })));
        assert_eq!(engine.frontier().enqueued_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_delay_interrupts() {
        let transport = ScriptedTransport::new().page("http://a.test/", "http://b.test/");
        let mut config = test_config(1000);
        config.crawler.request_delay = 60_000;
        let mut engine = Engine::new(config, transport);
        let token = engine.cancellation_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let result = engine.run("http://a.test/").await;

        assert!(matches!(result, Err(SpidyError::Interrupted)));
        assert_eq!(engine.state(), RunState::Interrupted);
        // Partial state survives the interrupt
        assert_eq!(engine.pages().len(), 1);
        let pending: Vec<&str> = engine.frontier().pending().collect();
        assert_eq!(pending, vec!["http://b.test/"]);
        assert!(engine.report().finished_at.is_some());
    }

    #[tokio::test]
    async fn test_resume_after_interrupt_stays_interrupted() {
        let transport = ScriptedTransport::new().page("http://a.test/", "http://b.test/");
        let token = CancellationToken::new();
        let mut engine = engine(transport).with_cancellation(token.clone());

        engine.seed("http://a.test/").unwrap();
        token.cancel();
        assert!(matches!(engine.resume().await, Err(SpidyError::Interrupted)));
        let finished_at = engine.report().finished_at;

        let again = engine.resume().await;

        assert!(matches!(again, Err(SpidyError::Interrupted)));
        assert_eq!(engine.state(), RunState::Interrupted);
        assert_eq!(engine.report().finished_at, finished_at);
        assert!(engine.pages().is_empty());
    }

    #[tokio::test]
    async fn test_resume_after_completion_returns_same_report() {
        let mut engine = engine(ScriptedTransport::new().page("http://a.test/", ""));

        let first = engine.run("http://a.test/").await.unwrap();
        let second = engine.resume().await.unwrap();

        assert_eq!(second.state, RunState::FrontierEmpty);
        assert_eq!(second.finished_at, first.finished_at);
        assert_eq!(second.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_delay_follows_every_page_including_failures() {
        let transport = ScriptedTransport::new()
            .page("http://a.test/", "http://b.test/ http://c.test/")
            .respond("http://b.test/", TransportResponse::status(500))
            .page("http://c.test/", "");
        let mut config = test_config(1000);
        config.crawler.request_delay = 50;
        let mut engine = Engine::new(config, transport);

        let started = tokio::time::Instant::now();
        let report = engine.run("http://a.test/").await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.failures_by_kind().get("non_ok_status"), Some(&1));
        assert!(
            elapsed >= Duration::from_millis(150),
            "three pauses expected, run took {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_already_cancelled_does_not_fetch() {
        let transport = ScriptedTransport::new().page("http://a.test/", "");
        let token = CancellationToken::new();
        token.cancel();
        let mut engine = engine(transport).with_cancellation(token);

        let result = engine.run("http://a.test/").await;

        assert!(matches!(result, Err(SpidyError::Interrupted)));
        assert!(engine.pages().is_empty());
    }

    #[tokio::test]
    async fn test_step_after_terminal_is_noop() {
        let mut engine = engine(ScriptedTransport::new().page("http://a.test/", ""));

        engine.run("http://a.test/").await.unwrap();
        assert_eq!(engine.step().await.unwrap(), RunState::FrontierEmpty);
        assert_eq!(engine.pages().len(), 1);
    }
}
