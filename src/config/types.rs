use serde::Deserialize;

/// Default page budget for a single run
pub const DEFAULT_MAX_PAGES_TO_CRAWL: usize = 1000;

/// Default pause between requests (milliseconds)
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// Default cap on redirect hops for a single fetch
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Main configuration structure for Spidy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub headers: HeaderConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of distinct URLs admitted to the frontier
    #[serde(default = "default_max_pages_to_crawl")]
    pub max_pages_to_crawl: usize,

    /// Pause between processed URLs (milliseconds)
    #[serde(default = "default_request_delay")]
    pub request_delay: u64,

    /// Maximum redirect hops followed for one fetch
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// What to do when the transport fails with an I/O error
    #[serde(default)]
    pub on_io_error: IoErrorPolicy,

    /// How links are pulled out of page text
    #[serde(default)]
    pub link_extraction: LinkExtraction,

    /// Whole-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection timeout (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_to_crawl: default_max_pages_to_crawl(),
            request_delay: default_request_delay(),
            max_redirects: default_max_redirects(),
            on_io_error: IoErrorPolicy::default(),
            link_extraction: LinkExtraction::default(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Request headers sent with every fetch
///
/// These only exist to avoid trivial bot-blocking. `Referer` is always the
/// URL being requested and `Connection` is always `keep-alive`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
        }
    }
}

/// Recovery policy for transport-level I/O failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IoErrorPolicy {
    /// Report the failure and let the loop move on
    #[default]
    Skip,

    /// Pull the next pending URL and fetch it in place of the failed one
    ///
    /// Substitute fetches run back to back; the request delay is only
    /// taken once the whole chain has been processed.
    SubstituteNext,
}

/// Link extraction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkExtraction {
    /// Textual URL pattern over the raw markup
    #[default]
    Pattern,

    /// `<a href>` and canonical `<link>` elements of the parsed document
    Html,
}

fn default_max_pages_to_crawl() -> usize {
    DEFAULT_MAX_PAGES_TO_CRAWL
}

fn default_request_delay() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_accept() -> String {
    "text/html".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.5".to_string()
}
