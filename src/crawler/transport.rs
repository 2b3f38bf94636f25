//! HTTP transport seam
//!
//! The crawl core never talks to the network directly. It hands a URL and a
//! header set to a `Transport` and gets back a status, an optional
//! `Location` header, and the body as text. Redirects are NOT followed here;
//! the fetcher resolves them hop by hop.

use crate::config::CrawlerConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Raw response for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Location` header value, if present
    pub location: Option<String>,
    /// Body decoded as text
    pub body: String,
}

impl TransportResponse {
    /// A 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            location: None,
            body: body.into(),
        }
    }

    /// A redirect response pointing at `location`
    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            location: Some(location.into()),
            body: String::new(),
        }
    }

    /// A bodiless response with an arbitrary status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: String::new(),
        }
    }
}

/// Transport-level failure (no HTTP status was obtained)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Io(String),
}

/// Capability to issue one GET request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, headers: HeaderMap)
        -> Result<TransportResponse, TransportError>;
}

/// `Transport` backed by a reqwest client with redirects disabled
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps an existing client
    ///
    /// The client must not follow redirects on its own, or redirect
    /// resolution and the hop cap are bypassed.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a transport from crawler timeouts
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use spidy::config::CrawlerConfig;
/// use spidy::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &Url,
        headers: HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| TransportError::Io(describe(&e)))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Io(describe(&e)))?;

        Ok(TransportResponse {
            status,
            location,
            body,
        })
    }
}

/// Classifies a reqwest error into a short message
fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
