//! Page fetching with redirect resolution
//!
//! This module handles:
//! - Building the browser-like request header set
//! - Following 301/302/303/307/308 redirects hop by hop
//! - Capping redirect chains and detecting loops
//! - Classifying failures into `FetchError`

use crate::config::HeaderConfig;
use crate::crawler::transport::Transport;
use crate::url::parse_target;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER, USER_AGENT,
};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Statuses treated as "go fetch the Location instead"
const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// A successfully fetched page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the body was served from, after redirects
    pub final_url: Url,
    /// Redirect hops followed
    pub redirects: u32,
    /// Page body as text
    pub body: String,
}

/// Why a fetch produced no body
///
/// None of these abort a crawl run; the engine records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Malformed URL {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Non-OK response for {url}: {status}")]
    NonOkStatus { url: String, status: u16 },

    #[error("IO error for {url}: {message}")]
    Io { url: String, message: String },

    #[error("Too many redirects from {url} ({hops} hops)")]
    RedirectLimit { url: String, hops: u32 },

    #[error("Redirect loop detected at {url}")]
    RedirectLoop { url: String },

    #[error("Redirect from {url} (HTTP {status}) has no Location header")]
    MissingLocation { url: String, status: u16 },
}

impl FetchError {
    /// Short machine-friendly label for grouping failures
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedUrl { .. } => "malformed_url",
            Self::NonOkStatus { .. } => "non_ok_status",
            Self::Io { .. } => "io_error",
            Self::RedirectLimit { .. } => "redirect_limit",
            Self::RedirectLoop { .. } => "redirect_loop",
            Self::MissingLocation { .. } => "missing_location",
        }
    }

    /// Returns true for transport-level failures
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Builds the header set sent with a request to `url`
///
/// `Referer` is the requested URL itself and `Connection` is always
/// `keep-alive`. Values that are not valid header text are skipped.
pub fn request_headers(config: &HeaderConfig, url: &Url) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let pairs = [
        (USER_AGENT, config.user_agent.as_str()),
        (ACCEPT, config.accept.as_str()),
        (ACCEPT_LANGUAGE, config.accept_language.as_str()),
        (REFERER, url.as_str()),
        (CONNECTION, "keep-alive"),
    ];

    for (name, value) in pairs {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.insert(name, v);
            }
            Err(_) => tracing::warn!("Skipping invalid {} header value: {:?}", name, value),
        }
    }

    headers
}

/// Fetches a URL, following redirects until a non-redirect response
///
/// # Request Flow
///
/// 1. Parse the target; a malformed URL fails immediately without a request
/// 2. GET with the browser-like header set
/// 3. On a redirect status, resolve `Location` against the current URL and
///    repeat (at most `max_redirects` hops, never revisiting a URL)
/// 4. Anything other than 200 is `NonOkStatus`; it is not retried
///
/// # Arguments
///
/// * `transport` - The transport to issue requests through
/// * `headers` - Header values from configuration
/// * `url` - The URL to fetch
/// * `max_redirects` - Hop cap for the redirect chain
pub async fn fetch_page<T>(
    transport: &T,
    headers: &HeaderConfig,
    url: &str,
    max_redirects: u32,
) -> Result<FetchedPage, FetchError>
where
    T: Transport + ?Sized,
{
    let mut current = parse_target(url).map_err(|e| {
        tracing::warn!("Malformed URL detected: {}", url);
        FetchError::MalformedUrl {
            url: url.to_string(),
            reason: e.to_string(),
        }
    })?;

    let mut visited = HashSet::new();
    visited.insert(current.to_string());
    let mut hops = 0;

    loop {
        let response = transport
            .get(&current, request_headers(headers, &current))
            .await
            .map_err(|e| FetchError::Io {
                url: current.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!("Response Code for URL {}: {}", current, response.status);

        if REDIRECT_STATUSES.contains(&response.status) {
            let next = redirect_target(&current, response.status, response.location.as_deref())?;

            hops += 1;
            if hops > max_redirects {
                return Err(FetchError::RedirectLimit {
                    url: url.to_string(),
                    hops: max_redirects,
                });
            }

            if !visited.insert(next.to_string()) {
                return Err(FetchError::RedirectLoop {
                    url: next.to_string(),
                });
            }

            tracing::info!("Redirecting to: {}", next);
            current = next;
            continue;
        }

        if response.status != 200 {
            return Err(FetchError::NonOkStatus {
                url: current.to_string(),
                status: response.status,
            });
        }

        return Ok(FetchedPage {
            final_url: current,
            redirects: hops,
            body: response.body,
        });
    }
}

/// Resolves a `Location` header against the URL that returned it
fn redirect_target(current: &Url, status: u16, location: Option<&str>) -> Result<Url, FetchError> {
    let location = location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| FetchError::MissingLocation {
            url: current.to_string(),
            status,
        })?;

    let joined = current
        .join(location)
        .map_err(|e| FetchError::MalformedUrl {
            url: location.to_string(),
            reason: e.to_string(),
        })?;

    parse_target(joined.as_str()).map_err(|e| FetchError::MalformedUrl {
        url: joined.to_string(),
        reason: e.to_string(),
    })
}
