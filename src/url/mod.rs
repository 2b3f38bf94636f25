//! URL handling module for Spidy
//!
//! This module provides the textual link scan, relative-reference
//! resolution, fetch-target validation, and host extraction.

mod host;
mod pattern;
mod resolve;

// Re-export main functions
pub use host::extract_host;
pub use pattern::find_link_candidates;
pub use resolve::{parse_target, resolve_link};

/// Extracts every URL-shaped link from page text as an absolute URL string
///
/// Links are returned in the order found. Duplicates are kept: the frontier
/// is responsible for deduplication.
///
/// # Arguments
///
/// * `page_text` - Raw page body
/// * `base_url` - URL the body was served from, used for relative links
///
/// # Examples
///
/// ```
/// use spidy::url::extract_links;
///
/// let body = r#"<a href="http://a.test/">self</a> <a href="http://b.test/">b</a>"#;
/// let links = extract_links(body, "http://a.test/");
/// assert_eq!(links, vec!["http://a.test/", "http://b.test/"]);
/// ```
pub fn extract_links(page_text: &str, base_url: &str) -> Vec<String> {
    find_link_candidates(page_text)
        .map(|found| resolve_link(found, base_url))
        .collect()
}
