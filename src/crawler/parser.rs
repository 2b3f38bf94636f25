//! Link extraction from fetched page bodies
//!
//! Two strategies share one contract: page text in, absolute URL strings out,
//! in document order, duplicates kept for the frontier to discard.
//!
//! - `Pattern` scans the raw text for URL-shaped substrings (see
//!   [`crate::url::find_link_candidates`]).
//! - `Html` parses the document and reads `<a href>` and
//!   `<link rel="canonical">` elements.

use crate::config::LinkExtraction;
use crate::url::{extract_links, resolve_link};
use scraper::{Html, Selector};

/// Extracts links from a page body with the configured strategy
///
/// # Arguments
///
/// * `strategy` - Which extractor to run
/// * `body` - The page text
/// * `base_url` - URL the body was served from
pub fn extract_page_links(strategy: LinkExtraction, body: &str, base_url: &str) -> Vec<String> {
    match strategy {
        LinkExtraction::Pattern => extract_links(body, base_url),
        LinkExtraction::Html => extract_html_links(body, base_url),
    }
}

/// Extracts `href` targets from anchors and canonical links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - Fragment-only references (same page anchors)
///
/// # Example
///
/// ```
/// use spidy::crawler::extract_html_links;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let links = extract_html_links(html, "https://example.com/");
/// assert_eq!(links, vec!["https://example.com/page"]);
/// ```
pub fn extract_html_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href], link[rel='canonical'][href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_href(href, base_url) {
                    links.push(link);
                }
            }
        }
    }

    links
}

/// Filters out non-navigational references, then resolves the rest
fn resolve_href(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    Some(resolve_link(href, base_url))
}
