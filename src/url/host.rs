use url::Url;

/// Extracts the lowercase host from a URL string
///
/// Frontier entries are plain strings and may hold links that never parsed,
/// so this returns `None` rather than failing.
///
/// # Examples
///
/// ```
/// use spidy::url::extract_host;
///
/// assert_eq!(extract_host("https://EXAMPLE.com:8080/a"), Some("example.com".to_string()));
/// assert_eq!(extract_host("../relative.html"), None);
/// ```
pub fn extract_host(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()?
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}
