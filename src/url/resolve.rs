use crate::UrlError;
use url::Url;

/// Parses a fetch target, rejecting anything that is not an absolute
/// `http`/`https` URL with a host
///
/// # Examples
///
/// ```
/// use spidy::url::parse_target;
///
/// let url = parse_target("http://example.com/page").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(parse_target("ftp://example.com/").is_err());
/// assert!(parse_target("not a url").is_err());
/// ```
pub fn parse_target(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Turns an extracted link into an absolute URL string
///
/// Links already starting with `http` are returned untouched. Anything else
/// is resolved against `base` with standard relative-reference rules
/// (scheme-relative, path-relative, and fragment references). If the base or
/// the reference cannot be resolved the original string is kept as-is.
///
/// # Examples
///
/// ```
/// use spidy::url::resolve_link;
///
/// let base = "http://example.com/dir/page.html";
/// assert_eq!(resolve_link("../x.html", base), "http://example.com/x.html");
/// assert_eq!(resolve_link("/root.html", base), "http://example.com/root.html");
/// assert_eq!(resolve_link("http://other.test/", base), "http://other.test/");
/// ```
pub fn resolve_link(found: &str, base: &str) -> String {
    if found.starts_with("http") {
        return found.to_string();
    }

    match Url::parse(base).and_then(|base_url| base_url.join(found)) {
        Ok(absolute) => absolute.to_string(),
        Err(e) => {
            tracing::warn!("Failed to resolve relative URL {}: {}", found, e);
            found.to_string()
        }
    }
}
