use once_cell::sync::Lazy;
use regex::Regex;

/// URL-shaped text: `http`/`https`, optional `www.`, a host ending in a
/// dot-separated top-level label, then an optional path/query/fragment.
const LINK_PATTERN: &str = r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)";

static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(LINK_PATTERN).expect("link pattern is a valid regex"));

/// Scans raw page text for URL-shaped substrings
///
/// This is a textual match over the markup, not an HTML parse: URLs inside
/// comments, scripts, and attribute values are all found. Matches are
/// yielded lazily in the order they appear.
///
/// # Examples
///
/// ```
/// use spidy::url::find_link_candidates;
///
/// let text = r#"<a href="http://a.test/x">a</a> see https://www.b.test/?q=1"#;
/// let found: Vec<&str> = find_link_candidates(text).collect();
/// assert_eq!(found, vec!["http://a.test/x", "https://www.b.test/?q=1"]);
/// ```
pub fn find_link_candidates(text: &str) -> impl Iterator<Item = &str> + '_ {
    LINK_REGEX.find_iter(text).map(|m| m.as_str())
}
