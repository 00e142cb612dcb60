//! Utility functions and helpers.

pub mod http;
pub mod time;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// Returns `None` when `href` cannot be made into an absolute URL.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            log::debug!("Cannot resolve {href} against {base}: {e}");
            None
        }
    }
}

/// Resolve a URL string against a base URL string.
pub fn resolve(base_url: &str, href: &str) -> Option<String> {
    Url::parse(base_url)
        .ok()
        .and_then(|base| resolve_url(&base, href))
}

/// Collapse runs of whitespace in scraped text into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.afl.com.au/news").unwrap();
        assert_eq!(
            resolve_url(&base, "/news/1234/match-report").as_deref(),
            Some("https://www.afl.com.au/news/1234/match-report")
        );
        assert_eq!(
            resolve_url(&base, "?page=2").as_deref(),
            Some("https://www.afl.com.au/news?page=2")
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x").as_deref(),
            Some("https://other.com/x")
        );
    }

    #[test]
    fn test_resolve_url_unresolvable_href() {
        let base = Url::parse("https://www.afl.com.au/news").unwrap();
        assert_eq!(resolve_url(&base, "http://[bad"), None);
        assert_eq!(resolve_url(&base, "https://"), None);
        assert_eq!(resolve("https://www.afl.com.au/news", "http://[bad"), None);
    }

    #[test]
    fn test_resolve_bad_base() {
        assert_eq!(resolve("not a url", "/x"), None);
        assert_eq!(
            resolve("https://www.afl.com.au/news", "/x"),
            Some("https://www.afl.com.au/x".to_string())
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Match \n\t Report "), "Match Report");
    }
}
