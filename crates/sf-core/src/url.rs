//! Fast URL scheme checks for the blocking pre-filter
//!
//! These run on every navigation event before any rule is consulted, so they
//! work directly on the string without full URL parsing.

/// True only for secure-HTTP URLs.
///
/// Non-https URLs (including browser-internal pages like
/// `chrome://extensions`) are never subject to blocking.
#[inline]
pub fn is_eligible_scheme(url: &str) -> bool {
    url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_eligible_scheme() {
        assert!(is_eligible_scheme("https://example.com"));
        assert!(is_eligible_scheme("https://example.com/path?q=1"));
        assert!(!is_eligible_scheme("http://example.com"));
        assert!(!is_eligible_scheme("chrome://extensions"));
        assert!(!is_eligible_scheme("about:blank"));
        assert!(!is_eligible_scheme("ftp://example.com"));
        assert!(!is_eligible_scheme(""));
    }
}
