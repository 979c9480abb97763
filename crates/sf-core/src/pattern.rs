//! Glob-style URL patterns
//!
//! A stored pattern is plain text; its matching behavior is recovered purely
//! from its shape (presence and position of `*` and `?`). Four kinds exist:
//!
//! - Exact:  `https://host/path?q` (no `*`) - matches only that URL
//! - Domain: `https://host/*` - matches any URL on that scheme+host
//! - Path:   `https://host/path*` - matches any URL under that path prefix
//! - Query:  `https://host/path?q` - matches path plus that exact query
//!
//! Generation and classification are inverses over generated patterns. The
//! Path check requires a trailing `*` with no `?` anywhere, so a pattern
//! carrying both falls through and reads as Query.

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

// =============================================================================
// Match Modes
// =============================================================================

/// How a URL is turned into a pattern, and the classification of a stored
/// pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Match only the literal URL.
    Exact,
    /// Match any URL sharing scheme and host.
    Domain,
    /// Match any URL sharing scheme, host, and path prefix.
    Path,
    /// Match scheme, host, path, and the exact query string.
    Query,
}

impl MatchMode {
    /// Parse from a user-facing tag string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(Self::Exact),
            "domain" => Some(Self::Domain),
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Domain => "domain",
            Self::Path => "path",
            Self::Query => "query",
        }
    }
}

// =============================================================================
// Pattern Generation
// =============================================================================

/// Generate a storable pattern from a concrete URL.
///
/// Fails with [`CoreError::InvalidUrl`] when `url` is not a parseable
/// absolute URL. Query mode falls back to Path when the URL carries no
/// query string.
pub fn generate_pattern(url: &str, mode: MatchMode) -> Result<String, CoreError> {
    let parsed = Url::parse(url).map_err(|_| CoreError::InvalidUrl(url.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| CoreError::InvalidUrl(url.to_string()))?;
    let scheme = parsed.scheme();

    let pattern = match mode {
        MatchMode::Exact => url.to_string(),
        MatchMode::Domain => format!("{}://{}/*", scheme, host),
        MatchMode::Path => format!("{}://{}{}*", scheme, host, parsed.path()),
        MatchMode::Query => match parsed.query() {
            Some(query) => format!("{}://{}{}?{}", scheme, host, parsed.path(), query),
            None => format!("{}://{}{}*", scheme, host, parsed.path()),
        },
    };

    log::debug!("generated {} pattern {:?} from {:?}", mode.as_str(), pattern, url);
    Ok(pattern)
}

// =============================================================================
// Pattern Matching
// =============================================================================

/// Test whether `url` satisfies `pattern`.
///
/// Every regex metacharacter in the pattern is escaped except `*`, which
/// expands to a greedy "any characters, including none" class. The expression
/// is anchored to the whole URL, so a wildcard-free pattern degenerates into
/// exact string equality. Total over any two strings.
pub fn is_match(url: &str, pattern: &str) -> bool {
    let expr = format!(
        "(?s)^{}$",
        pattern
            .split('*')
            .map(|segment| regex::escape(segment))
            .collect::<Vec<_>>()
            .join(".*")
    );

    // All literal segments are escaped, so compilation cannot fail; the
    // fallback keeps the function total regardless.
    Regex::new(&expr)
        .map(|re| re.is_match(url))
        .unwrap_or(false)
}

// =============================================================================
// Pattern Classification
// =============================================================================

/// Infer the kind of a stored pattern from its shape.
///
/// First match wins, in this order:
/// 1. ends with `/*`            -> Domain
/// 2. ends with `*`, no `?`     -> Path
/// 3. no `*`                    -> Exact
/// 4. contains `?`              -> Query
/// 5. fallback                  -> Exact
///
/// Step 2 requires the absence of `?`, so `https://h/p?q=1*` falls through
/// to step 4 and reads as Query. That ordering is load-bearing for stored
/// patterns.
pub fn classify(pattern: &str) -> MatchMode {
    if pattern.ends_with("/*") {
        return MatchMode::Domain;
    }
    if pattern.ends_with('*') && !pattern.contains('?') {
        return MatchMode::Path;
    }
    if !pattern.contains('*') {
        return MatchMode::Exact;
    }
    if pattern.contains('?') {
        return MatchMode::Query;
    }
    MatchMode::Exact
}

/// Remove the first `*` from a pattern, yielding a navigable URL.
///
/// Only the first occurrence is stripped even when several exist.
pub fn strip_wildcard(pattern: &str) -> String {
    pattern.replacen('*', "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_exact() {
        let pattern = generate_pattern("https://foo.com/bar?x=1", MatchMode::Exact).unwrap();
        assert_eq!(pattern, "https://foo.com/bar?x=1");
    }

    #[test]
    fn test_generate_domain() {
        let pattern = generate_pattern("https://foo.com/bar/baz?x=1", MatchMode::Domain).unwrap();
        assert_eq!(pattern, "https://foo.com/*");
    }

    #[test]
    fn test_generate_path() {
        let pattern = generate_pattern("https://foo.com/bar/baz?x=1", MatchMode::Path).unwrap();
        assert_eq!(pattern, "https://foo.com/bar/baz*");
    }

    #[test]
    fn test_generate_query() {
        let pattern = generate_pattern("https://foo.com/bar?x=1", MatchMode::Query).unwrap();
        assert_eq!(pattern, "https://foo.com/bar?x=1");
    }

    #[test]
    fn test_generate_query_without_query_falls_back_to_path() {
        let pattern = generate_pattern("https://foo.com/bar", MatchMode::Query).unwrap();
        assert_eq!(pattern, "https://foo.com/bar*");
    }

    #[test]
    fn test_generate_rejects_malformed_url() {
        assert!(matches!(
            generate_pattern("not a url", MatchMode::Domain),
            Err(CoreError::InvalidUrl(_))
        ));
        assert!(matches!(
            generate_pattern("/relative/path", MatchMode::Exact),
            Err(CoreError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_exact_round_trip() {
        let url = "https://example.com/a/b?c=d";
        let pattern = generate_pattern(url, MatchMode::Exact).unwrap();
        assert!(is_match(url, &pattern));
    }

    #[test]
    fn test_domain_round_trip() {
        let url = "https://example.com/a/b";
        let pattern = generate_pattern(url, MatchMode::Domain).unwrap();
        assert!(is_match(url, &pattern));
        // Any other URL on the same scheme+host matches too
        assert!(is_match("https://example.com/completely/other?q=1", &pattern));
        assert!(!is_match("https://other.com/a/b", &pattern));
    }

    #[test]
    fn test_path_prefix_matching() {
        let pattern = generate_pattern("https://example.com/docs", MatchMode::Path).unwrap();
        assert_eq!(pattern, "https://example.com/docs*");
        assert!(is_match("https://example.com/docs", &pattern));
        assert!(is_match("https://example.com/docs/intro", &pattern));
        // Wildcard is greedy across segment boundaries
        assert!(is_match("https://example.com/docs/a/b/c?x=1", &pattern));
        assert!(!is_match("https://example.com/doc", &pattern));
    }

    #[test]
    fn test_query_must_match_exactly() {
        let pattern = generate_pattern("https://foo.com/bar?x=1", MatchMode::Query).unwrap();
        assert!(is_match("https://foo.com/bar?x=1", &pattern));
        assert!(!is_match("https://foo.com/bar?x=2", &pattern));
        assert!(!is_match("https://foo.com/bar", &pattern));
    }

    #[test]
    fn test_match_escapes_metacharacters() {
        // '?' and '.' in the pattern are literal, not regex operators
        assert!(is_match("https://a.com/b?x=1", "https://a.com/b?x=1"));
        assert!(!is_match("https://axcom/b?x=1", "https://a.com/b?x=1"));
        assert!(!is_match("https://a.com/bx=1", "https://a.com/b?x=1"));
    }

    #[test]
    fn test_match_without_wildcard_is_equality() {
        assert!(is_match("https://a.com/b", "https://a.com/b"));
        assert!(!is_match("https://a.com/b/c", "https://a.com/b"));
        assert!(!is_match("xhttps://a.com/b", "https://a.com/b"));
    }

    #[test]
    fn test_match_multiple_wildcards() {
        let pattern = "https://a.com/*/end/*";
        assert!(is_match("https://a.com/x/end/y", pattern));
        assert!(is_match("https://a.com//end/", pattern));
        assert!(!is_match("https://a.com/x/y", pattern));
    }

    #[test]
    fn test_match_empty_pattern() {
        assert!(!is_match("https://a.com", ""));
        assert!(is_match("", ""));
    }

    #[test]
    fn test_match_is_deterministic() {
        let url = "https://a.com/b/c";
        let pattern = "https://a.com/*";
        assert_eq!(is_match(url, pattern), is_match(url, pattern));
    }

    #[test]
    fn test_classify_generated_patterns() {
        let url = "https://example.com/a/b";
        let domain = generate_pattern(url, MatchMode::Domain).unwrap();
        let path = generate_pattern(url, MatchMode::Path).unwrap();
        let exact = generate_pattern(url, MatchMode::Exact).unwrap();
        assert_eq!(classify(&domain), MatchMode::Domain);
        assert_eq!(classify(&path), MatchMode::Path);
        assert_eq!(classify(&exact), MatchMode::Exact);
    }

    #[test]
    fn test_classify_query() {
        assert_eq!(classify("https://a.com/b?x=1"), MatchMode::Exact);
        // A query pattern with a wildcard somewhere other than the tail
        assert_eq!(classify("https://a.com/*?x=1"), MatchMode::Query);
    }

    #[test]
    fn test_classify_query_wins_over_trailing_wildcard() {
        // The Path check demands no '?' anywhere, so a trailing '*' with an
        // embedded '?' falls through to Query
        assert_eq!(classify("https://a.com/b?x=1*"), MatchMode::Query);
        // Without the '?', the same shape is Path
        assert_eq!(classify("https://a.com/bx=1*"), MatchMode::Path);
    }

    #[test]
    fn test_classify_degenerate_patterns() {
        assert_eq!(classify(""), MatchMode::Exact);
        assert_eq!(classify("*"), MatchMode::Path);
        assert_eq!(classify("/*"), MatchMode::Domain);
    }

    #[test]
    fn test_strip_wildcard_removes_only_first() {
        assert_eq!(strip_wildcard("https://x.com/*/*"), "https://x.com//*");
        assert_eq!(strip_wildcard("https://x.com/*"), "https://x.com/");
        assert_eq!(strip_wildcard("https://x.com/a"), "https://x.com/a");
    }

    #[test]
    fn test_mode_tags() {
        assert_eq!(MatchMode::parse("domain"), Some(MatchMode::Domain));
        assert_eq!(MatchMode::parse("bogus"), None);
        assert_eq!(MatchMode::Query.as_str(), "query");
    }
}
