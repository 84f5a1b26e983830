//! Lookup request and provider query construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// A lookup request: find the page on `domain` that contains `fragment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw domain as supplied by the caller (may carry `*`/`.*` markers).
    pub domain: String,
    /// Text fragment to locate.
    pub fragment: String,
}

impl SearchRequest {
    /// Creates a new request.
    pub fn new(domain: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            fragment: fragment.into(),
        }
    }

    /// Returns the normalized domain.
    pub fn normalized_domain(&self) -> String {
        normalize_domain(&self.domain)
    }

    /// Builds the provider query for this request.
    pub fn query(&self) -> Result<ProviderQuery> {
        build_query(&self.domain, &self.fragment)
    }
}

/// A provider query string of the form `site:<domain> "<fragment>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderQuery(String);

impl ProviderQuery {
    /// Returns the query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProviderQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strips trailing wildcard markers (`*`, `.*`), dots, slashes and whitespace.
///
/// Stripping repeats until nothing changes, so the result is a fixed point:
/// `normalize_domain(normalize_domain(d)) == normalize_domain(d)`.
pub fn normalize_domain(domain: &str) -> String {
    let mut current = domain.trim();
    loop {
        let stripped = current
            .strip_suffix('*')
            .or_else(|| current.strip_suffix('.'))
            .or_else(|| current.strip_suffix('/'));
        match stripped {
            Some(rest) => current = rest.trim_end(),
            None => break,
        }
    }
    current.to_string()
}

/// Builds `site:<normalized-domain> "<fragment>"`.
///
/// The fragment is quoted verbatim; providers apply their own URL encoding.
pub fn build_query(domain: &str, fragment: &str) -> Result<ProviderQuery> {
    let domain = normalize_domain(domain);
    if domain.is_empty() {
        return Err(SearchError::InvalidInput("domain cannot be empty".into()));
    }
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Err(SearchError::InvalidInput("query cannot be empty".into()));
    }
    Ok(ProviderQuery(format!("site:{} \"{}\"", domain, fragment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wildcard_variants() {
        assert_eq!(normalize_domain("example.com.*"), "example.com");
        assert_eq!(normalize_domain("example.com*"), "example.com");
        assert_eq!(normalize_domain("example.com."), "example.com");
        assert_eq!(normalize_domain("example.com/*"), "example.com");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_domain("  example.com  "), "example.com");
        assert_eq!(normalize_domain(" example.com .* "), "example.com");
    }

    #[test]
    fn test_normalize_keeps_paths() {
        assert_eq!(normalize_domain("example.com/blog/*"), "example.com/blog");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in [
            "example.com.*",
            "example.com*",
            "example.com.",
            "example.com/*",
            "example.com..",
            "sub.example.org/*.*",
            "plain.net",
            "",
            "*",
        ] {
            let once = normalize_domain(raw);
            assert_eq!(normalize_domain(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_build_query() {
        let query = build_query("example.com/*", "hello world").unwrap();
        assert_eq!(query.as_str(), "site:example.com \"hello world\"");
    }

    #[test]
    fn test_build_query_does_not_escape_fragment() {
        let query = build_query("example.com", "a \"quoted\" & thing").unwrap();
        assert_eq!(query.to_string(), "site:example.com \"a \"quoted\" & thing\"");
    }

    #[test]
    fn test_build_query_trims_fragment() {
        let query = build_query("example.com", "  hello  ").unwrap();
        assert_eq!(query.as_str(), "site:example.com \"hello\"");
    }

    #[test]
    fn test_build_query_empty_domain() {
        let err = build_query(" .* ", "hello").unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
    }

    #[test]
    fn test_build_query_empty_fragment() {
        let err = build_query("example.com", "   ").unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
    }

    #[test]
    fn test_search_request_query() {
        let request = SearchRequest::new("example.com.*", "hello world");
        assert_eq!(request.normalized_domain(), "example.com");
        assert_eq!(
            request.query().unwrap().as_str(),
            "site:example.com \"hello world\""
        );
    }

    #[test]
    fn test_search_request_serialization() {
        let request = SearchRequest::new("example.com", "hello");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"domain\":\"example.com\""));
        assert!(json.contains("\"fragment\":\"hello\""));
    }
}
