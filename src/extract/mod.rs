//! Result extractors: raw provider payload in, candidates out.
//!
//! Every extractor runs at least two independent strategies in priority
//! order and keeps the output of the first one that yields anything, so a
//! provider's markup drifting away from one pattern does not silently turn
//! into "no results".

mod brave;
mod duckduckgo;
mod google;
mod json;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::{Candidate, Result, SearchError};

pub use brave::BraveHtml;
pub use duckduckgo::DuckDuckGoHtml;
pub use google::GoogleHtml;
pub use json::{BraveApiJson, SerperJson};

/// Upper bound on candidates collected from one payload.
pub const MAX_CANDIDATES: usize = 10;

/// Turns one provider's raw response body into candidates.
///
/// Implementations are pure: no I/O, no scoring. Candidates come back in
/// extraction order, unique by URL, at most [`MAX_CANDIDATES`].
pub trait ResultExtractor: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Extracts candidates from `body`.
    fn extract(&self, body: &str) -> Result<Vec<Candidate>>;
}

/// One extraction strategy.
pub(crate) type Strategy = fn(&str) -> Result<Vec<Candidate>>;

/// Runs `strategies` in order and returns the first non-empty output.
///
/// A failing strategy does not stop the later ones. The error is returned
/// only when every strategy failed.
pub(crate) fn first_non_empty(
    extractor: &str,
    body: &str,
    strategies: &[Strategy],
) -> Result<Vec<Candidate>> {
    let mut last_error = None;
    let mut any_succeeded = false;
    for (index, strategy) in strategies.iter().enumerate() {
        match strategy(body) {
            Ok(candidates) if !candidates.is_empty() => {
                tracing::debug!(
                    extractor,
                    strategy = index,
                    count = candidates.len(),
                    "Extracted candidates"
                );
                return Ok(candidates);
            }
            Ok(_) => any_succeeded = true,
            Err(e) => {
                tracing::debug!(extractor, strategy = index, error = %e, "Strategy failed");
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if !any_succeeded => Err(e),
        _ => Ok(Vec::new()),
    }
}

/// Ordered, URL-unique, bounded candidate collection for one pass.
pub(crate) struct CandidateSet {
    is_own_host: fn(&str) -> bool,
    seen: HashSet<String>,
    items: Vec<Candidate>,
}

impl CandidateSet {
    /// Creates a set that rejects links whose host satisfies `is_own_host`.
    pub(crate) fn new(is_own_host: fn(&str) -> bool) -> Self {
        Self {
            is_own_host,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Adds a candidate. Non-http(s) links, links back to the provider
    /// and URLs already present are skipped.
    pub(crate) fn push(&mut self, candidate: Candidate) {
        if self.is_full() {
            return;
        }
        let host = match url::Url::parse(&candidate.url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                parsed.host_str().map(|h| h.to_ascii_lowercase())
            }
            _ => return,
        };
        match host {
            Some(host) if !(self.is_own_host)(&host) => {}
            _ => return,
        }
        if self.seen.insert(candidate.url.clone()) {
            self.items.push(candidate);
        }
    }

    /// Returns whether the cap has been reached.
    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= MAX_CANDIDATES
    }

    pub(crate) fn into_vec(self) -> Vec<Candidate> {
        self.items
    }
}

/// Returns whether `host` is `domain` or one of its subdomains.
pub(crate) fn host_within(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Compiles a regex pattern, mapping failures to parse errors.
pub(crate) fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| SearchError::Parse(format!("Failed to compile pattern: {}", e)))
}

/// Parses a CSS selector, mapping failures to parse errors.
pub(crate) fn selector(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))
}

/// Removes markup and decodes the handful of entities providers emit,
/// collapsing whitespace.
pub(crate) fn clean_text(raw: &str) -> String {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    let without_tags = match TAGS.get_or_init(|| Regex::new(r"<[^>]*>").ok()) {
        Some(tags) => tags.replace_all(raw, " ").into_owned(),
        None => raw.to_string(),
    };
    let decoded = decode_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes common HTML entities in attribute values and text.
pub(crate) fn decode_entities(raw: &str) -> String {
    raw.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Returns `body[start..end]`, with both ends pulled inward to char boundaries.
pub(crate) fn window(body: &str, start: usize, end: usize) -> &str {
    let mut end = end.min(body.len());
    let mut start = start.min(end);
    while start < end && !body.is_char_boundary(start) {
        start += 1;
    }
    while end > start && !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_own(_: &str) -> bool {
        false
    }

    fn example_own(host: &str) -> bool {
        host_within(host, "example.org")
    }

    #[test]
    fn test_candidate_set_dedups_by_url() {
        let mut set = CandidateSet::new(never_own);
        set.push(Candidate::new("https://a.test/page", "First"));
        set.push(Candidate::new("https://a.test/page", "Second"));
        let items = set.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
    }

    #[test]
    fn test_candidate_set_caps() {
        let mut set = CandidateSet::new(never_own);
        for i in 0..25 {
            set.push(Candidate::new(format!("https://a.test/{}", i), "t"));
        }
        assert!(set.is_full());
        assert_eq!(set.into_vec().len(), MAX_CANDIDATES);
    }

    #[test]
    fn test_candidate_set_rejects_own_host_and_non_http() {
        let mut set = CandidateSet::new(example_own);
        set.push(Candidate::new("https://example.org/settings", "Settings"));
        set.push(Candidate::new("https://www.example.org/", "Home"));
        set.push(Candidate::new("javascript:void(0)", "Script"));
        set.push(Candidate::new("/relative", "Relative"));
        set.push(Candidate::new("https://notexample.org/", "Other"));
        let items = set.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://notexample.org/");
    }

    #[test]
    fn test_host_within() {
        assert!(host_within("google.com", "google.com"));
        assert!(host_within("www.google.com", "google.com"));
        assert!(!host_within("notgoogle.com", "google.com"));
        assert!(!host_within("google.com.evil.test", "google.com"));
    }

    #[test]
    fn test_first_non_empty_falls_through() {
        fn none(_: &str) -> Result<Vec<Candidate>> {
            Ok(Vec::new())
        }
        fn some(_: &str) -> Result<Vec<Candidate>> {
            Ok(vec![Candidate::new("https://a.test", "A")])
        }
        fn other(_: &str) -> Result<Vec<Candidate>> {
            Ok(vec![Candidate::new("https://b.test", "B")])
        }
        let result = first_non_empty("test", "", &[none as Strategy, some, other]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].url, "https://a.test");
    }

    #[test]
    fn test_first_non_empty_all_empty() {
        fn none(_: &str) -> Result<Vec<Candidate>> {
            Ok(Vec::new())
        }
        assert!(first_non_empty("test", "", &[none as Strategy, none]).unwrap().is_empty());
    }

    #[test]
    fn test_first_non_empty_continues_after_failure() {
        fn broken(_: &str) -> Result<Vec<Candidate>> {
            Err(SearchError::Parse("schema changed".to_string()))
        }
        fn none(_: &str) -> Result<Vec<Candidate>> {
            Ok(Vec::new())
        }
        fn some(_: &str) -> Result<Vec<Candidate>> {
            Ok(vec![Candidate::new("https://a.test", "A")])
        }

        let result = first_non_empty("test", "", &[broken as Strategy, some]).unwrap();
        assert_eq!(result[0].url, "https://a.test");

        let result = first_non_empty("test", "", &[broken as Strategy, none]).unwrap();
        assert!(result.is_empty());

        let err = first_non_empty("test", "", &[broken as Strategy, broken]).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("  <b>Hello</b>&nbsp;&amp; <i>World</i>\n "),
            "Hello & World"
        );
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        let body = "aé€b";
        // byte 2 is inside 'é', byte 4 inside '€'
        assert_eq!(window(body, 2, 4), "");
        assert_eq!(window(body, 0, 100), body);
        assert_eq!(window(body, 1, 3), "é");
    }
}
