//! Candidate, provider outcome and aggregate result types.

use serde::{Deserialize, Serialize};

use crate::scoring;

/// A single (url, title, snippet) triple extracted from one provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Resolved destination URL.
    pub url: String,
    /// Result title (falls back to the URL when the markup had none).
    pub title: String,
    /// Description/snippet, when the provider supplied one.
    pub snippet: Option<String>,
    /// Similarity to the searched fragment, in `[0, 1]`.
    pub score: f64,
}

impl Candidate {
    /// Creates an unscored candidate.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: None,
            score: 0.0,
        }
    }

    /// Sets the snippet. Blank snippets are dropped.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        self.snippet = if snippet.trim().is_empty() {
            None
        } else {
            Some(snippet)
        };
        self
    }

    /// Computes and stores the score against `fragment`.
    pub fn score_against(&mut self, fragment: &str) {
        self.score = scoring::candidate_score(&self.title, self.snippet.as_deref(), fragment);
    }
}

/// Scores every candidate and returns the best one.
///
/// Ties go to the earliest candidate. A best candidate is returned even when
/// its score is 0.
pub fn select_best(candidates: Vec<Candidate>, fragment: &str) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for mut candidate in candidates {
        candidate.score_against(fragment);
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// The outcome of one provider call. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    /// A best-matching page was found.
    Found { url: String, title: String },
    /// The provider answered but had no candidates.
    Empty,
    /// The provider refused automated access (bot challenge, soft block).
    Blocked { reason: String },
    /// Non-2xx status, network failure, timeout or parse failure.
    UpstreamError { detail: String },
    /// A credential the provider needs is missing.
    Unconfigured { credential: String },
}

impl ProviderOutcome {
    /// Returns whether this outcome ends the fallback chain.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::Empty => "empty",
            Self::Blocked { .. } => "blocked",
            Self::UpstreamError { .. } => "upstream_error",
            Self::Unconfigured { .. } => "unconfigured",
        }
    }
}

/// The response handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Best matching URL, empty on failure.
    pub url: String,
    /// Title of the best match, empty on failure.
    pub title: String,
    /// Human-readable failure description, `null` on success.
    pub error: Option<String>,
    /// Present (and true) only when the final provider blocked the request.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blocked: bool,
}

impl AggregateResult {
    /// A successful result.
    pub fn found(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            error: None,
            blocked: false,
        }
    }

    /// A failed result with the given message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            url: String::new(),
            title: String::new(),
            error: Some(error.into()),
            blocked: false,
        }
    }

    /// Normalizes the final outcome of `provider` into a result.
    pub fn from_outcome(provider: &str, outcome: ProviderOutcome) -> Self {
        match outcome {
            ProviderOutcome::Found { url, title } => Self::found(url, title),
            ProviderOutcome::Empty => Self::failure(format!("No results found on {}", provider)),
            ProviderOutcome::UpstreamError { detail } => Self::failure(detail),
            ProviderOutcome::Unconfigured { credential } => Self::failure(format!(
                "{} is not configured: missing {}",
                provider, credential
            )),
            ProviderOutcome::Blocked { reason } => Self {
                blocked: true,
                ..Self::failure(reason)
            },
        }
    }

    /// Returns whether a URL was found.
    pub fn is_found(&self) -> bool {
        self.error.is_none() && !self.url.is_empty()
    }
}
