//! Error types for the lookup library.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during a lookup.
///
/// Only [`SearchError::InvalidInput`] ever escapes [`crate::Resolver::resolve`];
/// everything else is folded into a provider outcome.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Provider call exceeded its time budget.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Missing or empty request field.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}
