//! JSON request entry point: `{domain, query}` in, `{status, body}` out.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::{Resolver, SearchError, SearchRequest};

/// Error message for a request missing either field.
pub const MISSING_FIELDS: &str = "domain and query are required";

/// Incoming lookup request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl LookupRequest {
    /// Converts into a [`SearchRequest`] when both fields are present and
    /// not blank.
    pub fn into_search_request(self) -> Option<SearchRequest> {
        let domain = self.domain.filter(|d| !d.trim().is_empty())?;
        let query = self.query.filter(|q| !q.trim().is_empty())?;
        Some(SearchRequest::new(domain, query))
    }
}

/// HTTP-style response: a status code and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryResponse {
    pub status: u16,
    pub body: Value,
}

impl EntryResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

/// Handles one raw JSON request body.
///
/// Malformed JSON or missing fields give 400. Provider failures are not
/// errors here: they come back as 200 with `error` set in the body. Anything
/// unexpected gives 500.
pub async fn handle_request(resolver: &Resolver, body: &str) -> EntryResponse {
    let request: LookupRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Malformed request body");
            return EntryResponse::error(400, format!("Invalid JSON: {}", e));
        }
    };

    let Some(request) = request.into_search_request() else {
        return EntryResponse::error(400, MISSING_FIELDS);
    };

    match resolver.resolve(&request).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(body) => EntryResponse::ok(body),
            Err(e) => {
                error!(error = %e, "Failed to serialize result");
                EntryResponse::error(500, e.to_string())
            }
        },
        Err(SearchError::InvalidInput(message)) => EntryResponse::error(400, message),
        Err(e) => {
            error!(error = %e, "Lookup failed");
            EntryResponse::error(500, e.to_string())
        }
    }
}
