//! JSON API extractors (Brave Search API, Serper).
//!
//! Each reads its documented schema first and falls back to a generic walk
//! that picks up any object carrying a `url`/`link` next to a `title`.

use serde::Deserialize;
use serde_json::Value;

use super::{clean_text, first_non_empty, host_within, CandidateSet, ResultExtractor, Strategy};
use crate::{Candidate, Result, SearchError};

/// Extracts `web.results` from Brave Search API responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraveApiJson;

/// Extracts `organic` results from Serper responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerperJson;

impl ResultExtractor for BraveApiJson {
    fn name(&self) -> &'static str {
        "brave_api_json"
    }

    fn extract(&self, body: &str) -> Result<Vec<Candidate>> {
        first_non_empty(self.name(), body, &[brave_schema as Strategy, brave_generic])
    }
}

impl ResultExtractor for SerperJson {
    fn name(&self) -> &'static str {
        "serper_json"
    }

    fn extract(&self, body: &str) -> Result<Vec<Candidate>> {
        first_non_empty(self.name(), body, &[serper_schema as Strategy, serper_generic])
    }
}

#[derive(Debug, Deserialize)]
struct BraveApiResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveWebResult>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResult {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

fn brave_own_host(host: &str) -> bool {
    host_within(host, "brave.com")
}

fn serper_own_host(host: &str) -> bool {
    host_within(host, "serper.dev") || host_within(host, "google.com")
}

fn parse_json<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| SearchError::Parse(format!("Invalid JSON: {}", e)))
}

fn brave_schema(body: &str) -> Result<Vec<Candidate>> {
    let response: BraveApiResponse = parse_json(body)?;
    let mut set = CandidateSet::new(brave_own_host);
    for result in response.web.map(|w| w.results).unwrap_or_default() {
        push_entry(
            &mut set,
            result.url.as_deref().unwrap_or_default(),
            result.title.as_deref().unwrap_or_default(),
            result.description.as_deref().unwrap_or_default(),
        );
    }
    Ok(set.into_vec())
}

fn serper_schema(body: &str) -> Result<Vec<Candidate>> {
    let response: SerperResponse = parse_json(body)?;
    let mut set = CandidateSet::new(serper_own_host);
    for result in response.organic {
        push_entry(
            &mut set,
            result.link.as_deref().unwrap_or_default(),
            result.title.as_deref().unwrap_or_default(),
            result.snippet.as_deref().unwrap_or_default(),
        );
    }
    Ok(set.into_vec())
}

fn brave_generic(body: &str) -> Result<Vec<Candidate>> {
    generic(body, brave_own_host)
}

fn serper_generic(body: &str) -> Result<Vec<Candidate>> {
    generic(body, serper_own_host)
}

fn generic(body: &str, is_own_host: fn(&str) -> bool) -> Result<Vec<Candidate>> {
    let value: Value = parse_json(body)?;
    let mut set = CandidateSet::new(is_own_host);
    walk(&value, &mut set);
    Ok(set.into_vec())
}

fn walk(value: &Value, set: &mut CandidateSet) {
    if set.is_full() {
        return;
    }
    match value {
        Value::Object(map) => {
            let url = map
                .get("url")
                .or_else(|| map.get("link"))
                .and_then(Value::as_str);
            let title = map.get("title").and_then(Value::as_str);
            if let (Some(url), Some(title)) = (url, title) {
                let snippet = map
                    .get("description")
                    .or_else(|| map.get("snippet"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                push_entry(set, url, title, snippet);
            }
            for child in map.values() {
                walk(child, set);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, set);
            }
        }
        _ => {}
    }
}

fn push_entry(set: &mut CandidateSet, url: &str, title: &str, snippet: &str) {
    let url = url.trim();
    if url.is_empty() {
        return;
    }
    // API titles and descriptions carry <strong> highlighting.
    let title = clean_text(title);
    let title = if title.is_empty() { url.to_string() } else { title };
    set.push(Candidate::new(url, title).with_snippet(clean_text(snippet)));
}
