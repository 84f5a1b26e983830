//! Provider trait, configuration and the shared response pipeline.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::Credentials;
use crate::extract::ResultExtractor;
use crate::headers::HeaderPolicy;
use crate::result::select_best;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::{ProviderOutcome, ProviderQuery, Result};

/// Case-insensitive markers of a bot challenge or anomaly page.
pub const ANOMALY_MARKERS: &[&str] = &[
    "captcha",
    "unusual traffic",
    "automated requests",
    "verify you're not a robot",
    "recaptcha",
    "our systems have detected",
    "/sorry/index",
];

/// How a provider is accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// HTML pages fetched with browser headers; scanned for bot challenges.
    Scraped,
    /// Authenticated JSON API.
    Api,
}

/// Static configuration of a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name of the provider.
    pub name: String,
    /// Short identifier used in provider chains (e.g., "ddg").
    pub shortcut: String,
    /// Scraped HTML or JSON API.
    pub access: Access,
    /// Credential key the provider needs, if any.
    #[serde(default)]
    pub credential: Option<String>,
    /// Whether HTTP 429 means "blocked" rather than a plain upstream error.
    #[serde(default)]
    pub soft_block_on_429: bool,
}

impl ProviderConfig {
    /// Configuration for a scraped HTML provider. HTTP 429 counts as a block.
    pub fn scraped(name: impl Into<String>, shortcut: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: shortcut.into(),
            access: Access::Scraped,
            credential: None,
            soft_block_on_429: true,
        }
    }

    /// Configuration for a JSON API provider that needs `credential`.
    pub fn api(
        name: impl Into<String>,
        shortcut: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shortcut: shortcut.into(),
            access: Access::Api,
            credential: Some(credential.into()),
            soft_block_on_429: false,
        }
    }
}

/// Per-call values handed to every provider.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Opaque credential store.
    pub credentials: Credentials,
    /// Header policy for outbound requests.
    pub headers: HeaderPolicy,
    /// Upper bound for one provider call.
    pub timeout: Duration,
}

impl FetchContext {
    /// Creates a context.
    pub fn new(credentials: Credentials, headers: HeaderPolicy, timeout: Duration) -> Self {
        Self {
            credentials,
            headers,
            timeout,
        }
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new(
            Credentials::default(),
            HeaderPolicy::default(),
            Duration::from_secs(8),
        )
    }
}

/// A search provider adapter.
///
/// Adapters never fail: every transport, status or parse problem comes back
/// as a [`ProviderOutcome`] so the resolver can move on to the next provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &ProviderConfig;

    /// Looks up `query`, ranking candidates against `fragment`.
    async fn fetch(
        &self,
        query: &ProviderQuery,
        fragment: &str,
        ctx: &FetchContext,
    ) -> ProviderOutcome;

    /// Returns the provider name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns the provider shortcut.
    fn shortcut(&self) -> &str {
        &self.config().shortcut
    }
}

/// Returns the configured credential, or the `Unconfigured` outcome.
pub(crate) fn credential<'a>(
    config: &ProviderConfig,
    ctx: &'a FetchContext,
) -> std::result::Result<Option<&'a str>, ProviderOutcome> {
    match &config.credential {
        None => Ok(None),
        Some(key) => match ctx.credentials.get(key) {
            Some(value) => Ok(Some(value)),
            None => {
                debug!(provider = %config.name, credential = %key, "Credential missing");
                Err(ProviderOutcome::Unconfigured {
                    credential: key.clone(),
                })
            }
        },
    }
}

/// Appends URL-encoded `params` to `base`.
pub(crate) fn with_params(base: &str, params: &[(&str, &str)]) -> Result<String> {
    Ok(Url::parse_with_params(base, params)?.to_string())
}

/// Wraps `error` into an `UpstreamError` attributed to the provider.
pub(crate) fn upstream_error(config: &ProviderConfig, error: impl Display) -> ProviderOutcome {
    ProviderOutcome::UpstreamError {
        detail: format!("{}: {}", config.name, error),
    }
}

/// Sends `request` and interprets the response.
pub(crate) async fn exchange(
    config: &ProviderConfig,
    transport: &dyn Transport,
    request: HttpRequest,
    extractor: &dyn ResultExtractor,
    fragment: &str,
) -> ProviderOutcome {
    match transport.send(request).await {
        Ok(response) => interpret(config, response, extractor, fragment),
        Err(e) => {
            warn!(provider = %config.name, error = %e, "Request failed");
            upstream_error(config, e)
        }
    }
}

/// Classifies a response: status, anomaly scan, extraction, ranking.
pub(crate) fn interpret(
    config: &ProviderConfig,
    response: HttpResponse,
    extractor: &dyn ResultExtractor,
    fragment: &str,
) -> ProviderOutcome {
    if !response.is_success() {
        warn!(provider = %config.name, status = response.status, "Non-success status");
        if response.status == 429 && config.soft_block_on_429 {
            return ProviderOutcome::Blocked {
                reason: format!("{} is rate limiting requests (HTTP 429)", config.name),
            };
        }
        return ProviderOutcome::UpstreamError {
            detail: format!("{}: HTTP {}", config.name, response.status),
        };
    }

    if config.access == Access::Scraped {
        if let Some(marker) = detect_anomaly(&response.body) {
            warn!(provider = %config.name, marker, "Bot challenge detected");
            return ProviderOutcome::Blocked {
                reason: format!("CAPTCHA detected on {}", config.name),
            };
        }
    }

    let candidates = match extractor.extract(&response.body) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(provider = %config.name, error = %e, "Extraction failed");
            return upstream_error(config, e);
        }
    };
    debug!(provider = %config.name, count = candidates.len(), "Candidates extracted");

    match select_best(candidates, fragment) {
        Some(best) => {
            debug!(provider = %config.name, url = %best.url, score = best.score, "Best candidate");
            ProviderOutcome::Found {
                url: best.url,
                title: best.title,
            }
        }
        None => ProviderOutcome::Empty,
    }
}

/// Returns the first anomaly marker found in `body`, if any.
pub fn detect_anomaly(body: &str) -> Option<&'static str> {
    let lowered = body.to_lowercase();
    ANOMALY_MARKERS
        .iter()
        .copied()
        .find(|marker| lowered.contains(marker))
}
