//! Fallback orchestration across the provider chain.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::config::{Credentials, LookupConfig};
use crate::headers::HeaderPolicy;
use crate::provider::{FetchContext, Provider};
use crate::transport::Transport;
use crate::transport_http::HttpTransport;
use crate::{AggregateResult, ProviderOutcome, Result, SearchError, SearchRequest};

/// Message returned when the chain has no providers.
pub const NO_PROVIDERS: &str = "No search providers configured";

/// Finds the page on a domain that contains a text fragment by trying
/// providers in order until one finds it.
///
/// A `Resolver` is immutable once built and can be shared across tasks
/// behind an `Arc`.
pub struct Resolver {
    providers: Vec<Arc<dyn Provider>>,
    context: FetchContext,
}

impl Resolver {
    /// Creates a resolver with an empty chain and default context.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            context: FetchContext::default(),
        }
    }

    /// Builds the configured chain on top of [`HttpTransport`]s.
    ///
    /// The configured proxy only carries scraped traffic. Keyed providers
    /// get a direct client.
    pub fn from_config(config: &LookupConfig, headers: HeaderPolicy) -> Result<Self> {
        config.validate()?;
        let direct: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);
        let proxied: Arc<dyn Transport> = match &config.proxy {
            Some(proxy) => Arc::new(HttpTransport::with_proxy(proxy)?),
            None => Arc::clone(&direct),
        };
        Ok(Self::with_transports(config, headers, proxied, direct))
    }

    /// Builds the configured chain with every provider on `transport`.
    pub fn with_transport(
        config: &LookupConfig,
        headers: HeaderPolicy,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::with_transports(config, headers, Arc::clone(&transport), transport)
    }

    /// Builds the configured chain, sending scraped providers through
    /// `proxied` and keyed providers through `direct`.
    pub fn with_transports(
        config: &LookupConfig,
        headers: HeaderPolicy,
        proxied: Arc<dyn Transport>,
        direct: Arc<dyn Transport>,
    ) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|kind| {
                let transport = if kind.uses_proxy() { &proxied } else { &direct };
                kind.build(Arc::clone(transport))
            })
            .collect();
        Self {
            providers,
            context: config.fetch_context(headers),
        }
    }

    /// Appends a provider to the chain.
    pub fn add_provider<P: Provider + 'static>(&mut self, provider: P) {
        self.providers.push(Arc::new(provider));
    }

    /// Appends an already shared provider to the chain.
    pub fn add_shared(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(provider);
    }

    /// Sets the per-provider timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.context.timeout = timeout;
    }

    /// Sets the header policy.
    pub fn set_headers(&mut self, headers: HeaderPolicy) {
        self.context.headers = headers;
    }

    /// Sets the credential store.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.context.credentials = credentials;
    }

    /// Returns the number of providers in the chain.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns the shortcuts of the chain, in order.
    pub fn provider_shortcuts(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.shortcut()).collect()
    }

    /// Resolves `request` to the best matching URL.
    ///
    /// Invalid input is an error. Every provider-side failure is reported
    /// through [`AggregateResult::error`]; when all providers fail, the last
    /// provider's failure wins.
    pub async fn resolve(&self, request: &SearchRequest) -> Result<AggregateResult> {
        let query = request.query()?;
        let fragment = request.fragment.trim();

        if self.providers.is_empty() {
            warn!("{}", NO_PROVIDERS);
            return Ok(AggregateResult::failure(NO_PROVIDERS));
        }

        let start = Instant::now();
        debug!(query = %query, providers = self.providers.len(), "Resolving");

        let mut last: Option<(&str, ProviderOutcome)> = None;
        for provider in &self.providers {
            let name = provider.name();
            let outcome = match timeout(
                self.context.timeout,
                provider.fetch(&query, fragment, &self.context),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(provider = %name, "Provider timed out");
                    ProviderOutcome::UpstreamError {
                        detail: format!(
                            "{}: {}",
                            name,
                            SearchError::Timeout(self.context.timeout)
                        ),
                    }
                }
            };

            debug!(provider = %name, outcome = outcome.kind(), "Provider finished");
            if outcome.is_found() {
                info!(
                    provider = %name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Match found"
                );
                return Ok(AggregateResult::from_outcome(name, outcome));
            }
            last = Some((name, outcome));
        }

        let result = match last {
            Some((name, outcome)) => AggregateResult::from_outcome(name, outcome),
            None => AggregateResult::failure(NO_PROVIDERS),
        };
        warn!(
            error = result.error.as_deref().unwrap_or_default(),
            blocked = result.blocked,
            "All providers failed"
        );
        Ok(result)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
