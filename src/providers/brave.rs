//! Brave Search provider (scraped result pages).

use std::sync::Arc;

use async_trait::async_trait;

use crate::extract::BraveHtml;
use crate::provider::{exchange, upstream_error, with_params, FetchContext, Provider, ProviderConfig};
use crate::transport::{HttpRequest, Transport};
use crate::{ProviderOutcome, ProviderQuery};

const ENDPOINT: &str = "https://search.brave.com/search";

/// Brave search provider.
pub struct Brave {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl Brave {
    /// Creates a new Brave provider.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig::scraped("Brave", "brave"),
            transport,
        }
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl Provider for Brave {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(
        &self,
        query: &ProviderQuery,
        fragment: &str,
        ctx: &FetchContext,
    ) -> ProviderOutcome {
        let url = match with_params(ENDPOINT, &[("q", query.as_str()), ("source", "web")]) {
            Ok(url) => url,
            Err(e) => return upstream_error(&self.config, e),
        };

        let request = HttpRequest::get(url)
            .headers(ctx.headers.browser_headers())
            .timeout(ctx.timeout);

        exchange(
            &self.config,
            self.transport.as_ref(),
            request,
            &BraveHtml,
            fragment,
        )
        .await
    }
}
