//! Google provider (scraped result pages).

use std::sync::Arc;

use async_trait::async_trait;

use super::RESULT_COUNT;
use crate::extract::GoogleHtml;
use crate::provider::{exchange, upstream_error, with_params, FetchContext, Provider, ProviderConfig};
use crate::transport::{HttpRequest, Transport};
use crate::{ProviderOutcome, ProviderQuery, Result};

const ENDPOINT: &str = "https://www.google.com/search";

/// Google search provider.
pub struct Google {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl Google {
    /// Creates a new Google provider.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig::scraped("Google", "google"),
            transport,
        }
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }
}

/// Builds the Google search URL for `query`. Shared with ScraperAPI, which
/// fetches the same page on our behalf.
pub(crate) fn search_url(query: &ProviderQuery, language: &str) -> Result<String> {
    with_params(
        ENDPOINT,
        &[("q", query.as_str()), ("num", RESULT_COUNT), ("hl", language)],
    )
}

#[async_trait]
impl Provider for Google {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(
        &self,
        query: &ProviderQuery,
        fragment: &str,
        ctx: &FetchContext,
    ) -> ProviderOutcome {
        let url = match search_url(query, ctx.headers.primary_language()) {
            Ok(url) => url,
            Err(e) => return upstream_error(&self.config, e),
        };

        let request = HttpRequest::get(url)
            .headers(ctx.headers.browser_headers())
            .header("Referer", "https://www.google.com/")
            .timeout(ctx.timeout);

        exchange(
            &self.config,
            self.transport.as_ref(),
            request,
            &GoogleHtml,
            fragment,
        )
        .await
    }
}
