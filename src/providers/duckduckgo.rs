//! DuckDuckGo provider (HTML endpoint).

use std::sync::Arc;

use async_trait::async_trait;

use crate::extract::DuckDuckGoHtml;
use crate::provider::{exchange, FetchContext, Provider, ProviderConfig};
use crate::transport::{HttpRequest, Transport};
use crate::{ProviderOutcome, ProviderQuery};

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo search provider.
///
/// Posts the query as a form to the JavaScript-free HTML endpoint, the same
/// request a browser submits from the DuckDuckGo home page.
pub struct DuckDuckGo {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl DuckDuckGo {
    /// Creates a new DuckDuckGo provider.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig::scraped("DuckDuckGo", "ddg"),
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
impl Provider for DuckDuckGo {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(
        &self,
        query: &ProviderQuery,
        fragment: &str,
        ctx: &FetchContext,
    ) -> ProviderOutcome {
        let request = HttpRequest::post(ENDPOINT)
            .headers(ctx.headers.browser_headers())
            .header("Referer", "https://duckduckgo.com/")
            // kl=wt-wt: no region
            .form(&[("q", query.as_str()), ("b", ""), ("kl", "wt-wt")])
            .timeout(ctx.timeout);

        exchange(
            &self.config,
            self.transport.as_ref(),
            request,
            &DuckDuckGoHtml,
            fragment,
        )
        .await
    }
}
