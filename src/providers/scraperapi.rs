//! ScraperAPI provider: a Google result page fetched through the
//! ScraperAPI rendering proxy.

use std::sync::Arc;

use async_trait::async_trait;

use super::google;
use crate::extract::GoogleHtml;
use crate::provider::{
    credential, exchange, upstream_error, with_params, Access, FetchContext, Provider,
    ProviderConfig,
};
use crate::transport::{HttpRequest, Transport};
use crate::{ProviderOutcome, ProviderQuery};

const ENDPOINT: &str = "https://api.scraperapi.com/";

/// Credential key holding the API key.
pub(crate) const CREDENTIAL: &str = "SCRAPERAPI_KEY";

/// ScraperAPI provider.
pub struct ScraperApi {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl ScraperApi {
    /// Creates a new ScraperAPI provider.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig {
                name: "ScraperAPI".to_string(),
                shortcut: "scraperapi".to_string(),
                // The body is Google's HTML, so it still gets the challenge scan.
                access: Access::Scraped,
                credential: Some(CREDENTIAL.to_string()),
                soft_block_on_429: false,
            },
            transport,
        }
    }
}

#[async_trait]
impl Provider for ScraperApi {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(
        &self,
        query: &ProviderQuery,
        fragment: &str,
        ctx: &FetchContext,
    ) -> ProviderOutcome {
        let key = match credential(&self.config, ctx) {
            Ok(Some(key)) => key,
            Ok(None) => return upstream_error(&self.config, "no credential key configured"),
            Err(outcome) => return outcome,
        };

        let target = match google::search_url(query, ctx.headers.primary_language()) {
            Ok(target) => target,
            Err(e) => return upstream_error(&self.config, e),
        };
        let url = match with_params(ENDPOINT, &[("api_key", key), ("url", target.as_str())]) {
            Ok(url) => url,
            Err(e) => return upstream_error(&self.config, e),
        };

        let request = HttpRequest::get(url).timeout(ctx.timeout);

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
