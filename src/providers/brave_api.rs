//! Brave Search API provider.

use std::sync::Arc;

use async_trait::async_trait;

use super::RESULT_COUNT;
use crate::extract::BraveApiJson;
use crate::provider::{
    credential, exchange, upstream_error, with_params, FetchContext, Provider, ProviderConfig,
};
use crate::transport::{HttpRequest, Transport};
use crate::{ProviderOutcome, ProviderQuery};

const ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// Credential key holding the subscription token.
pub(crate) const CREDENTIAL: &str = "BRAVE_API_KEY";

/// Brave Search API provider.
pub struct BraveApi {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl BraveApi {
    /// Creates a new Brave Search API provider.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig::api("Brave Search API", "brave_api", CREDENTIAL),
            transport,
        }
    }
}

#[async_trait]
impl Provider for BraveApi {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(
        &self,
        query: &ProviderQuery,
        fragment: &str,
        ctx: &FetchContext,
    ) -> ProviderOutcome {
        let token = match credential(&self.config, ctx) {
            Ok(Some(token)) => token,
            Ok(None) => return upstream_error(&self.config, "no credential key configured"),
            Err(outcome) => return outcome,
        };

        let url = match with_params(ENDPOINT, &[("q", query.as_str()), ("count", RESULT_COUNT)]) {
            Ok(url) => url,
            Err(e) => return upstream_error(&self.config, e),
        };

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .header("User-Agent", ctx.headers.user_agent())
            .header("X-Subscription-Token", token)
            .timeout(ctx.timeout);

        exchange(
            &self.config,
            self.transport.as_ref(),
            request,
            &BraveApiJson,
            fragment,
        )
        .await
    }
}
