//! Serper (Google results as JSON) provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::extract::SerperJson;
use crate::provider::{credential, exchange, upstream_error, FetchContext, Provider, ProviderConfig};
use crate::transport::{HttpRequest, Transport};
use crate::{ProviderOutcome, ProviderQuery};

const ENDPOINT: &str = "https://google.serper.dev/search";

/// Credential key holding the API key.
pub(crate) const CREDENTIAL: &str = "SERPER_API_KEY";

/// Serper provider.
pub struct Serper {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl Serper {
    /// Creates a new Serper provider.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig::api("Serper", "serper", CREDENTIAL),
            transport,
        }
    }
}

#[async_trait]
impl Provider for Serper {
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

        let request = HttpRequest::post(ENDPOINT)
            .header("X-API-KEY", key)
            .json(json!({
                "q": query.as_str(),
                "num": 10,
                "hl": ctx.headers.primary_language(),
            }))
            .timeout(ctx.timeout);

        exchange(
            &self.config,
            self.transport.as_ref(),
            request,
            &SerperJson,
            fragment,
        )
        .await
    }
}
