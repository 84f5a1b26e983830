//! HTTP transport using reqwest.

use async_trait::async_trait;
use reqwest::{Client, Proxy as ReqwestProxy};
use tracing::{debug, trace};

use crate::proxy::ProxyConfig;
use crate::transport::{HttpRequest, HttpResponse, Method, RequestBody, Transport};
use crate::{Result, SearchError};

/// A transport that performs real HTTP requests via reqwest.
///
/// User agent and other headers come from each [`HttpRequest`], never from
/// the client, so one transport can serve every provider.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with default settings.
    pub fn new() -> Result<Self> {
        Self::builder(None)
    }

    /// Creates a transport routed through the given proxy.
    pub fn with_proxy(proxy: &ProxyConfig) -> Result<Self> {
        Self::builder(Some(proxy))
    }

    /// Creates a transport with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn builder(proxy: Option<&ProxyConfig>) -> Result<Self> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(10));

        if let Some(proxy_config) = proxy {
            debug!("Using proxy: {}:{}", proxy_config.host, proxy_config.port);
            let proxy = ReqwestProxy::all(proxy_config.url())
                .map_err(|e| SearchError::Config(format!("Failed to create proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            Some(RequestBody::Json(value)) => builder.json(&value),
            None => builder,
        };

        // Strip URLs from errors: some providers carry API keys in the query.
        let response = builder
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| SearchError::Http(e.without_url()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(e.without_url()))?;

        trace!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse { status, body })
    }
}
