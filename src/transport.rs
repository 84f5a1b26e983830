//! Transport abstraction for provider HTTP exchanges.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// HTTP method used by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request body variants providers need.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(serde_json::Value),
}

/// One outbound request. The URL already carries its encoded query string.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_secs(8),
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds several headers.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a form body.
    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = Some(RequestBody::Form(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the first header value with the given name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single HTTP request and returns the raw response.
///
/// Non-2xx statuses are returned as responses, not errors; only transport
/// failures (DNS, TLS, connection, body read) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the exchange.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_get_defaults() {
        let request = HttpRequest::get("https://example.com");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "https://example.com");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
        assert_eq!(request.timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_request_builder_chain() {
        let request = HttpRequest::post("https://example.com/search")
            .header("X-API-KEY", "secret")
            .headers([("Accept", "application/json")])
            .form(&[("q", "rust")])
            .timeout(Duration::from_secs(3));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header_value("x-api-key"), Some("secret"));
        assert_eq!(request.header_value("accept"), Some("application/json"));
        assert_eq!(
            request.body,
            Some(RequestBody::Form(vec![("q".into(), "rust".into())]))
        );
        assert_eq!(request.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_request_json_body() {
        let request = HttpRequest::post("https://example.com").json(serde_json::json!({"q": "x"}));
        match request.body {
            Some(RequestBody::Json(value)) => assert_eq!(value["q"], "x"),
            other => panic!("Expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn test_response_is_success() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(429, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[tokio::test]
    async fn test_transport_trait_object() {
        struct Echo;
        #[async_trait]
        impl Transport for Echo {
            async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
                Ok(HttpResponse::new(200, request.url))
            }
        }

        let transport: Box<dyn Transport> = Box::new(Echo);
        let response = transport
            .send(HttpRequest::get("https://example.com"))
            .await
            .unwrap();
        assert_eq!(response.body, "https://example.com");
    }
}
