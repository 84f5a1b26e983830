//! Integration tests for the provider chain.
//!
//! Tests in the `live_*` modules are marked with `#[ignore]` because they
//! send real HTTP requests and may be slow or flaky (providers rate limit
//! and serve CAPTCHAs). Run them with:
//! `cargo test --test integration -- --ignored`
//!
//! The `offline` module drives the full chain through a fake transport.

use std::sync::Arc;

use a3s_sitefind::{
    AggregateResult, HeaderPolicy, HttpTransport, LookupConfig, ProviderKind, Resolver,
    SearchRequest, Transport,
};

/// Helper to run a single-provider lookup over the network.
async fn live_lookup(kind: ProviderKind, domain: &str, fragment: &str) -> AggregateResult {
    let config = LookupConfig {
        providers: vec![kind],
        timeout_secs: 15,
        ..LookupConfig::from_env().unwrap_or_default()
    };
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new().unwrap());
    let resolver = Resolver::with_transport(&config, HeaderPolicy::randomized("en-US"), transport);

    let result = resolver
        .resolve(&SearchRequest::new(domain, fragment))
        .await
        .unwrap();
    match &result.error {
        None => println!("{} found {} - {}", kind.label(), result.title, result.url),
        Some(error) => println!("{} failed (blocked={}): {}", kind.label(), result.blocked, error),
    }
    result
}

fn has_credential(kind: ProviderKind) -> bool {
    kind.credential()
        .map(|key| std::env::var(key).is_ok_and(|v| !v.trim().is_empty()))
        .unwrap_or(true)
}

mod live_scraped_tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_duckduckgo_lookup() {
        let result = live_lookup(
            ProviderKind::DuckDuckGo,
            "rust-lang.org",
            "A language empowering everyone",
        )
        .await;
        // Blocks are an expected live outcome; anything else must be a match.
        if !result.blocked {
            assert!(result.is_found(), "DuckDuckGo should find a page");
            assert!(result.url.contains("rust-lang.org"));
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_google_lookup() {
        let result = live_lookup(ProviderKind::Google, "rust-lang.org", "The Rust Programming Language").await;
        println!("Google result: {:?}", result);
    }

    #[tokio::test]
    #[ignore]
    async fn test_brave_lookup() {
        let result = live_lookup(ProviderKind::Brave, "docs.rs", "Docs.rs").await;
        println!("Brave result: {:?}", result);
    }
}

mod live_api_tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_brave_api_lookup() {
        if !has_credential(ProviderKind::BraveApi) {
            println!("BRAVE_API_KEY not set, skipping");
            return;
        }
        let result = live_lookup(ProviderKind::BraveApi, "rust-lang.org", "Rust Programming Language").await;
        assert!(result.is_found(), "Brave Search API should find a page");
    }

    #[tokio::test]
    #[ignore]
    async fn test_serper_lookup() {
        if !has_credential(ProviderKind::Serper) {
            println!("SERPER_API_KEY not set, skipping");
            return;
        }
        let result = live_lookup(ProviderKind::Serper, "rust-lang.org", "Rust Programming Language").await;
        assert!(result.is_found(), "Serper should find a page");
    }

    #[tokio::test]
    #[ignore]
    async fn test_scraperapi_lookup() {
        if !has_credential(ProviderKind::ScraperApi) {
            println!("SCRAPERAPI_KEY not set, skipping");
            return;
        }
        let result = live_lookup(ProviderKind::ScraperApi, "rust-lang.org", "Rust Programming Language").await;
        println!("ScraperAPI result: {:?}", result);
    }

    #[tokio::test]
    #[ignore]
    async fn test_missing_key_reports_unconfigured() {
        if has_credential(ProviderKind::Serper) {
            println!("SERPER_API_KEY is set, skipping");
            return;
        }
        let result = live_lookup(ProviderKind::Serper, "rust-lang.org", "Rust").await;
        assert_eq!(
            result.error.as_deref(),
            Some("Serper is not configured: missing SERPER_API_KEY")
        );
    }
}

mod offline {
    use std::sync::Mutex;

    use super::*;
    use a3s_sitefind::{
        handle_request, Credentials, HttpRequest, HttpResponse, RequestBody, Result, SearchError,
    };
    use async_trait::async_trait;

    const DDG_RESULTS: &str = r#"
        <div class="result">
          <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fother">unrelated page</a>
        </div>
        <div class="result">
          <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fhello">hello world</a>
        </div>
    "#;

    const DDG_EMPTY: &str = r#"<div class="no-results">No results found</div>"#;

    const GOOGLE_RESULTS: &str = r#"
        <div class="g"><a href="/url?q=https://example.com/from-google&amp;sa=U"><h3>Hello world from Google</h3></a></div>
    "#;

    /// Answers by host and records every request.
    struct FakeWeb {
        routes: Vec<(&'static str, u16, &'static str)>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl FakeWeb {
        fn new(routes: Vec<(&'static str, u16, &'static str)>) -> Arc<Self> {
            Arc::new(Self {
                routes,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeWeb {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.routes
                .iter()
                .find(|(host, _, _)| request.url.contains(*host))
                .map(|(_, status, body)| HttpResponse::new(*status, *body))
                .ok_or_else(|| SearchError::Other(format!("no route for {}", request.url)))
        }
    }

    fn resolver(web: Arc<FakeWeb>, providers: Vec<ProviderKind>) -> Resolver {
        let config = LookupConfig {
            providers,
            ..LookupConfig::default()
        };
        Resolver::with_transport(&config, HeaderPolicy::default(), web)
    }

    #[tokio::test]
    async fn test_end_to_end_best_match() {
        let web = FakeWeb::new(vec![("duckduckgo.com", 200, DDG_RESULTS)]);
        let resolver = resolver(web.clone(), vec![ProviderKind::DuckDuckGo, ProviderKind::Google]);

        let result = resolver
            .resolve(&SearchRequest::new("example.com/*", "hello world"))
            .await
            .unwrap();

        assert_eq!(result, AggregateResult::found("https://example.com/hello", "hello world"));

        let seen = web.seen();
        assert_eq!(seen.len(), 1, "Google must not be called after a match");
        match &seen[0].body {
            Some(RequestBody::Form(pairs)) => {
                assert_eq!(pairs[0].0, "q");
                assert_eq!(pairs[0].1, "site:example.com \"hello world\"");
            }
            other => panic!("Expected a form body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_google() {
        let web = FakeWeb::new(vec![
            ("duckduckgo.com", 200, DDG_EMPTY),
            ("google.com", 200, GOOGLE_RESULTS),
        ]);
        let resolver = resolver(web.clone(), vec![ProviderKind::DuckDuckGo, ProviderKind::Google]);

        let result = resolver
            .resolve(&SearchRequest::new("example.com.*", "hello world"))
            .await
            .unwrap();

        assert_eq!(result.url, "https://example.com/from-google");
        assert_eq!(web.seen().len(), 2);
    }

    #[tokio::test]
    async fn test_captcha_then_google_captcha_is_blocked() {
        let web = FakeWeb::new(vec![
            ("duckduckgo.com", 200, "<html>Please solve this CAPTCHA</html>"),
            ("google.com", 429, ""),
        ]);
        let resolver = resolver(web, vec![ProviderKind::DuckDuckGo, ProviderKind::Google]);

        let result = resolver
            .resolve(&SearchRequest::new("example.com", "hello world"))
            .await
            .unwrap();

        assert!(result.blocked);
        assert!(!result.is_found());
        assert!(result.error.unwrap().contains("Google"));
    }

    #[tokio::test]
    async fn test_all_empty_reports_last_provider() {
        let web = FakeWeb::new(vec![
            ("duckduckgo.com", 200, DDG_EMPTY),
            ("google.com", 200, "<html><body>No results</body></html>"),
        ]);
        let resolver = resolver(web, vec![ProviderKind::DuckDuckGo, ProviderKind::Google]);

        let result = resolver
            .resolve(&SearchRequest::new("example.com", "hello world"))
            .await
            .unwrap();

        assert_eq!(result.error.as_deref(), Some("No results found on Google"));
        assert!(!result.blocked);
    }

    #[tokio::test]
    async fn test_unconfigured_api_provider_is_skipped() {
        let web = FakeWeb::new(vec![("duckduckgo.com", 200, DDG_RESULTS)]);
        let resolver = resolver(web.clone(), vec![ProviderKind::Serper, ProviderKind::DuckDuckGo]);

        let result = resolver
            .resolve(&SearchRequest::new("example.com", "hello world"))
            .await
            .unwrap();

        assert!(result.is_found());
        assert!(web.seen().iter().all(|r| !r.url.contains("serper.dev")));
    }

    #[tokio::test]
    async fn test_configured_api_provider() {
        let web = FakeWeb::new(vec![(
            "google.serper.dev",
            200,
            r#"{"organic": [{"title": "hello world", "link": "https://example.com/hello"}]}"#,
        )]);
        let config = LookupConfig {
            providers: vec![ProviderKind::Serper],
            credentials: Credentials::new().with("SERPER_API_KEY", "test-key"),
            ..LookupConfig::default()
        };
        let resolver = Resolver::with_transport(&config, HeaderPolicy::default(), web.clone());

        let result = resolver
            .resolve(&SearchRequest::new("example.com", "hello world"))
            .await
            .unwrap();

        assert_eq!(result.url, "https://example.com/hello");
        assert_eq!(web.seen()[0].header_value("x-api-key"), Some("test-key"));
    }

    #[tokio::test]
    async fn test_handle_request_end_to_end() {
        let web = FakeWeb::new(vec![("duckduckgo.com", 200, DDG_RESULTS)]);
        let resolver = resolver(web, vec![ProviderKind::DuckDuckGo]);

        let response = handle_request(
            &resolver,
            r#"{"domain": "example.com/*", "query": "hello world"}"#,
        )
        .await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body["url"], "https://example.com/hello");
        assert_eq!(response.body["title"], "hello world");
        assert!(response.body["error"].is_null());

        let response = handle_request(&resolver, r#"{"domain": "example.com"}"#).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "domain and query are required");
    }

    #[test]
    fn test_blocking_runtime() {
        let web = FakeWeb::new(vec![("duckduckgo.com", 200, DDG_RESULTS)]);
        let resolver = resolver(web, vec![ProviderKind::DuckDuckGo]);

        let result = tokio_test::block_on(
            resolver.resolve(&SearchRequest::new("example.com", "unrelated page")),
        )
        .unwrap();
        assert_eq!(result.url, "https://example.com/other");
    }
}
