//! # a3s-sitefind
//!
//! Finds the live URL on a website that contains a given text fragment.
//!
//! A lookup turns `(domain, fragment)` into a `site:<domain> "<fragment>"`
//! query and walks a fallback chain of search providers until one of them
//! returns a matching page:
//!
//! - Scraped HTML providers (DuckDuckGo, Google, Brave) with bot-challenge detection
//! - JSON API providers (Brave Search API, Serper, ScraperAPI) keyed by credentials
//! - Candidate ranking by title/snippet similarity to the fragment
//! - One normalized result, whichever provider answered
//!
//! ## Example
//!
//! ```rust,no_run
//! use a3s_sitefind::{HeaderPolicy, LookupConfig, Resolver, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LookupConfig::from_env()?;
//!     let resolver = Resolver::from_config(&config, HeaderPolicy::randomized("en-US"))?;
//!
//!     let request = SearchRequest::new("example.com/*", "hello world");
//!     let result = resolver.resolve(&request).await?;
//!
//!     match result.error {
//!         None => println!("{}: {}", result.title, result.url),
//!         Some(error) => eprintln!("{}", error),
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod entry;
mod error;
mod headers;
mod provider;
mod query;
mod resolver;
mod result;
mod transport;
mod transport_http;

pub mod extract;
pub mod providers;
pub mod proxy;
pub mod scoring;

pub use config::{parse_providers, Credentials, LookupConfig};
pub use entry::{handle_request, EntryResponse, LookupRequest};
pub use error::{Result, SearchError};
pub use headers::{HeaderPolicy, USER_AGENTS};
pub use provider::{detect_anomaly, Access, FetchContext, Provider, ProviderConfig};
pub use providers::ProviderKind;
pub use query::{build_query, normalize_domain, ProviderQuery, SearchRequest};
pub use resolver::Resolver;
pub use result::{select_best, AggregateResult, Candidate, ProviderOutcome};
pub use transport::{HttpRequest, HttpResponse, Method, RequestBody, Transport};
pub use transport_http::HttpTransport;
