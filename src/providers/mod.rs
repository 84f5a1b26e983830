//! Search provider implementations.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::provider::Provider;
use crate::transport::Transport;

// Scraped HTML providers
mod brave;
mod duckduckgo;
mod google;
mod scraperapi;

// JSON API providers
mod brave_api;
mod serper;

pub use brave::Brave;
pub use duckduckgo::DuckDuckGo;
pub use google::Google;
pub use scraperapi::ScraperApi;

pub use brave_api::BraveApi;
pub use serper::Serper;

/// Number of results requested from providers that accept a count.
pub(crate) const RESULT_COUNT: &str = "10";

/// Every provider the crate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "ddg")]
    DuckDuckGo,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "brave")]
    Brave,
    #[serde(rename = "brave_api")]
    BraveApi,
    #[serde(rename = "serper")]
    Serper,
    #[serde(rename = "scraperapi")]
    ScraperApi,
}

impl ProviderKind {
    /// Returns all kinds in display order.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::DuckDuckGo,
            Self::Google,
            Self::Brave,
            Self::BraveApi,
            Self::Serper,
            Self::ScraperApi,
        ]
    }

    /// Parses a shortcut (case-insensitive).
    pub fn from_shortcut(shortcut: &str) -> Option<Self> {
        let shortcut = shortcut.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.shortcut() == shortcut)
    }

    /// Short identifier, e.g. `ddg`.
    pub fn shortcut(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "ddg",
            Self::Google => "google",
            Self::Brave => "brave",
            Self::BraveApi => "brave_api",
            Self::Serper => "serper",
            Self::ScraperApi => "scraperapi",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Google => "Google",
            Self::Brave => "Brave",
            Self::BraveApi => "Brave Search API",
            Self::Serper => "Serper",
            Self::ScraperApi => "ScraperAPI",
        }
    }

    /// Credential key the provider needs, if any.
    pub fn credential(&self) -> Option<&'static str> {
        match self {
            Self::BraveApi => Some(brave_api::CREDENTIAL),
            Self::Serper => Some(serper::CREDENTIAL),
            Self::ScraperApi => Some(scraperapi::CREDENTIAL),
            Self::DuckDuckGo | Self::Google | Self::Brave => None,
        }
    }

    /// Whether requests go through the configured outbound proxy.
    /// Providers that carry an API key always connect directly.
    pub fn uses_proxy(&self) -> bool {
        self.credential().is_none()
    }

    /// Builds the provider on top of `transport`.
    pub fn build(&self, transport: Arc<dyn Transport>) -> Arc<dyn Provider> {
        match self {
            Self::DuckDuckGo => Arc::new(DuckDuckGo::new(transport)),
            Self::Google => Arc::new(Google::new(transport)),
            Self::Brave => Arc::new(Brave::new(transport)),
            Self::BraveApi => Arc::new(BraveApi::new(transport)),
            Self::Serper => Arc::new(Serper::new(transport)),
            Self::ScraperApi => Arc::new(ScraperApi::new(transport)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shortcut())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;

    #[test]
    fn test_shortcut_round_trip() {
        for kind in ProviderKind::all() {
            assert_eq!(ProviderKind::from_shortcut(kind.shortcut()), Some(*kind));
        }
        assert_eq!(ProviderKind::from_shortcut(" DDG "), Some(ProviderKind::DuckDuckGo));
        assert_eq!(ProviderKind::from_shortcut("bing"), None);
    }

    #[test]
    fn test_credentials() {
        assert_eq!(ProviderKind::DuckDuckGo.credential(), None);
        assert_eq!(ProviderKind::BraveApi.credential(), Some("BRAVE_API_KEY"));
        assert_eq!(ProviderKind::Serper.credential(), Some("SERPER_API_KEY"));
        assert_eq!(ProviderKind::ScraperApi.credential(), Some("SCRAPERAPI_KEY"));
    }

    #[test]
    fn test_only_keyless_providers_use_proxy() {
        let proxied: Vec<_> = ProviderKind::all()
            .iter()
            .filter(|kind| kind.uses_proxy())
            .map(|kind| kind.shortcut())
            .collect();
        assert_eq!(proxied, vec!["ddg", "google", "brave"]);
    }

    #[test]
    fn test_build_matches_kind() {
        let transport: Arc<dyn Transport> = Arc::new(RecordingTransport::new());
        for kind in ProviderKind::all() {
            let provider = kind.build(Arc::clone(&transport));
            assert_eq!(provider.shortcut(), kind.shortcut());
            assert_eq!(provider.name(), kind.label());
            assert_eq!(
                provider.config().credential.as_deref(),
                kind.credential()
            );
        }
    }

    #[test]
    fn test_serde_uses_shortcuts() {
        for kind in ProviderKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.shortcut()));
        }
        let kind: ProviderKind = serde_json::from_str("\"ddg\"").unwrap();
        assert_eq!(kind, ProviderKind::DuckDuckGo);
    }
}
