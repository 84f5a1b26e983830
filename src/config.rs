//! Lookup configuration: provider chain, timeout, credentials and proxy.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::headers::HeaderPolicy;
use crate::provider::FetchContext;
use crate::providers::ProviderKind;
use crate::proxy::ProxyConfig;
use crate::{Result, SearchError};

/// Default per-provider timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Default language hint.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Opaque key/value credential store.
///
/// Values are never printed; blank values count as missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    values: HashMap<String, String>,
}

impl Credentials {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a credential.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`Credentials::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the credential for `key`, ignoring blank values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns whether a usable credential exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Credentials").field("keys", &keys).finish()
    }
}

/// Everything needed to build a [`crate::Resolver`].
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Provider fallback chain, tried in order.
    pub providers: Vec<ProviderKind>,
    /// Per-provider timeout in seconds.
    pub timeout_secs: u64,
    /// Provider credentials.
    pub credentials: Credentials,
    /// Outbound proxy.
    pub proxy: Option<ProxyConfig>,
    /// Language hint for `Accept-Language` and `hl=` parameters.
    pub language: String,
    /// Fixed User-Agent. `None` picks one at random per run.
    pub user_agent: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            providers: vec![ProviderKind::DuckDuckGo, ProviderKind::Google],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            credentials: Credentials::default(),
            proxy: None,
            language: DEFAULT_LANGUAGE.to_string(),
            user_agent: None,
        }
    }
}

impl LookupConfig {
    /// Reads configuration from the process environment.
    ///
    /// Recognized variables: `SITEFIND_PROVIDERS`, `SITEFIND_TIMEOUT`,
    /// `SITEFIND_LANGUAGE`, `SITEFIND_USER_AGENT`,
    /// `SITEFIND_PROXY_HOST`/`_PORT`/`_USER`/`_PASSWORD` and the provider
    /// credential keys (`BRAVE_API_KEY`, `SERPER_API_KEY`, `SCRAPERAPI_KEY`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(list) = get("SITEFIND_PROVIDERS") {
            config.providers = parse_providers(&list)?;
        }

        if let Some(timeout) = get("SITEFIND_TIMEOUT") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                SearchError::Config(format!("SITEFIND_TIMEOUT is not a number: {}", timeout))
            })?;
        }

        if let Some(language) = get("SITEFIND_LANGUAGE") {
            config.language = language;
        }
        config.user_agent = get("SITEFIND_USER_AGENT");

        for kind in ProviderKind::all() {
            if let Some(key) = kind.credential() {
                if let Some(value) = get(key) {
                    config.credentials.insert(key, value);
                }
            }
        }

        if let Some(host) = get("SITEFIND_PROXY_HOST") {
            let port = get("SITEFIND_PROXY_PORT").ok_or_else(|| {
                SearchError::Config(
                    "SITEFIND_PROXY_PORT is required when SITEFIND_PROXY_HOST is set".into(),
                )
            })?;
            let port: u16 = port.parse().map_err(|_| {
                SearchError::Config(format!("SITEFIND_PROXY_PORT is not a valid port: {}", port))
            })?;
            let mut proxy = ProxyConfig::new(host, port);
            if let (Some(user), Some(password)) =
                (get("SITEFIND_PROXY_USER"), get("SITEFIND_PROXY_PASSWORD"))
            {
                proxy = proxy.with_auth(user, password);
            }
            config.proxy = Some(proxy);
        }

        Ok(config)
    }

    /// Checks the configuration before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(SearchError::Config("timeout must be greater than zero".into()));
        }
        if self.providers.is_empty() {
            return Err(SearchError::Config("provider chain is empty".into()));
        }
        if self.language.trim().is_empty() {
            return Err(SearchError::Config("language cannot be empty".into()));
        }
        Ok(())
    }

    /// Per-provider timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Header policy: the fixed user agent when one is set, otherwise a
    /// randomly picked one.
    pub fn header_policy(&self) -> HeaderPolicy {
        match &self.user_agent {
            Some(user_agent) => HeaderPolicy::new(user_agent.clone(), self.language.clone()),
            None => HeaderPolicy::randomized(self.language.clone()),
        }
    }

    /// Builds the per-call context handed to providers.
    pub fn fetch_context(&self, headers: HeaderPolicy) -> FetchContext {
        FetchContext::new(self.credentials.clone(), headers, self.timeout())
    }
}

/// Parses a comma-separated list of provider shortcuts.
///
/// Unknown names are rejected so a typo never silently shortens the chain.
pub fn parse_providers(list: &str) -> Result<Vec<ProviderKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            ProviderKind::from_shortcut(name).ok_or_else(|| {
                SearchError::Config(format!(
                    "unknown provider '{}' (available: {})",
                    name,
                    ProviderKind::all()
                        .iter()
                        .map(|k| k.shortcut())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
        })
        .collect()
}
