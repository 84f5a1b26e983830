//! Header policy injected into providers at call time.
//!
//! Providers never pick a user agent themselves. The composition root
//! decides whether to use a fixed policy (tests, reproducible runs) or a
//! randomized one.

use rand::seq::SliceRandom;

/// Realistic browser User-Agent strings.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Headers a provider sends upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPolicy {
    user_agent: String,
    language: String,
}

impl HeaderPolicy {
    /// Creates a fixed policy.
    pub fn new(user_agent: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            language: language.into(),
        }
    }

    /// Creates a policy with a user agent picked at random from [`USER_AGENTS`].
    pub fn randomized(language: impl Into<String>) -> Self {
        let mut rng = rand::thread_rng();
        let user_agent = USER_AGENTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        Self::new(user_agent, language)
    }

    /// User-Agent header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Language tag, e.g. `en-US`.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Primary language subtag, e.g. `en` for `en-US`. Used for `hl=` parameters.
    pub fn primary_language(&self) -> &str {
        self.language
            .split(|c: char| c == '-' || c == '_')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("en")
    }

    /// `Accept-Language` header value.
    pub fn accept_language(&self) -> String {
        let primary = self.primary_language();
        if primary == "en" && self.language == "en" {
            "en".to_string()
        } else if primary == self.language {
            format!("{},en;q=0.8", self.language)
        } else {
            format!("{},{};q=0.9,en;q=0.8", self.language, primary)
        }
    }

    /// Browser-like headers for scraped HTML providers.
    pub fn browser_headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), HTML_ACCEPT.to_string()),
            ("Accept-Language".to_string(), self.accept_language()),
        ]
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::new(USER_AGENTS[0], "en-US")
    }
}
