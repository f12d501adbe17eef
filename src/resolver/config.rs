//! Knowledge base lookup configuration.
//!
//! Env vars: WIKI_BASE_URL, WIKI_TIMEOUT_SECS, WIKI_FOLLOW_REDIRECTS,
//! WIKI_USER_AGENT.

use serde::{Deserialize, Serialize};

/// Configuration for article existence checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Site root; articles live under `{base_url}/wiki/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-lookup timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Count an article reached through redirects as existing
    #[serde(default)]
    pub follow_redirects: bool,
    /// User-Agent header sent with every lookup
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("wikilinker/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl WikiConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            follow_redirects: false,
            user_agent: default_user_agent(),
        }
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup. Empty values count as unset.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("WIKI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(n) = var("WIKI_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        if let Some(val) = var("WIKI_FOLLOW_REDIRECTS") {
            self.follow_redirects = val.eq_ignore_ascii_case("true") || val == "1";
        }
        if let Some(ua) = var("WIKI_USER_AGENT") {
            self.user_agent = ua;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}
