//! Keyword extraction LLM client configuration.
//!
//! Env vars: LLM_PROVIDER, LLM_ENDPOINT, LLM_API_KEY, LLM_MODEL,
//! LLM_MAX_TOKENS, LLM_TEMPERATURE, LLM_TIMEOUT_SECS, LLM_MAX_CONTENT_CHARS,
//! plus the provider key variables OPENAI_API_KEY, GROQ_API_KEY and
//! TOGETHER_API_KEY.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::prompts::{DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT};

/// LLM provider type. All providers speak the OpenAI chat completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Groq,
    Together,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "groq" => Some(Self::Groq),
            "together" => Some(Self::Together),
            _ => None,
        }
    }

    /// Endpoint used when none is configured explicitly.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com",
            Self::Groq => "https://api.groq.com/openai",
            Self::Together => "https://api.together.xyz",
        }
    }

    /// Provider-specific API key variable.
    pub fn key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Together => "TOGETHER_API_KEY",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenAI => "openai",
            Self::Groq => "groq",
            Self::Together => "together",
        };
        f.write_str(name)
    }
}

/// Configuration for the keyword extraction client.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider (openai, groq, together)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint, without the `/v1/...` suffix (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Default API key, used when a request carries none
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model to use for extraction
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for generation (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum characters of input text sent to the model
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Custom system instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Custom user prompt (uses the {content} placeholder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_content_chars() -> usize {
    12000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

// The API key never shows up in logs.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_content_chars", &self.max_content_chars)
            .finish()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            provider: LlmProvider::default(),
            endpoint: None,
            api_key: None,
            model: default_model(),
            max_tokens: None,
            temperature: None,
            timeout_secs: default_timeout_secs(),
            max_content_chars: default_max_content_chars(),
            system_prompt: None,
            user_prompt: None,
        }
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup. Empty values count as unset.
    ///
    /// Priority: LLM_PROVIDER wins over the configured provider, which wins
    /// over auto-detection from API keys. LLM_API_KEY wins over the
    /// provider key variable, and LLM_ENDPOINT over the provider endpoint.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let explicit_provider = var("LLM_PROVIDER").and_then(|v| LlmProvider::from_str(&v));
        let explicit_endpoint = var("LLM_ENDPOINT");

        self.api_key = self.api_key.filter(|k| !k.trim().is_empty());
        if let Some(key) = var("LLM_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(provider) = explicit_provider {
            self.provider = provider;
        }
        if self.api_key.is_none() {
            self.api_key = var(self.provider.key_var());
        }
        // Only the default provider falls back to whichever key is present
        if self.api_key.is_none()
            && explicit_provider.is_none()
            && self.provider == LlmProvider::OpenAI
        {
            if let Some(key) = var("GROQ_API_KEY") {
                self.api_key = Some(key);
                self.provider = LlmProvider::Groq;
            }
        }

        if let Some(endpoint) = explicit_endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(model) = var("LLM_MODEL") {
            self.model = model;
        }
        if let Some(n) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = Some(n);
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = Some(t);
        }
        if let Some(n) = var("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        if let Some(n) = var("LLM_MAX_CONTENT_CHARS").and_then(|v| v.parse().ok()) {
            self.max_content_chars = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Configured endpoint, or the provider's default.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint())
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Default credential, if a non-blank one is configured.
    pub fn default_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Get the system prompt, using custom or default.
    pub fn get_system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Get the user prompt template, using custom or default.
    pub fn get_user_prompt(&self) -> &str {
        self.user_prompt.as_deref().unwrap_or(DEFAULT_USER_PROMPT)
    }

    /// Human-readable hint for a missing credential.
    pub fn credential_hint(&self) -> String {
        format!(
            "API key not set. Pass --api-key or set {} or LLM_API_KEY",
            self.provider.key_var()
        )
    }
}
