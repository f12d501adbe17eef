//! Configuration management for wikilinker using the prefer crate.
//!
//! Files are discovered with `prefer` (or given explicitly) and parsed with
//! serde by extension. Environment variables always win over file values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{LlmClient, LlmConfig};
use crate::resolver::{WikiConfig, WikiResolver};
use crate::services::pipeline::{Pipeline, DEFAULT_MAX_CONCURRENT_LOOKUPS};

/// Default bind address for the HTTP API.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Errors from loading configuration or building services from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Pipeline tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on article lookups in flight at once
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

fn default_max_concurrent_lookups() -> usize {
    DEFAULT_MAX_CONCURRENT_LOOKUPS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: default_max_concurrent_lookups(),
        }
        .with_env_overrides()
    }
}

impl PipelineConfig {
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = lookup("WIKILINKER_MAX_LOOKUPS").and_then(|v| v.trim().parse().ok()) {
            self.max_concurrent_lookups = n;
        }
        self
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (host:port)
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
        .with_env_overrides()
    }
}

impl ServerConfig {
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("WIKILINKER_BIND").filter(|s| !s.trim().is_empty()) {
            self.bind = bind;
        }
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Keyword extraction model settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Article lookup settings.
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults (with env overrides) when nothing is found.
    pub async fn load() -> Self {
        match prefer::load("wikilinker").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load from an explicit path if given, otherwise discover.
    pub async fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => Ok(Self::load().await),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`, then apply env overrides.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        let config: Config = match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            })?,
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            })?,
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            })?,
        };
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        self.llm = self.llm.with_env_overrides();
        self.wiki = self.wiki.with_env_overrides();
        self.pipeline = self.pipeline.with_env_overrides();
        self.server = self.server.with_env_overrides();
        self
    }

    /// Build the extraction → lookup → annotation pipeline from this config.
    pub fn build_pipeline(&self) -> Result<Pipeline, ConfigError> {
        let extractor =
            LlmClient::new(self.llm.clone()).map_err(|e| ConfigError::Client(e.to_string()))?;
        let resolver =
            WikiResolver::new(self.wiki.clone()).map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Pipeline::new(Arc::new(extractor), Arc::new(resolver))
            .with_default_api_key(self.llm.default_api_key().map(str::to_string))
            .with_max_concurrent_lookups(self.pipeline.max_concurrent_lookups))
    }
}
