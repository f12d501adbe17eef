//! LLM client for keyword extraction.
//!
//! Uses the OpenAI chat completion API, which Groq and Together.ai also
//! implement.

mod config;
mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::KeywordExtractor;
use crate::keyword::{parse_keyword_list, Keyword};

pub use config::{LlmConfig, LlmProvider};

/// LLM client for keyword extraction.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Chat completion request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Extract keywords from a text.
    ///
    /// Fails with `MissingCredential` before any request when the key is blank.
    pub async fn extract_keywords(
        &self,
        text: &str,
        api_key: &str,
    ) -> Result<Vec<Keyword>, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }

        let truncated = self.truncate_content(text);
        let prompt = self.config.get_user_prompt().replace("{content}", truncated);

        debug!(
            "Extracting keywords from {} chars with {}",
            truncated.len(),
            self.config.model
        );
        let response = self
            .call_chat(api_key, self.config.get_system_prompt(), &prompt)
            .await?;

        let keywords = parse_keyword_list(&response);
        info!("Extracted {} keywords", keywords.len());
        Ok(keywords)
    }

    /// Truncate content to configured maximum (UTF-8 safe).
    fn truncate_content<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.config.max_content_chars {
            return text;
        }
        let mut end = self.config.max_content_chars;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint().trim_end_matches('/')
        )
    }

    /// Call the chat completion API and return the reply text.
    async fn call_chat(&self, api_key: &str, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Parse("response contained no choices".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| LlmError::Parse("response contained no message content".to_string()))
    }
}

#[async_trait]
impl KeywordExtractor for LlmClient {
    async fn extract(&self, text: &str, api_key: &str) -> Result<Vec<Keyword>, LlmError> {
        self.extract_keywords(text, api_key).await
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was available
    #[error("API key not set")]
    MissingCredential,

    /// Failed to reach the LLM service
    #[error("Connection error: {0}")]
    Connection(String),

    /// API returned an error status
    #[error("API error: {0}")]
    Api(String),

    /// Response could not be used
    #[error("Parse error: {0}")]
    Parse(String),
}
