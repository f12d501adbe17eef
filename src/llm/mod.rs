//! LLM integration for keyword extraction.
//!
//! Talks to any OpenAI-compatible chat completion API (OpenAI, Groq,
//! Together.ai) and turns the reply into an ordered keyword list.

mod client;

use async_trait::async_trait;

use crate::keyword::Keyword;

pub use client::{LlmClient, LlmConfig, LlmError, LlmProvider};

/// A backend that can pick salient keywords out of a text.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Extract keywords from `text`, authenticating with `api_key`.
    ///
    /// Implementations must fail with `LlmError::MissingCredential` before
    /// doing any network work when `api_key` is blank.
    async fn extract(&self, text: &str, api_key: &str) -> Result<Vec<Keyword>, LlmError>;
}
