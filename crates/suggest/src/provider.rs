//! AI provider trait and error type.

use async_trait::async_trait;

/// Errors from AI provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("AI provider is not configured: {0}")]
    NotConfigured(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    Parse(String),
    #[error("prompt blocked by provider: {0}")]
    Blocked(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else if e.is_decode() {
            ProviderError::Parse(e.to_string())
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}

/// A hosted model that turns a prompt into free text.
///
/// One call is one blocking request/response exchange; implementations keep no
/// conversation state between calls.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;
}
