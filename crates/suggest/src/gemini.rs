//! Google Gemini `generateContent` provider.

use crate::config::SuggestConfig;
use crate::provider::{LlmProvider, ProviderError};
use async_trait::async_trait;
use serde_json::Value;

/// Header carrying the API key, kept out of request URLs so it never lands in
/// access logs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body kept in `ProviderError::Status`.
const MAX_ERROR_BODY: usize = 512;

pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Builds a provider from startup config.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotConfigured` when no API key is set, and
    /// `ProviderError::Http` if the HTTP client cannot be built.
    pub fn from_config(cfg: &SuggestConfig) -> Result<Self, ProviderError> {
        let api_key = cfg
            .api_key()
            .ok_or_else(|| ProviderError::NotConfigured("GOOGLE_API_KEY is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: cfg.model().to_string(),
            base_url: cfg.base_url().to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Pulls the reply text out of a `generateContent` response body.
    ///
    /// Text parts of the first candidate are concatenated. A prompt rejected by
    /// safety filters reports `promptFeedback.blockReason` instead of
    /// candidates and maps to `ProviderError::Blocked`.
    pub fn parse_response(json: &Value) -> Result<String, ProviderError> {
        if let Some(reason) = json
            .pointer("/promptFeedback/blockReason")
            .and_then(|v| v.as_str())
        {
            return Err(ProviderError::Blocked(reason.to_string()));
        }

        let parts = json
            .pointer("/candidates/0/content/parts")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                ProviderError::Parse("missing candidates[0].content.parts".to_string())
            })?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            let finish = json
                .pointer("/candidates/0/finishReason")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            return Err(ProviderError::Parse(format!(
                "candidate has no text (finishReason: {finish})"
            )));
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await?;
        Self::parse_response(&json)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
