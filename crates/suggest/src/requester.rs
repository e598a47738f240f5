//! One patient in, one parsed suggestion out.

use crate::config::SuggestConfig;
use crate::extract::{LabelExtractor, SuggestionExtractor, SuggestionResult};
use crate::gemini::GeminiProvider;
use crate::prompt::build_prompt;
use crate::provider::{LlmProvider, ProviderError};
use dxassist_core::PatientRecord;
use std::sync::Arc;
use std::time::Instant;

/// Builds the prompt, calls the provider once and extracts the reply.
///
/// Holds no per-request state, so one instance can serve concurrent requests
/// for different patients.
#[derive(Clone)]
pub struct SuggestionRequester {
    provider: Arc<dyn LlmProvider>,
    extractor: Arc<dyn SuggestionExtractor>,
}

impl SuggestionRequester {
    /// Uses the default [`LabelExtractor`].
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_extractor(provider, Arc::new(LabelExtractor::default()))
    }

    pub fn with_extractor(
        provider: Arc<dyn LlmProvider>,
        extractor: Arc<dyn SuggestionExtractor>,
    ) -> Self {
        Self {
            provider,
            extractor,
        }
    }

    /// Gemini-backed requester from startup config.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotConfigured` when the config has no API key.
    pub fn gemini(cfg: &SuggestConfig) -> Result<Self, ProviderError> {
        let provider = GeminiProvider::from_config(cfg)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Requests a diagnosis and medication suggestion for `record`.
    ///
    /// Missing sections in the reply become the extractor's sentinel; only a
    /// failed provider call is an error.
    ///
    /// # Errors
    ///
    /// Returns the provider's `ProviderError` unchanged (network, status,
    /// timeout, malformed or blocked response).
    pub async fn request_suggestion(
        &self,
        record: &PatientRecord,
    ) -> Result<SuggestionResult, ProviderError> {
        let prompt = build_prompt(record);
        let started = Instant::now();

        let reply = match self.provider.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    "{} suggestion for patient {} failed after {:?}: {}",
                    self.provider.name(),
                    record.id,
                    started.elapsed(),
                    e
                );
                return Err(e);
            }
        };

        tracing::info!(
            "{} suggestion for patient {} took {:?} ({} chars)",
            self.provider.name(),
            record.id,
            started.elapsed(),
            reply.len()
        );

        Ok(self.extractor.extract(&reply))
    }
}
