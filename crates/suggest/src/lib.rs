//! # dxassist Suggest
//!
//! Turns one patient record into an AI diagnosis/medication suggestion:
//! - [`prompt`]: deterministic prompt from the record's fields
//! - [`provider`]: the `LlmProvider` seam and its error type
//! - [`gemini`]: Google Gemini `generateContent` client
//! - [`extract`]: label-based reply parsing behind `SuggestionExtractor`
//! - [`requester`]: glue that runs the three in order

pub mod config;
pub mod extract;
pub mod gemini;
pub mod prompt;
pub mod provider;
pub mod requester;

pub use config::{ConfigError, SuggestConfig};
pub use extract::{LabelExtractor, SuggestionExtractor, SuggestionResult, NOT_SPECIFIED};
pub use gemini::GeminiProvider;
pub use prompt::build_prompt;
pub use provider::{LlmProvider, ProviderError};
pub use requester::SuggestionRequester;
