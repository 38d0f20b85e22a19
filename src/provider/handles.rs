//! Provider error type and the three capability handle traits.
//!
//! A handle is what a factory's `create` resolves to.  Handles are
//! object-safe and `Send + Sync` so they can be shared as `Arc<dyn ...>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::LanguageCode;
use crate::provider::summary::SummaryResponse;

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Errors that can occur while probing, creating or calling a provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider reported that the capability cannot be used.
    #[error("capability unavailable")]
    Unavailable,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The response could not be parsed as expected.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The provider returned a response with no usable content.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Fetching the model failed before the handle became ready.
    #[error("model download failed: {0}")]
    Download(String),

    /// The provider task panicked or was cancelled.
    #[error("provider task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Language detection
// ---------------------------------------------------------------------------

/// One ranked detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCandidate {
    pub detected_language: LanguageCode,
    pub confidence: f32,
}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Candidates for `text`, most likely first.  May be empty.
    async fn detect(&self, text: &str) -> Result<Vec<LanguageCandidate>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Summarization
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text`.  The response shape is provider-defined; callers
    /// flatten it with [`SummaryResponse::into_text`].
    async fn summarize(&self, text: &str) -> Result<SummaryResponse, ProviderError>;
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Source → target pair a translator handle is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: LanguageCode,
    pub target: LanguageCode,
}

impl LanguagePair {
    pub fn new(source: impl Into<LanguageCode>, target: impl Into<LanguageCode>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from the handle's source to its target language.
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;
}
