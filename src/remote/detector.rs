//! Remote language detector.
//!
//! The model is asked for a JSON array of candidates; the adapter parses it
//! and ranks by confidence so callers can take the first entry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CapabilityConfig;
use crate::provider::{
    Capability, LanguageCandidate, LanguageDetector, ProgressReporter, ProviderError,
    ProviderFactory, ProviderKind,
};
use crate::remote::client::ApiClient;
use crate::remote::prompt::ChatPrompt;

/// Strip a Markdown code fence some models wrap JSON in.
pub(crate) fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop an info string such as `json`.
    match inner.find('\n') {
        Some(pos) if !inner[..pos].trim_start().starts_with(['[', '{']) => inner[pos + 1..].trim(),
        _ => inner.trim(),
    }
}

/// Parse and rank a detector reply.  A single object is accepted as a
/// one-element list.
pub(crate) fn parse_candidates(content: &str) -> Result<Vec<LanguageCandidate>, ProviderError> {
    let json = strip_fences(content);
    let mut candidates: Vec<LanguageCandidate> = match serde_json::from_str(json) {
        Ok(list) => list,
        Err(list_err) => match serde_json::from_str::<LanguageCandidate>(json) {
            Ok(single) => vec![single],
            Err(_) => return Err(ProviderError::Parse(list_err.to_string())),
        },
    };
    candidates.retain(|c| !c.detected_language.as_str().is_empty());
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

pub struct RemoteDetector {
    client: Arc<ApiClient>,
    model: String,
}

#[async_trait]
impl LanguageDetector for RemoteDetector {
    async fn detect(&self, text: &str) -> Result<Vec<LanguageCandidate>, ProviderError> {
        let content = self.client.chat(&self.model, &ChatPrompt::detect(text)).await?;
        parse_candidates(&content)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

pub struct RemoteDetectorFactory {
    client: Arc<ApiClient>,
    capability: CapabilityConfig,
}

impl RemoteDetectorFactory {
    pub fn new(client: Arc<ApiClient>, capability: CapabilityConfig) -> Self {
        Self { client, capability }
    }
}

#[async_trait]
impl ProviderFactory for RemoteDetectorFactory {
    type Handle = dyn LanguageDetector;
    type Config = ();

    fn kind(&self) -> ProviderKind {
        ProviderKind::LanguageDetector
    }

    async fn probe(&self, _config: &()) -> Result<Capability, ProviderError> {
        self.client.probe_model(&self.capability).await
    }

    async fn create(
        &self,
        _config: &(),
        capability: Capability,
        progress: ProgressReporter,
    ) -> Result<Arc<dyn LanguageDetector>, ProviderError> {
        self.client
            .prepare(&self.capability.model, capability, &progress)
            .await?;
        Ok(Arc::new(RemoteDetector {
            client: Arc::clone(&self.client),
            model: self.capability.model.clone(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
