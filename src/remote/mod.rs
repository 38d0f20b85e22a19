//! HTTP-backed capability providers.
//!
//! This module provides:
//! * [`ApiClient`]: Ollama / OpenAI-compatible client (probe, pull, chat).
//! * [`ChatPrompt`]: system + user prompts for detect, summarize, translate.
//! * [`RemoteDetectorFactory`], [`RemoteSummarizerFactory`],
//!   [`RemoteTranslatorFactory`]: [`ProviderFactory`](crate::provider::ProviderFactory)
//!   implementations sharing one client.
//! * [`build_providers`]: wires all three from [`ProviderConfig`].

pub mod client;
pub mod detector;
pub mod prompt;
pub mod summarizer;
pub mod translator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::ApiClient;
pub use detector::{RemoteDetector, RemoteDetectorFactory};
pub use prompt::ChatPrompt;
pub use summarizer::{RemoteSummarizer, RemoteSummarizerFactory};
pub use translator::{RemoteTranslator, RemoteTranslatorFactory};

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::provider::Providers;

/// Build the three factories over one shared [`ApiClient`].
///
/// Nothing is contacted here; each provider is probed on first use.
pub fn build_providers(config: &ProviderConfig) -> Providers {
    let client = Arc::new(ApiClient::from_config(config));
    log::info!(
        "provider: {:?} backend at {}",
        client.backend(),
        config.base_url
    );

    Providers {
        detector: Arc::new(RemoteDetectorFactory::new(
            Arc::clone(&client),
            config.detector.clone(),
        )),
        summarizer: Arc::new(RemoteSummarizerFactory::new(
            Arc::clone(&client),
            config.summarizer.clone(),
        )),
        translator: Arc::new(RemoteTranslatorFactory::new(
            client,
            config.translator.clone(),
        )),
    }
}
