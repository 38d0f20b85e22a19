//! Capability provider contracts.
//!
//! This module provides:
//! * [`Capability`] / [`ProviderKind`]: probe results and provider identifiers.
//! * [`LanguageDetector`], [`Summarizer`], [`Translator`]: async handle traits.
//! * [`ProviderFactory`]: the probe-then-create contract.
//! * [`ProviderSlot`]: lazily created, session-scoped handle with
//!   single-flight creation and a per-creation download-progress stream.
//! * [`SummaryResponse`]: summarizer result shapes and their normalisation.
//! * [`ProviderError`]: error variants for provider operations.
//!
//! Concrete HTTP-backed factories live in [`crate::remote`].

pub mod capability;
pub mod handles;
pub mod lifecycle;
pub mod summary;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use capability::{
    progress_channel, Capability, DownloadProgress, ProgressReporter, ProgressSink,
    ProgressUpdate, ProviderKind,
};
pub use handles::{
    LanguageCandidate, LanguageDetector, LanguagePair, ProviderError, Summarizer, Translator,
};
pub use lifecycle::{ProviderFactory, ProviderSlot, SlotStatus};
pub use summary::{SummaryChunk, SummaryResponse, NO_SUMMARY};

use std::sync::Arc;

use crate::config::SummarizerOptions;

/// Factory for language detector handles (no creation options).
pub type DetectorFactory = dyn ProviderFactory<Handle = dyn LanguageDetector, Config = ()>;
/// Factory for summarizer handles, configured by [`SummarizerOptions`].
pub type SummarizerFactory =
    dyn ProviderFactory<Handle = dyn Summarizer, Config = SummarizerOptions>;
/// Factory for translator handles, one per [`LanguagePair`].
pub type TranslatorFactory = dyn ProviderFactory<Handle = dyn Translator, Config = LanguagePair>;

/// The three factories a session needs.
#[derive(Clone)]
pub struct Providers {
    pub detector: Arc<DetectorFactory>,
    pub summarizer: Arc<SummarizerFactory>,
    pub translator: Arc<TranslatorFactory>,
}
