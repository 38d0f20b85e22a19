//! Capability probe results and the per-creation download-progress stream.
//!
//! A provider is probed before first use.  When the probe reports
//! [`Capability::Downloadable`], creation may take a long time; the factory
//! reports how far along it is through a [`ProgressReporter`].  Each
//! creation gets its own channel, which closes when the factory drops the
//! reporter.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Result of probing a capability provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A handle can be created immediately.
    Available,
    /// A handle can be created once the model has been downloaded.
    Downloadable,
    /// The capability cannot be used in this session.
    Unavailable,
}

impl Capability {
    /// `true` unless the capability is [`Capability::Unavailable`].
    pub fn is_usable(&self) -> bool {
        !matches!(self, Capability::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

/// The three capability providers, keyed by their fixed identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    LanguageDetector,
    Summarizer,
    Translator,
}

impl ProviderKind {
    /// Fixed identifier of the provider.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::LanguageDetector => "languageDetector",
            ProviderKind::Summarizer => "summarizer",
            ProviderKind::Translator => "translator",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Download progress
// ---------------------------------------------------------------------------

/// Bytes downloaded so far for a model that is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl DownloadProgress {
    /// Completed fraction in `0.0..=1.0`; `0.0` when the total is unknown.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.loaded as f64 / self.total as f64).min(1.0) as f32
        }
    }
}

/// A progress event tagged with the provider it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub kind: ProviderKind,
    pub progress: DownloadProgress,
}

/// Observer that receives every progress event a lifecycle slot consumes.
pub type ProgressSink = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Sending half of a per-creation progress stream.
///
/// Reports are best-effort: if the consumer has gone away they are dropped.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<DownloadProgress>,
}

impl ProgressReporter {
    pub fn report(&self, loaded: u64, total: u64) {
        let _ = self.tx.send(DownloadProgress { loaded, total });
    }
}

/// Open a fresh progress stream for one `create` call.
pub fn progress_channel() -> (ProgressReporter, mpsc::UnboundedReceiver<DownloadProgress>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressReporter { tx }, rx)
}
