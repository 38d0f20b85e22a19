//! Session controller: drives the send pipeline and standalone summarize.
//!
//! [`SessionController`] owns the [`SharedSession`] and one lifecycle slot
//! per capability provider.  The translation pipeline lives in
//! [`super::translate`].
//!
//! # Send pipeline
//!
//! ```text
//! send_message(text)
//!   └─▶ trim; empty → no-op
//!   └─▶ append message, clear input          [Created]   (visible at once)
//!   └─▶ wait for the send lane
//!         └─▶ detect (fallback on any failure) [Detecting → Detected]
//!         └─▶ gate: length ∧ language ∧ summarizer handle
//!               ├─ true  → summarize            [Summarizing → Summarized]
//!               │          ├─ Ok  → summary
//!               │          └─ Err → error = "Summarization failed."
//!               └─ false → skip
//!         └─▶ [Done]
//!   unexpected failure → error = "Error processing text."  [Error]
//! ```
//!
//! Provider verbs run on their own tokio task so a panicking provider turns
//! into [`PipelineError::Internal`] instead of taking the session down.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

use crate::config::{AppConfig, SummarizerOptions};
use crate::language::LanguageCode;
use crate::provider::{
    LanguageDetector, LanguagePair, ProgressSink, ProgressUpdate, ProviderError, ProviderSlot,
    Providers, Summarizer, Translator,
};
use crate::session::{
    is_summarizable, lock_session, new_shared_session, translate_disabled, KeyEvent, Message,
    MessageId, MessageStage, SessionError, SharedSession, SummarizeControl,
};

use super::events::{EventSender, SessionEvent};

/// Written into `error` when the send pipeline fails unexpectedly.
pub const PROCESSING_ERROR: &str = "Error processing text.";
/// Written into `error` when an attempted summarization fails.
pub const SUMMARY_FAILED: &str = "Summarization failed.";
/// Written into `translation` when a translation fails.
pub const TRANSLATION_FAILED: &str = "Translation failed.";

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface inside the pipelines.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A provider call failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The session rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Internal / unexpected error (e.g. a provider task panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Run a provider call on its own task.
pub(super) async fn isolate<T, F>(call: F) -> Result<T, PipelineError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ProviderError>> + Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(result) => result.map_err(PipelineError::from),
        Err(e) => Err(PipelineError::Internal(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// LoadingGuard
// ---------------------------------------------------------------------------

/// Holds one count of the session busy flag; releases it on drop, on every
/// exit path.
pub(super) struct LoadingGuard {
    session: SharedSession,
    events: EventSender,
}

impl LoadingGuard {
    pub(super) fn begin(session: &SharedSession, events: &EventSender) -> Self {
        lock_session(session).begin_loading();
        Self::adopt(session, events)
    }

    /// Take ownership of a count the caller already added under the lock.
    pub(super) fn adopt(session: &SharedSession, events: &EventSender) -> Self {
        events.emit(SessionEvent::LoadingChanged(true));
        Self {
            session: Arc::clone(session),
            events: events.clone(),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let still_loading = {
            let mut st = lock_session(&self.session);
            st.end_loading();
            st.is_loading()
        };
        self.events.emit(SessionEvent::LoadingChanged(still_loading));
    }
}

// ---------------------------------------------------------------------------
// SummarizeOutcome
// ---------------------------------------------------------------------------

/// Result of a standalone summarize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizeOutcome {
    /// A summary was written to the message.
    Summarized,
    /// The attempt failed; the message carries an error.
    Failed,
    /// No summarizer this session.
    Unavailable,
    /// The gate, an existing summary, the busy flag or the message stage
    /// ruled the request out.
    Refused,
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Owns one chat session and the providers it calls.
///
/// Methods take `&self`; share the controller behind an `Arc` to run
/// pipelines from several tasks.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use text_processor::config::AppConfig;
/// use text_processor::pipeline::{event_channel, SessionController};
/// use text_processor::remote::build_providers;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = AppConfig::default();
/// let providers = build_providers(&config.provider);
/// let (events, _rx) = event_channel();
/// let controller = Arc::new(SessionController::new(providers, &config, events));
///
/// controller.send_message("Bonjour le monde").await;
/// controller.translate_message(0).await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionController {
    pub(super) session: SharedSession,
    pub(super) detector: ProviderSlot<dyn LanguageDetector, ()>,
    pub(super) summarizer: ProviderSlot<dyn Summarizer, SummarizerOptions>,
    pub(super) translator: ProviderSlot<dyn Translator, LanguagePair>,
    summarizer_options: SummarizerOptions,
    pub(super) fallback: LanguageCode,
    send_lane: AsyncMutex<()>,
    pub(super) events: EventSender,
}

impl SessionController {
    /// Create a controller with a fresh session.
    ///
    /// Providers are neither probed nor created here; each slot does that on
    /// first use.
    pub fn new(providers: Providers, config: &AppConfig, events: EventSender) -> Self {
        let sink: ProgressSink = {
            let events = events.clone();
            Arc::new(move |update: ProgressUpdate| events.emit(SessionEvent::DownloadProgress(update)))
        };

        Self {
            session: new_shared_session(config.pipeline.clone()),
            detector: ProviderSlot::new(providers.detector).with_progress_sink(Arc::clone(&sink)),
            summarizer: ProviderSlot::new(providers.summarizer)
                .with_progress_sink(Arc::clone(&sink)),
            translator: ProviderSlot::new(providers.translator).with_progress_sink(sink),
            summarizer_options: config.summarizer.clone(),
            fallback: LanguageCode::new(&config.pipeline.fallback_language),
            send_lane: AsyncMutex::new(()),
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Handle to the session state, for views that render from it directly.
    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Snapshot of the message log in display order.
    pub fn messages(&self) -> Vec<Message> {
        lock_session(&self.session).messages().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        lock_session(&self.session).is_loading()
    }

    pub fn translate_disabled(&self) -> bool {
        translate_disabled(&lock_session(&self.session))
    }

    pub fn detected_lang(&self) -> Option<LanguageCode> {
        lock_session(&self.session).detected_lang().cloned()
    }

    pub fn target_lang(&self) -> LanguageCode {
        lock_session(&self.session).target_lang().clone()
    }

    /// Select the translation target used by later translations.
    pub fn set_target_lang(&self, code: impl Into<LanguageCode>) -> Result<(), SessionError> {
        let code = code.into();
        lock_session(&self.session).set_target_lang(code.clone())?;
        log::info!("pipeline: target language set to {code}");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Feed one key press to the input buffer.  `Enter` without Shift sends
    /// the buffer and returns the new message id.
    pub async fn handle_key(&self, event: KeyEvent) -> Option<MessageId> {
        let submitted = {
            let mut st = lock_session(&self.session);
            if st.input.handle_key(event) {
                Some(st.input.text().to_owned())
            } else {
                None
            }
        };
        match submitted {
            Some(text) => self.send_message(&text).await,
            None => None,
        }
    }

    /// Send whatever is in the input buffer.
    pub async fn submit_input(&self) -> Option<MessageId> {
        let text = lock_session(&self.session).input.text().to_owned();
        self.send_message(&text).await
    }

    // -----------------------------------------------------------------------
    // Send pipeline
    // -----------------------------------------------------------------------

    /// Append `text` as a new message and run detection and, when gated in,
    /// summarization for it.
    ///
    /// Returns `None` for empty or whitespace-only input.  Per-message
    /// failures are recorded on the message, never returned.
    pub async fn send_message(&self, text: &str) -> Option<MessageId> {
        let text = text.trim();
        if text.is_empty() {
            log::debug!("pipeline: ignoring empty submission");
            return None;
        }

        let id = lock_session(&self.session).append(text.to_owned());
        self.events.emit(SessionEvent::MessageAppended(id));
        log::debug!("pipeline: message {id} appended");

        let _lane = self.send_lane.lock().await;
        if let Err(e) = self.process(id, text).await {
            self.fail(id, &e);
        }
        Some(id)
    }

    async fn process(&self, id: MessageId, text: &str) -> Result<(), PipelineError> {
        self.update(id, |m| m.advance(MessageStage::Detecting))?;

        let language = self.detect_language(text).await;
        {
            let mut st = lock_session(&self.session);
            let message = st.message_mut(id)?;
            message.set_language(language.clone());
            message.advance(MessageStage::Detected);
            st.set_detected_lang(language.clone());
        }
        self.events.emit(SessionEvent::MessageUpdated(id));

        let gated_in = {
            let st = lock_session(&self.session);
            is_summarizable(text.chars().count(), Some(&language), st.config())
        };

        if gated_in {
            if let Some(summarizer) = self.summarizer_handle().await {
                let _busy = LoadingGuard::begin(&self.session, &self.events);
                self.run_summary(id, text, summarizer).await?;
            }
        } else {
            log::debug!("pipeline: message {id} not summarizable ({language})");
        }

        self.update(id, |m| m.advance(MessageStage::Done))?;
        Ok(())
    }

    /// Top-ranked detected language, or the fallback when the detector is
    /// unavailable, fails, or returns nothing.
    async fn detect_language(&self, text: &str) -> LanguageCode {
        match self.run_detection(text).await {
            Ok(Some(code)) => {
                log::debug!("pipeline: detected language {code}");
                code
            }
            Ok(None) => {
                log::info!(
                    "pipeline: no language detected, falling back to {}",
                    self.fallback
                );
                self.fallback.clone()
            }
            Err(e) => {
                log::warn!(
                    "pipeline: language detection failed ({e}), falling back to {}",
                    self.fallback
                );
                self.fallback.clone()
            }
        }
    }

    async fn run_detection(&self, text: &str) -> Result<Option<LanguageCode>, PipelineError> {
        let Some(detector) = self.detector.ensure_ready(&()).await? else {
            return Ok(None);
        };
        let text = text.to_owned();
        let candidates = isolate(async move { detector.detect(&text).await }).await?;
        Ok(candidates
            .into_iter()
            .next()
            .map(|c| c.detected_language)
            .filter(|code| !code.as_str().is_empty()))
    }

    // -----------------------------------------------------------------------
    // Summarization
    // -----------------------------------------------------------------------

    /// Summarize an already-processed message on request.
    ///
    /// Allowed only when the summarization gate holds, the message has no
    /// summary, the send pipeline has finished with it and nothing else is
    /// loading.
    pub async fn summarize_message(&self, index: usize) -> Result<SummarizeOutcome, PipelineError> {
        let id = MessageId::from_index(index);
        let text = {
            let mut st = lock_session(&self.session);
            let message = st.message_at(index)?;
            let allowed = message.stage() == MessageStage::Done
                && SummarizeControl::for_message(&st, message).enabled;
            if !allowed {
                log::debug!("pipeline: summarize {id} refused");
                return Ok(SummarizeOutcome::Refused);
            }
            let text = message.text().to_owned();
            st.begin_loading();
            text
        };
        let _busy = LoadingGuard::adopt(&self.session, &self.events);

        let Some(summarizer) = self.summarizer_handle().await else {
            return Ok(SummarizeOutcome::Unavailable);
        };

        match self.run_summary(id, &text, summarizer).await {
            Ok(summarized) => {
                self.update(id, |m| m.advance(MessageStage::Done))?;
                Ok(if summarized {
                    SummarizeOutcome::Summarized
                } else {
                    SummarizeOutcome::Failed
                })
            }
            Err(e) => {
                self.fail(id, &e);
                Ok(SummarizeOutcome::Failed)
            }
        }
    }

    async fn summarizer_handle(&self) -> Option<Arc<dyn Summarizer>> {
        match self.summarizer.ensure_ready(&self.summarizer_options).await {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("pipeline: summarizer not ready ({e}), skipping summary");
                None
            }
        }
    }

    /// Call the summarizer and record the outcome.  Returns `Ok(false)` when
    /// the provider reported an error; only unexpected failures are `Err`.
    async fn run_summary(
        &self,
        id: MessageId,
        text: &str,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<bool, PipelineError> {
        self.update(id, |m| m.advance(MessageStage::Summarizing))?;

        let text = text.to_owned();
        match isolate(async move { summarizer.summarize(&text).await }).await {
            Ok(response) => {
                let summary = response.into_text();
                log::debug!("pipeline: message {id} summarized");
                self.update(id, |m| {
                    m.set_summary(summary);
                    m.advance(MessageStage::Summarized);
                })?;
                Ok(true)
            }
            Err(PipelineError::Provider(e)) => {
                log::warn!("pipeline: summarization of message {id} failed: {e}");
                self.update(id, |m| {
                    m.set_error(SUMMARY_FAILED);
                    m.advance(MessageStage::Summarized);
                })?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    pub(super) fn update(
        &self,
        id: MessageId,
        apply: impl FnOnce(&mut Message),
    ) -> Result<(), SessionError> {
        apply(lock_session(&self.session).message_mut(id)?);
        self.events.emit(SessionEvent::MessageUpdated(id));
        Ok(())
    }

    fn fail(&self, id: MessageId, error: &PipelineError) {
        log::error!("pipeline: message {id} failed: {error}");
        let recorded = self.update(id, |m| {
            m.set_error(PROCESSING_ERROR);
            m.advance(MessageStage::Error);
        });
        if let Err(e) = recorded {
            log::error!("pipeline: could not record failure on message {id}: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
