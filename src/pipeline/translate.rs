//! Translation pipeline: user-triggered, per message.
//!
//! ```text
//! translate_message(index)
//!   └─▶ refuse if translate is disabled, the message is already translated,
//!       or something is loading                  (test-and-set under the lock)
//!   └─▶ translator for (message.language ?? fallback → target)
//!         ├─ unavailable → no-op
//!         ├─ Ok  → translation, mark translated
//!         └─ Err → translation = "Translation failed.", retry allowed
//! ```

use crate::provider::LanguagePair;
use crate::session::{lock_session, MessageId, TranslationRefusal};

use super::events::SessionEvent;
use super::runner::{isolate, LoadingGuard, PipelineError, SessionController, TRANSLATION_FAILED};

/// What a translate request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// The translation was written and the message is marked translated.
    Translated,
    /// The failure string was written; a later request may retry.
    Failed,
    /// No translator for this language pair this session.
    Unavailable,
    /// Turned away before any provider call.
    Refused(TranslationRefusal),
}

impl SessionController {
    /// Translate the message at `index` into the current target language.
    ///
    /// Provider failures are recorded on the message; only an unknown index
    /// is returned as an error.
    pub async fn translate_message(&self, index: usize) -> Result<TranslateOutcome, PipelineError> {
        let id = MessageId::from_index(index);
        let (text, pair) = {
            let mut st = lock_session(&self.session);
            let message = st.message_at(index)?;
            let text = message.text().to_owned();
            let source = message
                .language()
                .cloned()
                .unwrap_or_else(|| self.fallback.clone());
            let pair = LanguagePair {
                source,
                target: st.target_lang().clone(),
            };
            if let Err(refusal) = st.try_begin_translation(id) {
                log::debug!("pipeline: translate {id} refused: {refusal:?}");
                return Ok(TranslateOutcome::Refused(refusal));
            }
            (text, pair)
        };
        let _busy = LoadingGuard::adopt(&self.session, &self.events);

        let translator = match self.translator.ensure_ready(&pair).await {
            Ok(Some(translator)) => translator,
            Ok(None) => {
                log::info!(
                    "pipeline: no translator for {} -> {}, skipping",
                    pair.source,
                    pair.target
                );
                return Ok(TranslateOutcome::Unavailable);
            }
            Err(e) => {
                log::warn!("pipeline: translator not ready ({e})");
                self.update(id, |m| m.set_translation(TRANSLATION_FAILED.into()))?;
                return Ok(TranslateOutcome::Failed);
            }
        };

        match isolate(async move { translator.translate(&text).await }).await {
            Ok(translated) => {
                {
                    let mut st = lock_session(&self.session);
                    st.message_mut(id)?.set_translation(translated);
                    st.mark_translated(id);
                }
                self.events.emit(SessionEvent::MessageUpdated(id));
                log::debug!("pipeline: message {id} translated to {}", pair.target);
                Ok(TranslateOutcome::Translated)
            }
            Err(e) => {
                log::warn!("pipeline: translation of message {id} failed: {e}");
                self.update(id, |m| m.set_translation(TRANSLATION_FAILED.into()))?;
                Ok(TranslateOutcome::Failed)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
