//! Session state shared between the controller and the presentation layer.
//!
//! [`SessionState`] is the single source of truth for one chat view: the
//! message log, the session-wide detected and target languages, the busy
//! counter behind `is_loading`, and the set of already-translated messages.
//!
//! [`SharedSession`] is `Arc<Mutex<SessionState>>`.  Lock it for a short
//! critical section with [`lock_session`]; never hold the guard across
//! `.await`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::language::LanguageCode;
use crate::session::input::InputBuffer;
use crate::session::message::{Message, MessageId};

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No message has this index.
    #[error("no message at index {0}")]
    UnknownMessage(usize),

    /// The code is not in the supported-language table.
    #[error("unsupported language code {0:?}")]
    UnsupportedLanguage(String),
}

// ---------------------------------------------------------------------------
// TranslationRefusal
// ---------------------------------------------------------------------------

/// Why a translate request was turned away without calling the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationRefusal {
    /// Detected language equals the target language.
    TranslateDisabled,
    /// Another summarization or translation is in flight.
    Busy,
    /// The message already carries a successful translation.
    AlreadyTranslated,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

pub struct SessionState {
    messages: Vec<Message>,
    detected_lang: Option<LanguageCode>,
    target_lang: LanguageCode,
    loading: usize,
    translated: HashSet<MessageId>,
    /// Text the user is composing.
    pub input: InputBuffer,
    config: PipelineConfig,
}

impl SessionState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            messages: Vec::new(),
            detected_lang: None,
            target_lang: LanguageCode::new(&config.default_target_language),
            loading: 0,
            translated: HashSet::new(),
            input: InputBuffer::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(id.index())
    }

    pub fn message_at(&self, index: usize) -> Result<&Message, SessionError> {
        self.messages
            .get(index)
            .ok_or(SessionError::UnknownMessage(index))
    }

    pub(crate) fn message_mut(&mut self, id: MessageId) -> Result<&mut Message, SessionError> {
        self.messages
            .get_mut(id.index())
            .ok_or(SessionError::UnknownMessage(id.index()))
    }

    /// Append a new unprocessed message and clear the input buffer.
    ///
    /// `text` must already be trimmed and non-empty.
    pub(crate) fn append(&mut self, text: String) -> MessageId {
        let id = MessageId::from_index(self.messages.len());
        self.messages.push(Message::new(id, text));
        self.input.clear();
        id
    }

    // -----------------------------------------------------------------------
    // Languages
    // -----------------------------------------------------------------------

    /// Language of the most recently processed message.
    pub fn detected_lang(&self) -> Option<&LanguageCode> {
        self.detected_lang.as_ref()
    }

    pub(crate) fn set_detected_lang(&mut self, code: LanguageCode) {
        self.detected_lang = Some(code);
    }

    pub fn target_lang(&self) -> &LanguageCode {
        &self.target_lang
    }

    /// Select the translation target.  Only supported codes are accepted.
    pub fn set_target_lang(&mut self, code: LanguageCode) -> Result<(), SessionError> {
        if !code.is_supported() {
            return Err(SessionError::UnsupportedLanguage(code.to_string()));
        }
        self.target_lang = code;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Busy flag
    // -----------------------------------------------------------------------

    /// `true` while any summarization or translation is running.
    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading += 1;
    }

    pub(crate) fn end_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Translation flags
    // -----------------------------------------------------------------------

    pub fn is_translated(&self, id: MessageId) -> bool {
        self.translated.contains(&id)
    }

    pub(crate) fn mark_translated(&mut self, id: MessageId) {
        self.translated.insert(id);
    }

    /// Check the translate guards and, when they pass, take the busy flag.
    ///
    /// The check and the flag update happen under one lock, so two callers
    /// cannot both start a translation.
    pub(crate) fn try_begin_translation(
        &mut self,
        id: MessageId,
    ) -> Result<(), TranslationRefusal> {
        if crate::session::predicates::translate_disabled(self) {
            return Err(TranslationRefusal::TranslateDisabled);
        }
        if self.is_translated(id) {
            return Err(TranslationRefusal::AlreadyTranslated);
        }
        if self.is_loading() {
            return Err(TranslationRefusal::Busy);
        }
        self.begin_loading();
        Ok(())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
pub type SharedSession = Arc<Mutex<SessionState>>;

pub fn new_shared_session(config: PipelineConfig) -> SharedSession {
    Arc::new(Mutex::new(SessionState::new(config)))
}

/// Lock the session, recovering the state if a previous holder panicked.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, SessionState> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
