//! Derived predicates the presentation layer renders from.
//!
//! Everything here is a pure function of [`SessionState`], so the values
//! are recomputed on every read and can never go stale after a language or
//! busy-flag change.

use crate::config::PipelineConfig;
use crate::language::LanguageCode;
use crate::session::message::{Message, MessageId};
use crate::session::state::SessionState;

/// `true` when the session-wide detected language equals the target.
///
/// The comparison uses the language of the most recently processed
/// message, not the message a control belongs to.
pub fn translate_disabled(state: &SessionState) -> bool {
    state.detected_lang() == Some(state.target_lang())
}

/// Summarization gate: long enough and in the summarizable language.
///
/// Provider availability is the third clause; the controller checks it when
/// it asks the lifecycle slot for a handle.
pub fn is_summarizable(
    char_len: usize,
    language: Option<&LanguageCode>,
    config: &PipelineConfig,
) -> bool {
    char_len >= config.summary_min_chars
        && language.is_some_and(|code| *code == LanguageCode::new(&config.summarizable_language))
}

// ---------------------------------------------------------------------------
// Per-message controls
// ---------------------------------------------------------------------------

/// State of one message's translate button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl TranslateControl {
    pub fn for_message(state: &SessionState, id: MessageId) -> Self {
        let translated = state.is_translated(id);
        let label = if state.is_loading() {
            "Translating..."
        } else if translated {
            "Translated"
        } else {
            "Translate"
        };
        Self {
            enabled: !translate_disabled(state) && !state.is_loading() && !translated,
            label,
        }
    }
}

/// State of one message's standalone summarize button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeControl {
    pub visible: bool,
    pub enabled: bool,
    pub label: &'static str,
}

impl SummarizeControl {
    pub fn for_message(state: &SessionState, message: &Message) -> Self {
        let visible = message.summary().is_none()
            && is_summarizable(message.char_len(), message.language(), state.config());
        Self {
            visible,
            enabled: visible && !state.is_loading(),
            label: if state.is_loading() {
                "Summarizing..."
            } else {
                "Summarize"
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
