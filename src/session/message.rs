//! Message records, the unit the pipelines operate on.
//!
//! `text`, `sender` and `timestamp` are fixed when the message is created.
//! `language`, `summary`, `translation` and `error` start empty and are
//! filled in independently by the pipelines; an `error` never blanks a field
//! that was already written.

use std::fmt;

use serde::Serialize;

use crate::language::LanguageCode;
use crate::session::stage::MessageStage;

// ---------------------------------------------------------------------------
// MessageId
// ---------------------------------------------------------------------------

/// Stable identifier of a message within one session.
///
/// Ids are insertion ordinals.  The message log is append-only, so an id
/// is also the message's display index and never changes meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(usize);

impl MessageId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Who authored a message.  Only user messages exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One submitted text and everything the pipelines learned about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    id: MessageId,
    text: String,
    sender: Sender,
    language: Option<LanguageCode>,
    summary: Option<String>,
    translation: Option<String>,
    error: Option<String>,
    timestamp: String,
    stage: MessageStage,
}

impl Message {
    /// Create an unprocessed user message stamped with the local time
    /// (`HH:MM`).  `text` must already be trimmed and non-empty.
    pub(crate) fn new(id: MessageId, text: String) -> Self {
        let timestamp = chrono::Local::now().format("%H:%M").to_string();
        Self::with_timestamp(id, text, timestamp)
    }

    pub(crate) fn with_timestamp(id: MessageId, text: String, timestamp: String) -> Self {
        Self {
            id,
            text,
            sender: Sender::User,
            language: None,
            summary: None,
            translation: None,
            error: None,
            timestamp,
            stage: MessageStage::Created,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn language(&self) -> Option<&LanguageCode> {
        self.language.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn stage(&self) -> MessageStage {
        self.stage
    }

    /// Length used by the summarization gate, in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Move to `next`.  Illegal transitions are logged and ignored.
    pub(crate) fn advance(&mut self, next: MessageStage) {
        if self.stage.can_advance_to(next) {
            log::debug!("message {}: {:?} -> {:?}", self.id, self.stage, next);
            self.stage = next;
        } else {
            log::warn!(
                "message {}: ignoring illegal transition {:?} -> {:?}",
                self.id,
                self.stage,
                next
            );
        }
    }

    pub(crate) fn set_language(&mut self, language: LanguageCode) {
        self.language = Some(language);
    }

    pub(crate) fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
    }

    pub(crate) fn set_translation(&mut self, translation: String) {
        self.translation = Some(translation);
    }

    pub(crate) fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_is_unprocessed() {
        let msg = Message::new(MessageId::from_index(0), "hello".into());
        assert_eq!(msg.sender(), Sender::User);
        assert!(msg.language().is_none());
        assert!(msg.summary().is_none());
        assert!(msg.translation().is_none());
        assert!(msg.error().is_none());
        assert_eq!(msg.timestamp().len(), 5, "HH:MM, got {}", msg.timestamp());
    }

    #[test]
    fn error_keeps_earlier_fields() {
        let mut msg = Message::with_timestamp(MessageId::from_index(3), "hi".into(), "10:00".into());
        msg.set_language(LanguageCode::new("fr"));
        msg.set_error("Error processing text.");
        assert_eq!(msg.language(), Some(&LanguageCode::new("fr")));
        assert_eq!(msg.error(), Some("Error processing text."));
        assert_eq!(msg.text(), "hi");
        assert_eq!(msg.timestamp(), "10:00");
    }

    #[test]
    fn advance_ignores_illegal_transitions() {
        let mut msg = Message::with_timestamp(MessageId::from_index(0), "x".into(), "".into());
        msg.advance(MessageStage::Done);
        assert_eq!(msg.stage(), MessageStage::Created);
        msg.advance(MessageStage::Detecting);
        msg.advance(MessageStage::Detected);
        assert_eq!(msg.stage(), MessageStage::Detected);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        let msg = Message::with_timestamp(MessageId::from_index(0), "héllo".into(), "".into());
        assert_eq!(msg.char_len(), 5);
    }

    #[test]
    fn serialises_for_the_view() {
        let mut msg = Message::with_timestamp(MessageId::from_index(1), "hola".into(), "09:30".into());
        msg.set_language(LanguageCode::new("es"));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["sender"], "user");
        assert_eq!(json["language"], "es");
        assert!(json["summary"].is_null());
    }
}
