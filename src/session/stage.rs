//! Per-message processing stage.
//!
//! The send pipeline moves each message through:
//!
//! ```text
//! Created ──▶ Detecting ──▶ Detected ──gate true──▶ Summarizing ──▶ Summarized ──▶ Done
//!                                    ──gate false─────────────────────────────────▶ Done
//! Detecting / Summarizing ──unexpected failure──▶ Error
//! ```
//!
//! `Error` is terminal for the send pipeline; translation may still run.
//! A standalone summarize request re-enters `Summarizing` from `Done`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageStage {
    /// Appended and visible; no provider call issued yet.
    Created,
    /// Waiting on the language detector.
    Detecting,
    /// Language resolved (possibly to the fallback).
    Detected,
    /// Waiting on the summarizer.
    Summarizing,
    /// Summarizer answered (or failed non-fatally).
    Summarized,
    /// Send pipeline settled.
    Done,
    /// Send pipeline aborted by an unexpected failure.
    Error,
}

impl MessageStage {
    /// Returns `true` while a provider call for this message is outstanding.
    ///
    /// ```
    /// use text_processor::session::MessageStage;
    ///
    /// assert!(!MessageStage::Created.is_busy());
    /// assert!(MessageStage::Detecting.is_busy());
    /// assert!(MessageStage::Summarizing.is_busy());
    /// assert!(!MessageStage::Done.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, MessageStage::Detecting | MessageStage::Summarizing)
    }

    /// Returns `true` once the send pipeline has settled for this message.
    pub fn is_settled(&self) -> bool {
        matches!(self, MessageStage::Done | MessageStage::Error)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: MessageStage) -> bool {
        use MessageStage::*;
        matches!(
            (self, next),
            (Created, Detecting)
                | (Detecting, Detected)
                | (Detecting, Error)
                | (Detected, Summarizing)
                | (Detected, Done)
                | (Summarizing, Summarized)
                | (Summarizing, Error)
                | (Summarized, Done)
                | (Done, Summarizing)
        )
    }

    /// A short human-readable label for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            MessageStage::Created => "Queued",
            MessageStage::Detecting => "Detecting language",
            MessageStage::Detected => "Language detected",
            MessageStage::Summarizing => "Summarizing",
            MessageStage::Summarized => "Summarized",
            MessageStage::Done => "Done",
            MessageStage::Error => "Error",
        }
    }
}

impl Default for MessageStage {
    fn default() -> Self {
        MessageStage::Created
    }
}
