//! Pipeline controller for one chat session.
//!
//! This module wires the send pipeline (language detection, then gated
//! summarization) and the translation pipeline, and publishes the events a
//! view redraws from.
//!
//! # Architecture
//!
//! ```text
//! view ── send_message / handle_key ──▶ SessionController
//!      ── translate_message(index)  ──▶   ├─ ProviderSlot<detector>
//!      ── summarize_message(index)  ──▶   ├─ ProviderSlot<summarizer>
//!      ── set_target_lang(code)     ──▶   └─ ProviderSlot<translator>
//!                                              │
//! SharedSession (Arc<Mutex<SessionState>>) ◀───┘ read by the view
//! SessionEvent (unbounded mpsc) ──▶ view redraw
//! ```

pub mod events;
pub mod runner;
pub mod translate;

#[cfg(test)]
mod testing;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use events::{event_channel, EventSender, SessionEvent};
pub use runner::{
    PipelineError, SessionController, SummarizeOutcome, PROCESSING_ERROR, SUMMARY_FAILED,
    TRANSLATION_FAILED,
};
pub use translate::TranslateOutcome;
