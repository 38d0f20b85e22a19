//! Session data model and the predicates rendered from it.
//!
//! * [`Message`] / [`MessageId`]: one submitted text and what the pipelines
//!   learned about it.
//! * [`MessageStage`]: per-message send-pipeline state machine.
//! * [`SessionState`] / [`SharedSession`]: the session context owned by the
//!   controller and read by the view.
//! * [`predicates`]: `translate_disabled`, the summarization gate and
//!   per-message control state.
//! * [`InputBuffer`]: the submit-on-Enter contract.

pub mod input;
pub mod message;
pub mod predicates;
pub mod stage;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use input::{InputBuffer, Key, KeyEvent};
pub use message::{Message, MessageId, Sender};
pub use predicates::{is_summarizable, translate_disabled, SummarizeControl, TranslateControl};
pub use stage::MessageStage;
pub use state::{
    lock_session, new_shared_session, SessionError, SessionState, SharedSession,
    TranslationRefusal,
};
