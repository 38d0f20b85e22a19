//! Notifications published by the controller for the presentation layer.

use tokio::sync::mpsc;

use crate::provider::ProgressUpdate;
use crate::session::MessageId;

/// Something the view should redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new message was appended (unprocessed).
    MessageAppended(MessageId),
    /// A field or the stage of an existing message changed.
    MessageUpdated(MessageId),
    /// `is_loading` changed; carries the new value.
    LoadingChanged(bool),
    /// A provider model download advanced.
    DownloadProgress(ProgressUpdate),
}

/// Sending half of the event stream.  Events are dropped once the receiver
/// is gone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sender that publishes nowhere.
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                log::trace!("pipeline: event receiver dropped");
            }
        }
    }
}

/// Open an event stream for one controller.
pub fn event_channel() -> (EventSender, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (events, mut rx) = event_channel();
        events.emit(SessionEvent::MessageAppended(MessageId::from_index(0)));
        events.emit(SessionEvent::LoadingChanged(true));

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::MessageAppended(MessageId::from_index(0)))
        );
        assert_eq!(rx.recv().await, Some(SessionEvent::LoadingChanged(true)));
    }

    #[test]
    fn emit_after_receiver_dropped_is_silent() {
        let (events, rx) = event_channel();
        drop(rx);
        events.emit(SessionEvent::LoadingChanged(false));
        EventSender::detached().emit(SessionEvent::LoadingChanged(false));
    }
}
