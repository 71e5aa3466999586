//! Typed notifications for the presentation layer.

use super::types::{DocumentId, SummaryVariant};
use tokio::sync::mpsc;

/// Something the presentation layer may want to show.
///
/// Events carry display data only: no document text, no credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A file passed the upload gate.
    DocumentAccepted {
        /// Identifier of the accepted document.
        document_id: DocumentId,
        /// Display name.
        name: String,
    },
    /// A file was turned away.
    DocumentRejected {
        /// Display name of the rejected file.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Extraction request sent.
    ExtractionStarted {
        /// Display name of the document.
        name: String,
    },
    /// Extraction succeeded and text is published.
    ExtractionReady {
        /// Display name of the document.
        name: String,
        /// Number of characters extracted.
        chars: usize,
    },
    /// Extraction failed.
    ExtractionFailed {
        /// Display name of the document.
        name: String,
        /// User-facing message.
        message: String,
    },
    /// Summary request sent.
    SummaryStarted {
        /// Requested variant.
        variant: SummaryVariant,
    },
    /// Summary generated.
    SummaryReady {
        /// Generated variant.
        variant: SummaryVariant,
    },
    /// Summary request failed.
    SummaryFailed {
        /// Requested variant.
        variant: SummaryVariant,
        /// User-facing message.
        message: String,
    },
    /// Q&A request sent.
    QaStarted,
    /// Q&A generated.
    QaReady,
    /// Q&A request failed.
    QaFailed {
        /// User-facing message.
        message: String,
    },
}

/// Sending half of the event channel. Emitting never fails, even with no listener.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: mpsc::UnboundedSender<PipelineEvent>,
}

impl EventSink {
    /// Create a sink and the receiver the presentation layer drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Publish an event.
    pub fn emit(&self, event: PipelineEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Event receiver dropped; event discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitted_events_arrive_in_order() {
        let (sink, mut receiver) = EventSink::channel();
        sink.emit(PipelineEvent::QaStarted);
        sink.emit(PipelineEvent::QaReady);

        assert_eq!(receiver.recv().await, Some(PipelineEvent::QaStarted));
        assert_eq!(receiver.recv().await, Some(PipelineEvent::QaReady));
    }

    #[test]
    fn emitting_without_listener_is_harmless() {
        let (sink, receiver) = EventSink::channel();
        drop(receiver);
        sink.emit(PipelineEvent::QaStarted);
    }
}
