//! Summary generation.
//!
//! One variant is generated at a time and at most one result is retained: starting a new
//! generation discards whatever the previous one produced.

use super::GenerationError;
use super::events::{EventSink, PipelineEvent};
use super::extraction::TextWatch;
use super::types::{DocumentId, SummaryResult, SummaryVariant};
use crate::backend::BackendApi;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Observable state of the summary coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    /// Nothing generated yet, or the last result was cleared.
    Idle,
    /// A request for this variant is in flight.
    Pending(SummaryVariant),
    /// The retained result.
    Done(SummaryResult),
    /// The last request failed.
    Failed {
        /// Variant that was requested.
        variant: SummaryVariant,
        /// User-facing failure message.
        message: String,
    },
}

/// Drives `/summarize` requests against the currently published text.
pub struct SummaryCoordinator {
    backend: Arc<dyn BackendApi>,
    text: TextWatch,
    events: Option<EventSink>,
    state: Mutex<SummaryState>,
}

impl SummaryCoordinator {
    /// Create an idle coordinator reading text from `text`.
    pub fn new(backend: Arc<dyn BackendApi>, text: TextWatch) -> Self {
        Self {
            backend,
            text,
            events: None,
            state: Mutex::new(SummaryState::Idle),
        }
    }

    /// Report lifecycle transitions on `events`. Refused requests are only reported to the
    /// caller.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    fn is_current(&self, document_id: &DocumentId) -> bool {
        self.text
            .borrow()
            .as_ref()
            .is_some_and(|text| &text.document_id == document_id)
    }

    /// Current state snapshot.
    pub async fn state(&self) -> SummaryState {
        self.state.lock().await.clone()
    }

    /// The retained summary, if the last generation succeeded.
    pub async fn result(&self) -> Option<SummaryResult> {
        match &*self.state.lock().await {
            SummaryState::Done(result) => Some(result.clone()),
            _ => None,
        }
    }

    /// Whether `generate` would be accepted right now.
    pub async fn can_generate(&self) -> bool {
        let pending = matches!(*self.state.lock().await, SummaryState::Pending(_));
        !pending && self.text.borrow().is_some()
    }

    /// Drop a retained result or failure. A pending request is left to resolve.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        if !matches!(*state, SummaryState::Pending(_)) {
            *state = SummaryState::Idle;
        }
    }

    /// Request a summary in `variant`.
    ///
    /// Rejected without side effects when no text is published or a request is in flight.
    pub async fn generate(&self, variant: SummaryVariant) -> Result<SummaryResult, GenerationError> {
        let source = {
            let mut state = self.state.lock().await;
            let published = self.text.borrow().clone();
            let Some(source) = published else {
                return Err(GenerationError::NoExtractedText);
            };
            if let SummaryState::Pending(active) = *state {
                tracing::warn!(requested = %variant, %active, "Summary already pending");
                return Err(GenerationError::Busy);
            }
            *state = SummaryState::Pending(variant);
            source
        };

        tracing::info!(document = %source.document_id, %variant, "Summary generation started");
        self.emit(PipelineEvent::SummaryStarted { variant });
        let outcome = self.backend.summarize(source.as_str(), variant).await;

        let mut state = self.state.lock().await;
        if !self.is_current(&source.document_id) {
            tracing::debug!(
                %variant,
                document = %source.document_id,
                "Discarding summary for replaced document"
            );
            *state = SummaryState::Idle;
            return Err(GenerationError::Superseded);
        }
        match outcome {
            Ok(text) => {
                let result = SummaryResult {
                    variant,
                    text,
                    document_id: source.document_id,
                };
                tracing::info!(%variant, chars = result.text.len(), "Summary ready");
                *state = SummaryState::Done(result.clone());
                self.emit(PipelineEvent::SummaryReady { variant });
                Ok(result)
            }
            Err(error) => {
                tracing::error!(%variant, error = %error, "Summary generation failed");
                *state = SummaryState::Failed {
                    variant,
                    message: error.to_string(),
                };
                self.emit(PipelineEvent::SummaryFailed {
                    variant,
                    message: error.to_string(),
                });
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::ExtractionCoordinator;
    use crate::pipeline::test_support::{StubBackend, pdf};

    async fn ready_pipeline(backend: Arc<StubBackend>) -> (ExtractionCoordinator, Arc<SummaryCoordinator>) {
        let extraction = ExtractionCoordinator::new(backend.clone());
        let summary = Arc::new(SummaryCoordinator::new(backend.clone(), extraction.subscribe()));
        extraction
            .extract(pdf("report.pdf", b"%PDF-report"))
            .await
            .expect("extraction ready");
        (extraction, summary)
    }

    #[tokio::test]
    async fn generate_without_text_is_rejected_without_state_change() {
        let backend = Arc::new(StubBackend::default());
        let extraction = ExtractionCoordinator::new(backend.clone());
        let summary = SummaryCoordinator::new(backend.clone(), extraction.subscribe());

        assert!(!summary.can_generate().await);
        let error = summary
            .generate(SummaryVariant::Concise)
            .await
            .expect_err("no text");

        assert!(matches!(error, GenerationError::NoExtractedText));
        assert_eq!(summary.state().await, SummaryState::Idle);
        assert!(backend.summarize_calls().await.is_empty());
    }

    #[tokio::test]
    async fn new_variant_replaces_previous_result() {
        let backend = Arc::new(StubBackend::default());
        backend.set_extract(Ok("The report discusses...".into())).await;
        let (_extraction, summary) = ready_pipeline(backend.clone()).await;

        let concise = summary
            .generate(SummaryVariant::Concise)
            .await
            .expect("concise");
        assert_eq!(concise.text, "concise summary");

        let detailed = summary
            .generate(SummaryVariant::Detailed)
            .await
            .expect("detailed");

        assert_eq!(summary.result().await, Some(detailed.clone()));
        assert_eq!(detailed.variant, SummaryVariant::Detailed);
        assert_eq!(detailed.text, "detailed summary");
        assert_eq!(
            backend.summarize_calls().await,
            vec![
                (SummaryVariant::Concise, "The report discusses...".to_string()),
                (SummaryVariant::Detailed, "The report discusses...".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn second_request_while_pending_is_busy() {
        let backend = Arc::new(StubBackend::default());
        let (_extraction, summary) = ready_pipeline(backend.clone()).await;
        backend.hold_summarize().await;

        let first = tokio::spawn({
            let summary = summary.clone();
            async move { summary.generate(SummaryVariant::Detailed).await }
        });
        while summary.state().await != SummaryState::Pending(SummaryVariant::Detailed) {
            tokio::task::yield_now().await;
        }
        assert!(!summary.can_generate().await);

        let error = summary
            .generate(SummaryVariant::Concise)
            .await
            .expect_err("busy");
        assert!(matches!(error, GenerationError::Busy));

        backend.release();
        let result = first.await.expect("join").expect("detailed");
        assert_eq!(result.variant, SummaryVariant::Detailed);
        assert_eq!(backend.summarize_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn failure_is_recorded_and_not_retried() {
        let backend = Arc::new(StubBackend::default());
        let (_extraction, summary) = ready_pipeline(backend.clone()).await;
        backend.set_summarize(Err("model unavailable".into())).await;

        let error = summary
            .generate(SummaryVariant::Concise)
            .await
            .expect_err("fails");

        assert!(matches!(error, GenerationError::Transport(_)));
        assert!(matches!(
            summary.state().await,
            SummaryState::Failed { variant: SummaryVariant::Concise, ref message } if message.contains("model unavailable")
        ));
        assert_eq!(summary.result().await, None);
        assert_eq!(backend.summarize_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_drops_retained_result() {
        let backend = Arc::new(StubBackend::default());
        let (_extraction, summary) = ready_pipeline(backend.clone()).await;
        summary
            .generate(SummaryVariant::Concise)
            .await
            .expect("concise");

        summary.clear().await;
        assert_eq!(summary.state().await, SummaryState::Idle);
        assert!(summary.can_generate().await);
    }
}
