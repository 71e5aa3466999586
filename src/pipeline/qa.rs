//! Question/answer generation.
//!
//! The credential is a by-value argument to [`QaCoordinator::generate`]. It moves into the
//! single backend call and is dropped when that call resolves; the coordinator only keeps the
//! outcome.

use super::GenerationError;
use super::events::{EventSink, PipelineEvent};
use super::extraction::TextWatch;
use super::types::{Credential, DocumentId, QaResult};
use crate::backend::BackendApi;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Observable state of the Q&A coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QaState {
    /// Nothing generated yet, or the last result was cleared.
    Idle,
    /// A request is in flight.
    Pending,
    /// Generation succeeded.
    Done(QaResult),
    /// The last request failed.
    Failed {
        /// User-facing failure message.
        message: String,
    },
}

/// Drives `/generate-qa` requests against the currently published text.
pub struct QaCoordinator {
    backend: Arc<dyn BackendApi>,
    text: TextWatch,
    events: Option<EventSink>,
    state: Mutex<QaState>,
}

impl QaCoordinator {
    /// Create an idle coordinator reading text from `text`.
    pub fn new(backend: Arc<dyn BackendApi>, text: TextWatch) -> Self {
        Self {
            backend,
            text,
            events: None,
            state: Mutex::new(QaState::Idle),
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
    pub async fn state(&self) -> QaState {
        self.state.lock().await.clone()
    }

    /// The generated Q&A text, if the last generation succeeded.
    pub async fn result(&self) -> Option<QaResult> {
        match &*self.state.lock().await {
            QaState::Done(result) => Some(result.clone()),
            _ => None,
        }
    }

    /// Whether Q&A pairs have been generated.
    pub async fn is_generated(&self) -> bool {
        matches!(*self.state.lock().await, QaState::Done(_))
    }

    /// Whether `generate` would be accepted right now, credential aside.
    pub async fn can_generate(&self) -> bool {
        let pending = matches!(*self.state.lock().await, QaState::Pending);
        !pending && self.text.borrow().is_some()
    }

    /// Drop a retained result or failure. A pending request is left to resolve.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        if *state != QaState::Pending {
            *state = QaState::Idle;
        }
    }

    /// Request Q&A pairs, authorizing the call with `credential`.
    ///
    /// A blank credential is rejected before anything else is checked, and never reaches the
    /// network.
    pub async fn generate(&self, credential: Credential) -> Result<QaResult, GenerationError> {
        if credential.is_blank() {
            tracing::warn!("Q&A generation requested without a credential");
            return Err(GenerationError::MissingCredential);
        }

        let source = {
            let mut state = self.state.lock().await;
            let published = self.text.borrow().clone();
            let Some(source) = published else {
                return Err(GenerationError::NoExtractedText);
            };
            if *state == QaState::Pending {
                tracing::warn!("Q&A generation already pending");
                return Err(GenerationError::Busy);
            }
            *state = QaState::Pending;
            source
        };

        tracing::info!(document = %source.document_id, "Q&A generation started");
        self.emit(PipelineEvent::QaStarted);
        let outcome = self.backend.generate_qa(source.as_str(), credential).await;

        let mut state = self.state.lock().await;
        if !self.is_current(&source.document_id) {
            tracing::debug!(document = %source.document_id, "Discarding Q&A for replaced document");
            *state = QaState::Idle;
            return Err(GenerationError::Superseded);
        }
        match outcome {
            Ok(text) => {
                let result = QaResult {
                    text,
                    document_id: source.document_id,
                };
                tracing::info!(chars = result.text.len(), "Q&A ready");
                *state = QaState::Done(result.clone());
                self.emit(PipelineEvent::QaReady);
                Ok(result)
            }
            Err(error) => {
                tracing::error!(error = %error, "Q&A generation failed");
                *state = QaState::Failed {
                    message: error.to_string(),
                };
                self.emit(PipelineEvent::QaFailed {
                    message: error.to_string(),
                });
                Err(error.into())
            }
        }
    }
}
