//! Extraction lifecycle.
//!
//! `Idle -> Extracting -> Ready | Failed`. A newer document supersedes an in-flight one: the
//! older request keeps running, but its result is discarded when it arrives.

use super::events::{EventSink, PipelineEvent};
use super::types::{Document, DocumentId, ExtractedText};
use crate::backend::{BackendApi, BackendError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, watch};

/// Receiving side of the extracted-text publication.
pub type TextWatch = watch::Receiver<Option<ExtractedText>>;

/// Failures of a single extraction attempt.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Network or server failure.
    #[error("Failed to extract text from PDF: {0}")]
    Transport(#[from] BackendError),
    /// The service answered but found no text.
    #[error("No text could be extracted; the PDF may be empty or scanned (image-based)")]
    EmptyText,
    /// A newer document was submitted before this one finished.
    #[error("Extraction of '{name}' was superseded by a newer document")]
    Superseded {
        /// Display name of the stale document.
        name: String,
    },
}

/// Observable state of the extraction coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionState {
    /// No document submitted yet.
    Idle,
    /// Waiting on the service.
    Extracting {
        /// Document being extracted.
        document_id: DocumentId,
        /// Its display name.
        name: String,
    },
    /// Text is available and published.
    Ready(ExtractedText),
    /// The latest attempt failed.
    Failed {
        /// Document whose extraction failed.
        document_id: DocumentId,
        /// Its display name.
        name: String,
        /// User-facing failure message.
        message: String,
    },
}

struct Inner {
    state: ExtractionState,
    // Incremented per submission; only the latest ticket may write results.
    latest_ticket: u64,
}

/// Owns the extraction state machine and publishes [`ExtractedText`].
pub struct ExtractionCoordinator {
    backend: Arc<dyn BackendApi>,
    inner: Mutex<Inner>,
    published: watch::Sender<Option<ExtractedText>>,
    events: Option<EventSink>,
}

impl ExtractionCoordinator {
    /// Create an idle coordinator.
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            backend,
            inner: Mutex::new(Inner {
                state: ExtractionState::Idle,
                latest_ticket: 0,
            }),
            published,
            events: None,
        }
    }

    /// Report lifecycle transitions on `events`.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    /// Subscribe to extracted-text publications.
    pub fn subscribe(&self) -> TextWatch {
        self.published.subscribe()
    }

    /// Current state snapshot.
    pub async fn state(&self) -> ExtractionState {
        self.inner.lock().await.state.clone()
    }

    /// Currently published text, if any.
    pub fn extracted_text(&self) -> Option<ExtractedText> {
        self.published.borrow().clone()
    }

    /// Send `document` to the extraction service and publish the result.
    ///
    /// Entering `Extracting` withdraws any previously published text.
    pub async fn extract(&self, document: Document) -> Result<ExtractedText, ExtractionError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.latest_ticket += 1;
            if let ExtractionState::Extracting { name, .. } = &inner.state {
                tracing::info!(superseded = %name, "Superseding in-flight extraction");
            }
            inner.state = ExtractionState::Extracting {
                document_id: document.id().clone(),
                name: document.name().to_string(),
            };
            self.published.send_replace(None);
            inner.latest_ticket
        };

        tracing::info!(document = %document.id(), name = document.name(), "Extraction started");
        self.emit(PipelineEvent::ExtractionStarted {
            name: document.name().to_string(),
        });
        let outcome = self.backend.extract_text(&document).await;

        let mut inner = self.inner.lock().await;
        if inner.latest_ticket != ticket {
            tracing::debug!(document = %document.id(), "Discarding stale extraction result");
            return Err(ExtractionError::Superseded {
                name: document.name().to_string(),
            });
        }

        let result = outcome
            .map_err(ExtractionError::from)
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(ExtractionError::EmptyText)
                } else {
                    Ok(ExtractedText {
                        document_id: document.id().clone(),
                        document_name: document.name().to_string(),
                        text: Arc::from(text),
                    })
                }
            });

        match &result {
            Ok(extracted) => {
                tracing::info!(
                    document = %document.id(),
                    chars = extracted.char_count(),
                    "Extraction ready"
                );
                inner.state = ExtractionState::Ready(extracted.clone());
                self.published.send_replace(Some(extracted.clone()));
                self.emit(PipelineEvent::ExtractionReady {
                    name: extracted.document_name.clone(),
                    chars: extracted.char_count(),
                });
            }
            Err(error) => {
                tracing::error!(document = %document.id(), error = %error, "Extraction failed");
                inner.state = ExtractionState::Failed {
                    document_id: document.id().clone(),
                    name: document.name().to_string(),
                    message: error.to_string(),
                };
                self.emit(PipelineEvent::ExtractionFailed {
                    name: document.name().to_string(),
                    message: error.to_string(),
                });
            }
        }
        result
    }
}
