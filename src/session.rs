//! One user's run of the pipeline.
//!
//! [`Session`] wires the upload gate into the extraction coordinator and hands the published
//! text to the summary and Q&A coordinators. Every operation takes `&self`, so a summary and a
//! Q&A request can be awaited concurrently (for example with `tokio::join!`).

use crate::backend::BackendApi;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::pipeline::{
    ArtifactSink, Candidate, Credential, EventSink, ExportError, ExtractedText,
    ExtractionCoordinator, ExtractionError, ExtractionState, GenerationError, InputSource,
    PipelineError, PipelineEvent, QaCoordinator, QaResult, QaState, SummaryCoordinator,
    SummaryResult, SummaryState, SummaryVariant, UploadGate,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Coordinators for a single active document plus the session's event channel.
pub struct Session {
    gate: UploadGate,
    extraction: ExtractionCoordinator,
    summary: SummaryCoordinator,
    qa: QaCoordinator,
    events: EventSink,
    metrics: SessionMetrics,
}

impl Session {
    /// Build a session over `backend`, returning the receiver for its events.
    pub fn new(backend: Arc<dyn BackendApi>) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (events, receiver) = EventSink::channel();
        let extraction = ExtractionCoordinator::new(backend.clone()).with_events(events.clone());
        let summary = SummaryCoordinator::new(backend.clone(), extraction.subscribe())
            .with_events(events.clone());
        let qa = QaCoordinator::new(backend, extraction.subscribe()).with_events(events.clone());

        let session = Self {
            gate: UploadGate::new(),
            extraction,
            summary,
            qa,
            events,
            metrics: SessionMetrics::new(),
        };
        (session, receiver)
    }

    /// Validate `candidate` and, when accepted, extract its text.
    ///
    /// A rejected candidate leaves every coordinator untouched. An accepted one replaces the
    /// active document and clears retained summary and Q&A results.
    pub async fn submit(
        &self,
        candidate: Candidate,
        source: InputSource,
    ) -> Result<ExtractedText, PipelineError> {
        let name = candidate.name.clone();
        let document = match self.gate.submit(candidate, source) {
            Ok(document) => document,
            Err(error) => {
                self.metrics.record_upload(false);
                self.events.emit(PipelineEvent::DocumentRejected {
                    name,
                    reason: error.to_string(),
                });
                return Err(error.into());
            }
        };

        self.metrics.record_upload(true);
        self.events.emit(PipelineEvent::DocumentAccepted {
            document_id: document.id().clone(),
            name,
        });
        self.summary.clear().await;
        self.qa.clear().await;

        match self.extraction.extract(document).await {
            Ok(text) => {
                self.metrics.record_extraction(true);
                Ok(text)
            }
            Err(error @ ExtractionError::Superseded { .. }) => Err(error.into()),
            Err(error) => {
                self.metrics.record_extraction(false);
                Err(error.into())
            }
        }
    }

    /// Generate a summary of the active document's text.
    pub async fn summarize(&self, variant: SummaryVariant) -> Result<SummaryResult, PipelineError> {
        match self.summary.generate(variant).await {
            Ok(result) => {
                self.metrics.record_summary();
                Ok(result)
            }
            Err(error) => {
                if matches!(error, GenerationError::Transport(_)) {
                    self.metrics.record_generation_failure();
                }
                Err(error.into())
            }
        }
    }

    /// Generate Q&A pairs, consuming `credential` for this one request.
    pub async fn generate_qa(&self, credential: Credential) -> Result<QaResult, PipelineError> {
        match self.qa.generate(credential).await {
            Ok(result) => {
                self.metrics.record_qa();
                Ok(result)
            }
            Err(error) => {
                if matches!(error, GenerationError::Transport(_)) {
                    self.metrics.record_generation_failure();
                }
                Err(error.into())
            }
        }
    }

    /// Save the retained summary through `sink`.
    pub async fn export_summary(&self, sink: &dyn ArtifactSink) -> Result<PathBuf, PipelineError> {
        let result = self
            .summary
            .result()
            .await
            .ok_or(ExportError::NothingToExport("summary"))?;
        Ok(sink.save(&result.to_artifact()).await?)
    }

    /// Save the generated Q&A pairs through `sink`.
    pub async fn export_qa(&self, sink: &dyn ArtifactSink) -> Result<PathBuf, PipelineError> {
        let result = self
            .qa
            .result()
            .await
            .ok_or(ExportError::NothingToExport("Q&A"))?;
        Ok(sink.save(&result.to_artifact()).await?)
    }

    /// Save the extracted text through `sink`.
    pub async fn export_extracted_text(
        &self,
        sink: &dyn ArtifactSink,
    ) -> Result<PathBuf, PipelineError> {
        let text = self
            .extraction
            .extracted_text()
            .ok_or(ExportError::NothingToExport("extracted text"))?;
        Ok(sink.save(&text.to_artifact()).await?)
    }

    /// Currently published text.
    pub fn extracted_text(&self) -> Option<ExtractedText> {
        self.extraction.extracted_text()
    }

    /// Extraction state snapshot.
    pub async fn extraction_state(&self) -> ExtractionState {
        self.extraction.state().await
    }

    /// Summary state snapshot.
    pub async fn summary_state(&self) -> SummaryState {
        self.summary.state().await
    }

    /// Q&A state snapshot.
    pub async fn qa_state(&self) -> QaState {
        self.qa.state().await
    }

    /// Whether a summary request would be accepted right now.
    pub async fn can_summarize(&self) -> bool {
        self.summary.can_generate().await
    }

    /// Whether a Q&A request would be accepted right now, credential aside.
    pub async fn can_generate_qa(&self) -> bool {
        self.qa.can_generate().await
    }

    /// Session counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
