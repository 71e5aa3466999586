//! Orchestration core: upload gate, extraction, the two generation flows, and export.
//!
//! Each stage owns an explicit state enum. Summary and Q&A generation are gated on the text
//! published by [`ExtractionCoordinator`]; they never see each other.

/// Typed events for the presentation layer.
pub mod events;
/// Download artifacts and sinks.
pub mod export;
/// Extraction state machine.
pub mod extraction;
/// Q&A state machine.
pub mod qa;
/// Summary state machine.
pub mod summary;
/// Shared data model.
pub mod types;
/// File acceptance.
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use events::{EventSink, PipelineEvent};
pub use export::{ArtifactKind, ArtifactSink, DirectorySink, DownloadArtifact, ExportError, to_artifact};
pub use extraction::{ExtractionCoordinator, ExtractionError, ExtractionState};
pub use qa::{QaCoordinator, QaState};
pub use summary::{SummaryCoordinator, SummaryState};
pub use types::{
    Credential, Document, DocumentId, ExtractedText, QaResult, SummaryResult, SummaryVariant,
};
pub use upload::{Candidate, InputSource, UploadError, UploadGate};

use crate::backend::BackendError;
use thiserror::Error;

/// Reasons a summary or Q&A request is refused or fails.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No extracted text is published yet.
    #[error("No extracted text available; upload a PDF first")]
    NoExtractedText,
    /// A request of the same kind is already in flight.
    #[error("A generation of this kind is already in progress")]
    Busy,
    /// Q&A was requested without a credential.
    #[error("Please enter your API key to generate Q&A")]
    MissingCredential,
    /// The document changed while the request was in flight; the result was discarded.
    #[error("The document changed before generation finished; result discarded")]
    Superseded,
    /// Network or server failure.
    #[error("Generation request failed: {0}")]
    Transport(#[from] BackendError),
}

/// Any failure surfaced by a [`crate::session::Session`] operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upload rejected.
    #[error(transparent)]
    Upload(#[from] UploadError),
    /// Extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Summary or Q&A generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
