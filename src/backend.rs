//! Client for the document backend (`/extract-text`, `/summarize`, `/generate-qa`).
//!
//! Coordinators talk to the backend through the [`BackendApi`] trait so tests can swap in
//! stubs; [`HttpBackend`] is the reqwest-based production implementation.

mod client;
mod types;

pub use client::HttpBackend;
pub use types::BackendError;

use crate::pipeline::{Credential, Document, SummaryVariant};
use async_trait::async_trait;

/// Operations the pipeline needs from the backend service.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Upload a PDF and return the text the service extracted from it.
    async fn extract_text(&self, document: &Document) -> Result<String, BackendError>;

    /// Generate a summary of `text` in the requested variant.
    async fn summarize(&self, text: &str, variant: SummaryVariant)
    -> Result<String, BackendError>;

    /// Generate question/answer pairs for `text`.
    ///
    /// The credential is consumed: it lives exactly as long as this call.
    async fn generate_qa(&self, text: &str, credential: Credential)
    -> Result<String, BackendError>;
}
