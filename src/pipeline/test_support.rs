//! Stub backend shared by the coordinator tests.

use super::types::{Credential, Document, SummaryVariant};
use super::upload::{Candidate, InputSource, PDF_MEDIA_TYPE, UploadGate};
use crate::backend::{BackendApi, BackendError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashSet;
use tokio::sync::{Mutex, Notify};

/// Canned reply; `Err` becomes a 500 from the backend.
pub(crate) type StubReply = Result<String, String>;

pub(crate) fn pdf(name: &str, bytes: &[u8]) -> Document {
    UploadGate::new()
        .submit(
            Candidate::new(name, PDF_MEDIA_TYPE, bytes.to_vec()),
            InputSource::Browse,
        )
        .expect("stub pdf accepted")
}

#[derive(Default)]
pub(crate) struct StubBackend {
    extract_reply: Mutex<Option<StubReply>>,
    summarize_reply: Mutex<Option<StubReply>>,
    qa_reply: Mutex<Option<StubReply>>,
    extract_calls: Mutex<Vec<String>>,
    summarize_calls: Mutex<Vec<(SummaryVariant, String)>>,
    qa_calls: Mutex<Vec<(String, String)>>,
    held: Mutex<HashSet<String>>,
    gate: Notify,
}

impl StubBackend {
    pub(crate) async fn set_extract(&self, reply: StubReply) {
        *self.extract_reply.lock().await = Some(reply);
    }

    pub(crate) async fn set_summarize(&self, reply: StubReply) {
        *self.summarize_reply.lock().await = Some(reply);
    }

    pub(crate) async fn set_qa(&self, reply: StubReply) {
        *self.qa_reply.lock().await = Some(reply);
    }

    /// Hold the next call matching `key` until [`StubBackend::release`].
    ///
    /// Keys are document names for extraction, `summarize` and `qa` otherwise.
    pub(crate) async fn hold_extract(&self, key: &str) {
        self.held.lock().await.insert(key.to_string());
    }

    pub(crate) async fn hold_summarize(&self) {
        self.held.lock().await.insert("summarize".into());
    }

    pub(crate) async fn hold_qa(&self) {
        self.held.lock().await.insert("qa".into());
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }

    pub(crate) async fn extract_calls(&self) -> Vec<String> {
        self.extract_calls.lock().await.clone()
    }

    pub(crate) async fn summarize_calls(&self) -> Vec<(SummaryVariant, String)> {
        self.summarize_calls.lock().await.clone()
    }

    pub(crate) async fn qa_calls(&self) -> Vec<(String, String)> {
        self.qa_calls.lock().await.clone()
    }

    async fn wait_if_held(&self, key: &str) {
        let held = self.held.lock().await.remove(key);
        if held {
            self.gate.notified().await;
        }
    }

    async fn reply(slot: &Mutex<Option<StubReply>>, fallback: String) -> Result<String, BackendError> {
        match slot.lock().await.clone() {
            Some(Ok(text)) => Ok(text),
            Some(Err(body)) => Err(BackendError::UnexpectedStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body,
            }),
            None => Ok(fallback),
        }
    }
}

#[async_trait]
impl BackendApi for StubBackend {
    async fn extract_text(&self, document: &Document) -> Result<String, BackendError> {
        self.extract_calls
            .lock()
            .await
            .push(document.name().to_string());
        self.wait_if_held(document.name()).await;
        Self::reply(&self.extract_reply, "extracted text".into()).await
    }

    async fn summarize(
        &self,
        text: &str,
        variant: SummaryVariant,
    ) -> Result<String, BackendError> {
        self.summarize_calls
            .lock()
            .await
            .push((variant, text.to_string()));
        self.wait_if_held("summarize").await;
        Self::reply(&self.summarize_reply, format!("{variant} summary")).await
    }

    async fn generate_qa(
        &self,
        text: &str,
        credential: Credential,
    ) -> Result<String, BackendError> {
        self.qa_calls
            .lock()
            .await
            .push((text.to_string(), credential.expose().to_string()));
        self.wait_if_held("qa").await;
        Self::reply(&self.qa_reply, "Q1: What?\nA1: That.".into()).await
    }
}
