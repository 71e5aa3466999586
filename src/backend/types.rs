//! Wire types and errors for the backend HTTP contract.

use crate::pipeline::SummaryVariant;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while talking to the backend service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend responded with a non-success status code.
    #[error("Unexpected backend response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Error detail, or the raw body when no detail was provided.
        body: String,
    },
    /// Backend answered successfully but the body could not be decoded.
    #[error("Malformed backend response: {0}")]
    InvalidResponse(String),
}

/// Response body of `POST /extract-text`.
#[derive(Debug, Deserialize)]
pub(crate) struct ExtractTextResponse {
    pub text: String,
}

/// Request body of `POST /summarize`.
#[derive(Debug, Serialize)]
pub(crate) struct SummarizeBody<'a> {
    pub text: &'a str,
    pub summary_type: SummaryVariant,
}

/// Response body of `POST /summarize`.
#[derive(Debug, Deserialize)]
pub(crate) struct SummarizeResponse {
    pub summary: String,
}

/// Request body of `POST /generate-qa`. Borrowed so the secret is never copied.
#[derive(Serialize)]
pub(crate) struct GenerateQaBody<'a> {
    pub text: &'a str,
    pub api_key: &'a str,
}

/// Response body of `POST /generate-qa`.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateQaResponse {
    pub qa_pairs: String,
}

/// FastAPI-style error envelope (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: serde_json::Value,
}

/// Prefer the `detail` field of an error body, falling back to the raw text.
pub(crate) fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorEnvelope { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
