//! File acceptance.
//!
//! The gate is the only place a [`Document`] can be created, so everything downstream can
//! assume a non-empty payload declared as a PDF.

use super::types::Document;
use std::path::Path;
use thiserror::Error;

/// Media type accepted by the gate.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Media type declared for files whose extension is not recognized.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Reasons a candidate file is turned away.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// Declared media type is not PDF.
    #[error("Please upload a PDF file (got '{declared}')")]
    InvalidType {
        /// Media type the candidate declared.
        declared: String,
    },
    /// PDF-typed candidate carried no bytes.
    #[error("The selected file is empty")]
    EmptyFile,
    /// Reading the candidate from disk failed.
    #[error("Failed to read '{path}': {message}")]
    Unreadable {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

/// How the user picked the file. Both paths share the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Dropped onto the upload area.
    DragAndDrop,
    /// Chosen through the file browser.
    Browse,
}

/// A user-selected file that has not been validated yet.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Display name.
    pub name: String,
    /// Media type declared by the host (browser, file picker, or extension mapping).
    pub media_type: String,
    /// Raw payload.
    pub bytes: Vec<u8>,
}

impl Candidate {
    /// Build a candidate from parts.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a candidate from disk, declaring its media type from the file extension.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|error| UploadError::Unreadable {
                path: path.display().to_string(),
                message: error.to_string(),
            })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }
}

/// Map a path's extension to the media type a file picker would declare.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// Validates candidates and turns accepted ones into [`Document`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct UploadGate;

impl UploadGate {
    /// Create a gate.
    pub const fn new() -> Self {
        Self
    }

    /// Accept a PDF candidate or reject it without side effects.
    pub fn submit(&self, candidate: Candidate, source: InputSource) -> Result<Document, UploadError> {
        if !is_pdf(&candidate.media_type) {
            tracing::warn!(
                name = %candidate.name,
                declared = %candidate.media_type,
                ?source,
                "Rejected non-PDF upload"
            );
            return Err(UploadError::InvalidType {
                declared: candidate.media_type,
            });
        }
        if candidate.bytes.is_empty() {
            tracing::warn!(name = %candidate.name, ?source, "Rejected empty upload");
            return Err(UploadError::EmptyFile);
        }

        let document = Document::new(candidate.name, PDF_MEDIA_TYPE.to_string(), candidate.bytes);
        tracing::info!(
            document = %document.id(),
            name = document.name(),
            bytes = document.bytes().len(),
            ?source,
            "Accepted upload"
        );
        Ok(document)
    }
}

fn is_pdf(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE))
}
