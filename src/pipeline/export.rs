//! Download artifacts.
//!
//! Turning a result into an artifact is pure; writing it somewhere is the job of an
//! [`ArtifactSink`].

use super::types::{ExtractedText, QaResult, SummaryResult, SummaryVariant};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// MIME type of every artifact.
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// What an artifact was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A summary in the given variant.
    Summary(SummaryVariant),
    /// Generated question/answer pairs.
    QaPairs,
    /// The raw extracted text.
    ExtractedText,
}

impl ArtifactKind {
    /// File name derived from the kind.
    pub fn file_name(self) -> String {
        match self {
            Self::Summary(variant) => format!("{variant}_summary.txt"),
            Self::QaPairs => "qa_pairs.txt".to_string(),
            Self::ExtractedText => "extracted_text.txt".to_string(),
        }
    }
}

/// A named plain-text blob ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// Always [`TEXT_MIME_TYPE`].
    pub mime_type: &'static str,
    /// UTF-8 content, byte-for-byte the generated text.
    pub content: Vec<u8>,
}

/// Build the artifact for `content` generated as `kind`.
pub fn to_artifact(kind: ArtifactKind, content: &str) -> DownloadArtifact {
    DownloadArtifact {
        file_name: kind.file_name(),
        mime_type: TEXT_MIME_TYPE,
        content: content.as_bytes().to_vec(),
    }
}

impl SummaryResult {
    /// Artifact named after this summary's variant.
    pub fn to_artifact(&self) -> DownloadArtifact {
        to_artifact(ArtifactKind::Summary(self.variant), &self.text)
    }
}

impl QaResult {
    /// `qa_pairs.txt` artifact.
    pub fn to_artifact(&self) -> DownloadArtifact {
        to_artifact(ArtifactKind::QaPairs, &self.text)
    }
}

impl ExtractedText {
    /// `extracted_text.txt` artifact.
    pub fn to_artifact(&self) -> DownloadArtifact {
        to_artifact(ArtifactKind::ExtractedText, self.as_str())
    }
}

/// Errors raised while saving an artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been generated that could be exported.
    #[error("Nothing to export: {0} has not been generated")]
    NothingToExport(&'static str),
    /// Writing the artifact failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Host-side save primitive.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persist `artifact`, returning where it ended up.
    async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf, ExportError>;
}

/// Saves artifacts as files inside a directory, overwriting same-named files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`, created on first save when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.dir.clone(),
                source,
            })?;
        let path = self.dir.join(&artifact.file_name);
        tokio::fs::write(&path, &artifact.content)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), bytes = artifact.content.len(), "Artifact saved");
        Ok(path)
    }
}
