//! Shared data model for the document pipeline.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Content-derived identifier of a [`Document`] (lowercase hex SHA-256 of the payload).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Hash a payload into its identifier.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Full hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First twelve hex characters, enough to tell documents apart in logs.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// A PDF accepted by the upload gate. Immutable once created.
#[derive(Clone)]
pub struct Document {
    id: DocumentId,
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl Document {
    pub(crate) fn new(name: String, media_type: String, bytes: Vec<u8>) -> Self {
        Self {
            id: DocumentId::from_bytes(&bytes),
            name,
            media_type,
            bytes: bytes.into(),
        }
    }

    /// Identifier derived from the payload.
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Display name, typically the original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Raw payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Text published by a successful extraction, tied to exactly one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Source document.
    pub document_id: DocumentId,
    /// Display name of the source document.
    pub document_name: String,
    /// Extracted text; never empty.
    pub text: Arc<str>,
}

impl ExtractedText {
    /// Borrow the text body.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Return at most `max_chars` characters, with a trailing `...` when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.text[..cut]),
            None => self.text.to_string(),
        }
    }
}

/// Selectable summary mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum SummaryVariant {
    /// Short bullet-point summary.
    Concise,
    /// Structured summary with headings and explanations.
    Detailed,
}

impl SummaryVariant {
    /// Wire and file-name tag for the variant.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SummaryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated summary together with the variant it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    /// Variant that produced this summary.
    pub variant: SummaryVariant,
    /// Generated summary text.
    pub text: String,
    /// Document whose text was summarized.
    pub document_id: DocumentId,
}

/// Generated question/answer text. Carries no trace of the credential that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaResult {
    /// Generated question/answer pairs.
    pub text: String,
    /// Document whose text was used.
    pub document_id: DocumentId,
}

/// User-supplied secret authorizing Q&A generation.
///
/// Deliberately not `Clone` and not serializable: it moves into exactly one request and is
/// dropped when that request resolves.
pub struct Credential(String);

impl Credential {
    /// Wrap a secret entered by the user.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Whether the secret is empty once surrounding whitespace is ignored.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Borrow the secret for the outgoing request body.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
