//! reqwest implementation of [`BackendApi`].

use super::BackendApi;
use super::types::{
    BackendError, ExtractTextResponse, GenerateQaBody, GenerateQaResponse, SummarizeBody,
    SummarizeResponse, error_detail,
};
use crate::config::get_config;
use crate::pipeline::{Credential, Document, SummaryVariant};
use async_trait::async_trait;
use reqwest::{Client, multipart};
use serde::de::DeserializeOwned;

/// HTTP client for the backend service.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for the backend rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder().user_agent("rusty-brief/0.1").build()?;
        let base_url = normalize_base_url(base_url).map_err(BackendError::InvalidUrl)?;
        tracing::debug!(url = %base_url, "Initialized backend HTTP client");
        Ok(Self { client, base_url })
    }

    /// Build a client using the configured `BRIEF_API_URL`.
    pub fn from_config() -> Result<Self, BackendError> {
        Self::new(&get_config().api_url)
    }

    /// Normalized base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format_endpoint(&self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = BackendError::UnexpectedStatus {
                status,
                body: error_detail(&body),
            };
            tracing::error!(path, %status, "Backend request failed");
            return Err(error);
        }

        response.json::<T>().await.map_err(|error| {
            BackendError::InvalidResponse(format!("failed to decode {path} response: {error}"))
        })
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn extract_text(&self, document: &Document) -> Result<String, BackendError> {
        let part = multipart::Part::bytes(document.bytes().to_vec())
            .file_name(document.name().to_string())
            .mime_str(document.media_type())?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(
            document = %document.id(),
            bytes = document.bytes().len(),
            "Uploading document for extraction"
        );
        let response = self
            .client
            .post(self.endpoint("extract-text"))
            .multipart(form)
            .send()
            .await?;
        let body: ExtractTextResponse = self.decode("/extract-text", response).await?;
        Ok(body.text)
    }

    async fn summarize(
        &self,
        text: &str,
        variant: SummaryVariant,
    ) -> Result<String, BackendError> {
        tracing::debug!(%variant, text_len = text.len(), "Requesting summary");
        let response = self
            .client
            .post(self.endpoint("summarize"))
            .json(&SummarizeBody {
                text,
                summary_type: variant,
            })
            .send()
            .await?;
        let body: SummarizeResponse = self.decode("/summarize", response).await?;
        Ok(body.summary)
    }

    async fn generate_qa(
        &self,
        text: &str,
        credential: Credential,
    ) -> Result<String, BackendError> {
        tracing::debug!(text_len = text.len(), "Requesting Q&A generation");
        let response = self
            .client
            .post(self.endpoint("generate-qa"))
            .json(&GenerateQaBody {
                text,
                api_key: credential.expose(),
            })
            .send()
            .await?;
        drop(credential);
        let body: GenerateQaResponse = self.decode("/generate-qa", response).await?;
        Ok(body.qa_pairs)
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
