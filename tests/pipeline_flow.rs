use std::sync::Arc;

use httpmock::{Method::POST, MockServer};
use rustybrief::backend::HttpBackend;
use rustybrief::pipeline::{
    Candidate, Credential, DirectorySink, ExtractionError, ExtractionState, GenerationError,
    InputSource, PipelineError, QaState, SummaryState, SummaryVariant, UploadError,
};
use rustybrief::session::Session;
use serde_json::json;

fn session_for(server: &MockServer) -> Session {
    let backend = HttpBackend::new(&server.base_url()).expect("client");
    let (session, _events) = Session::new(Arc::new(backend));
    session
}

fn report() -> Candidate {
    Candidate::new("report.pdf", "application/pdf", b"%PDF-1.4 report".to_vec())
}

#[tokio::test]
async fn report_is_summarized_and_exported() {
    let server = MockServer::start_async().await;
    let extract = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/extract-text")
                .body_contains("filename=\"report.pdf\"");
            then.status(200)
                .json_body(json!({ "text": "The report discusses..." }));
        })
        .await;
    let summarize = server
        .mock_async(|when, then| {
            when.method(POST).path("/summarize").json_body(json!({
                "text": "The report discusses...",
                "summary_type": "concise"
            }));
            then.status(200).json_body(json!({ "summary": "Short version." }));
        })
        .await;

    let session = session_for(&server);
    let text = session
        .submit(report(), InputSource::DragAndDrop)
        .await
        .expect("extracted");
    assert_eq!(text.as_str(), "The report discusses...");

    let summary = session
        .summarize(SummaryVariant::Concise)
        .await
        .expect("summary");
    assert_eq!(summary.text, "Short version.");

    let dir = tempfile::tempdir().expect("tempdir");
    let sink = DirectorySink::new(dir.path());
    let path = session.export_summary(&sink).await.expect("export");

    assert_eq!(path, dir.path().join("concise_summary.txt"));
    let saved = tokio::fs::read_to_string(&path).await.expect("read back");
    assert_eq!(saved, "Short version.");
    extract.assert_async().await;
    summarize.assert_async().await;
}

#[tokio::test]
async fn qa_forwards_key_and_exports_pairs() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/extract-text");
            then.status(200).json_body(json!({ "text": "Body text" }));
        })
        .await;
    let qa = server
        .mock_async(|when, then| {
            when.method(POST).path("/generate-qa").json_body(json!({
                "text": "Body text",
                "api_key": "sk-live"
            }));
            then.status(200)
                .json_body(json!({ "qa_pairs": "Q1: What?\nA1: Body." }));
        })
        .await;

    let session = session_for(&server);
    session
        .submit(report(), InputSource::Browse)
        .await
        .expect("extracted");
    session
        .generate_qa(Credential::new("sk-live"))
        .await
        .expect("qa");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = session
        .export_qa(&DirectorySink::new(dir.path()))
        .await
        .expect("export");

    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("qa_pairs.txt"));
    assert!(matches!(session.qa_state().await, QaState::Done(_)));
    qa.assert_async().await;
}

#[tokio::test]
async fn failed_extraction_blocks_generation() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/extract-text");
            then.status(500)
                .json_body(json!({ "detail": "PDF parser crashed" }));
        })
        .await;
    let summarize = server
        .mock_async(|when, then| {
            when.method(POST).path("/summarize");
            then.status(200).json_body(json!({ "summary": "unused" }));
        })
        .await;
    let qa = server
        .mock_async(|when, then| {
            when.method(POST).path("/generate-qa");
            then.status(200).json_body(json!({ "qa_pairs": "unused" }));
        })
        .await;

    let session = session_for(&server);
    let error = session
        .submit(report(), InputSource::Browse)
        .await
        .expect_err("extraction fails");
    assert!(matches!(
        error,
        PipelineError::Extraction(ExtractionError::Transport(_))
    ));
    assert!(error.to_string().contains("PDF parser crashed"));
    assert!(matches!(
        session.extraction_state().await,
        ExtractionState::Failed { .. }
    ));

    let summary = session.summarize(SummaryVariant::Detailed).await;
    let pairs = session.generate_qa(Credential::new("sk-live")).await;

    assert!(matches!(
        summary,
        Err(PipelineError::Generation(GenerationError::NoExtractedText))
    ));
    assert!(matches!(
        pairs,
        Err(PipelineError::Generation(GenerationError::NoExtractedText))
    ));
    assert_eq!(session.summary_state().await, SummaryState::Idle);
    summarize.assert_hits_async(0).await;
    qa.assert_hits_async(0).await;
}

#[tokio::test]
async fn non_pdf_is_rejected_without_network() {
    let server = MockServer::start_async().await;
    let extract = server
        .mock_async(|when, then| {
            when.method(POST).path("/extract-text");
            then.status(200).json_body(json!({ "text": "unused" }));
        })
        .await;

    let session = session_for(&server);
    let error = session
        .submit(
            Candidate::new("notes.txt", "text/plain", b"plain".to_vec()),
            InputSource::DragAndDrop,
        )
        .await
        .expect_err("rejected");

    assert!(matches!(
        error,
        PipelineError::Upload(UploadError::InvalidType { .. })
    ));
    assert_eq!(session.extraction_state().await, ExtractionState::Idle);
    assert!(session.extracted_text().is_none());
    extract.assert_hits_async(0).await;
}
