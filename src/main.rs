use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rustybrief::backend::HttpBackend;
use rustybrief::config::{self, Config};
use rustybrief::logging;
use rustybrief::pipeline::{
    Candidate, Credential, DirectorySink, InputSource, PipelineEvent, SummaryVariant,
};
use rustybrief::session::Session;

/// Environment variable holding the key forwarded with Q&A requests.
const QA_KEY_VARIABLE: &str = "BRIEF_QA_API_KEY";

#[derive(Parser)]
#[command(
    name = "rustybrief",
    about = "Extract, summarize, and generate Q&A pairs for a PDF"
)]
struct Cli {
    /// PDF to process.
    file: PathBuf,
    /// Summary variants to generate, in order. Repeatable.
    #[arg(long = "summary", value_enum)]
    summaries: Vec<SummaryVariant>,
    /// Generate Q&A pairs (reads the key from BRIEF_QA_API_KEY).
    #[arg(long)]
    qa: bool,
    /// Directory for exported files. Defaults to BRIEF_OUTPUT_DIR.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print a preview of the extracted text.
    #[arg(long)]
    preview: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing();

    let backend = HttpBackend::from_config().context("invalid backend URL")?;
    let (session, mut events) = Session::new(Arc::new(backend));
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}", describe(&event));
        }
    });

    let outcome = process(&session, cli, config).await;
    tracing::info!(metrics = ?session.metrics(), "Session finished");
    // Dropping the session closes the event channel; the printer drains and exits.
    drop(session);
    printer.await.context("event printer stopped unexpectedly")?;
    outcome
}

async fn process(session: &Session, cli: Cli, config: &Config) -> Result<()> {
    let Cli {
        file,
        summaries: variants,
        qa: want_qa,
        out,
        preview,
    } = cli;
    let candidate = Candidate::from_path(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let text = session
        .submit(candidate, InputSource::Browse)
        .await
        .context("document could not be processed")?;
    if preview {
        println!("{}", text.preview(config.preview_chars));
    }

    let sink = DirectorySink::new(out.unwrap_or_else(|| config.output_dir.clone()));
    let summaries = async {
        for &variant in &variants {
            session
                .summarize(variant)
                .await
                .with_context(|| format!("{variant} summary failed"))?;
            let path = session.export_summary(&sink).await?;
            println!("saved {}", path.display());
        }
        anyhow::Ok(())
    };
    let qa = async {
        if !want_qa {
            return anyhow::Ok(());
        }
        let credential = Credential::new(config::load_env(QA_KEY_VARIABLE).unwrap_or_default());
        session
            .generate_qa(credential)
            .await
            .context("Q&A generation failed")?;
        let path = session.export_qa(&sink).await?;
        println!("saved {}", path.display());
        anyhow::Ok(())
    };
    let (summaries, qa) = tokio::join!(summaries, qa);
    summaries?;
    qa
}

fn describe(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::DocumentAccepted { document_id, name } => {
            format!("accepted {name} ({document_id})")
        }
        PipelineEvent::DocumentRejected { name, reason } => format!("rejected {name}: {reason}"),
        PipelineEvent::ExtractionStarted { name } => format!("extracting text from {name}..."),
        PipelineEvent::ExtractionReady { name, chars } => {
            format!("extracted {chars} characters from {name}")
        }
        PipelineEvent::ExtractionFailed { name, message } => {
            format!("extraction failed for {name}: {message}")
        }
        PipelineEvent::SummaryStarted { variant } => format!("generating {variant} summary..."),
        PipelineEvent::SummaryReady { variant } => format!("{variant} summary ready"),
        PipelineEvent::SummaryFailed { variant, message } => {
            format!("{variant} summary failed: {message}")
        }
        PipelineEvent::QaStarted => "generating Q&A pairs...".to_string(),
        PipelineEvent::QaReady => "Q&A pairs ready".to_string(),
        PipelineEvent::QaFailed { message } => format!("Q&A generation failed: {message}"),
    }
}
