use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing one session's pipeline activity.
#[derive(Default)]
pub struct SessionMetrics {
    documents_accepted: AtomicU64,
    documents_rejected: AtomicU64,
    extractions_succeeded: AtomicU64,
    extractions_failed: AtomicU64,
    summaries_generated: AtomicU64,
    qa_generated: AtomicU64,
    generation_failures: AtomicU64,
}

impl SessionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of an upload attempt.
    pub fn record_upload(&self, accepted: bool) {
        let counter = if accepted {
            &self.documents_accepted
        } else {
            &self.documents_rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of an extraction attempt.
    pub fn record_extraction(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.extractions_succeeded
        } else {
            &self.extractions_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a generated summary.
    pub fn record_summary(&self) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record generated Q&A pairs.
    pub fn record_qa(&self) {
        self.qa_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a generation of either kind that failed at the backend.
    pub fn record_generation_failure(&self) {
        self.generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_accepted: self.documents_accepted.load(Ordering::Relaxed),
            documents_rejected: self.documents_rejected.load(Ordering::Relaxed),
            extractions_succeeded: self.extractions_succeeded.load(Ordering::Relaxed),
            extractions_failed: self.extractions_failed.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            qa_generated: self.qa_generated.load(Ordering::Relaxed),
            generation_failures: self.generation_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of session counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Uploads that passed the gate.
    pub documents_accepted: u64,
    /// Uploads the gate turned away.
    pub documents_rejected: u64,
    /// Extractions that published text.
    pub extractions_succeeded: u64,
    /// Extractions that failed (superseded attempts are not counted).
    pub extractions_failed: u64,
    /// Summaries generated.
    pub summaries_generated: u64,
    /// Q&A generations completed.
    pub qa_generated: u64,
    /// Generations that failed at the backend.
    pub generation_failures: u64,
}
