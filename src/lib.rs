#![deny(missing_docs)]

//! Core library for Rusty Brief: PDF upload, text extraction, summaries, and Q&A generation
//! against a remote processing backend.

/// HTTP client for the processing backend.
pub mod backend;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Session activity counters.
pub mod metrics;
/// Upload, extraction, generation, and export state machines.
pub mod pipeline;
/// Wiring of the pipeline stages for a single user.
pub mod session;
