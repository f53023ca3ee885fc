//! Error types for the mistral-ocr-tools library.
//!
//! Two failure modes exist and they are handled differently:
//!
//! * [`OcrToolsError`] — **Fatal** for the run: configuration, input
//!   validation, network and write failures. Returned as `Err` from every
//!   pipeline step and surfaced by the binaries as a non-zero exit.
//!
//! * Image encode/resize failures — **Degraded**: the helpers in
//!   [`crate::pipeline::encode`] log the problem and return `None` instead of
//!   an error, so callers decide whether a missing image matters.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mistral-ocr-tools library.
#[derive(Debug, Error)]
pub enum OcrToolsError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The API key environment variable is unset or empty.
    #[error("{var} not found in environment variables\nExport it or add it to a .env file.")]
    MissingApiKey { var: &'static str },

    /// Builder or option validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The file exists but its extension is not accepted by this operation.
    #[error("Invalid file format for '{path}'. Only {expected} files are supported.")]
    UnsupportedFormat { path: PathBuf, expected: &'static str },

    /// The input exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Vendor API errors ─────────────────────────────────────────────────
    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Mistral API error on {endpoint} (HTTP {status}): {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The API rejected the key (401/403).
    #[error("Authentication error from Mistral API on {endpoint}: {detail}")]
    AuthError { endpoint: String, detail: String },

    /// The chat completion returned no choices or an empty message.
    #[error("Chat completion from model '{model}' contained no message content")]
    EmptyCompletion { model: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialisation of a vendor payload failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OcrToolsError>;
