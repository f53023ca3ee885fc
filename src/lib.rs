//! # mistral-ocr-tools
//!
//! Two small document tools built on the Mistral AI hosted API:
//!
//! * **OCR to Markdown** — upload a PDF (or inline an image), run
//!   `mistral-ocr-latest`, save the raw JSON response and a Markdown file with
//!   every extracted image embedded as base64.
//! * **Requirement extraction** — feed extracted text to
//!   `mistral-large-latest` and save the `code,description` table it returns.
//!
//! OCR and language understanding happen on the vendor side. This crate
//! builds the requests, moves files around, and stitches the results together.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF ──▶ validate ──▶ upload ──▶ signed URL ──▶ OCR ──▶ <name>.json
//!                                                  └──▶ assemble ──▶ <name>.md
//!
//! text ──▶ prompt ──▶ chat completion ──▶ inspect (warn only) ──▶ requirements.csv
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mistral_ocr_tools::{MistralClient, OcrProcessor};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads MISTRALAI_API_KEY
//!     let client = Arc::new(MistralClient::from_env()?);
//!     let output = OcrProcessor::new(client).process_pdf("document.pdf").await?;
//!     println!("{}", output.markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Builds `mistral-ocr` and `requirement-extractor` (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{MistralClient, OcrResponse, VendorClient};
pub use config::{ClientConfig, ExtractorConfig, OcrOptions, OcrOptionsBuilder};
pub use convert::{OcrArtifacts, OcrOutput, OcrProcessor};
pub use error::{OcrToolsError, Result};
pub use extractor::ExtractionOutcome;
pub use pipeline::assemble::get_combined_markdown;
pub use progress::{NoopObserver, Observer, PipelineObserver};
