//! Local pipeline stages. None of these touch the network.
//!
//! ## Data Flow
//!
//! ```text
//! OCR:        input ──▶ (upload/OCR via client) ──▶ persist(json) ──▶ assemble ──▶ persist(md)
//!               └─ image inputs: encode (resize + data URI) ──▶ OCR
//! Extraction: read ──▶ prompt ──▶ (chat via client) ──▶ requirements (inspect) ──▶ write
//! ```
//!
//! 1. [`input`]    — validate the path and classify it as PDF or image
//! 2. [`encode`]   — base64 and size-aware downscaling of images
//! 3. [`assemble`] — substitute image placeholders and join pages
//! 4. [`persist`]  — write JSON and Markdown next to the input
//! 5. [`requirements`] — non-fatal CSV inspection of model output

pub mod assemble;
pub mod encode;
pub mod input;
pub mod persist;
pub mod requirements;
