//! Vendor API boundary.
//!
//! Every network call made by either tool goes through [`VendorClient`].
//! The pipelines hold it as `Arc<dyn VendorClient>`, so tests swap in a fake
//! and never touch the network. [`MistralClient`] is the reqwest-backed
//! implementation used by the binaries.

mod mistral;
pub mod types;

pub use mistral::MistralClient;
pub use types::{
    ChatMessage, FilePurpose, OcrDocument, OcrImage, OcrPage, OcrRequest, OcrResponse, SignedUrl,
    UploadedFile,
};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Capabilities the tools need from the hosted service.
#[async_trait]
pub trait VendorClient: Send + Sync {
    /// Store `content` under `file_name` tagged with `purpose`.
    async fn upload_file(
        &self,
        file_name: &str,
        content: Vec<u8>,
        purpose: FilePurpose,
    ) -> Result<UploadedFile>;

    /// Issue a signed URL for a stored file, valid for `expiry_hours`.
    async fn get_signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<SignedUrl>;

    /// Run OCR over a document reference and return the response body untouched.
    async fn process_ocr(&self, request: &OcrRequest) -> Result<Value>;

    /// Single non-streaming chat completion; returns the first choice's content.
    async fn chat_complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}
