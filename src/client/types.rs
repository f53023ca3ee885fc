//! Request and response payloads exchanged with the Mistral API.
//!
//! The OCR endpoint's body is kept as a raw [`serde_json::Value`] and written
//! to disk as-is; [`OcrResponse`] is a lenient view of it used for Markdown
//! assembly. Fields the view does not name land in its `extra` maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Purpose tag attached to an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePurpose {
    Ocr,
}

impl FilePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePurpose::Ocr => "ocr",
        }
    }
}

/// Metadata of a file stored on the vendor side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Time-limited link to an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrl {
    pub url: String,
}

/// Document reference accepted by the OCR endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OcrDocument {
    /// A PDF reachable over HTTP(S), typically a signed URL.
    DocumentUrl { document_url: String },
    /// An image as a URL or `data:` URI.
    ImageUrl { image_url: String },
}

/// Body of `POST /v1/ocr`.
#[derive(Debug, Clone, Serialize)]
pub struct OcrRequest {
    pub model: String,
    pub document: OcrDocument,
    pub include_image_base64: bool,
}

/// Full OCR response, page by page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResponse {
    pub pages: Vec<OcrPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_info: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OcrResponse {
    /// Total number of images across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}

/// One OCR'd page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub images: Vec<OcrImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An image extracted from a page, referenced from Markdown as `![id](id)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrImage {
    pub id: String,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Chat message for completion requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /v1/chat/completions`. Streaming is never requested.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub(crate) fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}
