//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mistral_ocr_tools::client::{
    ChatMessage, FilePurpose, OcrImage, OcrPage, OcrRequest, OcrResponse, SignedUrl, UploadedFile,
};
use mistral_ocr_tools::{OcrToolsError, PipelineObserver, Result, VendorClient};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

/// In-memory stand-in for the Mistral API that records every call.
#[derive(Default)]
pub struct FakeClient {
    pub calls: Mutex<Vec<String>>,
    pub ocr_requests: Mutex<Vec<OcrRequest>>,
    pub chat_messages: Mutex<Vec<ChatMessage>>,
    pub ocr_response: Option<Value>,
    pub chat_reply: Option<String>,
    pub fail_ocr: bool,
}

impl FakeClient {
    pub fn with_ocr(response: OcrResponse) -> Self {
        Self::with_raw_ocr(serde_json::to_value(response).unwrap())
    }

    /// Reply to OCR with this exact body.
    pub fn with_raw_ocr(body: Value) -> Self {
        Self {
            ocr_response: Some(body),
            ..Default::default()
        }
    }

    pub fn with_chat(reply: &str) -> Self {
        Self {
            chat_reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VendorClient for FakeClient {
    async fn upload_file(
        &self,
        file_name: &str,
        content: Vec<u8>,
        purpose: FilePurpose,
    ) -> Result<UploadedFile> {
        self.record(format!(
            "upload {} {} {}",
            file_name,
            content.len(),
            purpose.as_str()
        ));
        Ok(UploadedFile {
            id: "file-123".into(),
            filename: Some(file_name.to_string()),
            bytes: Some(content.len() as u64),
            extra: Default::default(),
        })
    }

    async fn get_signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<SignedUrl> {
        self.record(format!("sign {file_id} {expiry_hours}"));
        Ok(SignedUrl {
            url: format!("https://files.test/{file_id}?sig=abc"),
        })
    }

    async fn process_ocr(&self, request: &OcrRequest) -> Result<Value> {
        self.record(format!("ocr {}", request.model));
        self.ocr_requests.lock().unwrap().push(request.clone());
        if self.fail_ocr {
            return Err(OcrToolsError::Api {
                endpoint: "/v1/ocr".into(),
                status: 500,
                message: "upstream exploded".into(),
            });
        }
        Ok(self
            .ocr_response
            .clone()
            .unwrap_or_else(|| serde_json::json!({ "pages": [] })))
    }

    async fn chat_complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        self.record(format!("chat {model}"));
        self.chat_messages
            .lock()
            .unwrap()
            .extend_from_slice(messages);
        self.chat_reply.clone().ok_or(OcrToolsError::EmptyCompletion {
            model: model.to_string(),
        })
    }
}

/// Observer that records event names in order.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_upload_start(&self, file_name: &str, _bytes: usize) {
        self.push(format!("upload_start {file_name}"));
    }
    fn on_upload_complete(&self, file_id: &str) {
        self.push(format!("upload_complete {file_id}"));
    }
    fn on_ocr_start(&self, model: &str) {
        self.push(format!("ocr_start {model}"));
    }
    fn on_ocr_complete(&self, pages: usize, images: usize) {
        self.push(format!("ocr_complete {pages} {images}"));
    }
    fn on_chat_start(&self, model: &str, _prompt_chars: usize) {
        self.push(format!("chat_start {model}"));
    }
    fn on_chat_complete(&self, response_chars: usize) {
        self.push(format!("chat_complete {response_chars}"));
    }
    fn on_artifact_saved(&self, path: &Path) {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.push(format!("saved {name}"));
    }
}

pub fn page(index: usize, markdown: &str, images: &[(&str, &str)]) -> OcrPage {
    OcrPage {
        index,
        markdown: markdown.to_string(),
        images: images
            .iter()
            .map(|(id, b64)| OcrImage {
                id: id.to_string(),
                image_base64: Some(b64.to_string()),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}
