//! reqwest implementation of [`VendorClient`] for `api.mistral.ai`.

use super::types::{ChatRequest, ChatResponse};
use super::{
    ChatMessage, FilePurpose, OcrRequest, SignedUrl, UploadedFile, VendorClient,
};
use crate::config::ClientConfig;
use crate::error::{OcrToolsError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// HTTP client for the Mistral REST API.
pub struct MistralClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl MistralClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Build from `MISTRALAI_API_KEY` / `MISTRALAI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map the status, then decode the JSON body.
    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
        started: Instant,
    ) -> Result<T> {
        let status = response.status();
        debug!("{} → HTTP {} in {:?}", endpoint, status, started.elapsed());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(endpoint, status, body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn status_error(endpoint: &str, status: StatusCode, body: String) -> OcrToolsError {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OcrToolsError::AuthError {
            endpoint: endpoint.to_string(),
            detail: message,
        },
        _ => OcrToolsError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl VendorClient for MistralClient {
    async fn upload_file(
        &self,
        file_name: &str,
        content: Vec<u8>,
        purpose: FilePurpose,
    ) -> Result<UploadedFile> {
        let endpoint = "/v1/files";
        debug!("Uploading {} ({} bytes)", file_name, content.len());

        let part = Part::bytes(content).file_name(file_name.to_string());
        let form = Form::new()
            .text("purpose", purpose.as_str())
            .part("file", part);

        let started = Instant::now();
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        Self::decode(endpoint, response, started).await
    }

    async fn get_signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<SignedUrl> {
        let endpoint = format!("/v1/files/{file_id}/url");
        let started = Instant::now();
        let response = self
            .http
            .get(self.url(&endpoint))
            .bearer_auth(&self.config.api_key)
            .query(&[("expiry", expiry_hours)])
            .send()
            .await?;
        Self::decode(&endpoint, response, started).await
    }

    async fn process_ocr(&self, request: &OcrRequest) -> Result<Value> {
        let endpoint = "/v1/ocr";
        let started = Instant::now();
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;
        Self::decode(endpoint, response, started).await
    }

    async fn chat_complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let endpoint = "/v1/chat/completions";
        let body = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
        };
        let started = Instant::now();
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: ChatResponse = Self::decode(endpoint, response, started).await?;
        parsed
            .into_content()
            .ok_or_else(|| OcrToolsError::EmptyCompletion {
                model: model.to_string(),
            })
    }
}
