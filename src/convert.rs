//! OCR entry points: upload a document, run OCR, assemble Markdown.
//!
//! [`OcrProcessor`] owns the injected [`VendorClient`] and
//! [`PipelineObserver`] and runs each step strictly in sequence. A failure at
//! any step aborts the run; nothing is retried and earlier vendor-side work
//! (an uploaded file) is not cleaned up.

use crate::client::{FilePurpose, OcrDocument, OcrRequest, OcrResponse, VendorClient};
use crate::config::OcrOptions;
use crate::error::{OcrToolsError, Result};
use crate::pipeline::{assemble, encode, input, persist};
use crate::progress::{self, Observer};
use image::ImageFormat;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of one OCR run.
#[derive(Debug, Clone)]
pub struct OcrOutput {
    /// The response body exactly as returned (and as written to `json_path`).
    pub raw: Value,
    /// Typed view of `raw` used for assembly.
    pub response: OcrResponse,
    /// All pages joined, placeholders resolved.
    pub markdown: String,
    /// Where the raw response was saved.
    pub json_path: PathBuf,
}

/// Paths written by [`OcrProcessor::ocr_to_files`].
#[derive(Debug, Clone)]
pub struct OcrArtifacts {
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
    pub markdown: String,
    pub pages: usize,
    pub images: usize,
    pub duration_ms: u64,
}

/// Drives the OCR pipeline against a [`VendorClient`].
///
/// # Example
/// ```rust,no_run
/// use mistral_ocr_tools::{MistralClient, OcrProcessor};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let processor = OcrProcessor::new(Arc::new(MistralClient::from_env()?));
/// let artifacts = processor.ocr_to_files("report.pdf").await?;
/// println!("wrote {}", artifacts.markdown_path.display());
/// # Ok(())
/// # }
/// ```
pub struct OcrProcessor {
    client: Arc<dyn VendorClient>,
    options: OcrOptions,
    observer: Observer,
}

impl OcrProcessor {
    /// Processor with default [`OcrOptions`] and no observer.
    pub fn new(client: Arc<dyn VendorClient>) -> Self {
        Self {
            client,
            options: OcrOptions::default(),
            observer: progress::noop(),
        }
    }

    pub fn with_options(mut self, options: OcrOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    /// Upload a PDF and return a signed URL for it.
    ///
    /// The file is stored under its stem (`report.pdf` → `report`).
    ///
    /// # Errors
    /// * [`OcrToolsError::FileNotFound`] / [`OcrToolsError::UnsupportedFormat`]
    ///   before any network call
    /// * any upload or signing error from the client
    pub async fn upload_pdf(&self, path: impl AsRef<Path>) -> Result<String> {
        let pdf = input::validate_pdf(path.as_ref())?;
        let file_name = pdf
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let content = tokio::fs::read(&pdf)
            .await
            .map_err(|e| OcrToolsError::ReadFailed {
                path: pdf.clone(),
                source: e,
            })?;

        info!("Uploading PDF: {}", file_name);
        self.observer.on_upload_start(&file_name, content.len());
        let uploaded = self
            .client
            .upload_file(&file_name, content, FilePurpose::Ocr)
            .await?;
        self.observer.on_upload_complete(&uploaded.id);
        debug!("Uploaded {} as file {}", file_name, uploaded.id);

        let signed = self
            .client
            .get_signed_url(&uploaded.id, self.options.signed_url_expiry_hours)
            .await?;
        Ok(signed.url)
    }

    /// Upload, OCR, persist `<path>.json`, and return the assembled Markdown.
    pub async fn process_pdf(&self, path: impl AsRef<Path>) -> Result<OcrOutput> {
        let path = path.as_ref();
        let signed_url = self.upload_pdf(path).await?;
        let document = OcrDocument::DocumentUrl {
            document_url: signed_url,
        };
        self.run_ocr(path, document).await
    }

    /// OCR a single image sent inline as a `data:` URI.
    ///
    /// Images above [`OcrOptions::max_image_mb`] are downscaled to JPEG first.
    pub async fn process_image(&self, path: impl AsRef<Path>) -> Result<OcrOutput> {
        let path = path.as_ref();
        let image_path = input::validate_image(path)?;

        let bytes = encode::resize_image_if_needed(
            &image_path,
            self.options.max_image_mb,
            ImageFormat::Jpeg,
        )
        .ok_or_else(|| OcrToolsError::ReadFailed {
            path: image_path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "image could not be read or resized",
            ),
        })?;

        let data_url =
            encode::image_data_url(&bytes).ok_or_else(|| OcrToolsError::UnsupportedFormat {
                path: image_path.clone(),
                expected: "PNG, JPEG, WebP, GIF, BMP or TIFF",
            })?;

        let document = OcrDocument::ImageUrl {
            image_url: data_url,
        };
        self.run_ocr(path, document).await
    }

    /// Route by extension: known image types to [`Self::process_image`],
    /// everything else to [`Self::process_pdf`].
    pub async fn process_file(&self, path: impl AsRef<Path>) -> Result<OcrOutput> {
        let path = path.as_ref();
        match input::classify(path) {
            input::InputKind::Image => self.process_image(path).await,
            input::InputKind::Pdf => self.process_pdf(path).await,
        }
    }

    /// Process `path` and write both `<path>.json` and `<path>.md`.
    pub async fn ocr_to_files(&self, path: impl AsRef<Path>) -> Result<OcrArtifacts> {
        let start = Instant::now();
        let path = path.as_ref();
        let output = self.process_file(path).await?;
        let markdown_path = persist::write_markdown_sidecar(path, &output.markdown).await?;
        self.observer.on_artifact_saved(&markdown_path);

        Ok(OcrArtifacts {
            json_path: output.json_path,
            markdown_path,
            pages: output.response.pages.len(),
            images: output.response.image_count(),
            markdown: output.markdown,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn run_ocr(&self, input_path: &Path, document: OcrDocument) -> Result<OcrOutput> {
        let request = OcrRequest {
            model: self.options.model.clone(),
            document,
            include_image_base64: self.options.include_image_base64,
        };

        info!("Performing OCR on the document...");
        self.observer.on_ocr_start(&request.model);
        let ocr_start = Instant::now();
        let raw = self.client.process_ocr(&request).await?;

        // Raw body hits disk before the typed view is parsed.
        let json_path = persist::write_json_sidecar(input_path, &raw).await?;
        self.observer.on_artifact_saved(&json_path);

        let response: OcrResponse = serde_json::from_value(raw.clone())?;
        let images = response.image_count();
        info!(
            "OCR returned {} pages, {} images in {}ms",
            response.pages.len(),
            images,
            ocr_start.elapsed().as_millis()
        );
        self.observer.on_ocr_complete(response.pages.len(), images);

        let markdown = assemble::get_combined_markdown(&response);
        Ok(OcrOutput {
            raw,
            response,
            markdown,
            json_path,
        })
    }
}
