//! Configuration types for both tools.
//!
//! * [`ClientConfig`] — transport settings for [`crate::client::MistralClient`]
//!   (API key, base URL, timeout). Usually built with [`ClientConfig::from_env`].
//! * [`OcrOptions`] — knobs for the OCR pipeline, built via
//!   [`OcrOptionsBuilder`] so callers only set what they care about.
//! * [`ExtractorConfig`] — paths and model for the requirement extractor.

use crate::error::{OcrToolsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the Mistral API key.
pub const API_KEY_ENV: &str = "MISTRALAI_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "MISTRALAI_BASE_URL";

/// Public Mistral API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// Model used for document OCR.
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";

/// Model used for requirement extraction.
pub const DEFAULT_CHAT_MODEL: &str = "mistral-large-latest";

/// Default input for the requirement extractor.
pub const DEFAULT_EXTRACTOR_INPUT: &str = "data/input.md";

/// Default output for the requirement extractor.
pub const DEFAULT_EXTRACTOR_OUTPUT: &str = "output/requirements.csv";

/// Transport configuration for the Mistral API client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer token sent with every request.
    pub api_key: String,

    /// Scheme + host (+ optional port) without a trailing slash.
    pub base_url: String,

    /// Whole-request timeout in seconds. Default: 300.
    ///
    /// OCR of a long PDF is a single blocking request on the vendor side and
    /// can take minutes.
    pub timeout_secs: u64,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for the public endpoint with the given key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OcrToolsError::MissingApiKey { var: API_KEY_ENV });
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 300,
        })
    }

    /// Read `MISTRALAI_API_KEY` (required) and `MISTRALAI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV).unwrap_or_default();
        let mut config = Self::new(key)?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url);
            }
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }
}

/// Options for the OCR pipeline.
///
/// # Example
/// ```rust
/// use mistral_ocr_tools::OcrOptions;
///
/// let options = OcrOptions::builder()
///     .max_image_mb(4.0)
///     .signed_url_expiry_hours(2)
///     .build()
///     .unwrap();
/// assert_eq!(options.model, "mistral-ocr-latest");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOptions {
    /// OCR model identifier. Default: `mistral-ocr-latest`.
    pub model: String,

    /// Ask the endpoint to return every extracted image as base64. Default: true.
    ///
    /// Without it the assembled Markdown keeps every `![id](id)` placeholder.
    pub include_image_base64: bool,

    /// Lifetime of the signed URL issued for an uploaded PDF, in hours. Default: 1.
    pub signed_url_expiry_hours: u32,

    /// Size threshold for image inputs in MiB. Default: 5.0.
    ///
    /// Larger images are downscaled with [`crate::pipeline::encode::resize_image_if_needed`]
    /// before being sent inline.
    pub max_image_mb: f64,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_OCR_MODEL.to_string(),
            include_image_base64: true,
            signed_url_expiry_hours: 1,
            max_image_mb: 5.0,
        }
    }
}

impl OcrOptions {
    /// Create a new builder for `OcrOptions`.
    pub fn builder() -> OcrOptionsBuilder {
        OcrOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// Builder for [`OcrOptions`].
#[derive(Debug)]
pub struct OcrOptionsBuilder {
    options: OcrOptions,
}

impl OcrOptionsBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    pub fn include_image_base64(mut self, v: bool) -> Self {
        self.options.include_image_base64 = v;
        self
    }

    pub fn signed_url_expiry_hours(mut self, hours: u32) -> Self {
        self.options.signed_url_expiry_hours = hours;
        self
    }

    pub fn max_image_mb(mut self, mb: f64) -> Self {
        self.options.max_image_mb = mb;
        self
    }

    /// Build the options, validating constraints.
    pub fn build(self) -> Result<OcrOptions> {
        let o = &self.options;
        if o.model.trim().is_empty() {
            return Err(OcrToolsError::InvalidConfig("OCR model must not be empty".into()));
        }
        if o.signed_url_expiry_hours == 0 {
            return Err(OcrToolsError::InvalidConfig(
                "Signed URL expiry must be ≥ 1 hour".into(),
            ));
        }
        if !(o.max_image_mb.is_finite() && o.max_image_mb > 0.0) {
            return Err(OcrToolsError::InvalidConfig(format!(
                "Image size threshold must be a positive number of MiB, got {}",
                o.max_image_mb
            )));
        }
        Ok(self.options)
    }
}

/// Paths, model and prompt override for the requirement extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Pre-extracted text (usually Markdown from `mistral-ocr`).
    pub input_path: PathBuf,

    /// Destination of the raw model output. Its parent directory is created.
    pub output_path: PathBuf,

    /// Chat model identifier. Default: `mistral-large-latest`.
    pub model: String,

    /// Replacement for the built-in extraction instructions.
    pub instructions: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_EXTRACTOR_INPUT),
            output_path: PathBuf::from(DEFAULT_EXTRACTOR_OUTPUT),
            model: DEFAULT_CHAT_MODEL.to_string(),
            instructions: None,
        }
    }
}
