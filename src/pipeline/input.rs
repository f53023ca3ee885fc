//! Input validation: decide what kind of document a path is before any upload.
//!
//! Everything here runs locally, so a bad path or a wrong extension is
//! reported before a single byte goes over the network.

use crate::error::{OcrToolsError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image extensions accepted by the OCR tool (lower case).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff"];

/// How a local input will be sent to the OCR endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Uploaded to file storage and referenced by signed URL.
    Pdf,
    /// Inlined as a base64 `data:` URI.
    Image,
}

/// Lower-cased extension of `path`, if any.
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Classify by extension. Anything that is not a known image is treated as a
/// PDF candidate, so that [`validate_pdf`] produces the format error.
pub fn classify(path: &Path) -> InputKind {
    match extension(path) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => InputKind::Image,
        _ => InputKind::Pdf,
    }
}

/// Check that `path` is an existing file with a `.pdf` extension (any case).
///
/// Returns the canonicalised path.
pub fn validate_pdf(path: &Path) -> Result<PathBuf> {
    let resolved = ensure_file(path)?;
    if extension(&resolved).as_deref() != Some("pdf") {
        return Err(OcrToolsError::UnsupportedFormat {
            path: resolved,
            expected: "PDF",
        });
    }
    debug!("Validated PDF input: {}", resolved.display());
    Ok(resolved)
}

/// Check that `path` is an existing file with a known image extension.
pub fn validate_image(path: &Path) -> Result<PathBuf> {
    let resolved = ensure_file(path)?;
    if classify(&resolved) != InputKind::Image {
        return Err(OcrToolsError::UnsupportedFormat {
            path: resolved,
            expected: "PNG, JPEG, WebP, GIF, BMP or TIFF",
        });
    }
    debug!("Validated image input: {}", resolved.display());
    Ok(resolved)
}

fn ensure_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(OcrToolsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::canonicalize(path).map_err(|e| OcrToolsError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
