//! Output files written next to the input: `<base>.json` and `<base>.md`.
//!
//! Writes go to a sibling `*.tmp` file first and are renamed into place, so an
//! interrupted run never leaves a half-written artifact under the final name.

use crate::error::{OcrToolsError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// `input` with its extension replaced by `ext` (e.g. `doc.pdf` → `doc.json`).
pub fn sidecar_path(input: &Path, ext: &str) -> PathBuf {
    input.with_extension(ext)
}

/// Serialise `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `contents` to `path` via a temporary file and rename.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| OcrToolsError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        tokio::fs::remove_file(&tmp_path).await.ok();
        return Err(OcrToolsError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

/// Persist `value` as pretty JSON at `<input>.json` and return that path.
pub async fn write_json_sidecar<T: Serialize>(input: &Path, value: &T) -> Result<PathBuf> {
    let path = sidecar_path(input, "json");
    write_atomic(&path, &to_pretty_json(value)?).await?;
    info!("OCR output saved to: {}", path.display());
    Ok(path)
}

/// Persist Markdown at `<input>.md` and return that path.
pub async fn write_markdown_sidecar(input: &Path, markdown: &str) -> Result<PathBuf> {
    let path = sidecar_path(input, "md");
    write_atomic(&path, markdown).await?;
    info!("Markdown output saved to: {}", path.display());
    Ok(path)
}
