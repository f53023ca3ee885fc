//! Requirement extraction: text file → prompt → chat completion → CSV file.
//!
//! Each step logs its own failure at ERROR level and returns it unchanged, so
//! the binary only has to turn the final `Err` into a non-zero exit.

use crate::client::{ChatMessage, VendorClient};
use crate::config::ExtractorConfig;
use crate::error::{OcrToolsError, Result};
use crate::pipeline::requirements::{inspect_requirements_csv, CsvReport};
use crate::progress::PipelineObserver;
use crate::prompts;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// What a successful extraction produced.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub output_path: PathBuf,
    pub response: String,
    pub report: CsvReport,
}

/// Read the whole input file as UTF-8.
pub async fn read_input_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path).await.map_err(|e| {
        error!("Error reading file {}: {}", path.display(), e);
        if e.kind() == std::io::ErrorKind::NotFound {
            OcrToolsError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            OcrToolsError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Send `prompt` as a single user message and return the reply text.
pub async fn get_mistral_response(
    client: &dyn VendorClient,
    prompt: &str,
    model: &str,
) -> Result<String> {
    client
        .chat_complete(model, &[ChatMessage::user(prompt)])
        .await
        .map_err(|e| {
            error!("Error calling Mistral API: {}", e);
            e
        })
}

/// Write `content` to `path`, replacing any existing file.
pub async fn save_output(content: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match tokio::fs::write(path, content).await {
        Ok(()) => {
            info!("Results saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Error saving output {}: {}", path.display(), e);
            Err(OcrToolsError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Run the whole extraction described by `config`.
///
/// The output directory is created first; the output file itself is only
/// written once the model has answered.
pub async fn run(
    client: &dyn VendorClient,
    config: &ExtractorConfig,
    observer: &dyn PipelineObserver,
) -> Result<ExtractionOutcome> {
    if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            error!("Error creating output directory {}: {}", parent.display(), e);
            OcrToolsError::OutputWriteFailed {
                path: parent.to_path_buf(),
                source: e,
            }
        })?;
    }

    info!("Reading input file: {}", config.input_path.display());
    let text = read_input_file(&config.input_path).await?;

    let prompt = match config.instructions.as_deref() {
        Some(instructions) => prompts::requirements_prompt_with(&text, instructions),
        None => prompts::requirements_prompt(&text),
    };

    info!("Sending prompt to Mistral {}", config.model);
    observer.on_chat_start(&config.model, prompt.chars().count());
    let response = get_mistral_response(client, &prompt, &config.model).await?;
    observer.on_chat_complete(response.chars().count());

    let report = inspect_requirements_csv(&response);
    report.log();

    save_output(&response, &config.output_path).await?;
    observer.on_artifact_saved(&config.output_path);

    Ok(ExtractionOutcome {
        output_path: config.output_path.clone(),
        response,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_missing_file_is_file_not_found() {
        let err = read_input_file("/no/such/input.md").await.unwrap_err();
        assert!(matches!(err, OcrToolsError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn read_non_utf8_file_is_read_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.md");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let err = read_input_file(&path).await.unwrap_err();
        assert!(matches!(err, OcrToolsError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn save_output_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.csv");
        save_output("old", &path).await.unwrap();
        save_output("code,description\n", &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "code,description\n");
    }

    #[tokio::test]
    async fn save_output_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_output("x", dir.path().join("nope/out.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrToolsError::OutputWriteFailed { .. }));
    }
}
