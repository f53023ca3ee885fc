//! CLI binary: extract requirement statements from a text file into a CSV.
//!
//! Runs with no arguments using the built-in paths; every path and the model
//! can be overridden with flags or environment variables.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mistral_ocr_tools::config::{DEFAULT_CHAT_MODEL, DEFAULT_EXTRACTOR_INPUT, DEFAULT_EXTRACTOR_OUTPUT};
use mistral_ocr_tools::{extractor, ClientConfig, ExtractorConfig, MistralClient, NoopObserver, PipelineObserver};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Spinner shown while the model is thinking.
struct ChatSpinner {
    bar: ProgressBar,
}

impl ChatSpinner {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Reading");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl PipelineObserver for ChatSpinner {
    fn on_chat_start(&self, model: &str, prompt_chars: usize) {
        self.bar.set_prefix("Extracting");
        self.bar
            .set_message(format!("{model} ← {prompt_chars} chars"));
    }

    fn on_chat_complete(&self, response_chars: usize) {
        self.bar.set_prefix("Saving");
        self.bar.set_message(format!("{response_chars} chars received"));
    }

    fn on_artifact_saved(&self, path: &Path) {
        self.bar.finish_and_clear();
        eprintln!("\x1b[32m✔\x1b[0m Results saved to \x1b[1m{}\x1b[0m", path.display());
    }
}

/// Extract requirements (code, description) from extracted text into a CSV.
#[derive(Parser, Debug)]
#[command(name = "requirement-extractor", version, about)]
struct Cli {
    /// Extracted text to read (e.g. Markdown produced by mistral-ocr).
    #[arg(long, env = "REQUIREMENTS_INPUT", default_value = DEFAULT_EXTRACTOR_INPUT)]
    input: PathBuf,

    /// Where to write the model's CSV output.
    #[arg(long, env = "REQUIREMENTS_OUTPUT", default_value = DEFAULT_EXTRACTOR_OUTPUT)]
    output: PathBuf,

    /// Chat model ID.
    #[arg(long, env = "REQUIREMENTS_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    model: String,

    /// Text file whose contents replace the built-in extraction instructions.
    #[arg(long, env = "REQUIREMENTS_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let show_progress = !cli.quiet && !cli.no_progress && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        // Keep WARN so CSV inspection findings stay visible under the spinner.
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli, show_progress).await {
        tracing::error!("Application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    let client_config = ClientConfig::from_env()
        .context("Cannot start without an API key")?
        .with_timeout_secs(cli.timeout);
    let client = MistralClient::new(client_config).context("Failed to build HTTP client")?;

    let instructions = match cli.prompt_file {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt from {:?}", path))?,
        ),
        None => None,
    };

    let config = ExtractorConfig {
        input_path: cli.input.clone(),
        output_path: cli.output.clone(),
        model: cli.model.clone(),
        instructions,
    };

    let outcome = if show_progress {
        let spinner = ChatSpinner::new();
        let result = extractor::run(&client, &config, &spinner).await;
        spinner.bar.finish_and_clear();
        result
    } else {
        extractor::run(&client, &config, &NoopObserver).await
    }
    .context("Requirement extraction failed")?;

    if !cli.quiet && !outcome.report.is_clean() {
        eprintln!(
            "⚠ {} rows written; the table did not match the code,description layout (see warnings)",
            outcome.report.records
        );
    }

    Ok(())
}
