//! CLI binary: OCR a PDF (or image) with Mistral and write Markdown.
//!
//! A thin shim over the library crate that maps CLI flags to `OcrOptions`,
//! writes `<input>.json` and `<input>.md`, and prints the Markdown.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mistral_ocr_tools::{
    ClientConfig, MistralClient, OcrOptions, OcrProcessor, Observer, PipelineObserver,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Spinner on stderr that narrates upload → OCR → save.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for SpinnerObserver {
    fn on_upload_start(&self, file_name: &str, bytes: usize) {
        self.bar.set_prefix("Uploading");
        self.bar
            .set_message(format!("{file_name} ({:.1} KiB)", bytes as f64 / 1024.0));
    }

    fn on_upload_complete(&self, file_id: &str) {
        self.bar.println(format!("  {} uploaded  {}", green("✓"), dim(file_id)));
        self.bar.set_prefix("Signing");
        self.bar.set_message("requesting signed URL");
    }

    fn on_ocr_start(&self, model: &str) {
        self.bar.set_prefix("OCR");
        self.bar.set_message(format!("waiting for {model}"));
    }

    fn on_ocr_complete(&self, pages: usize, images: usize) {
        self.bar.println(format!(
            "  {} OCR done  {}",
            green("✓"),
            dim(&format!("{pages} pages, {images} images"))
        ));
        self.bar.set_prefix("Saving");
        self.bar.set_message("");
    }

    fn on_artifact_saved(&self, path: &Path) {
        self.bar
            .println(format!("  {} saved  {}", green("✓"), bold(&path.display().to_string())));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR a PDF: writes report.json and report.md next to it, prints Markdown
  mistral-ocr report.pdf

  # Write files only, nothing on stdout
  mistral-ocr --no-display report.pdf

  # OCR a scanned page; images over 5 MiB are downscaled first
  mistral-ocr --max-image-mb 4 scan.png

ENVIRONMENT VARIABLES:
  MISTRALAI_API_KEY    Mistral API key (required; also read from .env)
  MISTRALAI_BASE_URL   Override the API endpoint (default https://api.mistral.ai)
  RUST_LOG             Log filter, e.g. RUST_LOG=mistral_ocr_tools=debug
"#;

/// OCR a PDF with Mistral and write Markdown with embedded images.
#[derive(Parser, Debug)]
#[command(
    name = "mistral-ocr",
    version,
    about = "OCR a PDF with Mistral and write Markdown with embedded images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF (or PNG/JPEG/WebP/GIF/BMP/TIFF image).
    input: PathBuf,

    /// OCR model ID.
    #[arg(long, env = "MISTRAL_OCR_MODEL", default_value = "mistral-ocr-latest")]
    model: String,

    /// Signed URL lifetime in hours.
    #[arg(long, env = "MISTRAL_OCR_EXPIRY_HOURS", default_value_t = 1)]
    expiry_hours: u32,

    /// Downscale image inputs larger than this many MiB.
    #[arg(long, env = "MISTRAL_OCR_MAX_IMAGE_MB", default_value_t = 5.0)]
    max_image_mb: f64,

    /// Do not request base64 image payloads (placeholders stay unresolved).
    #[arg(long)]
    no_images: bool,

    /// HTTP timeout in seconds for each API call.
    #[arg(long, env = "MISTRAL_OCR_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Do not print the Markdown to stdout.
    #[arg(long)]
    no_display: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "MISTRAL_OCR_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Default level when `RUST_LOG` is unset. With the spinner on, INFO is
/// hidden but WARN (e.g. unresolved image placeholders) still shows.
fn log_filter(verbose: bool, quiet: bool, show_progress: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let show_progress = !cli.quiet && !cli.no_progress && !cli.verbose;
    init_tracing(log_filter(cli.verbose, cli.quiet, show_progress));

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

    let options = OcrOptions::builder()
        .model(&cli.model)
        .signed_url_expiry_hours(cli.expiry_hours)
        .max_image_mb(cli.max_image_mb)
        .include_image_base64(!cli.no_images)
        .build()
        .context("Invalid configuration")?;

    let spinner = show_progress.then(SpinnerObserver::new);
    let mut processor = OcrProcessor::new(Arc::new(client)).with_options(options);
    if let Some(ref s) = spinner {
        processor = processor.with_observer(Arc::clone(s) as Observer);
    }

    let result = processor.ocr_to_files(&cli.input).await;
    if let Some(ref s) = spinner {
        s.finish();
    }
    let artifacts = result.with_context(|| format!("OCR failed for {}", cli.input.display()))?;

    if !cli.quiet && !cli.no_display {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(artifacts.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !artifacts.markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} pages, {} images  {}ms  →  {}",
            green("✔"),
            artifacts.pages,
            artifacts.images,
            artifacts.duration_ms,
            bold(&artifacts.markdown_path.display().to_string()),
        );
        eprintln!("   raw response  {}", dim(&artifacts.json_path.display().to_string()));
    }

    Ok(())
}
