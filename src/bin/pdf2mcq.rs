//! CLI binary for pdf-mcq.
//!
//! A thin shim over the library crate: maps flags to `McqConfig`, asks for
//! the PDF path when none is given, and prints one line per stage.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_mcq::{
    connect_model, run_with_model, McqConfig, McqError, PipelineOutput,
    PipelineProgressCallback, ProgressCallback, Stage,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
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

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints the stage lines to stdout and keeps a spinner on stderr while the
/// model is generating.
struct CliProgressCallback {
    /// Provider shown in the "Generating MCQs with …" line.
    provider: String,
    /// Draw a spinner during generation.
    spinner: bool,
    /// The active spinner, if any.
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new(provider: &str, spinner: bool) -> Arc<Self> {
        Arc::new(Self {
            provider: provider_display(provider),
            spinner,
            bar: Mutex::new(None),
        })
    }

    fn start_spinner(&self) {
        if !self.spinner {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Generating");
        bar.set_message(format!("waiting for {}", self.provider));
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        match stage {
            Stage::Extract => println!("{}", stage.start_message()),
            Stage::Generate => {
                println!("Generating MCQs with {}...", self.provider);
                self.start_spinner();
            }
            Stage::SaveText | Stage::SaveQuestions => {}
        }
    }

    fn on_stage_complete(&self, stage: Stage, artifact: Option<&Path>) {
        let Some(path) = artifact else {
            if stage == Stage::Generate {
                self.stop_spinner();
            }
            return;
        };
        match stage {
            Stage::SaveText => println!("Extracted text saved to: {}", path.display()),
            Stage::SaveQuestions => println!("MCQs saved to: {}", path.display()),
            Stage::Extract | Stage::Generate => {}
        }
    }

    fn on_stage_error(&self, _stage: Stage, _error: &str) {
        self.stop_spinner();
    }
}

/// "ollama" → "Ollama"; other names are shown as given.
fn provider_display(provider: &str) -> String {
    let mut chars = provider.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive: prompts for the PDF path
  pdf2mcq

  # Path on the command line
  pdf2mcq lecture.pdf

  # Another local model, with a timeout
  pdf2mcq --model mistral --api-timeout 300 lecture.pdf

  # Write artifacts elsewhere and print a JSON summary
  pdf2mcq --output-dir quiz/ --json lecture.pdf

OUTPUT:
  {stem}_extracted.txt   extracted text (UTF-8)
  {stem}_mcqs.docx       generated questions, one paragraph per line

ENVIRONMENT VARIABLES:
  EDGEQUAKE_PROVIDER      Override provider (default: ollama)
  EDGEQUAKE_MODEL         Override model ID (default: llama3)
  OLLAMA_HOST             Ollama endpoint (default: http://localhost:11434)
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)

SETUP:
  1. Start Ollama and pull the model:  ollama pull llama3
  2. Run:                              pdf2mcq lecture.pdf
"#;

/// Generate multiple-choice questions from a PDF with a local LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2mcq",
    version,
    about = "Generate multiple-choice questions from a PDF with a local LLM",
    long_about = "Extract the text of a PDF, ask a locally hosted language model for five \
multiple-choice questions, and save both the text and the questions (as a Word document) \
next to the input.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file path. Prompted for interactively when omitted.
    input: Option<String>,

    /// LLM model ID.
    #[arg(long, env = "EDGEQUAKE_MODEL", default_value = pdf_mcq::config::DEFAULT_MODEL)]
    model: String,

    /// LLM provider: ollama, openai, anthropic, gemini, …
    #[arg(long, env = "EDGEQUAKE_PROVIDER", default_value = pdf_mcq::config::DEFAULT_PROVIDER)]
    provider: String,

    /// LLM temperature (0.0–2.0). Provider default when unset.
    #[arg(long, env = "PDF2MCQ_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max LLM output tokens. Provider default when unset.
    #[arg(long, env = "PDF2MCQ_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// LLM call timeout in seconds. Waits indefinitely when unset.
    #[arg(long, env = "PDF2MCQ_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MCQ_PASSWORD")]
    password: Option<String>,

    /// Write both artifacts to this directory instead of next to the input.
    #[arg(short, long, env = "PDF2MCQ_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Heading of the questions document.
    #[arg(long, env = "PDF2MCQ_HEADING", default_value = pdf_mcq::config::DEFAULT_HEADING)]
    heading: String,

    /// Print a JSON summary (PipelineOutput) after a successful run.
    #[arg(long, env = "PDF2MCQ_JSON")]
    json: bool,

    /// Disable the spinner shown while the model is generating.
    #[arg(long, env = "PDF2MCQ_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MCQ_VERBOSE")]
    verbose: bool,

    /// Suppress stage messages; failures are still reported.
    #[arg(short, long, env = "PDF2MCQ_QUIET")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Stage lines go to stdout; library logs stay at ERROR on stderr unless
    // asked for.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = match build_config(&cli, stage_printer(&cli)) {
        Ok(c) => c,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };

    // ── Initialise model ─────────────────────────────────────────────────
    let model = match connect_model(&config) {
        Ok(m) => m,
        Err(e) => {
            println!(
                "Error initializing {} model: {e}",
                provider_display(&config.provider_name)
            );
            return Ok(());
        }
    };

    // ── Get PDF path ─────────────────────────────────────────────────────
    let input = match cli.input {
        Some(ref s) => s.clone(),
        None => prompt_for_path().context("Failed to read the PDF path from stdin")?,
    };

    // ── Run ──────────────────────────────────────────────────────────────
    match run_with_model(&input, &model, &config).await {
        Ok(output) => print_summary(&cli, &output)?,
        Err(e) => report_failure(&e, &config.provider_name),
    }

    Ok(())
}

/// Stage lines on stdout, unless `--quiet`, or `--json` needs stdout clean.
fn stage_printer(cli: &Cli) -> Option<ProgressCallback> {
    if cli.quiet || cli.json {
        return None;
    }
    let cb = CliProgressCallback::new(&cli.provider, !cli.no_progress);
    Some(cb as Arc<dyn PipelineProgressCallback>)
}

fn build_config(cli: &Cli, progress_cb: Option<ProgressCallback>) -> Result<McqConfig, McqError> {
    let mut builder = McqConfig::builder()
        .model(&cli.model)
        .provider_name(&cli.provider)
        .heading(&cli.heading);

    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    builder.build()
}

fn prompt_for_path() -> Result<String> {
    print!("Enter the PDF file path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Print the diagnostic for a failed run.
fn report_failure(err: &McqError, provider: &str) {
    for line in failure_lines(err, provider) {
        println!("{line}");
    }
}

/// Lines printed for a failed run.
///
/// An empty document or an empty reply is not an exception, so only the
/// `Failed to … Exiting.` line is shown for those.
fn failure_lines(err: &McqError, provider: &str) -> Vec<String> {
    if err.is_input_error() {
        let reason = match err {
            McqError::NotAPdf { .. } => "File is not a .pdf file.",
            _ => "File does not exist at the specified path.",
        };
        return vec![format!("Error: {reason}")];
    }

    let Some(stage) = err.stage() else {
        return vec![format!("Error: {err}")];
    };

    let mut lines = Vec::with_capacity(2);
    if !matches!(
        err,
        McqError::NoExtractableText { .. } | McqError::EmptyResponse
    ) {
        let action = if stage == Stage::Generate {
            format!("{} with {}", stage.failure_action(), provider_display(provider))
        } else {
            stage.failure_action().to_string()
        };
        lines.push(format!("Error {action}: {err}"));
    }
    if let Some(exit) = stage.exit_message() {
        lines.push(exit.to_string());
    }
    lines
}

fn print_summary(cli: &Cli, output: &PipelineOutput) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet {
        let s = &output.stats;
        eprintln!(
            "{}  {} pages ({} with text)  {} question headers  {}ms",
            green("✔"),
            s.total_pages,
            s.pages_with_text,
            bold(&s.question_headers.to_string()),
            s.total_duration_ms,
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&s.input_tokens.to_string()),
            dim(&s.output_tokens.to_string()),
        );
    }
    Ok(())
}
