//! Orchestration: drive the four stages in order and stop at the first
//! failure.
//!
//! ```text
//! connect model ─▶ validate path ─▶ extract ─▶ save text ─▶ generate ─▶ save docx
//! ```
//!
//! Nothing is retried and nothing runs concurrently. Every stage reports to
//! the configured progress callback, which is how the CLI prints its
//! messages; the library itself only logs through `tracing`.

use crate::config::McqConfig;
use crate::error::McqError;
use crate::output::{count_question_headers, OutputPaths, PipelineOutput, PipelineStats};
use crate::pipeline::llm::{self, LlmModel, QuestionModel};
use crate::pipeline::extract::{self, ExtractedText};
use crate::pipeline::{input, persist};
use crate::progress::Stage;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Run the whole pipeline on `input` with the model described by `config`.
///
/// The model handle is created before the path is looked at, so a
/// misconfigured provider fails fast.
///
/// # Example
/// ```rust,no_run
/// use pdf_mcq::{run, McqConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let output = run("lecture.pdf", &McqConfig::default()).await?;
/// println!("questions in {}", output.paths.mcq_file.display());
/// # Ok(())
/// # }
/// ```
pub async fn run(
    input_str: impl AsRef<str>,
    config: &McqConfig,
) -> Result<PipelineOutput, McqError> {
    let model = connect_model(config)?;
    run_with_model(input_str, &model, config).await
}

/// Synchronous wrapper around [`run`].
///
/// Creates a single-threaded tokio runtime internally.
pub fn run_sync(
    input_str: impl AsRef<str>,
    config: &McqConfig,
) -> Result<PipelineOutput, McqError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| McqError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run(input_str, config))
}

/// Build the model handle described by `config`.
///
/// A pre-built provider in `config.provider` is used as-is; otherwise
/// `ProviderFactory` creates `config.provider_name` with `config.model`.
pub fn connect_model(config: &McqConfig) -> Result<LlmModel, McqError> {
    let provider = resolve_provider(config)?;
    info!("Using {} via {}", config.model, provider_label(config));
    Ok(LlmModel::new(provider, config))
}

/// Run the pipeline on `input` with an already-connected `model`.
///
/// # Errors
/// Returns the first stage error. Input errors
/// ([`McqError::FileNotFound`], [`McqError::NotAPdf`]) are raised before
/// extraction starts and before any file is written.
pub async fn run_with_model<M: QuestionModel>(
    input_str: impl AsRef<str>,
    model: &M,
    config: &McqConfig,
) -> Result<PipelineOutput, McqError> {
    let total_start = Instant::now();

    // ── Validate input ───────────────────────────────────────────────────
    let pdf_path = input::validate_input(input_str.as_ref())?;
    info!("Starting run: {}", pdf_path.display());

    // ── Stage 1: Extract ─────────────────────────────────────────────────
    announce(config, Stage::Extract);
    let extract_start = Instant::now();
    let extracted = report(
        config,
        Stage::Extract,
        None,
        extract::extract_text(&pdf_path, config.password.as_deref()).await,
    )?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} chars from {}/{} pages",
        extracted.text.len(),
        extracted.pages_with_text,
        extracted.total_pages
    );

    let mut output = run_from_text(&pdf_path, extracted, model, config).await?;
    output.stats.extract_duration_ms = extract_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Run complete: {} paragraphs, {}ms total",
        output.stats.paragraphs_written, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Run the stages that follow extraction: save text, generate, save
/// questions.
///
/// `pdf_path` only names the artifacts; it is not read. Useful when the text
/// comes from somewhere other than pdfium.
pub async fn run_from_text<M: QuestionModel>(
    pdf_path: &Path,
    extracted: ExtractedText,
    model: &M,
    config: &McqConfig,
) -> Result<PipelineOutput, McqError> {
    let start = Instant::now();
    let paths = OutputPaths::for_input(pdf_path, config);

    // ── Stage 2: Save text ───────────────────────────────────────────────
    announce(config, Stage::SaveText);
    report(
        config,
        Stage::SaveText,
        Some(&paths.text_file),
        persist::save_text(&extracted.text, &paths.text_file),
    )?;

    // ── Stage 3: Generate ────────────────────────────────────────────────
    announce(config, Stage::Generate);
    let llm_start = Instant::now();
    let reply = report(
        config,
        Stage::Generate,
        None,
        llm::generate_mcqs(model, &extracted.text).await,
    )?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    let question_headers = count_question_headers(&reply.content);
    if question_headers != crate::prompts::QUESTION_COUNT {
        // Informational: the response is persisted unchanged either way.
        warn!(
            "Response has {} question headers (asked for {})",
            question_headers,
            crate::prompts::QUESTION_COUNT
        );
    }

    // ── Stage 4: Save questions ──────────────────────────────────────────
    announce(config, Stage::SaveQuestions);
    let paragraphs_written = report(
        config,
        Stage::SaveQuestions,
        Some(&paths.mcq_file),
        persist::save_mcqs_docx(&config.heading, &reply.content, &paths.mcq_file),
    )?;

    let stats = PipelineStats {
        total_pages: extracted.total_pages,
        pages_with_text: extracted.pages_with_text,
        text_chars: extracted.text.chars().count(),
        input_tokens: reply.prompt_tokens,
        output_tokens: reply.completion_tokens,
        question_headers,
        paragraphs_written,
        extract_duration_ms: 0,
        llm_duration_ms,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    Ok(PipelineOutput {
        input: pdf_path.to_path_buf(),
        paths,
        text: extracted.text,
        response: reply.content,
        stats,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the LLM provider.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is; handy in tests
///    or when the caller wraps the provider in its own middleware.
/// 2. **Named provider + model** — [`ProviderFactory::create_llm_provider`]
///    reads host and key settings (`OLLAMA_HOST`, `OPENAI_API_KEY`, …) from
///    the environment.
fn resolve_provider(config: &McqConfig) -> Result<Arc<dyn LLMProvider>, McqError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    ProviderFactory::create_llm_provider(&config.provider_name, &config.model).map_err(|e| {
        McqError::ProviderNotConfigured {
            provider: config.provider_name.clone(),
            hint: format!("{e}"),
        }
    })
}

fn provider_label(config: &McqConfig) -> &str {
    if config.provider.is_some() {
        "<custom provider>"
    } else {
        &config.provider_name
    }
}

fn announce(config: &McqConfig, stage: Stage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

/// Forward a stage outcome to the progress callback and hand it back.
fn report<T>(
    config: &McqConfig,
    stage: Stage,
    artifact: Option<&Path>,
    result: Result<T, McqError>,
) -> Result<T, McqError> {
    match &result {
        Ok(_) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_stage_complete(stage, artifact);
            }
        }
        Err(e) => {
            warn!("Stage {} failed: {}", stage, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_stage_error(stage, &e.to_string());
            }
        }
    }
    result
}
