//! # pdf-mcq
//!
//! Generate multiple-choice questions from a PDF with a locally hosted LLM.
//!
//! The text layer of every page is extracted with pdfium, saved next to the
//! input, and sent to the model with a fixed prompt asking for five questions
//! with four options and a correct-answer letter. The raw response is written,
//! one paragraph per line, into a `.docx` document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path (exists, `.pdf`)
//!  ├─ 2. Extract  pdfium text layer, pages joined in order (spawn_blocking)
//!  ├─ 3. Save     {stem}_extracted.txt
//!  ├─ 4. LLM      one prompt → one response (Ollama `llama3` by default)
//!  └─ 5. Save     {stem}_mcqs.docx, heading + one paragraph per line
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_mcq::{run, McqConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = McqConfig::builder().model("llama3").build()?;
//!     let output = run("chapter1.pdf", &config).await?;
//!     println!("{}", output.response);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2mcq` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{McqConfig, McqConfigBuilder};
pub use error::McqError;
pub use output::{OutputPaths, PipelineOutput, PipelineStats};
pub use pipeline::extract::ExtractedText;
pub use pipeline::llm::{generate_mcqs, LlmModel, ModelReply, QuestionModel};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Stage};
pub use run::{connect_model, run, run_from_text, run_sync, run_with_model};
