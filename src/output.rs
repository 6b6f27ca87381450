//! Output types: where artifacts go and what a run reports back.

use crate::config::McqConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The two files a run writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    /// Plain-text file holding the extracted text.
    pub text_file: PathBuf,
    /// `.docx` document holding the generated questions.
    pub mcq_file: PathBuf,
}

impl OutputPaths {
    /// Derive artifact paths from the input PDF.
    ///
    /// Both files share the input's stem, with the configured suffixes, and
    /// live in `config.output_dir` or, if unset, the input's directory.
    pub fn for_input(pdf_path: &Path, config: &McqConfig) -> Self {
        let dir = match config.output_dir {
            Some(ref d) => d.clone(),
            None => pdf_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        let stem = pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            text_file: dir.join(format!("{stem}{}", config.text_suffix)),
            mcq_file: dir.join(format!("{stem}{}", config.mcq_suffix)),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// The PDF that was processed.
    pub input: PathBuf,
    /// Files written.
    pub paths: OutputPaths,
    /// Extracted text, exactly as written to `paths.text_file`.
    pub text: String,
    /// Raw model response, unmodified.
    pub response: String,
    /// Run statistics.
    pub stats: PipelineStats,
}

/// Counters and timings for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that contributed text.
    pub pages_with_text: usize,
    /// Characters of extracted text.
    pub text_chars: usize,
    /// Prompt tokens reported by the provider (0 if not reported).
    pub input_tokens: usize,
    /// Completion tokens reported by the provider (0 if not reported).
    pub output_tokens: usize,
    /// Lines in the response that look like question headers (`Q1.`, `2)` …).
    ///
    /// Informational only; the response is never checked against the
    /// requested count.
    pub question_headers: usize,
    /// Paragraphs written below the heading.
    pub paragraphs_written: usize,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

static QUESTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\*\*)?(?:Q(?:uestion)?[ \t]*)?\d+[ \t]*[.):]").expect("valid regex")
});

/// Count lines that open a question in a model response.
pub fn count_question_headers(response: &str) -> usize {
    QUESTION_HEADER.find_iter(response).count()
}
