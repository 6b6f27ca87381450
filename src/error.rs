//! Error type for the pdf-mcq library.
//!
//! Every stage of the pipeline reports failure through [`McqError`]. The run
//! is linear and a failed stage ends it, so there is a single fatal error type
//! rather than a fatal/non-fatal split. [`McqError::stage`] tells the caller
//! which stage produced the error so the CLI can phrase its diagnostic.

use crate::progress::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-mcq library.
#[derive(Debug, Error)]
pub enum McqError {
    // ── Model set-up ──────────────────────────────────────────────────────
    /// The configured provider could not be constructed.
    #[error("LLM provider '{provider}' could not be initialised: {hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path does not name an existing file.
    #[error("File does not exist at the specified path: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Input file exists but does not carry a `.pdf` extension.
    #[error("File is not a .pdf file: '{path}'")]
    NotAPdf { path: PathBuf },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library in the working directory."
    )]
    PdfiumBindingFailed(String),

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium failed to read the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    PageTextFailed { page: usize, detail: String },

    /// The document opened fine but no page produced any text.
    #[error("No extractable text in '{path}' (image-only or empty document)")]
    NoExtractableText { path: PathBuf },

    // ── Generation errors ─────────────────────────────────────────────────
    /// The model call returned an error.
    #[error("LLM call to '{model}' failed: {message}")]
    LlmApiError { model: String, message: String },

    /// The model call exceeded `api_timeout_secs`.
    #[error("LLM call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    /// The model answered with an empty string.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not write the extracted-text file.
    #[error("Failed to write text file '{path}': {source}")]
    TextWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not build or save the `.docx` document.
    #[error("Failed to write document '{path}': {detail}")]
    DocumentWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McqError {
    /// The pipeline stage this error belongs to.
    ///
    /// Returns `None` for errors raised before any stage runs (model set-up,
    /// input validation, configuration).
    pub fn stage(&self) -> Option<Stage> {
        match self {
            McqError::ProviderNotConfigured { .. }
            | McqError::FileNotFound { .. }
            | McqError::NotAPdf { .. }
            | McqError::InvalidConfig(_)
            | McqError::Internal(_) => None,
            McqError::PdfiumBindingFailed(_)
            | McqError::CorruptPdf { .. }
            | McqError::PasswordRequired { .. }
            | McqError::WrongPassword { .. }
            | McqError::PageTextFailed { .. }
            | McqError::NoExtractableText { .. } => Some(Stage::Extract),
            McqError::TextWriteFailed { .. } => Some(Stage::SaveText),
            McqError::LlmApiError { .. } | McqError::ApiTimeout { .. } | McqError::EmptyResponse => {
                Some(Stage::Generate)
            }
            McqError::DocumentWriteFailed { .. } => Some(Stage::SaveQuestions),
        }
    }

    /// True for failures detected while validating the input path.
    pub fn is_input_error(&self) -> bool {
        matches!(self, McqError::FileNotFound { .. } | McqError::NotAPdf { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_attribution() {
        assert_eq!(
            McqError::NoExtractableText { path: "a.pdf".into() }.stage(),
            Some(Stage::Extract)
        );
        assert_eq!(McqError::EmptyResponse.stage(), Some(Stage::Generate));
        assert_eq!(McqError::ApiTimeout { secs: 5 }.stage(), Some(Stage::Generate));
        assert_eq!(
            McqError::DocumentWriteFailed {
                path: "a_mcqs.docx".into(),
                detail: "disk full".into()
            }
            .stage(),
            Some(Stage::SaveQuestions)
        );
        assert_eq!(McqError::FileNotFound { path: "x".into() }.stage(), None);
    }

    #[test]
    fn input_errors() {
        assert!(McqError::NotAPdf { path: "notes.txt".into() }.is_input_error());
        assert!(!McqError::EmptyResponse.is_input_error());
    }

    #[test]
    fn text_write_display_includes_cause() {
        let e = McqError::TextWriteFailed {
            path: "out/doc_extracted.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let msg = e.to_string();
        assert!(msg.contains("doc_extracted.txt"), "got: {msg}");
        assert!(msg.contains("read-only"), "got: {msg}");
    }

    #[test]
    fn llm_error_display() {
        let e = McqError::LlmApiError {
            model: "llama3".into(),
            message: "connection refused".into(),
        };
        assert!(e.to_string().contains("llama3"));
        assert!(e.to_string().contains("connection refused"));
    }
}
