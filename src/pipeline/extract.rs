//! Text extraction: read the text layer of every page via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is synchronous and
//! keeps thread-local state. Running it on the blocking pool keeps the
//! runtime free for the model client even though the stages never overlap.
//!
//! ## Assembly rule
//!
//! Pages are visited in document order. A page whose text is empty
//! contributes nothing; every other page contributes its text followed by a
//! newline. The joined string is trimmed at both ends, so an image-only
//! document yields an empty string and the run stops before the model call.

use crate::error::McqError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming a pdfium library file or the directory that
/// contains it.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Text pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Joined, trimmed text. Never empty when returned from [`extract_text`].
    pub text: String,
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that contributed text.
    pub pages_with_text: usize,
}

/// Extract the text of every page of `pdf_path`.
///
/// Runs inside `spawn_blocking` since pdfium operations are blocking.
///
/// # Errors
/// - [`McqError::PdfiumBindingFailed`] if no pdfium library can be loaded
/// - [`McqError::CorruptPdf`], [`McqError::PasswordRequired`],
///   [`McqError::WrongPassword`] if the document cannot be opened
/// - [`McqError::NoExtractableText`] if no page yields any text
pub async fn extract_text(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedText, McqError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_text_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| McqError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of text extraction.
fn extract_text_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedText, McqError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| open_error(pdf_path, password, e))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut page_texts = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| McqError::PageTextFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Page {}: {} chars of text", idx + 1, text.len());
        page_texts.push(text);
    }

    let (text, pages_with_text) = join_page_texts(&page_texts);
    if text.is_empty() {
        warn!("No text layer found in {}", pdf_path.display());
        return Err(McqError::NoExtractableText {
            path: pdf_path.to_path_buf(),
        });
    }

    Ok(ExtractedText {
        text,
        total_pages,
        pages_with_text,
    })
}

/// Join per-page text in order and trim the result.
///
/// Returns the joined text and the number of pages that contributed.
pub fn join_page_texts<S: AsRef<str>>(pages: &[S]) -> (String, usize) {
    let mut joined = String::new();
    let mut contributed = 0;

    for page in pages {
        let page = page.as_ref();
        if page.is_empty() {
            continue;
        }
        joined.push_str(&normalise_line_endings(page));
        joined.push('\n');
        contributed += 1;
    }

    (joined.trim().to_string(), contributed)
}

/// pdfium separates lines with CRLF; the persisted text uses LF only.
fn normalise_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
}

/// Map a pdfium load error onto the matching `McqError`.
fn open_error(pdf_path: &Path, password: Option<&str>, e: PdfiumError) -> McqError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            McqError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            McqError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        McqError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}

/// Load pdfium from, in order: `PDFIUM_LIB_PATH`, the working directory, the
/// system library path.
pub fn bind_pdfium() -> Result<Pdfium, McqError> {
    let bindings = match std::env::var(PDFIUM_LIB_PATH_ENV) {
        Ok(p) if !p.is_empty() => {
            let lib = library_file(PathBuf::from(p));
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| McqError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Accept either the library file itself or its directory.
fn library_file(path: PathBuf) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(&path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_pages_in_order() {
        let pages = ["First page.", "Second page.", "Third page."];
        let (text, n) = join_page_texts(&pages);
        assert_eq!(text, "First page.\nSecond page.\nThird page.");
        assert_eq!(n, 3);
        assert_eq!(text.split('\n').count(), 3);
    }

    #[test]
    fn empty_pages_contribute_nothing() {
        let pages = ["", "Only text.", ""];
        let (text, n) = join_page_texts(&pages);
        assert_eq!(text, "Only text.");
        assert_eq!(n, 1);
    }

    #[test]
    fn image_only_document_is_empty() {
        let pages: [&str; 3] = ["", "", ""];
        assert_eq!(join_page_texts(&pages), (String::new(), 0));
        let none: [&str; 0] = [];
        assert_eq!(join_page_texts(&none), (String::new(), 0));
    }

    #[test]
    fn result_is_trimmed() {
        let pages = ["\n  Title\n", "Body  \n\n"];
        let (text, _) = join_page_texts(&pages);
        assert_eq!(text, "Title\n\nBody");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn whitespace_only_page_still_counts() {
        let pages = ["A", "   ", "B"];
        let (text, n) = join_page_texts(&pages);
        assert_eq!(text, "A\n   \nB");
        assert_eq!(n, 3);
    }

    #[test]
    fn crlf_is_normalised() {
        let pages = ["line one\r\nline two", "next\r\npage"];
        let (text, _) = join_page_texts(&pages);
        assert_eq!(text, "line one\nline two\nnext\npage");
        assert!(!text.contains('\r'));
    }
}
