//! Input validation: accept a user-typed path only if it names an existing
//! `.pdf` file.
//!
//! Validation happens before any other stage so that a typo never produces
//! output files or a model call. Only the path is checked here; whether the
//! bytes really are a PDF is left to pdfium, which reports a corrupt document
//! as an extraction failure.

use crate::error::McqError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expected input extension, compared case-insensitively.
pub const PDF_EXTENSION: &str = "pdf";

/// Validate a user-supplied path string and return it as a `PathBuf`.
///
/// Surrounding whitespace (including the newline left by line-based stdin
/// reads) is trimmed. Existence is checked before the extension, so a
/// missing `notes.txt` reports [`McqError::FileNotFound`].
pub fn validate_input(input: &str) -> Result<PathBuf, McqError> {
    let path = PathBuf::from(input.trim());

    if !path.is_file() {
        return Err(McqError::FileNotFound { path });
    }
    if !has_pdf_extension(&path) {
        return Err(McqError::NotAPdf { path });
    }

    debug!("Validated input PDF: {}", path.display());
    Ok(path)
}

/// True if `path` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PDF_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("a.pdf")));
        assert!(has_pdf_extension(Path::new("dir/B.PDF")));
        assert!(has_pdf_extension(Path::new("c.Pdf")));
        assert!(!has_pdf_extension(Path::new("d.txt")));
        assert!(!has_pdf_extension(Path::new("pdf")));
        assert!(!has_pdf_extension(Path::new("e.pdf.bak")));
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = validate_input("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, McqError::FileNotFound { .. }), "got: {err:?}");
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("folder.pdf");
        std::fs::create_dir(&sub).unwrap();
        let err = validate_input(sub.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, McqError::FileNotFound { .. }), "got: {err:?}");
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();
        let err = validate_input(file.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, McqError::NotAPdf { .. }), "got: {err:?}");
    }

    #[test]
    fn trims_whitespace_and_accepts_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Lecture.PDF");
        std::fs::write(&file, b"%PDF-1.4\n").unwrap();
        let typed = format!("  {}\n", file.display());
        assert_eq!(validate_input(&typed).unwrap(), file);
    }
}
