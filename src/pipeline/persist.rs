//! Persistence: write the extracted text and the generated questions.
//!
//! Both writers go through a sibling `.tmp` file followed by a rename, so an
//! existing artifact is either fully replaced or left as it was. Neither
//! writer appends or merges. Files are created with the process umask, like
//! any plain `fs::write`.

use crate::error::McqError;
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Style id of the document heading.
const HEADING_STYLE_ID: &str = "Heading1";

/// Write `text` to `path` as UTF-8, replacing any existing file.
pub fn save_text(text: &str, path: &Path) -> Result<(), McqError> {
    let io_err = |source: std::io::Error| McqError::TextWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    // Atomic write: write to temp, then rename
    let tmp_path = prepare_tmp_path(path).map_err(io_err)?;
    let written = fs::write(&tmp_path, text).and_then(|_| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Lines of `response` that become body paragraphs.
///
/// Lines whose trimmed form is empty are dropped; all others are kept as-is
/// (a trailing `\r` from CRLF input excepted), in their original order.
pub fn mcq_paragraphs(response: &str) -> Vec<&str> {
    response
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Build the questions document: one level-1 heading, then one paragraph per
/// non-blank response line.
pub fn build_mcq_document(heading: &str, response: &str) -> Docx {
    let heading_style = Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
        .name("Heading 1")
        .size(32)
        .bold();

    let mut doc = Docx::new().add_style(heading_style).add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(heading))
            .style(HEADING_STYLE_ID),
    );

    for line in mcq_paragraphs(response) {
        doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }
    doc
}

/// Save the questions document to `path`, replacing any existing file.
///
/// Returns the number of body paragraphs written.
pub fn save_mcqs_docx(heading: &str, response: &str, path: &Path) -> Result<usize, McqError> {
    let write_err = |detail: String| McqError::DocumentWriteFailed {
        path: path.to_path_buf(),
        detail,
    };

    let paragraphs = mcq_paragraphs(response).len();
    let doc = build_mcq_document(heading, response);

    let tmp_path = prepare_tmp_path(path).map_err(|e| write_err(e.to_string()))?;
    let written = File::create(&tmp_path)
        .map_err(|e| e.to_string())
        .and_then(|f| doc.build().pack(f).map_err(|e| e.to_string()))
        .and_then(|_| fs::rename(&tmp_path, path).map_err(|e| e.to_string()));
    if let Err(detail) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(detail));
    }

    debug!("Wrote {} paragraphs to {}", paragraphs, path.display());
    Ok(paragraphs)
}

/// Create the directory that will hold `path` and return the sibling temp
/// path (`name.ext.tmp`) to write through.
fn prepare_tmp_path(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::DocumentChild;

    const RESPONSE: &str = "Q1. What is 2 + 2?\n\
        A) 3\n\
        B) 4\n\
        \n\
        C) 5\n   \n\
        D) 22\n\
        Correct Answer: B\n\n";

    #[test]
    fn blank_lines_are_dropped_in_order() {
        assert_eq!(
            mcq_paragraphs(RESPONSE),
            vec![
                "Q1. What is 2 + 2?",
                "A) 3",
                "B) 4",
                "C) 5",
                "D) 22",
                "Correct Answer: B"
            ]
        );
    }

    #[test]
    fn lines_keep_inner_whitespace() {
        assert_eq!(mcq_paragraphs("  A) indented  \r\n\r\n"), vec!["  A) indented  "]);
    }

    #[test]
    fn empty_response_yields_no_paragraphs() {
        assert!(mcq_paragraphs("").is_empty());
        assert!(mcq_paragraphs("\n \n\t\n").is_empty());
    }

    #[test]
    fn document_has_heading_plus_body_paragraphs() {
        let doc = build_mcq_document("Multiple Choice Questions", RESPONSE);
        let paragraphs: Vec<_> = doc
            .document
            .children
            .iter()
            .filter(|c| matches!(c, DocumentChild::Paragraph(_)))
            .collect();
        assert_eq!(paragraphs.len(), 1 + 6);
    }

    #[test]
    fn save_text_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_extracted.txt");
        let text = "Ünïcødé line\nsecond line — with dash";
        save_text(text, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), text.as_bytes());
    }

    #[test]
    fn save_text_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_extracted.txt");
        std::fs::write(&path, "old content that is longer than the new one").unwrap();
        save_text("new", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn save_text_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/doc_extracted.txt");
        save_text("x", &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn save_docx_writes_zip_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_mcqs.docx");
        std::fs::write(&path, "stale").unwrap();

        let written = save_mcqs_docx("Multiple Choice Questions", RESPONSE, &path).unwrap();
        assert_eq!(written, 6);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "docx must be a zip package");
        // No temp files left behind.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn tmp_path_sits_beside_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out/doc_mcqs.docx");
        let tmp = prepare_tmp_path(&target).unwrap();
        assert_eq!(tmp, dir.path().join("out/doc_mcqs.docx.tmp"));
        assert!(dir.path().join("out").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn artifacts_get_plain_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "x").unwrap();
        let expected = std::fs::metadata(&plain).unwrap().permissions().mode() & 0o777;

        let text = dir.path().join("doc_extracted.txt");
        save_text("x", &text).unwrap();
        let docx = dir.path().join("doc_mcqs.docx");
        save_mcqs_docx("Multiple Choice Questions", RESPONSE, &docx).unwrap();

        for path in [&text, &docx] {
            let mode = std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, expected, "{}", path.display());
        }
    }

    #[test]
    fn failed_write_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes the rename fail.
        let path = dir.path().join("doc_extracted.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let err = save_text("new", &path).unwrap_err();
        assert!(matches!(err, McqError::TextWriteFailed { .. }), "got: {err:?}");
        assert!(!dir.path().join("doc_extracted.txt.tmp").exists());
    }
}
