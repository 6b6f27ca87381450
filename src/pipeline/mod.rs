//! Pipeline stages for PDF-to-MCQ generation.
//!
//! Each submodule implements exactly one step so it can be tested without the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ persist (text) ──▶ llm ──▶ persist (docx)
//! (path)    (pdfium)    (_extracted.txt)  (MCQs)   (_mcqs.docx)
//! ```
//!
//! 1. [`input`]   — reject paths that are missing or not `.pdf`
//! 2. [`extract`] — read the text layer of each page in `spawn_blocking`
//! 3. [`persist`] — write the text file, and later the questions document
//! 4. [`llm`]     — one prompt, one model call, no retries

pub mod extract;
pub mod input;
pub mod llm;
pub mod persist;
