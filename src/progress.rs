//! Pipeline stages and the progress-callback trait.
//!
//! The library never prints. Callers that want feedback inject an
//! [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::McqConfigBuilder::progress_callback`] and receive an event
//! at the start and end of every stage. The CLI turns these into the familiar
//! "Extracting text from PDF..." lines and a spinner around the model call.
//!
//! # Example
//!
//! ```rust
//! use pdf_mcq::{McqConfig, PipelineProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl PipelineProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("{}", stage.start_message());
//!     }
//! }
//!
//! let config = McqConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The four stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Read the text layer of every page.
    Extract,
    /// Write the extracted text next to the input.
    SaveText,
    /// Ask the model for questions.
    Generate,
    /// Write the model response into a `.docx` document.
    SaveQuestions,
}

impl Stage {
    /// Line announced when the stage begins.
    pub fn start_message(self) -> &'static str {
        match self {
            Stage::Extract => "Extracting text from PDF...",
            Stage::SaveText => "Saving extracted text...",
            Stage::Generate => "Generating MCQs...",
            Stage::SaveQuestions => "Saving MCQs to Word document...",
        }
    }

    /// Gerund phrase used in `Error <action>: <cause>` diagnostics.
    pub fn failure_action(self) -> &'static str {
        match self {
            Stage::Extract => "extracting text from PDF",
            Stage::SaveText => "saving extracted text",
            Stage::Generate => "generating MCQs",
            Stage::SaveQuestions => "saving MCQs to Word document",
        }
    }

    /// Follow-up line printed after the diagnostic, for stages whose failure
    /// means "nothing was produced".
    pub fn exit_message(self) -> Option<&'static str> {
        match self {
            Stage::Extract => Some("Failed to extract text. Exiting."),
            Stage::Generate => Some("Failed to generate MCQs. Exiting."),
            Stage::SaveText | Stage::SaveQuestions => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::SaveText => "save-text",
            Stage::Generate => "generate",
            Stage::SaveQuestions => "save-questions",
        };
        f.write_str(name)
    }
}

/// Called by the orchestrator as it moves through the stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Stages never overlap, but the trait is `Send + Sync`
/// so a callback can be shared with other threads by the host application.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes.
    ///
    /// # Arguments
    /// * `stage`    — the stage that finished
    /// * `artifact` — the file written by the stage, if it writes one
    fn on_stage_complete(&self, stage: Stage, artifact: Option<&Path>) {
        let _ = (stage, artifact);
    }

    /// Called when a stage fails. The run ends right after this call.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::McqConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
