//! The question-generation prompt.
//!
//! The prompt is fixed: five questions, four options labelled A–D, and a
//! `Correct Answer:` line, anchored by a literal example so small local models
//! copy the layout. Keeping it here lets tests inspect the exact text without
//! a model.

/// Number of questions the prompt asks for.
pub const QUESTION_COUNT: usize = 5;

/// Instruction header that opens every prompt.
pub const MCQ_INSTRUCTIONS: &str = "Generate 5 multiple-choice questions based on the following text. \
Each question must have 4 options (A, B, C, D) and specify the correct answer. \
Use this exact format:\n\n";

/// Worked example anchoring the expected output format.
pub const MCQ_EXAMPLE: &str = "Example:\n\
Q1. What is the capital of France?\n\
A) Berlin\n\
B) Madrid\n\
C) Paris\n\
D) Rome\n\
Correct Answer: C\n\n";

/// Marker placed immediately before the source text.
pub const TEXT_MARKER: &str = "Text:\n";

/// Closing instruction placed after the source text.
pub const CLOSING_INSTRUCTION: &str = "Now generate 5 questions in this format:";

/// Build the full prompt for `text`.
///
/// The text is trimmed and embedded verbatim between [`TEXT_MARKER`] and
/// [`CLOSING_INSTRUCTION`], separated from the latter by a blank line.
pub fn build_mcq_prompt(text: &str) -> String {
    format!(
        "{MCQ_INSTRUCTIONS}{MCQ_EXAMPLE}{TEXT_MARKER}{}\n\n{CLOSING_INSTRUCTION}",
        text.trim()
    )
}
