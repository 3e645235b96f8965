//! System prompts and template builders for analysis calls.
//!
//! Prompts define what each call is for: analyzing one fragment, analyzing
//! a whole small document, consolidating fragment analyses, and merging
//! per-file answers. Builders format the user-side text of each request.

use std::fmt::Write;

/// System prompt for analyzing one fragment of a larger document.
pub const CHUNK_SYSTEM_PROMPT: &str = r"You are an extraction assistant working on one fragment of a larger document. Other fragments are analyzed in parallel and every result is consolidated afterwards.

## Instructions

1. Read the attached fragment in full.
2. Extract everything in it that helps answer the user's question: figures, names, dates, definitions, table rows, quoted statements.
3. Cite values exactly as they appear. Keep units and currencies.
4. If the fragment holds nothing relevant, answer only: Not in this fragment.
5. Do not guess about content outside the fragment and do not write a final conclusion.

## Style

Terse. Bullet points over prose. No preamble, no closing remarks.";

/// System prompt for answering from the whole document in one call.
pub const DOCUMENT_SYSTEM_PROMPT: &str = r"You are a document analysis assistant. Answer the user's question using the attached document.

Base every statement on the document. Quote figures exactly. When the document does not contain the answer, say so plainly instead of guessing. Use headings or lists when they make a long answer easier to scan.";

/// System prompt for consolidating fragment analyses into one answer.
pub const CONSOLIDATION_SYSTEM_PROMPT: &str = r"You are a consolidation assistant. A document was too large to analyze at once, so it was divided and each part was analyzed separately. You receive those partial analyses in document order.

## Instructions

1. Answer the user's question using only the partial analyses.
2. Merge information repeated across parts into a single statement.
3. When parts disagree, point out the contradiction and cite both values.
4. Ignore parts that report nothing relevant.
5. Write for the user: do not mention fragments, parts or the splitting process.";

/// System prompt for merging the answers obtained for several files.
pub const CROSS_FILE_SYSTEM_PROMPT: &str = r"You are a consolidation assistant. Several files were analyzed separately against the same question. You receive one answer per file, labelled with the file name.

## Instructions

1. Produce a single answer to the user's question from the per-file answers.
2. Reference individual files by name when a fact comes from one of them.
3. Combine figures across files only when they are comparable.
4. Point out contradictions between files.";

/// Set of system prompts used for one processing run.
///
/// # Examples
///
/// ```
/// use docreduce::agent::PromptSet;
///
/// let prompts = PromptSet::default().with_chunk("Only list numbers.");
/// assert_eq!(prompts.chunk, "Only list numbers.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Fragment analysis.
    pub chunk: String,
    /// Whole-document analysis.
    pub document: String,
    /// Single-file consolidation.
    pub consolidation: String,
    /// Multi-file consolidation.
    pub cross_file: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            chunk: CHUNK_SYSTEM_PROMPT.to_string(),
            document: DOCUMENT_SYSTEM_PROMPT.to_string(),
            consolidation: CONSOLIDATION_SYSTEM_PROMPT.to_string(),
            cross_file: CROSS_FILE_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl PromptSet {
    /// Replaces the fragment analysis prompt.
    #[must_use]
    pub fn with_chunk(mut self, prompt: impl Into<String>) -> Self {
        self.chunk = prompt.into();
        self
    }

    /// Replaces the whole-document prompt.
    #[must_use]
    pub fn with_document(mut self, prompt: impl Into<String>) -> Self {
        self.document = prompt.into();
        self
    }

    /// Replaces the single-file consolidation prompt.
    #[must_use]
    pub fn with_consolidation(mut self, prompt: impl Into<String>) -> Self {
        self.consolidation = prompt.into();
        self
    }

    /// Replaces the multi-file consolidation prompt.
    #[must_use]
    pub fn with_cross_file(mut self, prompt: impl Into<String>) -> Self {
        self.cross_file = prompt.into();
        self
    }
}

/// Builds the instruction sent alongside a fragment.
#[must_use]
pub fn chunk_instruction(question: &str) -> String {
    format!("This is a fragment of the file. The user's question is: ```{question}```")
}

/// Builds the consolidation request for one file.
///
/// # Arguments
///
/// * `fragment_count` - Number of analyzed fragments.
/// * `context` - Ordered, possibly truncated, partial analyses.
/// * `question` - The user's question.
#[must_use]
pub fn consolidation_request(fragment_count: usize, context: &str, question: &str) -> String {
    let mut out = String::with_capacity(context.len() + question.len() + 512);
    let _ = writeln!(
        out,
        "STATUS: the document was analyzed in {fragment_count} parts."
    );
    out.push_str("\nCONTEXT (partial analyses, in document order):\n");
    out.push_str(context);
    out.push_str("\n\nFINAL INSTRUCTION: Answer the user request below using exclusively the context above. ");
    out.push_str("Unify information that appears more than once and point out any contradictions.\n\n");
    let _ = write!(out, "USER REQUEST: {question}");
    out
}

/// Builds the request merging per-file answers.
///
/// # Arguments
///
/// * `answers` - `(display name, answer)` pairs in input order.
/// * `question` - The user's question.
#[must_use]
pub fn cross_file_request(answers: &[(String, String)], question: &str) -> String {
    let mut out = String::new();
    for (name, answer) in answers {
        let _ = writeln!(out, "=== FILE: {name} ===");
        out.push_str(answer.trim_end());
        out.push_str("\n\n");
    }
    let _ = write!(out, "USER REQUEST: {question}");
    out
}
