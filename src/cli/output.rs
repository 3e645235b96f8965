//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::Error;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// One fragment written by the `split` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFragment {
    /// Fragment number, starting at 1.
    pub sequence: usize,
    /// Path of the written file.
    pub path: String,
    /// Fragment size in bytes.
    pub bytes: usize,
}

/// Summary of a `split` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Source document path.
    pub source: String,
    /// Format used to pick the splitter.
    pub format: String,
    /// Source size in bytes.
    pub source_bytes: usize,
    /// Fragment ceiling in bytes.
    pub hard_limit: usize,
    /// Written fragments in order.
    pub fragments: Vec<WrittenFragment>,
}

/// Answer produced by the `ask` command in JSON mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerReport {
    /// Model that produced the answer.
    pub model: String,
    /// The question asked.
    pub question: String,
    /// Documents the answer covers.
    pub files: Vec<String>,
    /// Full answer text.
    pub answer: String,
}

/// Formats a split report.
#[must_use]
pub fn format_split_report(report: &SplitReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_split_report_text(report),
        OutputFormat::Json => format_json(report),
    }
}

fn format_split_report_text(report: &SplitReport) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Split {} ({}, {}) into {} fragments (limit {}):",
        report.source,
        report.format,
        format_size(report.source_bytes),
        report.fragments.len(),
        format_size(report.hard_limit)
    );
    for fragment in &report.fragments {
        let flag = if fragment.bytes > report.hard_limit {
            "  [over limit]"
        } else {
            ""
        };
        let _ = writeln!(
            output,
            "  {:>4}  {:>10}  {}{flag}",
            fragment.sequence,
            format_size(fragment.bytes),
            fragment.path
        );
    }
    output
}

/// Formats the list of splitting formats.
#[must_use]
pub fn format_formats(formats: &[&str], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str("Formats with a dedicated splitter:\n");
            for name in formats {
                let _ = writeln!(output, "  {name}");
            }
            output.push_str("Other formats are analyzed whole.\n");
            output
        }
        OutputFormat::Json => format_json(&formats),
    }
}

/// Formats a complete answer as JSON.
///
/// Text answers are written as they stream in and never pass through here.
#[must_use]
pub fn format_answer(report: &AnswerReport) -> String {
    format_json(report)
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({
            "error": error.to_string(),
        })),
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
