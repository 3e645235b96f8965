//! Document references and display-name handling.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters allowed in a display name, besides whitespace.
static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    // The pattern is a literal; compilation cannot fail.
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[^A-Za-z0-9\s\-()\[\]]").unwrap()
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\s+").unwrap()
});

/// A document to analyze: where its bytes live and what to call it.
///
/// # Examples
///
/// ```
/// use docreduce::core::DocumentRef;
///
/// let doc = DocumentRef::from_path("reports/q3_results.v2.pdf");
/// assert_eq!(doc.name, "q3_results.v2.pdf");
/// assert_eq!(doc.extension(), "pdf");
/// assert_eq!(doc.display_name(), "q3 results v2 pdf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Location of the document bytes.
    pub path: PathBuf,

    /// Human-facing name, before sanitization.
    pub name: String,
}

impl DocumentRef {
    /// Creates a document reference with an explicit name.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Creates a document reference named after the file.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy().to_string(), |n| {
                n.to_string_lossy().to_string()
            });
        Self { path, name }
    }

    /// Returns the lowercased file extension, or an empty string.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }

    /// Returns the sanitized name sent to the agent.
    #[must_use]
    pub fn display_name(&self) -> String {
        sanitize_display_name(&self.name)
    }
}

/// Returns the lowercased extension of `path`, or an empty string.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Normalizes a name into the restricted alphabet accepted for attachments.
///
/// Underscores and dots become spaces, anything outside letters, digits,
/// whitespace, hyphens, parentheses and square brackets is dropped,
/// whitespace runs collapse to a single space and the result is trimmed.
///
/// # Examples
///
/// ```
/// use docreduce::core::sanitize_display_name;
///
/// assert_eq!(sanitize_display_name("informe_final.2024.xlsx"), "informe final 2024 xlsx");
/// assert_eq!(sanitize_display_name("a@b#c"), "abc");
/// ```
#[must_use]
pub fn sanitize_display_name(name: &str) -> String {
    let spaced = name.replace(['_', '.'], " ");
    let filtered = DISALLOWED_CHARS.replace_all(&spaced, "");
    WHITESPACE_RUN
        .replace_all(&filtered, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("report.pdf", "report pdf" ; "dot becomes space")]
    #[test_case("my_file_name", "my file name" ; "underscores become spaces")]
    #[test_case("  spaced   out  ", "spaced out" ; "whitespace collapses")]
    #[test_case("Budget (draft) [v2]-final", "Budget (draft) [v2]-final" ; "brackets and hyphens kept")]
    #[test_case("naïve résumé", "nave rsum" ; "non ascii dropped")]
    #[test_case("a/b\\c:d*e", "abcde" ; "path separators dropped")]
    #[test_case("", "" ; "empty stays empty")]
    #[test_case("_._", "" ; "only separators")]
    fn test_sanitize_display_name(input: &str, expected: &str) {
        assert_eq!(sanitize_display_name(input), expected);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_display_name("Q3 results_final.v2.pdf");
        assert_eq!(sanitize_display_name(&once), once);
    }

    #[test]
    fn test_from_path_uses_file_name() {
        let doc = DocumentRef::from_path("/data/in/Sales.XLSX");
        assert_eq!(doc.name, "Sales.XLSX");
        assert_eq!(doc.extension(), "xlsx");
    }

    #[test]
    fn test_extension_missing() {
        let doc = DocumentRef::new("/data/README", "readme");
        assert_eq!(doc.extension(), "");
    }
}
