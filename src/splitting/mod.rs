//! Splitting strategies for docreduce.
//!
//! This module provides a trait-based system for cutting oversized
//! documents into standalone, size-bounded fragments. Strategies are
//! selected by file extension:
//!
//! - **pdf**: Contiguous page ranges found by adaptive batch search
//! - **xlsx**: Whole sheets packed greedily into new workbooks
//! - anything else: **identity**, the document as a single fragment

pub mod identity;
pub mod paged;
pub mod pdf;
pub mod sheeted;
pub mod traits;
pub mod xlsx;

pub use identity::IdentitySplitter;
pub use paged::{PageSource, pack_pages};
pub use pdf::PdfSplitter;
pub use sheeted::{SheetSource, pack_sheets};
pub use traits::{DEFAULT_HARD_LIMIT, SOFT_TARGET_RATIO, SplitLimits, Splitter};
pub use xlsx::XlsxSplitter;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static DEFAULT_REGISTRY: LazyLock<SplitterRegistry> = LazyLock::new(SplitterRegistry::new);

/// Extension-to-splitter lookup table.
///
/// Built once and read-only afterwards. Unknown extensions resolve to an
/// [`IdentitySplitter`], so lookup never fails.
///
/// # Examples
///
/// ```
/// use docreduce::splitting::SplitterRegistry;
///
/// let registry = SplitterRegistry::new();
/// assert_eq!(registry.resolve("PDF").format(), "pdf");
/// assert_eq!(registry.resolve("docx").format(), "docx");
/// ```
#[derive(Clone)]
pub struct SplitterRegistry {
    splitters: HashMap<String, Arc<dyn Splitter>>,
}

impl SplitterRegistry {
    /// Creates the standard table with the default 4 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(SplitLimits::default())
    }

    /// Creates the standard table with custom limits.
    #[must_use]
    pub fn with_limits(limits: SplitLimits) -> Self {
        Self::empty()
            .register("pdf", Arc::new(PdfSplitter::with_limits(limits)))
            .register("xlsx", Arc::new(XlsxSplitter::with_limits(limits)))
    }

    /// Creates a table where every extension resolves to identity.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            splitters: HashMap::new(),
        }
    }

    /// Adds or replaces the splitter for an extension.
    #[must_use]
    pub fn register(mut self, extension: &str, splitter: Arc<dyn Splitter>) -> Self {
        self.splitters.insert(extension.to_lowercase(), splitter);
        self
    }

    /// Returns the splitter for an extension (case-insensitive, no dot).
    #[must_use]
    pub fn resolve(&self, extension: &str) -> Arc<dyn Splitter> {
        let extension = extension.to_lowercase();
        self.splitters.get(&extension).map_or_else(
            || Arc::new(IdentitySplitter::new(&extension)) as Arc<dyn Splitter>,
            Arc::clone,
        )
    }

    /// Lists the extensions with a dedicated splitter, sorted.
    #[must_use]
    pub fn formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.splitters.keys().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }
}

impl Default for SplitterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SplitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitterRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

/// Returns the default splitter for an extension.
///
/// # Arguments
///
/// * `extension` - File extension without the dot, any case.
///
/// # Returns
///
/// The PDF or XLSX splitter, or an identity splitter for anything else.
#[must_use]
pub fn splitter_for(extension: &str) -> Arc<dyn Splitter> {
    DEFAULT_REGISTRY.resolve(extension)
}

/// Lists the formats with structural splitting.
#[must_use]
pub fn available_formats() -> Vec<&'static str> {
    vec!["pdf", "xlsx"]
}
