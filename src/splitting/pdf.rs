//! PDF splitting by contiguous page ranges.

use crate::error::{Result, SplitError};
use crate::splitting::paged::{PageSource, pack_pages};
use crate::splitting::traits::{SplitLimits, Splitter};
use lopdf::Document;
use std::ops::Range;
use tracing::info;

/// Splits PDFs into standalone documents of contiguous pages.
///
/// Inputs under the hard limit are returned untouched without being parsed.
///
/// # Examples
///
/// ```
/// use docreduce::splitting::{PdfSplitter, Splitter};
///
/// let splitter = PdfSplitter::new();
/// // Small inputs take the fast path, even when they are not valid PDFs.
/// let blobs = splitter.split(b"%PDF-1.7 tiny").unwrap();
/// assert_eq!(blobs.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfSplitter {
    limits: SplitLimits,
}

impl PdfSplitter {
    /// Creates a PDF splitter with the default 4 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a PDF splitter with custom limits.
    #[must_use]
    pub const fn with_limits(limits: SplitLimits) -> Self {
        Self { limits }
    }
}

impl Splitter for PdfSplitter {
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>> {
        if input.len() < self.limits.hard_limit() {
            return Ok(vec![input.to_vec()]);
        }

        let pages = PdfPages::load(input)?;
        info!(
            pages = pages.page_count(),
            size = input.len(),
            "splitting PDF by page ranges"
        );
        let blobs = pack_pages(&pages, input.len(), self.limits)?;
        info!(fragments = blobs.len(), "PDF split complete");
        Ok(blobs)
    }

    fn format(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &'static str {
        "Contiguous page ranges sized by adaptive batch search"
    }
}

/// A parsed PDF able to serialize page ranges on their own.
struct PdfPages {
    document: Document,
    page_numbers: Vec<u32>,
}

impl PdfPages {
    fn load(bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes).map_err(SplitError::from)?;
        let page_numbers = document.get_pages().keys().copied().collect();
        Ok(Self {
            document,
            page_numbers,
        })
    }
}

impl PageSource for PdfPages {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn render(&self, pages: Range<usize>) -> Result<Vec<u8>> {
        let outside: Vec<u32> = self
            .page_numbers
            .iter()
            .enumerate()
            .filter(|(i, _)| !pages.contains(i))
            .map(|(_, &number)| number)
            .collect();

        let mut document = self.document.clone();
        if !outside.is_empty() {
            document.delete_pages(&outside);
        }
        document.prune_objects();
        document.compress();

        let mut out = Vec::new();
        document
            .save_to(&mut out)
            .map_err(|e| SplitError::Pdf {
                reason: e.to_string(),
            })?;
        Ok(out)
    }
}
