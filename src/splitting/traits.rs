//! Splitter trait definition and size limits.
//!
//! Defines the interface for all splitting strategies, enabling
//! pluggable per-format document segmentation.

use crate::error::{Error, Result};

/// Trait for splitting a document into standalone, size-bounded fragments.
///
/// Implementations must be `Send + Sync` so a shared instance can run on a
/// blocking worker thread. Each splitter produces the same output for the
/// same input, preserving the document's natural unit order (pages, sheets).
///
/// # Examples
///
/// ```
/// use docreduce::splitting::{IdentitySplitter, Splitter};
///
/// let splitter = IdentitySplitter::new("txt");
/// let blobs = splitter.split(b"hello").unwrap();
/// assert_eq!(blobs, vec![b"hello".to_vec()]);
/// ```
pub trait Splitter: Send + Sync {
    /// Splits the input into fragments.
    ///
    /// # Arguments
    ///
    /// * `input` - Raw document bytes.
    ///
    /// # Returns
    ///
    /// Ordered fragments, each a valid document of the same format. An empty
    /// vector means the document has no units (zero pages, zero sheets).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SplitError`] if the document cannot be parsed
    /// or a fragment cannot be serialized.
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>>;

    /// Returns the format tag sent alongside each fragment (e.g. "pdf").
    fn format(&self) -> &str;

    /// Returns a description of the splitting strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }
}

/// Default hard ceiling on a single fragment: 4 MiB.
pub const DEFAULT_HARD_LIMIT: usize = 4 * 1024 * 1024;

/// Fraction of the hard limit aimed for when sizing fragments.
pub const SOFT_TARGET_RATIO: f64 = 0.90;

/// Byte-size ceiling for split output.
///
/// # Examples
///
/// ```
/// use docreduce::splitting::SplitLimits;
///
/// let limits = SplitLimits::default();
/// assert_eq!(limits.hard_limit(), 4_194_304);
/// assert_eq!(limits.soft_target(), 3_774_873);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitLimits {
    hard_limit: usize,
}

impl SplitLimits {
    /// Creates limits with the given hard ceiling in bytes.
    #[must_use]
    pub const fn new(hard_limit: usize) -> Self {
        Self { hard_limit }
    }

    /// Returns the hard ceiling in bytes.
    #[must_use]
    pub const fn hard_limit(&self) -> usize {
        self.hard_limit
    }

    /// Returns the soft target, `floor(hard_limit * 0.90)`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn soft_target(&self) -> usize {
        (self.hard_limit as f64 * SOFT_TARGET_RATIO) as usize
    }

    /// Validates the limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the hard limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.hard_limit == 0 {
            return Err(Error::Config {
                message: "hard limit must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SplitLimits {
    fn default() -> Self {
        Self::new(DEFAULT_HARD_LIMIT)
    }
}
