//! Orchestration settings.

use crate::agent::config::DEFAULT_MODEL;
use crate::error::{Error, Result};
use crate::splitting::{DEFAULT_HARD_LIMIT, SplitLimits};

/// Default number of concurrent chunk analyses per file.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Files larger than this many bytes are split before analysis.
pub const DEFAULT_BYTES_THRESHOLD: usize = 4_300_000;

/// Default character budget of the consolidated context.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 150_000;

/// Settings for a [`crate::processor::DocumentProcessor`].
///
/// Read once at construction.
///
/// # Examples
///
/// ```
/// use docreduce::processor::ProcessorConfig;
///
/// let config = ProcessorConfig::default().with_max_workers(2);
/// assert_eq!(config.max_workers, 2);
/// assert_eq!(config.bytes_threshold, 4_300_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Concurrent chunk analyses per file.
    pub max_workers: usize,
    /// Model identifier reported in logs; expected to match the agent's.
    pub model: String,
    /// Ceiling on a single fragment, in bytes.
    pub hard_limit: usize,
    /// Size above which a file is split, in bytes.
    pub bytes_threshold: usize,
    /// Character budget of the consolidated context.
    pub max_context_chars: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            model: DEFAULT_MODEL.to_string(),
            hard_limit: DEFAULT_HARD_LIMIT,
            bytes_threshold: DEFAULT_BYTES_THRESHOLD,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

impl ProcessorConfig {
    /// Sets the number of concurrent chunk analyses.
    #[must_use]
    pub const fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the fragment ceiling.
    #[must_use]
    pub const fn with_hard_limit(mut self, bytes: usize) -> Self {
        self.hard_limit = bytes;
        self
    }

    /// Sets the split threshold.
    #[must_use]
    pub const fn with_bytes_threshold(mut self, bytes: usize) -> Self {
        self.bytes_threshold = bytes;
        self
    }

    /// Sets the consolidated context budget.
    #[must_use]
    pub const fn with_max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = chars;
        self
    }

    /// Returns the split limits derived from the hard limit.
    #[must_use]
    pub const fn split_limits(&self) -> SplitLimits {
        SplitLimits::new(self.hard_limit)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any count or limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::Config {
                message: "max_workers must be > 0".to_string(),
            });
        }
        if self.max_context_chars == 0 {
            return Err(Error::Config {
                message: "max_context_chars must be > 0".to_string(),
            });
        }
        self.split_limits().validate()
    }
}
