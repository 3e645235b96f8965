//! Pass-through splitter for formats without structural splitting.

use crate::error::Result;
use crate::splitting::traits::Splitter;

/// Splitter that returns its input unchanged as a single fragment.
///
/// Used for every extension without a dedicated strategy. The format tag is
/// the file's lowercased extension so the agent still learns the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySplitter {
    format: String,
}

impl IdentitySplitter {
    /// Creates an identity splitter reporting the given format.
    #[must_use]
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_lowercase(),
        }
    }
}

impl Splitter for IdentitySplitter {
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>> {
        Ok(vec![input.to_vec()])
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn description(&self) -> &'static str {
        "Pass-through: the whole document as one fragment"
    }
}
