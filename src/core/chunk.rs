//! Chunk and partial-result representation.
//!
//! A chunk is one structurally valid fragment of a document, produced by a
//! splitter and numbered at split time. A partial result is the analysis
//! text produced for one chunk. Sequence numbers are the only ordering key
//! used when partial results are reduced.

use serde::{Deserialize, Serialize};

/// A numbered fragment of a document.
///
/// # Examples
///
/// ```
/// use docreduce::core::Chunk;
///
/// let chunk = Chunk::new(1, b"%PDF-1.5".to_vec());
/// assert_eq!(chunk.sequence, 1);
/// assert_eq!(chunk.size(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position within the file, starting at 1.
    pub sequence: usize,

    /// Fragment bytes, a standalone document of the source format.
    pub bytes: Vec<u8>,
}

impl Chunk {
    /// Creates a new chunk.
    #[must_use]
    pub const fn new(sequence: usize, bytes: Vec<u8>) -> Self {
        Self { sequence, bytes }
    }

    /// Returns the size of the chunk in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Numbers split output contiguously from 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use docreduce::core::Chunk;
    ///
    /// let chunks = Chunk::sequence_all(vec![vec![1], vec![2], vec![3]]);
    /// let numbers: Vec<usize> = chunks.iter().map(|c| c.sequence).collect();
    /// assert_eq!(numbers, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn sequence_all(blobs: Vec<Vec<u8>>) -> Vec<Self> {
        blobs
            .into_iter()
            .enumerate()
            .map(|(i, bytes)| Self::new(i + 1, bytes))
            .collect()
    }
}

/// Analysis text produced for a single chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    /// Sequence number of the chunk this result belongs to.
    pub sequence: usize,

    /// Analysis text returned by the agent.
    pub text: String,
}

impl PartialResult {
    /// Creates a new partial result.
    #[must_use]
    pub const fn new(sequence: usize, text: String) -> Self {
        Self { sequence, text }
    }
}

/// Sorts partial results into chunk order.
///
/// Completion order is arbitrary; the returned texts follow sequence numbers.
#[must_use]
pub fn order_results(mut results: Vec<PartialResult>) -> Vec<String> {
    results.sort_by_key(|r| r.sequence);
    results.into_iter().map(|r| r.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_new() {
        let chunk = Chunk::new(3, vec![0u8; 10]);
        assert_eq!(chunk.sequence, 3);
        assert_eq!(chunk.size(), 10);
    }

    #[test]
    fn test_sequence_all_empty() {
        assert!(Chunk::sequence_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_sequence_all_keeps_bytes() {
        let chunks = Chunk::sequence_all(vec![b"a".to_vec(), b"bb".to_vec()]);
        assert_eq!(chunks[0].bytes, b"a");
        assert_eq!(chunks[1].bytes, b"bb");
        assert_eq!(chunks[1].sequence, 2);
    }

    #[test]
    fn test_order_results() {
        let results = vec![
            PartialResult::new(3, "third".to_string()),
            PartialResult::new(1, "first".to_string()),
            PartialResult::new(2, "second".to_string()),
        ];
        assert_eq!(order_results(results), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_partial_result_serialization() {
        let result = PartialResult::new(1, "text".to_string());
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"sequence":1,"text":"text"}"#);
    }
}
