//! # docreduce
//!
//! Map-reduce question answering over documents too large for a single
//! model request.
//!
//! Oversized files are cut into standalone, size-bounded fragments, each
//! fragment is analyzed concurrently under a worker cap, and the ordered
//! partial answers are consolidated into one streamed answer. Several files
//! are each reduced first and then answered together.
//!
//! ## Features
//!
//! - **PDF splitting**: Contiguous page ranges found by adaptive batch search
//! - **XLSX splitting**: Whole sheets packed greedily into new workbooks
//! - **Bounded fan-out**: Fragment analyses run under a semaphore
//! - **Deterministic reduction**: Partial answers ordered by fragment number
//! - **Lifecycle events**: Async listeners for progress and errors
//! - **OpenAI-compatible backend**: Behind the default `openai` feature
//!
//! ## Example
//!
//! ```
//! use docreduce::splitting::splitter_for;
//!
//! let splitter = splitter_for("txt");
//! let fragments = splitter.split(b"plain text").unwrap();
//! assert_eq!(fragments, vec![b"plain text".to_vec()]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod cli;
pub mod core;
pub mod error;
pub mod events;
pub mod io;
pub mod processor;
pub mod splitting;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Chunk, DocumentRef, PartialResult};

// Re-export agent types
pub use agent::{AgentConfig, AnalysisAgent, EventStream, Message, PromptSet, StreamEvent};
#[cfg(feature = "openai")]
pub use agent::OpenAiAgent;

// Re-export event types
pub use events::{Notifier, ProcessingListener, TracingListener};

// Re-export processing types
pub use processor::{DocumentProcessor, ProcessorConfig, TextStream};

// Re-export splitting types
pub use splitting::{
    DEFAULT_HARD_LIMIT, PdfSplitter, SplitLimits, Splitter, SplitterRegistry, XlsxSplitter,
    available_formats, splitter_for,
};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
