//! Map-reduce orchestration for docreduce.
//!
//! Decides whether each file is analyzed whole or split, fans fragment
//! analyses out to a bounded worker pool, reduces the ordered partial
//! answers into a size-capped context and streams the consolidated answer.

pub mod config;
pub mod context;
pub mod orchestrator;

pub use config::{
    DEFAULT_BYTES_THRESHOLD, DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_MAX_WORKERS, ProcessorConfig,
};
pub use context::{PART_SEPARATOR, TRUNCATION_MARKER, build_context, truncate_context};
pub use orchestrator::{DocumentProcessor, TextStream};
