//! Core domain models for docreduce.
//!
//! This module contains the data structures passed between splitting and
//! orchestration: document references, numbered chunks and partial results.
//! These are pure domain models with no I/O dependencies.

pub mod chunk;
pub mod document;

pub use chunk::{Chunk, PartialResult, order_results};
pub use document::{DocumentRef, extension_of, sanitize_display_name};
