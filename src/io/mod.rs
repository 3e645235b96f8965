//! I/O utilities for docreduce.
//!
//! Provides asynchronous document reading for the processing pipeline and
//! fragment writing for the `split` command.

pub mod reader;

pub use reader::{read_document, write_chunks};
