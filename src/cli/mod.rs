//! CLI layer for docreduce.
//!
//! Provides the command-line interface using clap, with commands for
//! asking questions about documents, splitting them on disk and listing
//! the supported formats.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{AskArgs, Cli, Commands};
