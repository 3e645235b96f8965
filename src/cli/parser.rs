//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::agent::config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, DEFAULT_READ_TIMEOUT,
    DEFAULT_TEMPERATURE,
};
use crate::processor::{DEFAULT_BYTES_THRESHOLD, DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_MAX_WORKERS};
use crate::splitting::DEFAULT_HARD_LIMIT;

/// docreduce: ask questions about documents too large for one request.
///
/// Large PDFs and workbooks are split into standalone fragments, analyzed
/// concurrently and consolidated into a single answer.
#[derive(Parser, Debug)]
#[command(name = "docreduce")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about one or more documents.
    ///
    /// A single file streams its answer; several files are answered
    /// together after each is analyzed.
    Ask(AskArgs),

    /// Split a document into size-bounded fragments on disk.
    Split {
        /// Document to split.
        file: PathBuf,

        /// Output directory.
        #[arg(short, long, default_value = ".docreduce/fragments")]
        out_dir: PathBuf,

        /// Filename prefix (default: the file stem).
        #[arg(short, long)]
        prefix: Option<String>,

        /// Maximum fragment size in bytes.
        #[arg(long, default_value_t = DEFAULT_HARD_LIMIT)]
        hard_limit: usize,
    },

    /// List the formats with a dedicated splitter.
    Formats,
}

/// Arguments of the `ask` command.
#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// Documents to analyze.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// The question to answer.
    #[arg(short, long)]
    pub question: String,

    /// Display names, one per file in order (default: file names).
    #[arg(short, long = "name")]
    pub names: Vec<String>,

    /// Model identifier.
    #[arg(long, env = "DOCREDUCE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API key for the model endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint.
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,

    /// Concurrent fragment analyses per file.
    #[arg(long, env = "DOCREDUCE_MAX_WORKERS", default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Files larger than this many bytes are split.
    #[arg(long, default_value_t = DEFAULT_BYTES_THRESHOLD)]
    pub threshold: usize,

    /// Maximum fragment size in bytes.
    #[arg(long, default_value_t = DEFAULT_HARD_LIMIT)]
    pub hard_limit: usize,

    /// Character budget of the consolidated context.
    #[arg(long, default_value_t = DEFAULT_MAX_CONTEXT_CHARS)]
    pub max_context_chars: usize,

    /// Sampling temperature.
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Read timeout per request, in seconds.
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT.as_secs())]
    pub read_timeout: u64,

    /// Connect timeout per request, in seconds.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout: u64,

    /// Attempts per request before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}
