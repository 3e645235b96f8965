//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, SplitReport, WrittenFragment, format_formats, format_split_report,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::extension_of;
use crate::error::{IoError, Result, SplitError};
use crate::io::{read_document, write_chunks};
use crate::splitting::{SplitLimits, SplitterRegistry, available_formats};
use std::io::Write;
use std::path::Path;

#[cfg(feature = "openai")]
use crate::cli::parser::AskArgs;

/// Executes the CLI command, writing its output to `out`.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
/// * `out` - Destination of the command output, usually stdout.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub async fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        #[cfg(feature = "openai")]
        Commands::Ask(args) => ask::cmd_ask(args, format, out).await,
        #[cfg(not(feature = "openai"))]
        Commands::Ask(_) => Err(crate::error::CommandError::ExecutionFailed(
            "the ask command requires the `openai` feature".to_string(),
        )
        .into()),
        Commands::Split {
            file,
            out_dir,
            prefix,
            hard_limit,
        } => {
            let output = cmd_split(file, out_dir, prefix.as_deref(), *hard_limit, format).await?;
            emit(out, &output).map(|_| ())
        }
        Commands::Formats => emit(out, &format_formats(&available_formats(), format)).map(|_| ()),
    }
}

/// Writes `text` to `out`, returning `false` once the reader has gone away.
fn emit<W: Write>(out: &mut W, text: &str) -> Result<bool> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => Ok(true),
        // Reader closed the pipe (e.g. `| head`).
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(false),
        Err(e) => Err(IoError::WriteFailed {
            path: "<stdout>".to_string(),
            reason: e.to_string(),
        }
        .into()),
    }
}

async fn cmd_split(
    file: &Path,
    out_dir: &Path,
    prefix: Option<&str>,
    hard_limit: usize,
    format: OutputFormat,
) -> Result<String> {
    let limits = SplitLimits::new(hard_limit);
    limits.validate()?;

    let bytes = read_document(file).await?;
    let source_bytes = bytes.len();
    let extension = extension_of(file);
    let splitter = SplitterRegistry::with_limits(limits).resolve(&extension);
    let splitter_format = splitter.format().to_string();

    let blobs = tokio::task::spawn_blocking(move || splitter.split(&bytes))
        .await
        .map_err(SplitError::from)??;

    let prefix = prefix.map_or_else(
        || {
            file.file_stem()
                .map_or_else(|| "fragment".to_string(), |s| s.to_string_lossy().to_string())
        },
        str::to_string,
    );
    let paths = write_chunks(out_dir, &prefix, &extension, &blobs)?;

    let fragments = paths
        .into_iter()
        .zip(&blobs)
        .enumerate()
        .map(|(i, (path, blob))| WrittenFragment {
            sequence: i + 1,
            path,
            bytes: blob.len(),
        })
        .collect();

    let report = SplitReport {
        source: file.to_string_lossy().to_string(),
        format: splitter_format,
        source_bytes,
        hard_limit,
        fragments,
    };
    Ok(format_split_report(&report, format))
}

#[cfg(feature = "openai")]
mod ask {
    use super::{AskArgs, OutputFormat, Result, emit};
    use crate::agent::{AgentConfig, OpenAiAgent};
    use crate::cli::output::{AnswerReport, format_answer};
    use crate::core::DocumentRef;
    use crate::error::CommandError;
    use crate::events::TracingListener;
    use crate::processor::{DocumentProcessor, ProcessorConfig};
    use futures_util::StreamExt;
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    pub(super) async fn cmd_ask<W: Write>(
        args: &AskArgs,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<()> {
        let files = documents(args)?;
        let file_names: Vec<String> = files.iter().map(|doc| doc.name.clone()).collect();

        let mut agent_config = AgentConfig::new(&args.model)
            .with_temperature(args.temperature)
            .with_read_timeout(Duration::from_secs(args.read_timeout))
            .with_connect_timeout(Duration::from_secs(args.connect_timeout))
            .with_max_attempts(args.max_attempts);
        if let Some(key) = &args.api_key {
            agent_config = agent_config.with_api_key(key);
        }
        if let Some(base) = &args.api_base {
            agent_config = agent_config.with_api_base(base);
        }
        let agent = Arc::new(OpenAiAgent::new(agent_config)?);

        let config = ProcessorConfig::default()
            .with_model(&args.model)
            .with_max_workers(args.max_workers)
            .with_bytes_threshold(args.threshold)
            .with_hard_limit(args.hard_limit)
            .with_max_context_chars(args.max_context_chars);
        let processor =
            DocumentProcessor::new(agent, config)?.add_listener(Arc::new(TracingListener));

        let mut answer = processor.process(files, args.question.clone());
        match format {
            OutputFormat::Text => {
                let mut last = String::new();
                while let Some(fragment) = answer.next().await {
                    let fragment = fragment?;
                    if !emit(out, &fragment)? {
                        return Ok(());
                    }
                    last = fragment;
                }
                if !last.ends_with('\n') {
                    emit(out, "\n")?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                let mut text = String::new();
                while let Some(fragment) = answer.next().await {
                    text.push_str(&fragment?);
                }
                let report = AnswerReport {
                    model: args.model.clone(),
                    question: args.question.clone(),
                    files: file_names,
                    answer: text,
                };
                emit(out, &format_answer(&report)).map(|_| ())
            }
        }
    }

    /// Pairs each path with its display name.
    pub(super) fn documents(args: &AskArgs) -> Result<Vec<DocumentRef>> {
        if args.names.is_empty() {
            return Ok(args.files.iter().map(DocumentRef::from_path).collect());
        }
        if args.names.len() != args.files.len() {
            return Err(CommandError::InvalidArgument(format!(
                "{} names given for {} files",
                args.names.len(),
                args.files.len()
            ))
            .into());
        }
        Ok(args
            .files
            .iter()
            .zip(&args.names)
            .map(|(path, name)| DocumentRef::new(path, name))
            .collect())
    }
}
