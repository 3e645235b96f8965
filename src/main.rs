//! Binary entry point for docreduce.
//!
//! docreduce: ask questions about documents too large for one request.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use docreduce::cli::output::{OutputFormat, format_error};
use docreduce::cli::{Cli, execute};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);

    // Logs go to stderr so stdout carries only the answer.
    let default_filter = if cli.verbose {
        "docreduce=debug"
    } else {
        "docreduce=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    match execute(&cli, &mut io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json => {
                    // JSON errors go to stdout for programmatic parsing
                    println!("{error_output}");
                }
                OutputFormat::Text => {
                    eprintln!("Error: {error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
