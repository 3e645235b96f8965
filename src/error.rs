//! Error types for docreduce operations.
//!
//! This module provides the error hierarchy using `thiserror` for splitting,
//! agent calls, file I/O and CLI commands.

use thiserror::Error;

/// Result type alias for docreduce operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for docreduce operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Structural splitting errors (PDF, XLSX).
    #[error("split error: {0}")]
    Split(#[from] SplitError),

    /// Analysis agent errors (requests, streams).
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Invalid state errors.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state.
        message: String,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors raised while splitting a document into size-bounded fragments.
///
/// A split failure is fatal for the file: the input is never passed through
/// as a single oversized chunk instead.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The PDF could not be parsed or a page range could not be serialized.
    #[error("critical error processing PDF: {reason}")]
    Pdf {
        /// Reason for failure.
        reason: String,
    },

    /// The workbook could not be opened or a sheet group could not be written.
    #[error("critical error processing XLSX: {reason}")]
    Xlsx {
        /// Reason for failure.
        reason: String,
    },

    /// The blocking split task did not complete.
    #[error("split task failed: {0}")]
    Task(String),
}

/// Errors raised by an analysis agent.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The request to the model failed after all attempts.
    #[error("request to {model} failed: {reason}")]
    Request {
        /// Model identifier.
        model: String,
        /// Reason for failure.
        reason: String,
    },

    /// The model answered without any text content.
    #[error("empty response from {model}")]
    EmptyResponse {
        /// Model identifier.
        model: String,
    },

    /// A response stream broke off mid-way.
    #[error("response stream failed: {0}")]
    Stream(String),

    /// The request could not be built (attachment rendering, arguments).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

// Implement From traits for library errors

impl From<lopdf::Error> for SplitError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf {
            reason: err.to_string(),
        }
    }
}

impl From<calamine::XlsxError> for SplitError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Xlsx {
            reason: err.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for SplitError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx {
            reason: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for SplitError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidState {
            message: "test error".to_string(),
        };
        assert_eq!(err.to_string(), "invalid state: test error");
    }

    #[test]
    fn test_split_error_display() {
        let err = SplitError::Pdf {
            reason: "no trailer".to_string(),
        };
        assert_eq!(err.to_string(), "critical error processing PDF: no trailer");

        let err = SplitError::Xlsx {
            reason: "bad zip".to_string(),
        };
        assert_eq!(err.to_string(), "critical error processing XLSX: bad zip");
    }

    #[test]
    fn test_agent_error_display() {
        let err = AgentError::Request {
            model: "gpt-4o".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "request to gpt-4o failed: timeout");

        let err = AgentError::EmptyResponse {
            model: "gpt-4o".to_string(),
        };
        assert!(err.to_string().contains("empty response"));

        let err = AgentError::Stream("reset by peer".to_string());
        assert!(err.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_io_error_display() {
        let err = IoError::FileNotFound {
            path: "/tmp/report.pdf".to_string(),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/report.pdf");
    }

    #[test]
    fn test_io_error_variants() {
        let err = IoError::ReadFailed {
            path: "/tmp/test".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("/tmp/test"));
        assert!(err.to_string().contains("permission denied"));

        let err = IoError::WriteFailed {
            path: "/tmp/out".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("disk full"));

        let err = IoError::DirectoryFailed {
            path: "/tmp/dir".to_string(),
            reason: "exists".to_string(),
        };
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_command_error_display() {
        let err: Error = CommandError::InvalidArgument("1 names given for 2 files".to_string()).into();
        assert_eq!(
            err.to_string(),
            "command error: invalid argument: 1 names given for 2 files"
        );
    }

    #[test]
    fn test_error_from_io() {
        let err: Error = IoError::FileNotFound {
            path: "report.pdf".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: file not found: report.pdf");
    }

    #[test]
    fn test_error_from_split() {
        let err: Error = SplitError::Task("cancelled".to_string()).into();
        assert!(matches!(err, Error::Split(_)));
        assert!(err.to_string().starts_with("split error:"));
    }

    #[test]
    fn test_error_from_agent() {
        let err: Error = AgentError::InvalidRequest("empty".to_string()).into();
        assert!(matches!(err, Error::Agent(_)));
    }

    #[test]
    fn test_from_lopdf_error() {
        let err: SplitError = lopdf::Document::load_mem(b"not a pdf").unwrap_err().into();
        assert!(matches!(err, SplitError::Pdf { .. }));
    }

    #[test]
    fn test_error_config() {
        let err = Error::Config {
            message: "max_workers must be > 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: max_workers must be > 0"
        );
    }
}
