//! Processing lifecycle notifications.
//!
//! Listeners observe a processing run: file start and end, each chunk
//! analysis, errors and the cross-file summary phase. All hooks are async
//! and default to no-ops, so a listener only implements what it needs.
//! Listeners are shared (`Arc`) and stay owned by whoever registered them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::Error;

/// Observer of processing milestones.
///
/// Files are identified by their sanitized display name.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use docreduce::events::ProcessingListener;
///
/// struct ChunkCounter;
///
/// #[async_trait]
/// impl ProcessingListener for ChunkCounter {
///     async fn on_processing_start(&self, file_name: &str, total_chunks: usize) {
///         let _ = (file_name, total_chunks);
///     }
/// }
/// ```
#[async_trait]
pub trait ProcessingListener: Send + Sync {
    /// A file started processing, split into `total_chunks` parts (1 when
    /// processed whole).
    async fn on_processing_start(&self, _file_name: &str, _total_chunks: usize) {}

    /// A chunk analysis acquired its worker slot and started.
    async fn on_chunk_start(&self, _chunk_number: usize, _file_name: &str) {}

    /// A chunk analysis finished with `response`.
    async fn on_chunk_end(&self, _chunk_number: usize, _file_name: &str, _response: &str) {}

    /// A file finished its analysis phase.
    async fn on_processing_end(&self, _file_name: &str) {}

    /// An operation failed; the error is returned to the caller afterwards.
    async fn on_error(&self, _error: &Error) {}

    /// The cross-file summary started.
    async fn on_summary_start(&self) {}

    /// The cross-file summary finished.
    async fn on_summary_end(&self) {}
}

/// Ordered set of listeners notified one after another.
///
/// Each notification awaits every listener in registration order before
/// returning.
#[derive(Clone, Default)]
pub struct Notifier {
    listeners: Vec<Arc<dyn ProcessingListener>>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Notifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener after the existing ones.
    pub fn add(&mut self, listener: Arc<dyn ProcessingListener>) {
        self.listeners.push(listener);
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies a file start.
    pub async fn processing_start(&self, file_name: &str, total_chunks: usize) {
        for listener in &self.listeners {
            listener.on_processing_start(file_name, total_chunks).await;
        }
    }

    /// Notifies a chunk start.
    pub async fn chunk_start(&self, chunk_number: usize, file_name: &str) {
        for listener in &self.listeners {
            listener.on_chunk_start(chunk_number, file_name).await;
        }
    }

    /// Notifies a chunk end.
    pub async fn chunk_end(&self, chunk_number: usize, file_name: &str, response: &str) {
        for listener in &self.listeners {
            listener.on_chunk_end(chunk_number, file_name, response).await;
        }
    }

    /// Notifies a file end.
    pub async fn processing_end(&self, file_name: &str) {
        for listener in &self.listeners {
            listener.on_processing_end(file_name).await;
        }
    }

    /// Notifies an error.
    pub async fn error(&self, error: &Error) {
        for listener in &self.listeners {
            listener.on_error(error).await;
        }
    }

    /// Notifies the summary start.
    pub async fn summary_start(&self) {
        for listener in &self.listeners {
            listener.on_summary_start().await;
        }
    }

    /// Notifies the summary end.
    pub async fn summary_end(&self) {
        for listener in &self.listeners {
            listener.on_summary_end().await;
        }
    }
}

/// Listener that reports progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

#[async_trait]
impl ProcessingListener for TracingListener {
    async fn on_processing_start(&self, file_name: &str, total_chunks: usize) {
        if total_chunks > 1 {
            info!(file = file_name, chunks = total_chunks, "processing file in chunks");
        } else {
            info!(file = file_name, "processing file");
        }
    }

    async fn on_chunk_start(&self, chunk_number: usize, file_name: &str) {
        info!(file = file_name, chunk = chunk_number, "worker started");
    }

    async fn on_chunk_end(&self, chunk_number: usize, file_name: &str, response: &str) {
        info!(
            file = file_name,
            chunk = chunk_number,
            chars = response.chars().count(),
            "worker finished"
        );
    }

    async fn on_processing_end(&self, file_name: &str) {
        info!(file = file_name, "file analysis complete");
    }

    async fn on_error(&self, error: &Error) {
        error!(%error, "processing failed");
    }

    async fn on_summary_start(&self) {
        info!("consolidating answers across files");
    }

    async fn on_summary_end(&self) {
        info!("cross-file summary complete");
    }
}
