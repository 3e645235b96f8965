//! Analysis agent abstraction.
//!
//! The orchestrator only needs two operations from a model backend: a
//! one-shot request returning the full answer, and a streamed request
//! yielding events as they arrive. Any backend implementing
//! [`AnalysisAgent`] can drive document processing.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::message::{Message, StreamEvent};
use crate::error::Result;

/// Stream of events from a streamed agent request.
pub type EventStream = BoxStream<'static, Result<StreamEvent>>;

/// A model backend able to analyze documents.
///
/// Implementations own their transport concerns: timeouts, retries and
/// credentials. Each call is independent; no conversation state is kept
/// between calls.
#[async_trait]
pub trait AnalysisAgent: Send + Sync {
    /// Sends a request and returns the complete answer text.
    ///
    /// # Arguments
    ///
    /// * `system_prompt` - Instructions for this call.
    /// * `messages` - Conversation, usually a single user message.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AgentError`] if the request fails.
    async fn invoke(&self, system_prompt: &str, messages: Vec<Message>) -> Result<String>;

    /// Sends a request and returns its answer as a stream of events.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AgentError`] if the request cannot be
    /// started; failures mid-stream arrive as stream items.
    async fn stream(&self, system_prompt: &str, messages: Vec<Message>) -> Result<EventStream>;

    /// Returns the model identifier, for logs.
    fn model(&self) -> &str;
}
