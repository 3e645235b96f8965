//! Analysis agent layer for docreduce.
//!
//! Defines the narrow contract the orchestrator consumes from a model
//! backend, the message and event types exchanged over it, the prompts
//! used for each kind of call, and an OpenAI-compatible backend.
//!
//! # Architecture
//!
//! ```text
//! DocumentProcessor
//!   ├── invoke(chunk prompt, fragment + question)   → partial text
//!   ├── stream(document prompt, file + question)    → events
//!   ├── stream(consolidation prompt, partials)      → events
//!   └── stream(cross-file prompt, per-file answers) → events
//! ```
//!
//! # Feature Gate
//!
//! The OpenAI backend and attachment rendering require the `openai`
//! feature (enabled by default).

#[cfg(feature = "openai")]
pub mod attachment;
pub mod config;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;

// Re-export key types
pub use config::AgentConfig;
pub use message::{ContentBlock, DocumentAttachment, Message, Role, StreamEvent};
pub use prompt::PromptSet;
pub use provider::{AnalysisAgent, EventStream};
#[cfg(feature = "openai")]
pub use providers::OpenAiAgent;
