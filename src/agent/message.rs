//! Message and stream event types exchanged with an analysis agent.

use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,
    /// The agent.
    Assistant,
}

/// A binary document attached to a message.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentAttachment {
    /// Format tag, usually the lowercased extension ("pdf", "xlsx").
    pub format: String,
    /// Sanitized display name.
    pub name: String,
    /// Document bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for DocumentAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentAttachment")
            .field("format", &self.format)
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// One block of message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// An attached document.
    Document(DocumentAttachment),
    /// Plain text.
    Text(String),
}

impl ContentBlock {
    /// Creates a document block.
    #[must_use]
    pub fn document(format: &str, name: &str, bytes: Vec<u8>) -> Self {
        Self::Document(DocumentAttachment {
            format: format.to_string(),
            name: name.to_string(),
            bytes,
        })
    }

    /// Creates a text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the text of a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Document(_) => None,
        }
    }

    /// Returns the attachment of a document block.
    #[must_use]
    pub const fn as_document(&self) -> Option<&DocumentAttachment> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Text(_) => None,
        }
    }
}

/// A message sent to an analysis agent.
///
/// # Examples
///
/// ```
/// use docreduce::agent::{Message, Role};
///
/// let msg = Message::document_request("pdf", "report", vec![1, 2, 3], "What changed?");
/// assert_eq!(msg.role, Role::User);
/// assert_eq!(msg.content.len(), 2);
/// assert_eq!(msg.text(), "What changed?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Author role.
    pub role: Role,
    /// Ordered content blocks.
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Creates a user message from content blocks.
    #[must_use]
    pub const fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// Creates a user message holding a single text block.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentBlock::text(text)])
    }

    /// Creates a user message with one document followed by an instruction.
    #[must_use]
    pub fn document_request(format: &str, name: &str, bytes: Vec<u8>, text: &str) -> Self {
        Self::user(vec![
            ContentBlock::document(format, name, bytes),
            ContentBlock::text(text),
        ])
    }

    /// Returns all text blocks joined by blank lines.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Returns the attached documents, in order.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentAttachment> {
        self.content.iter().filter_map(ContentBlock::as_document)
    }
}

/// An event produced while an agent streams its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment of the answer.
    Text(String),
    /// The agent finished a message.
    MessageStop,
    /// Anything else (metadata, usage, tool traffic).
    Other,
}

impl StreamEvent {
    /// Returns the output a caller sees for this event.
    ///
    /// Text is forwarded, a message boundary becomes a newline, anything
    /// else produces nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use docreduce::agent::StreamEvent;
    ///
    /// assert_eq!(StreamEvent::Text("hi".into()).into_output(), Some("hi".to_string()));
    /// assert_eq!(StreamEvent::MessageStop.into_output(), Some("\n".to_string()));
    /// assert_eq!(StreamEvent::Other.into_output(), None);
    /// ```
    #[must_use]
    pub fn into_output(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::MessageStop => Some("\n".to_string()),
            Self::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_document_request_layout() {
        let msg = Message::document_request("xlsx", "ventas", vec![0; 4], "Total?");
        let docs: Vec<_> = msg.documents().collect();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].format, "xlsx");
        assert_eq!(docs[0].name, "ventas");
        assert_eq!(msg.content[1].as_text(), Some("Total?"));
    }

    #[test]
    fn test_text_joins_blocks() {
        let msg = Message::user(vec![
            ContentBlock::text("a"),
            ContentBlock::document("pdf", "x", Vec::new()),
            ContentBlock::text("b"),
        ]);
        assert_eq!(msg.text(), "a\n\nb");
    }

    #[test]
    fn test_attachment_debug_hides_bytes() {
        let block = ContentBlock::document("pdf", "big", vec![0; 1024]);
        let rendered = format!("{block:?}");
        assert!(rendered.contains("1024"));
        assert!(!rendered.contains("[0, 0"));
    }
}
