//! Chat transcript and the live tool-progress slot

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Text of the placeholder shown while waiting for the assistant
pub const PENDING_REPLY_TEXT: &str = "Processing your request";

/// Role of a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
    Error,
}

impl Role {
    /// Header shown above the message
    pub fn header(&self) -> &'static str {
        match self {
            Role::User => "👤 USER",
            Role::Assistant => "🤖 ASSISTANT",
            Role::System => "🖥️ SYSTEM",
            Role::Error => "❌ ERROR",
        }
    }
}

/// A chat message with content and metadata
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    /// Placeholder awaiting the assistant's reply
    pub pending: bool,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Local::now(),
            pending: false,
        }
    }
}

/// An in-flight tool call reported by the server
#[derive(Debug, Clone)]
pub struct ToolProgress {
    pub message: String,
    pub started_at: DateTime<Local>,
}

/// Messages in arrival order plus at most one tool-progress indicator
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    tool_progress: Option<ToolProgress>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Assistant messages replace any pending placeholder.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &ChatMessage {
        if role == Role::Assistant {
            self.remove_pending();
        }
        self.messages.push(ChatMessage::new(role, content));
        &self.messages[self.messages.len() - 1]
    }

    /// Append the "waiting for reply" placeholder
    pub fn push_pending(&mut self) -> &ChatMessage {
        self.remove_pending();
        let mut message = ChatMessage::new(Role::Assistant, PENDING_REPLY_TEXT);
        message.pending = true;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    fn remove_pending(&mut self) {
        self.messages.retain(|m| !m.pending);
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    /// Show a new tool-progress indicator, replacing the current one
    pub fn set_tool_progress(&mut self, message: impl Into<String>) {
        self.tool_progress = Some(ToolProgress {
            message: message.into(),
            started_at: Local::now(),
        });
    }

    pub fn clear_tool_progress(&mut self) -> Option<ToolProgress> {
        self.tool_progress.take()
    }

    pub fn tool_progress(&self) -> Option<&ToolProgress> {
        self.tool_progress.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop all messages. The tool-progress indicator is left alone.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_arrival_order() {
        let mut transcript = Transcript::new();
        transcript.push(Role::User, "q");
        transcript.push(Role::System, "note");
        transcript.push(Role::Assistant, "a");

        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::System, Role::Assistant]);
    }

    #[test]
    fn test_assistant_reply_replaces_pending() {
        let mut transcript = Transcript::new();
        transcript.push_pending();
        assert!(transcript.has_pending());

        transcript.push(Role::Assistant, "answer");
        assert!(!transcript.has_pending());
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "answer");
    }

    #[test]
    fn test_non_assistant_messages_keep_pending() {
        let mut transcript = Transcript::new();
        transcript.push_pending();
        transcript.push(Role::User, "echo");
        transcript.push(Role::Error, "oops");
        assert!(transcript.has_pending());
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_single_pending_placeholder() {
        let mut transcript = Transcript::new();
        transcript.push_pending();
        transcript.push_pending();
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_tool_progress_replaces() {
        let mut transcript = Transcript::new();
        transcript.set_tool_progress("first");
        transcript.set_tool_progress("second");
        assert_eq!(transcript.tool_progress().unwrap().message, "second");
        assert!(transcript.clear_tool_progress().is_some());
        assert!(transcript.tool_progress().is_none());
    }

    #[test]
    fn test_role_headers() {
        assert_eq!(Role::User.header(), "👤 USER");
        assert_eq!(Role::Error.header(), "❌ ERROR");
    }
}
