//! Inbound message dispatch
//!
//! Routes decoded envelopes to transcript, status and cue updates.

use super::cues::Cue;
use super::transcript::Role;
use super::ChatSession;
use crate::protocol::{self, Inbound, ServerMessage};

/// Shown when a frame from the server cannot be decoded
pub const MALFORMED_NOTICE: &str = "Received malformed message from server";

/// Assistant replies longer than this are noted in the debug log
const LONG_MESSAGE_CHARS: usize = 500;

impl ChatSession {
    /// Decode and dispatch one text frame from the server.
    pub fn receive(&mut self, text: &str) {
        match protocol::decode(text) {
            Ok(Inbound::Known(message)) => self.dispatch(message),
            Ok(Inbound::Unknown(kind)) => {
                tracing::debug!("Unknown message type: {}", kind);
            }
            Err(e) => {
                tracing::warn!("Dropping malformed server frame: {}", e);
                self.transcript.push(Role::Error, MALFORMED_NOTICE);
            }
        }
    }

    /// Apply one decoded server envelope.
    pub fn dispatch(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Status(update) => {
                self.status.apply(&update);
                if let Some(note) = update.message.filter(|m| !m.is_empty()) {
                    self.transcript.push(Role::System, note);
                }
            }
            ServerMessage::UserMessage { message } => {
                self.transcript.push(Role::User, message);
            }
            ServerMessage::AssistantMessage { message, tokens } => {
                self.transcript.clear_tool_progress();
                let content = match tokens.filter(|t| !t.is_empty()) {
                    Some(tokens) => format!("{message}\n\n{tokens}"),
                    None => message,
                };
                let chars = content.chars().count();
                if chars > LONG_MESSAGE_CHARS {
                    tracing::debug!(chars, "Long assistant message");
                }
                self.transcript.push(Role::Assistant, content);
                self.play(Cue::Message);
            }
            ServerMessage::ToolProgress { message } => {
                tracing::debug!("Tool progress: {}", message);
                self.transcript.set_tool_progress(message);
                self.play(Cue::Send);
            }
            ServerMessage::Error { message } => {
                self.transcript.push(Role::Error, message);
                self.play(Cue::Error);
            }
        }
    }
}
