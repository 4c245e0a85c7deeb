//! Chat session
//!
//! [`ChatSession`] is the one client instance of a running app: it owns the
//! connection manager, the transcript, the server status and the cue sink,
//! and applies every socket event, timer firing and user action to them in
//! order. It is constructed once at startup and handed to the UI.

pub mod cues;
mod dispatch;
pub mod status;
pub mod transcript;

pub use cues::{Cue, CueSink, Silent};
pub use dispatch::MALFORMED_NOTICE;
pub use status::StatusInfo;
pub use transcript::{ChatMessage, Role, ToolProgress, Transcript, PENDING_REPLY_TEXT};

use crate::client::{
    ClientEvent, ConnectionManager, ConnectionOptions, ConnectionState, Connector, SendOutcome,
};
use crate::config::Config;
use crate::core::ClientError;
use crate::protocol::ClientMessage;

pub const NOT_CONNECTED_NOTICE: &str = "Not connected to server. Please wait for reconnection.";
pub const CLEAR_WHILE_DISCONNECTED_NOTICE: &str = "Cannot clear chat while disconnected.";
pub const CONNECTION_ERROR_NOTICE: &str = "Connection error. Retrying...";
pub const QUEUED_NOTICE: &str = "Message queued until the connection is restored.";

/// Settings a session is built from
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Server origin, e.g. `http://localhost:8000`
    pub origin: String,
    pub connection: ConnectionOptions,
    pub sound_enabled: bool,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            origin: config.server.origin.clone(),
            connection: ConnectionOptions {
                reconnect_delay: config.connection.reconnect_delay(),
                queue_while_disconnected: config.connection.queue_while_disconnected,
            },
            sound_enabled: config.ui.sound,
        }
    }
}

/// Result of submitting chat input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSend {
    Sent,
    /// Held for delivery after reconnect
    Queued,
    /// Not accepted; an error message was added to the transcript
    Rejected,
    /// Input was blank; nothing happened
    Empty,
}

pub struct ChatSession {
    connection: ConnectionManager,
    transcript: Transcript,
    status: StatusInfo,
    cues: Box<dyn CueSink>,
    sound_enabled: bool,
}

impl ChatSession {
    pub fn new(
        options: SessionOptions,
        connector: Box<dyn Connector>,
        cues: Box<dyn CueSink>,
    ) -> Self {
        Self {
            connection: ConnectionManager::new(options.origin, options.connection, connector),
            transcript: Transcript::new(),
            status: StatusInfo::default(),
            cues,
            sound_enabled: options.sound_enabled,
        }
    }

    /// Open the first connection.
    pub fn start(&mut self) {
        if let Err(e) = self.connection.connect() {
            self.transcript
                .push(Role::Error, format!("Failed to connect: {e}"));
        }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> &StatusInfo {
        &self.status
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Apply one event from a socket or timer task.
    pub fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Opened { generation } => {
                if self.connection.on_open(generation).is_some() {
                    self.play(Cue::Connect);
                }
            }
            ClientEvent::Message { generation, text } => {
                if self.connection.is_current(generation) {
                    self.receive(&text);
                } else {
                    tracing::debug!(generation, "Dropping frame from superseded connection");
                }
            }
            ClientEvent::Errored { generation, error } => {
                if self.connection.on_error(generation, &error) {
                    self.transcript.push(Role::Error, CONNECTION_ERROR_NOTICE);
                }
            }
            ClientEvent::Closed { generation, reason } => {
                tracing::debug!(generation, "Connection closed: {}", reason);
                if self.connection.on_close(generation) {
                    self.play(Cue::Disconnect);
                }
            }
            ClientEvent::ReconnectDue { token } => {
                self.connection.on_reconnect_due(token);
            }
        }
    }

    /// Submit chat input.
    ///
    /// The connection gate is checked before the input itself, so a blank
    /// submit while disconnected still reports the disconnect.
    pub fn send_chat(&mut self, input: &str) -> ChatSend {
        if !self.connection.can_send() {
            self.transcript.push(Role::Error, NOT_CONNECTED_NOTICE);
            return ChatSend::Rejected;
        }

        let message = input.trim();
        if message.is_empty() {
            return ChatSend::Empty;
        }

        match self.connection.send(ClientMessage::chat(message)) {
            Ok(SendOutcome::Sent) => {
                self.transcript.push_pending();
                self.play(Cue::Send);
                ChatSend::Sent
            }
            Ok(SendOutcome::Queued) => {
                self.transcript.push(Role::System, QUEUED_NOTICE);
                ChatSend::Queued
            }
            Err(ClientError::NotConnected) => {
                self.transcript.push(Role::Error, NOT_CONNECTED_NOTICE);
                ChatSend::Rejected
            }
            Err(e) => {
                tracing::warn!("Failed to send chat message: {}", e);
                self.transcript
                    .push(Role::Error, format!("Failed to send message: {e}"));
                ChatSend::Rejected
            }
        }
    }

    /// Ask the server to forget the conversation and clear the local transcript.
    ///
    /// Returns whether the request was sent.
    pub fn clear_chat(&mut self) -> bool {
        if !self.connection.is_connected() {
            self.transcript
                .push(Role::Error, CLEAR_WHILE_DISCONNECTED_NOTICE);
            return false;
        }

        if let Err(e) = self.connection.send(ClientMessage::Clear) {
            tracing::warn!("Failed to send clear request: {}", e);
            self.transcript
                .push(Role::Error, format!("Failed to clear chat: {e}"));
            return false;
        }

        self.transcript.clear();
        self.play(Cue::Clear);
        true
    }

    /// Flip sound on/off. Returns the new setting.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        tracing::debug!(enabled = self.sound_enabled, "Sound toggled");
        self.play(Cue::Toggle);
        self.sound_enabled
    }

    fn play(&mut self, cue: Cue) {
        if self.sound_enabled {
            self.cues.play(cue);
        }
    }
}
