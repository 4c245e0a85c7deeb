//! Wire protocol for the assistant's `/ws` endpoint
//!
//! Every frame is a JSON object discriminated by its `type` field. Outbound
//! frames are [`ClientMessage`]; inbound frames decode into [`Inbound`], which
//! keeps unrecognised types apart from malformed payloads so newer servers can
//! add message kinds without breaking older clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ProtocolError;

/// Envelopes sent from the client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// User input for the assistant
    Chat { message: String },
    /// Ask the server to reset its conversation history
    Clear,
}

impl ClientMessage {
    /// Build a chat envelope
    pub fn chat(message: impl Into<String>) -> Self {
        ClientMessage::Chat {
            message: message.into(),
        }
    }

    /// Serialize to the JSON text frame sent over the socket
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Server status report (sent on connect and after a history reset)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub caching: bool,
    pub tools: Option<u64>,
    pub message: Option<String>,
}

/// Envelopes sent from the server to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Status(StatusUpdate),
    /// Echo of the user's own chat input
    UserMessage { message: String },
    AssistantMessage {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tokens: Option<String>,
    },
    /// The backend is running a tool on behalf of the current request
    ToolProgress { message: String },
    Error { message: String },
}

/// Envelope `type` values this client understands
pub const KNOWN_TYPES: &[&str] = &[
    "status",
    "user_message",
    "assistant_message",
    "tool_progress",
    "error",
];

/// Result of decoding one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Known(ServerMessage),
    /// Well-formed envelope with a `type` this client does not handle
    Unknown(String),
}

/// Decode an inbound text frame.
///
/// Unknown `type` values are not an error; non-JSON payloads, envelopes
/// without a string `type`, and known envelopes missing required fields are.
pub fn decode(text: &str) -> Result<Inbound, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_owned();

    if !KNOWN_TYPES.contains(&kind.as_str()) {
        return Ok(Inbound::Unknown(kind));
    }

    serde_json::from_value(value)
        .map(Inbound::Known)
        .map_err(|e| ProtocolError::InvalidEnvelope {
            kind,
            reason: e.to_string(),
        })
}
