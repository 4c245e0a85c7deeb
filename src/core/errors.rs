//! Domain error types
//!
//! These errors represent client-level failures, distinct from the
//! infrastructure errors (terminal setup, config IO) that flow through `anyhow`.

use thiserror::Error;

/// Errors raised while deriving the WebSocket endpoint from a server origin
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The origin could not be parsed as a URL
    #[error("Invalid server origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// Only http and https origins map onto a WebSocket scheme
    #[error("Unsupported origin scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// The origin has no host component
    #[error("Server origin has no host: {0}")]
    MissingHost(String),
}

/// Errors related to decoding inbound envelopes
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload was not valid JSON
    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload was JSON but carried no string `type` field
    #[error("Envelope is missing a string `type` field")]
    MissingType,

    /// A known envelope type was missing required fields
    #[error("Invalid `{kind}` envelope: {reason}")]
    InvalidEnvelope { kind: String, reason: String },
}

/// Errors related to the chat connection
#[derive(Debug, Error)]
pub enum ClientError {
    /// A send was attempted while the connection is not open
    #[error("Not connected to server")]
    NotConnected,

    /// The outbound envelope could not be serialized
    #[error("Failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The transport rejected the frame (writer task gone)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint could not be derived
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ClientError::NotConnected.to_string(),
            "Not connected to server"
        );
        assert_eq!(
            EndpointError::UnsupportedScheme("ftp".into()).to_string(),
            "Unsupported origin scheme 'ftp' (expected http or https)"
        );
        assert_eq!(
            ProtocolError::MissingType.to_string(),
            "Envelope is missing a string `type` field"
        );
    }

    #[test]
    fn test_endpoint_error_converts_into_client_error() {
        let err: ClientError = EndpointError::MissingHost("http://".into()).into();
        assert!(matches!(err, ClientError::Endpoint(_)));
        assert_eq!(err.to_string(), "Server origin has no host: http://");
    }
}
