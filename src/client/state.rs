//! Connection state shown in the status indicator

use std::fmt;

/// Lifecycle state of the chat connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// A connection attempt is in flight
    Connecting,
    /// Socket open; sends go straight to the transport
    Connected,
    /// Socket closed; a reconnect is scheduled
    #[default]
    Disconnected,
    /// The transport reported an error; a close normally follows
    Error,
    /// No attempt could be started (the endpoint is unusable)
    Failed,
}

impl ConnectionState {
    /// Status indicator text
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "CONNECTING...",
            ConnectionState::Connected => "CONNECTED",
            ConnectionState::Disconnected => "DISCONNECTED",
            ConnectionState::Error => "ERROR",
            ConnectionState::Failed => "FAILED",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ConnectionState::Connecting.label(), "CONNECTING...");
        assert_eq!(ConnectionState::Connected.to_string(), "CONNECTED");
        assert_eq!(ConnectionState::Failed.label(), "FAILED");
    }

    #[test]
    fn test_only_connected_is_connected() {
        assert!(ConnectionState::Connected.is_connected());
        for state in [
            ConnectionState::Connecting,
            ConnectionState::Disconnected,
            ConnectionState::Error,
            ConnectionState::Failed,
        ] {
            assert!(!state.is_connected());
        }
    }
}
