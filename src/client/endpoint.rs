//! WebSocket endpoint derivation
//!
//! The assistant serves its socket at `/ws` on the same host that serves the
//! chat page, so the client only needs the server origin.

use url::Url;

use crate::core::EndpointError;

/// Path of the chat socket on the server
pub const SOCKET_PATH: &str = "/ws";

/// Derive the socket URL for a server origin.
///
/// `https` maps to `wss` and `http` to `ws`; host and explicit port are kept,
/// any path or query on the origin is dropped. Origins that are already
/// `ws`/`wss` keep their scheme.
pub fn websocket_url(origin: &str) -> Result<Url, EndpointError> {
    let parsed = Url::parse(origin.trim()).map_err(|e| EndpointError::InvalidOrigin {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    let scheme = match parsed.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
    };

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| EndpointError::MissingHost(origin.to_string()))?;

    let authority = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let url = format!("{scheme}://{authority}{SOCKET_PATH}");
    Url::parse(&url).map_err(|e| EndpointError::InvalidOrigin {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}
