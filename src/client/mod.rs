//! Connection layer: endpoint derivation, lifecycle state machine and the
//! Tokio WebSocket driver behind it.

pub mod connection;
pub mod endpoint;
pub mod socket;
pub mod state;

pub use connection::{
    ConnectionManager, ConnectionOptions, Connector, ReconnectTicket, SendOutcome, Transport,
    DEFAULT_RECONNECT_DELAY,
};
pub use endpoint::{websocket_url, SOCKET_PATH};
pub use socket::{ChannelTransport, ClientEvent, SocketConnector};
pub use state::ConnectionState;
