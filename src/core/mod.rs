//! Core domain modules
//!
//! Types shared by the client, session and presentation layers.

pub mod errors;

pub use errors::{ClientError, EndpointError, ProtocolError};
