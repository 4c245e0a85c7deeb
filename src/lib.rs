//! mcp-chat: terminal client for an MCP research assistant
//!
//! This library provides:
//! - A WebSocket connection manager with fixed-delay reconnect
//! - The JSON message protocol spoken with the assistant's web server
//! - A chat session that dispatches server messages into a transcript
//! - Rich formatting of assistant output (links, tool calls, token summaries)
//! - A terminal UI (TUI) built on ratatui

pub mod client;
pub mod config;
pub mod core;
pub mod format;
pub mod protocol;
pub mod session;
pub mod tui;

pub use client::{ClientEvent, ConnectionManager, ConnectionState, SocketConnector};
pub use config::Config;
pub use crate::core::{ClientError, EndpointError, ProtocolError};
pub use session::{ChatSession, SessionOptions};
