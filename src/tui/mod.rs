//! Terminal user interface for the research assistant chat
//!
//! A ratatui/crossterm front end over [`ChatSession`](crate::session::ChatSession).

pub mod app;
pub mod bell;
mod events;
pub mod keybindings;
pub mod markup;
pub mod ui;
pub mod view;
pub mod widgets;

pub use app::ChatApp;
pub use bell::TerminalBell;
pub use events::{Event, EventHandler};
pub use keybindings::{action_for, Action};
pub use view::ViewState;
