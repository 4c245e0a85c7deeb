//! UI widgets for the chat screen

mod footer;
mod header;
mod input;
mod message_list;
mod tool_progress;

pub use footer::FooterWidget;
pub use header::{state_color, HeaderWidget};
pub use input::{char_count_color, InputBox, InputState};
pub use message_list::{message_lines, role_color, wrap_line, MessageListWidget};
pub use tool_progress::{ToolProgressWidget, PANEL_HEIGHT};
