//! Key bindings for the chat screen
//!
//! The input box always has focus, so every key maps straight to one action.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Rows moved by PageUp/PageDown
pub const PAGE_ROWS: usize = 10;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send the input (Enter)
    Submit,
    /// Insert a line break (Alt+Enter / Shift+Enter)
    InsertNewline,
    InsertChar(char),
    /// Backspace
    DeleteBefore,
    /// Delete
    DeleteAt,
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,
    /// Scroll the transcript back by n rows
    ScrollUp(usize),
    /// Scroll the transcript forward by n rows
    ScrollDown(usize),
    /// Jump back to the newest message
    ScrollToBottom,
    /// Ask the server to clear the conversation (Ctrl+L)
    ClearChat,
    /// Toggle audible cues (Ctrl+S)
    ToggleSound,
    /// Leave the app (Esc / Ctrl+C)
    Quit,
}

/// Map a key press to an action
pub fn action_for(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('l') if ctrl => Action::ClearChat,
        KeyCode::Char('s') if ctrl => Action::ToggleSound,
        KeyCode::Char('a') if ctrl => Action::CursorStart,
        KeyCode::Char('e') if ctrl => Action::CursorEnd,
        KeyCode::Char('j') if ctrl => Action::InsertNewline,
        KeyCode::Char(_) if ctrl || alt => return None,
        KeyCode::Char(c) => Action::InsertChar(c),
        KeyCode::Enter if alt || shift => Action::InsertNewline,
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::DeleteBefore,
        KeyCode::Delete => Action::DeleteAt,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::CursorStart,
        KeyCode::End if ctrl => Action::ScrollToBottom,
        KeyCode::End => Action::CursorEnd,
        KeyCode::Up => Action::ScrollUp(1),
        KeyCode::Down => Action::ScrollDown(1),
        KeyCode::PageUp => Action::ScrollUp(PAGE_ROWS),
        KeyCode::PageDown => Action::ScrollDown(PAGE_ROWS),
        _ => return None,
    };
    Some(action)
}
