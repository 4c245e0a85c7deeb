//! Screen-local state and how key actions change it

use std::time::Instant;

use chrono::{DateTime, Local};

use crate::config::UiConfig;
use crate::session::{ChatSend, ChatSession};
use crate::tui::keybindings::Action;
use crate::tui::widgets::InputState;

/// Everything the screen tracks that is not part of the chat session
#[derive(Debug, Clone)]
pub struct ViewState {
    pub input: InputState,
    /// Rows scrolled back from the newest message
    pub scroll_from_bottom: usize,
    /// Send stays disabled until this instant
    pub send_ready_at: Option<Instant>,
    /// Clock shown in the header
    pub last_updated: DateTime<Local>,
    /// Animation frame for spinners
    pub frame: usize,
    pub ui: UiConfig,
}

impl ViewState {
    pub fn new(ui: UiConfig) -> Self {
        Self {
            input: InputState::new(),
            scroll_from_bottom: 0,
            send_ready_at: None,
            last_updated: Local::now(),
            frame: 0,
            ui,
        }
    }

    /// Whether the send cooldown is still running
    pub fn is_sending(&self, now: Instant) -> bool {
        self.send_ready_at.is_some_and(|ready| now < ready)
    }

    /// Advance animations and expire the send cooldown
    pub fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        if !self.is_sending(now) {
            self.send_ready_at = None;
        }
    }

    pub fn refresh_clock(&mut self) {
        self.last_updated = Local::now();
    }

    /// Apply one key action. Returns `false` when the app should quit.
    pub fn apply(&mut self, action: Action, session: &mut ChatSession, now: Instant) -> bool {
        match action {
            Action::Quit => return false,
            Action::Submit => self.submit(session, now),
            Action::InsertNewline => self.input.insert_newline(),
            Action::InsertChar(c) => self.input.insert_char(c),
            Action::DeleteBefore => self.input.delete_char_before(),
            Action::DeleteAt => self.input.delete_char_at(),
            Action::CursorLeft => self.input.move_cursor_left(),
            Action::CursorRight => self.input.move_cursor_right(),
            Action::CursorStart => self.input.move_cursor_to_start(),
            Action::CursorEnd => self.input.move_cursor_to_end(),
            Action::ScrollUp(rows) => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
            }
            Action::ScrollDown(rows) => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
            }
            Action::ScrollToBottom => self.scroll_from_bottom = 0,
            Action::ClearChat => {
                session.clear_chat();
                self.scroll_from_bottom = 0;
            }
            Action::ToggleSound => {
                session.toggle_sound();
            }
        }
        true
    }

    /// Insert pasted text at the cursor
    pub fn paste(&mut self, text: &str) {
        // Terminals send CR for newlines in bracketed paste
        self.input.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    }

    fn submit(&mut self, session: &mut ChatSession, now: Instant) {
        if self.is_sending(now) {
            return;
        }
        match session.send_chat(self.input.content()) {
            ChatSend::Sent => {
                self.input.clear();
                self.scroll_from_bottom = 0;
                self.send_ready_at = Some(now + self.ui.send_cooldown());
            }
            ChatSend::Queued => {
                self.input.clear();
                self.scroll_from_bottom = 0;
            }
            // Rejected input stays in the box for another try
            ChatSend::Rejected => self.scroll_from_bottom = 0,
            ChatSend::Empty => {}
        }
    }
}
