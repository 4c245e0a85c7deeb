//! Event handling for the TUI
//!
//! Wraps crossterm's async event stream so terminal input can be awaited
//! alongside socket events in the app's select loop.

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use futures::StreamExt;

/// Events that can occur in the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Paste event (bracketed paste)
    Paste(String),
}

/// Async source of terminal events
pub struct EventHandler {
    stream: EventStream,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Wait for the next relevant terminal event.
    ///
    /// Returns `None` once the terminal stream ends or fails.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            match self.stream.next().await? {
                Ok(event) => {
                    if let Some(event) = convert_event(event) {
                        return Some(event);
                    }
                }
                Err(e) => {
                    tracing::error!("Terminal event stream failed: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Convert a crossterm event to our Event type
fn convert_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        // Only key presses; releases and repeats would double-insert on some terminals
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
        _ => None,
    }
}

/// Helper functions for key event matching
impl Event {
    /// Check if this is a quit key (Ctrl-C or Esc)
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) | Event::Key(KeyEvent {
                code: KeyCode::Esc,
                ..
            })
        )
    }

    /// Check if this is a resize event
    pub fn is_resize(&self) -> bool {
        matches!(self, Event::Resize(_, _))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        let plain_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));

        assert!(ctrl_c.is_quit());
        assert!(esc.is_quit());
        assert!(!plain_c.is_quit());
    }

    #[test]
    fn test_key_release_is_dropped() {
        let release = CrosstermEvent::Key(key(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(convert_event(release), None);

        let press = CrosstermEvent::Key(key(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Press,
        ));
        assert!(matches!(convert_event(press), Some(Event::Key(_))));
    }

    #[test]
    fn test_resize_and_paste_pass_through() {
        let resize = convert_event(CrosstermEvent::Resize(80, 24)).unwrap();
        assert!(resize.is_resize());
        assert_eq!(
            convert_event(CrosstermEvent::Paste("hi".into())),
            Some(Event::Paste("hi".into()))
        );
        assert_eq!(convert_event(CrosstermEvent::FocusGained), None);
    }
}
