//! Main TUI application
//!
//! Owns the terminal and the chat session, and runs the single loop that
//! applies terminal input, socket events and timers in order.

use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::client::ClientEvent;
use crate::config::UiConfig;
use crate::session::ChatSession;
use crate::tui::events::{Event, EventHandler};
use crate::tui::keybindings::action_for;
use crate::tui::ui;
use crate::tui::view::ViewState;

/// Spinner and cooldown resolution
const TICK_RATE: Duration = Duration::from_millis(250);

/// Terminal chat application
pub struct ChatApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    session: ChatSession,
    client_events: mpsc::UnboundedReceiver<ClientEvent>,
    view: ViewState,
}

impl ChatApp {
    /// Take over the terminal.
    ///
    /// `client_events` must be the receiving end of the channel the
    /// session's connector reports into.
    pub fn new(
        session: ChatSession,
        client_events: mpsc::UnboundedReceiver<ClientEvent>,
        ui: UiConfig,
    ) -> anyhow::Result<Self> {
        Self::install_panic_hook();
        let terminal = Self::setup_terminal().context("Failed to initialize terminal")?;
        Ok(Self {
            terminal,
            session,
            client_events,
            view: ViewState::new(ui),
        })
    }

    /// Connect and run until the user quits
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.session.start();

        let mut events = EventHandler::new();
        let mut clock = tokio::time::interval(self.view.ui.timestamp_refresh());
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticker = tokio::time::interval(TICK_RATE);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            self.terminal
                .draw(|frame| ui::draw(frame, &self.session, &mut self.view))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(Event::Key(key)) => {
                        if let Some(action) = action_for(key) {
                            if !self.view.apply(action, &mut self.session, Instant::now()) {
                                break;
                            }
                        }
                    }
                    Some(Event::Paste(text)) => self.view.paste(&text),
                    Some(Event::Resize(..)) => {}
                    None => {
                        tracing::warn!("Terminal input closed");
                        break;
                    }
                },
                Some(event) = self.client_events.recv() => {
                    self.session.handle_event(event);
                }
                _ = clock.tick() => self.view.refresh_clock(),
                _ = ticker.tick() => self.view.tick(Instant::now()),
            }
        }

        tracing::info!("Chat closed");
        Ok(())
    }

    /// Install a panic hook that restores the terminal
    fn install_panic_hook() {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = Self::restore_terminal_static();
            original_hook(panic_info);
        }));
    }

    /// Static version of restore_terminal for use in panic hook
    fn restore_terminal_static() -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste)?;
        Ok(())
    }

    fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ChatApp {
    fn drop(&mut self) {
        if let Err(e) = self.restore_terminal() {
            tracing::error!("Failed to restore terminal: {}", e);
        }
    }
}
