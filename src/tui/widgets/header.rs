//! Header line: connection state, model, tool count and clock
//!
//! Rendered like a status bar: styled spans separated by thin bars, with the
//! "last updated" clock pushed to the right edge.

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::client::ConnectionState;
use crate::session::StatusInfo;

/// Colour of the connection indicator for each state
pub fn state_color(state: ConnectionState) -> Color {
    match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Disconnected | ConnectionState::Error | ConnectionState::Failed => {
            Color::Red
        }
    }
}

/// Header widget
pub struct HeaderWidget<'a> {
    status: &'a StatusInfo,
    state: ConnectionState,
    last_updated: DateTime<Local>,
    style: Style,
}

impl<'a> HeaderWidget<'a> {
    pub fn new(
        status: &'a StatusInfo,
        state: ConnectionState,
        last_updated: DateTime<Local>,
    ) -> Self {
        Self {
            status,
            state,
            last_updated,
            style: Style::default().bg(Color::Black),
        }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let separator = || Span::styled(" │ ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled(
                " 🤖 MCP RESEARCH ASSISTANT",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            separator(),
            Span::styled(
                format!("● {}", self.state.label()),
                Style::default()
                    .fg(state_color(self.state))
                    .add_modifier(Modifier::BOLD),
            ),
        ];

        if let Some(model) = self.status.model_label() {
            spans.push(separator());
            spans.push(Span::styled(model, Style::default().fg(Color::White)));
        }

        if let Some(tools) = self.status.tools {
            spans.push(separator());
            spans.push(Span::styled(
                format!("🔧 {tools} tools"),
                Style::default().fg(Color::Yellow),
            ));
        }

        spans
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut spans = self.spans();
        let clock = format!(
            "Updated: {} ",
            self.last_updated.format("%Y-%m-%d %H:%M")
        );
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let available = area.width as usize;
        // Clock only when it fits
        if used + clock.width() + 1 <= available {
            spans.push(Span::raw(" ".repeat(available - used - clock.width())));
            spans.push(Span::styled(clock, Style::default().fg(Color::DarkGray)));
        }

        Paragraph::new(Line::from(spans))
            .style(self.style)
            .render(area, buf);
    }
}
