//! Message list widget for displaying the transcript
//!
//! Each message gets a role header with its timestamp, then the formatted
//! content. Lines are wrapped here rather than by `Paragraph` so scrolling
//! can be measured exactly in rows.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::format::format_message;
use crate::session::{ChatMessage, Role, Transcript};
use crate::tui::markup::markup_lines;

/// Header colour for each role
pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Green,
        Role::System => Color::Yellow,
        Role::Error => Color::Red,
    }
}

fn body_style(role: Role) -> Style {
    match role {
        Role::User | Role::Assistant => Style::default().fg(Color::White),
        Role::System => Style::default().fg(Color::Gray),
        Role::Error => Style::default().fg(Color::LightRed),
    }
}

/// Unwrapped lines for one message, header first
pub fn message_lines(message: &ChatMessage, frame: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            message.role.header(),
            Style::default()
                .fg(role_color(message.role))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", message.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    if message.pending {
        let dots = ".".repeat(frame % 3 + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{dots}", message.content),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.extend(markup_lines(
            &format_message(&message.content),
            body_style(message.role),
        ));
    }
    lines
}

/// Hard-wrap a line at `width` columns, keeping span styles
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut row_width = 0;

    for span in line.spans {
        let style = span.style;
        let mut chunk = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if row_width > 0 && row_width + w > width {
                if !chunk.is_empty() {
                    if let Some(row) = rows.last_mut() {
                        row.push(Span::styled(std::mem::take(&mut chunk), style));
                    }
                }
                rows.push(Vec::new());
                row_width = 0;
            }
            chunk.push(c);
            row_width += w;
        }
        if !chunk.is_empty() {
            if let Some(row) = rows.last_mut() {
                row.push(Span::styled(chunk, style));
            }
        }
    }

    rows.into_iter().map(Line::from).collect()
}

/// Transcript widget scrolled relative to the newest message
pub struct MessageListWidget<'a> {
    transcript: &'a Transcript,
    scroll_from_bottom: usize,
    frame: usize,
}

impl<'a> MessageListWidget<'a> {
    pub fn new(transcript: &'a Transcript) -> Self {
        Self {
            transcript,
            scroll_from_bottom: 0,
            frame: 0,
        }
    }

    /// Rows to scroll back from the newest message
    pub fn scroll(mut self, rows: usize) -> Self {
        self.scroll_from_bottom = rows;
        self
    }

    /// Animation frame for the pending-reply dots
    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }

    fn block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(Span::styled(
                " 💬 CONVERSATION ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )))
    }

    /// Wrapped rows for the whole transcript at the given width
    pub fn rows(&self, width: usize) -> Vec<Line<'static>> {
        let mut rows = Vec::new();
        for (i, message) in self.transcript.messages().iter().enumerate() {
            if i > 0 {
                rows.push(Line::default());
            }
            for line in message_lines(message, self.frame) {
                rows.extend(wrap_line(line, width));
            }
        }
        rows
    }

    /// Furthest the list can scroll back when drawn in `area`
    pub fn max_scroll(&self, area: Rect) -> usize {
        let inner = Self::block().inner(area);
        let total = self.rows(inner.width as usize).len();
        total.saturating_sub(inner.height as usize)
    }
}

impl Widget for MessageListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.transcript.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No messages yet. Ask a research question to get started.",
                Style::default().fg(Color::DarkGray),
            )))
            .render(inner, buf);
            return;
        }

        let rows = self.rows(inner.width as usize);
        let height = inner.height as usize;
        let max_scroll = rows.len().saturating_sub(height);
        let scroll = self.scroll_from_bottom.min(max_scroll);
        let start = max_scroll - scroll;

        let visible: Vec<Line> = rows.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_line_keeps_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let line = Line::from(vec![Span::raw("abc"), Span::styled("defg", bold)]);
        let rows = wrap_line(line, 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[0]), "abcd");
        assert_eq!(text(&rows[1]), "efg");
        assert_eq!(rows[1].spans[0].style, bold);
    }

    #[test]
    fn test_wrap_empty_line() {
        assert_eq!(wrap_line(Line::default(), 10).len(), 1);
    }

    #[test]
    fn test_pending_message_animates() {
        let mut transcript = Transcript::new();
        transcript.push_pending();
        let message = &transcript.messages()[0];
        assert!(text(&message_lines(message, 0)[1]).ends_with("request."));
        assert!(text(&message_lines(message, 2)[1]).ends_with("request..."));
    }

    #[test]
    fn test_rows_separate_messages() {
        let mut transcript = Transcript::new();
        transcript.push(Role::User, "hi");
        transcript.push(Role::Assistant, "hello");
        let rows = MessageListWidget::new(&transcript).rows(40);
        // header, body, blank, header, body
        assert_eq!(rows.len(), 5);
        assert!(text(&rows[0]).starts_with("👤 USER"));
        assert!(text(&rows[3]).starts_with("🤖 ASSISTANT"));
    }

    #[test]
    fn test_max_scroll() {
        let mut transcript = Transcript::new();
        for i in 0..10 {
            transcript.push(Role::System, format!("note {i}"));
        }
        let widget = MessageListWidget::new(&transcript);
        // 10 * 2 rows + 9 separators, 8 visible rows inside the border
        assert_eq!(widget.max_scroll(Rect::new(0, 0, 40, 10)), 29 - 8);
    }
}
