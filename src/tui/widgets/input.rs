//! Chat input box with cursor management
//!
//! Multi-line text entry with a character counter in the bottom border and a
//! title that doubles as the send indicator.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

const PLACEHOLDER: &str = "Ask the research assistant... (Enter to send, Alt+Enter for newline)";

/// Input state
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Current input content
    content: String,
    /// Cursor position (byte offset)
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position as a byte offset
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of characters typed, as shown by the counter
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor position
    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a string at the cursor position
    pub fn insert_str(&mut self, s: &str) {
        self.content.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor (backspace)
    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev_boundary = self.prev_boundary();
            self.content.remove(prev_boundary);
            self.cursor = prev_boundary;
        }
    }

    /// Delete the character at the cursor (delete key)
    pub fn delete_char_at(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the current input, leaving the box empty
    pub fn submit(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Counter colour for a given length
pub fn char_count_color(count: usize, warn: usize, alert: usize) -> Color {
    if count > alert {
        Color::LightRed
    } else if count > warn {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Renderer for [`InputState`]
pub struct InputBox<'a> {
    input: &'a InputState,
    sending: bool,
    warn_threshold: usize,
    alert_threshold: usize,
}

impl<'a> InputBox<'a> {
    pub fn new(input: &'a InputState) -> Self {
        Self {
            input,
            sending: false,
            warn_threshold: 1500,
            alert_threshold: 1800,
        }
    }

    /// Show the send indicator as busy
    pub fn sending(mut self, sending: bool) -> Self {
        self.sending = sending;
        self
    }

    pub fn thresholds(mut self, warn: usize, alert: usize) -> Self {
        self.warn_threshold = warn;
        self.alert_threshold = alert;
        self
    }

    fn block(&self) -> Block<'static> {
        let (title, title_style) = if self.sending {
            (" 📡 SENDING... ", Style::default().fg(Color::DarkGray))
        } else {
            (
                " 📡 TRANSMIT ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let count = self.input.char_count();
        let counter_style = Style::default().fg(char_count_color(
            count,
            self.warn_threshold,
            self.alert_threshold,
        ));

        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Line::from(Span::styled(title, title_style)))
            .title_bottom(
                Line::from(Span::styled(format!(" {count} chars "), counter_style))
                    .right_aligned(),
            )
    }
}

/// Visual rows of the input, hard-wrapped at the box width
struct Rows {
    width: usize,
    rows: Vec<Vec<Span<'static>>>,
    row_width: usize,
    cursor_row: usize,
}

impl Rows {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: vec![Vec::new()],
            row_width: 0,
            cursor_row: 0,
        }
    }

    fn break_row(&mut self) {
        self.rows.push(Vec::new());
        self.row_width = 0;
    }

    fn push_cell(&mut self, c: char, style: Style) {
        let w = c.width().unwrap_or(0);
        if self.row_width > 0 && self.row_width + w > self.width {
            self.break_row();
        }
        self.row_width += w;
        if let Some(row) = self.rows.last_mut() {
            match row.last_mut() {
                Some(span) if span.style == style => span.content.to_mut().push(c),
                _ => row.push(Span::styled(c.to_string(), style)),
            }
        }
    }

    fn mark_cursor(&mut self) {
        self.cursor_row = self.rows.len() - 1;
    }
}

fn layout_rows(input: &InputState, width: usize, cursor_style: Style) -> Rows {
    let mut rows = Rows::new(width.max(1));
    for (i, c) in input.content.char_indices() {
        let at_cursor = i == input.cursor;
        if c == '\n' {
            if at_cursor {
                rows.push_cell(' ', cursor_style);
                rows.mark_cursor();
            }
            rows.break_row();
        } else if at_cursor {
            rows.push_cell(c, cursor_style);
            rows.mark_cursor();
        } else {
            rows.push_cell(c, Style::default());
        }
    }
    if input.cursor >= input.content.len() {
        rows.push_cell(' ', cursor_style);
        rows.mark_cursor();
    }
    rows
}

impl Widget for InputBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        if self.input.is_empty() {
            Paragraph::new(Line::from(vec![
                Span::styled(" ", cursor_style),
                Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            ]))
            .render(inner, buf);
            return;
        }

        let height = inner.height as usize;
        let rows = layout_rows(self.input, inner.width as usize, cursor_style);
        // Keep the cursor row on screen
        let offset = rows.cursor_row.saturating_sub(height - 1);
        let lines: Vec<Line> = rows
            .rows
            .into_iter()
            .skip(offset)
            .take(height)
            .map(Line::from)
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
