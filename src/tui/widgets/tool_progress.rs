//! Live tool-execution panel shown while the server runs a tool

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::format::format_tool_progress;
use crate::session::ToolProgress;
use crate::tui::markup::tool_progress_lines;

/// Rows the panel needs, borders included
pub const PANEL_HEIGHT: u16 = 5;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct ToolProgressWidget<'a> {
    progress: &'a ToolProgress,
    frame: usize,
}

impl<'a> ToolProgressWidget<'a> {
    pub fn new(progress: &'a ToolProgress) -> Self {
        Self { progress, frame: 0 }
    }

    /// Spinner animation frame
    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }
}

impl Widget for ToolProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spinner = SPINNER[self.frame % SPINNER.len()];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Line::from(vec![
                Span::styled(format!(" {spinner} "), Style::default().fg(Color::Yellow)),
                Span::styled(
                    "🔧 TOOL EXECUTION ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]))
            .title_bottom(
                Line::from(Span::styled(
                    format!(" started {} ", self.progress.started_at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ))
                .right_aligned(),
            );

        let lines = tool_progress_lines(&format_tool_progress(&self.progress.message));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
