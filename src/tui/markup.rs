//! Styling of formatted message content
//!
//! Maps [`Markup`] fragments onto ratatui spans and lines.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::format::{Fragment, Markup, ToolProgressMarkup};

fn link_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::UNDERLINED)
}

fn tool_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn keyword_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

/// Render markup as lines, with `base` applied to plain text
pub fn markup_lines(markup: &Markup, base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for fragment in markup.fragments() {
        match fragment {
            Fragment::Text(text) => current.push(Span::styled(text.clone(), base)),
            Fragment::LineBreak => lines.push(Line::from(std::mem::take(&mut current))),
            Fragment::Link { url } => current.push(Span::styled(url.clone(), link_style())),
            Fragment::ToolCall { name } => {
                current.push(Span::styled("🔧 ", base));
                current.push(Span::styled(format!("Calling tool {name}"), tool_style()));
            }
            Fragment::Keyword { word } => {
                current.push(Span::styled("📁 ", base));
                current.push(Span::styled(word.clone(), keyword_style()));
            }
            Fragment::TokenSummary {
                input,
                output,
                total_input,
                total_output,
            } => {
                if !current.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
                lines.push(token_summary_line(*input, *output, *total_input, *total_output));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn token_summary_line(
    input: u64,
    output: u64,
    total_input: u64,
    total_output: u64,
) -> Line<'static> {
    let frame = Style::default().fg(Color::Yellow);
    let label = tool_style();
    let inbound = Style::default().fg(Color::Green);
    let outbound = Style::default().fg(Color::LightBlue);
    Line::from(vec![
        Span::styled("┃ ", frame),
        Span::styled("🔢 Tokens: ", label),
        Span::styled(input.to_string(), inbound),
        Span::styled("/", frame),
        Span::styled(output.to_string(), outbound),
        Span::styled(" | ", frame),
        Span::styled("Total: ", label),
        Span::styled(total_input.to_string(), inbound),
        Span::styled("/", frame),
        Span::styled(total_output.to_string(), outbound),
        Span::styled(" ┃", frame),
    ])
}

/// Render a tool-progress message: name and arguments on separate lines
pub fn tool_progress_lines(markup: &ToolProgressMarkup) -> Vec<Line<'static>> {
    match markup {
        ToolProgressMarkup::Call { name, args } => vec![
            Line::from(Span::styled(name.clone(), tool_style())),
            Line::from(Span::styled(args.clone(), Style::default().fg(Color::Gray))),
        ],
        ToolProgressMarkup::Raw(message) => message
            .split('\n')
            .map(|line| Line::from(line.to_string()))
            .collect(),
    }
}
