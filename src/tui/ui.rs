//! Screen layout

use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::session::ChatSession;
use crate::tui::view::ViewState;
use crate::tui::widgets::{
    FooterWidget, HeaderWidget, InputBox, MessageListWidget, ToolProgressWidget, PANEL_HEIGHT,
};

/// Rows given to the input box, borders included
const INPUT_HEIGHT: u16 = 5;

struct Areas {
    header: Rect,
    messages: Rect,
    tool_progress: Option<Rect>,
    input: Rect,
    footer: Rect,
}

fn split(area: Rect, with_tool_progress: bool) -> Areas {
    if with_tool_progress {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(PANEL_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);
        Areas {
            header: chunks[0],
            messages: chunks[1],
            tool_progress: Some(chunks[2]),
            input: chunks[3],
            footer: chunks[4],
        }
    } else {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);
        Areas {
            header: chunks[0],
            messages: chunks[1],
            tool_progress: None,
            input: chunks[2],
            footer: chunks[3],
        }
    }
}

/// Draw the whole screen.
///
/// Clamps the view's scroll position to what the transcript can show.
pub fn draw(frame: &mut Frame, session: &ChatSession, view: &mut ViewState) {
    let now = std::time::Instant::now();
    let transcript = session.transcript();
    let areas = split(frame.area(), transcript.tool_progress().is_some());

    frame.render_widget(
        HeaderWidget::new(
            session.status(),
            session.connection_state(),
            view.last_updated,
        ),
        areas.header,
    );

    let messages = MessageListWidget::new(transcript).frame(view.frame);
    view.scroll_from_bottom = view.scroll_from_bottom.min(messages.max_scroll(areas.messages));
    frame.render_widget(messages.scroll(view.scroll_from_bottom), areas.messages);

    if let (Some(area), Some(progress)) = (areas.tool_progress, transcript.tool_progress()) {
        frame.render_widget(ToolProgressWidget::new(progress).frame(view.frame), area);
    }

    frame.render_widget(
        InputBox::new(&view.input)
            .sending(view.is_sending(now))
            .thresholds(view.ui.char_warn_threshold, view.ui.char_alert_threshold),
        areas.input,
    );

    frame.render_widget(FooterWidget::new(session.sound_enabled()), areas.footer);
}
