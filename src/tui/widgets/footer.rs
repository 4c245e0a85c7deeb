//! Key hints and sound indicator

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const HINTS: &[(&str, &str)] = &[
    ("Enter", "send"),
    ("Alt+Enter", "newline"),
    ("Ctrl+L", "clear"),
    ("Ctrl+S", "sound"),
    ("PgUp/PgDn", "scroll"),
    ("Esc", "quit"),
];

pub struct FooterWidget {
    sound_enabled: bool,
}

impl FooterWidget {
    pub fn new(sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }
}

impl Widget for FooterWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_style = Style::default().fg(Color::Cyan);
        let text_style = Style::default().fg(Color::DarkGray);

        let mut spans = vec![if self.sound_enabled {
            Span::styled(" 🔊 SOUND ON ", Style::default().fg(Color::Green))
        } else {
            Span::styled(" 🔇 SOUND OFF ", Style::default().fg(Color::DarkGray))
        }];
        for (key, action) in HINTS {
            spans.push(Span::styled(format!(" {key}"), key_style));
            spans.push(Span::styled(format!(" {action} "), text_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
