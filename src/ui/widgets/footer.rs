// src/ui/widgets/footer.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer: a notice line (rejected submits, validation) and the key hints.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let notice = match &app.notice {
        Some(text) => Line::from(Span::styled(text.clone(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    };

    let hints = match app.state {
        AppState::Idle => Line::from(vec![
            key("Enter"),
            Span::raw(" scan  "),
            key("Tab"),
            Span::raw(" mode  "),
            key("F2"),
            Span::raw(" crawl  "),
            key("F3"),
            Span::raw(" AI  "),
            key("F4"),
            Span::raw(" PDF  "),
            key("Esc"),
            Span::raw(" quit"),
        ]),
        AppState::Finished => Line::from(vec![
            key("←/→"),
            Span::raw(" tabs  "),
            key("↑/↓"),
            Span::raw(" scroll  "),
            key("[N]"),
            Span::raw("ew scan  "),
            key("[D]"),
            Span::raw("ownload report  "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
        AppState::Scanning => Line::from("Scanning... Press Q to quit."),
    };

    let footer = Paragraph::new(vec![notice, hints]).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
