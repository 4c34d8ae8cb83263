// src/ui/widgets/input.rs
use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};
use crate::app::{App, AppState};

/// Renders the input box widget.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input_block = Block::default().borders(Borders::ALL).title("Target (host, IP or URL)");
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // Show the cursor only when in the Idle state.
    if let AppState::Idle = app.state {
        frame.set_cursor_position((
            area.x + app.input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

/// Renders the one-line option strip under the input box.
pub fn render_options(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::raw(" Mode "),
        Span::styled(format!("[{}]", app.mode), Style::new().bold().fg(Color::Cyan)),
    ];
    for (label, enabled) in [("Crawl", app.crawl), ("AI", app.use_llm), ("PDF", app.export_report)] {
        spans.push(Span::raw(format!("  {label} ")));
        spans.push(toggle(enabled));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn toggle(enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled("on", Style::default().fg(Color::Green))
    } else {
        Span::styled("off", Style::default().fg(Color::DarkGray))
    }
}
