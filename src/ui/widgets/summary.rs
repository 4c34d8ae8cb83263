// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use fastscan_tui::core::risk::RiskBand;
use fastscan_tui::core::session::{ReportStatus, ScanStatus};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

fn band_color(band: RiskBand) -> Color {
    match band {
        RiskBand::Critical => Color::Red,
        RiskBand::High => Color::LightRed,
        RiskBand::Medium => Color::Yellow,
        RiskBand::Low => Color::Cyan,
        RiskBand::Info => Color::Green,
    }
}

fn report_line(report: &ReportStatus) -> Line<'static> {
    let (text, color) = match report {
        ReportStatus::NotRequested => ("not requested".to_string(), Color::DarkGray),
        ReportStatus::Unavailable(e) => (format!("unavailable: {e}"), Color::Yellow),
        ReportStatus::Saving => ("saving...".to_string(), Color::Cyan),
        ReportStatus::Saved(path) => (format!("saved to {}", path.display()), Color::Green),
        ReportStatus::SaveFailed(e) => (format!("save failed: {e}"), Color::Red),
    };
    Line::from(vec![Span::raw("Report: "), Span::styled(text, Style::default().fg(color))])
}

/// Renders the summary panel: score and band, a gauge, alert counts per
/// bucket and the state of the report. Empty until a scan has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & band
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(6), // Alert counts
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Surface & report
        ])
        .split(area);

    if app.state != AppState::Finished || app.session.status != ScanStatus::Success {
        return;
    }
    let summary = &app.summary;
    let Some(band) = summary.band else {
        return;
    };
    let color = band_color(band);

    // --- Score & Band ---
    let score_text = Text::from(vec![
        Line::from("Risk Score".bold()),
        Line::from(format!("{:.0}/100 ({})", summary.risk_score, band)).style(Style::default().fg(color).bold()),
        Line::from(band.headline()).style(Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    let gauge = Gauge::default()
        .percent(summary.risk_score.round().clamp(0.0, 100.0) as u16)
        .label("")
        .style(Style::default().fg(color));
    frame.render_widget(gauge, summary_chunks[1]);

    // --- Alert counts ---
    let count = |label: &'static str, n: usize, color: Color| {
        Line::from(vec![
            Span::raw(format!("{label:<15}")),
            Span::styled(n.to_string(), Style::default().fg(color)),
        ])
    };
    let counts = vec![
        count("High", summary.high, Color::Red),
        count("Medium", summary.medium, Color::Yellow),
        count("Low", summary.low, Color::Cyan),
        count("Informational", summary.informational, Color::Blue),
        count("Other", summary.unrecognized, Color::Magenta),
    ];
    let counts_block = Block::default().title("ALERTS".bold());
    frame.render_widget(Paragraph::new(counts).block(counts_block), summary_chunks[3]);

    // --- Surface & report ---
    let mut surface = vec![
        Line::from(format!("Open ports: {}", summary.open_ports)),
        Line::from(format!("Pages crawled: {}", summary.pages)),
        Line::from(""),
        report_line(&app.session.report),
    ];
    if let Some(at) = app.session.completed_at {
        surface.push(Line::from(Span::styled(
            format!("Completed {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let surface_block = Block::default().title("SURFACE".bold());
    let p = Paragraph::new(surface).wrap(Wrap { trim: true }).block(surface_block);
    frame.render_widget(p, summary_chunks[5]);
}
