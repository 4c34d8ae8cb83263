// src/ui/widgets/results.rs

use crate::app::{App, AppState, ResultTab, SPINNER_CHARS};
use fastscan_tui::core::findings::{group_by_severity, SeverityBucket};
use fastscan_tui::core::knowledge_base;
use fastscan_tui::core::models::{AiSection, ScanResult};
use fastscan_tui::core::narrative::analysis_failure;
use fastscan_tui::core::session::ScanStatus;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Tabs, Wrap},
};
use strum::IntoEnumIterator;

pub fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Scan Results (Navigate with ← → ↑ ↓)");

    if app.state != AppState::Finished {
        let content = match app.state {
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw(format!("Scanning {}... Please wait.", app.input.trim())),
                ]))
            }
            _ => Paragraph::new("Enter a target and press Enter to start the scan."),
        };
        frame.render_widget(content.alignment(Alignment::Center).block(main_block), area);
        return;
    }

    if app.session.status == ScanStatus::Error {
        let message = app.session.error_message().unwrap_or_else(|| "Scan failed.".to_string());
        let text = vec![
            Line::from("SCAN FAILED".bold().fg(Color::Red)),
            Line::from(""),
            Line::from(message),
        ];
        let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(main_block);
        frame.render_widget(p, area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner_area);

    let tabs = Tabs::new(ResultTab::iter().map(|t| t.to_string()))
        .select(app.tab.index())
        .highlight_style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, chunks[0]);

    let lines = match &app.session.result {
        Some(result) => tab_lines(app.tab, result),
        None => vec![Line::from("No result.")],
    };

    // Keep the offset inside the content so scrolling back up responds at once.
    app.scroll_offset = app.scroll_offset.min(lines.len().saturating_sub(1));
    app.report_scroll_state = app
        .report_scroll_state
        .content_length(lines.len())
        .position(app.scroll_offset);

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    frame.render_widget(body, chunks[1]);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight).thumb_symbol("■");
    frame.render_stateful_widget(scrollbar, chunks[1], &mut app.report_scroll_state);
}

pub fn tab_lines(tab: ResultTab, result: &ScanResult) -> Vec<Line<'static>> {
    match tab {
        ResultTab::Ports => port_lines(result),
        ResultTab::Alerts => alert_lines(result),
        ResultTab::Pages => page_lines(result),
        ResultTab::Ai => ai_lines(result),
    }
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().bold().underlined()))
}

fn port_lines(result: &ScanResult) -> Vec<Line<'static>> {
    if result.ports.is_empty() {
        return vec![Line::from(Span::styled("✓ No ports reported.", Style::default().fg(Color::Green)))];
    }

    let mut lines = Vec::new();
    for port in &result.ports {
        let state_style = if port.is_open() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let protocol = port.protocol.as_deref().unwrap_or("tcp");
        let service = port.service.as_deref().unwrap_or("unknown");
        lines.push(Line::from(vec![
            Span::styled(format!("{:>5}/{:<4}", port.port, protocol), Style::default().bold()),
            Span::styled(format!(" {:<9}", port.state), state_style),
            Span::raw(service.to_string()),
        ]));

        if !port.is_open() {
            continue;
        }
        if let Some(detail) = knowledge_base::get_port_detail(port.port) {
            lines.push(Line::from(vec![
                Span::styled(format!("      [{}] ", detail.category), Style::default().fg(Color::DarkGray)),
                Span::styled(detail.title, Style::default().fg(Color::Yellow)),
                Span::styled(format!("  exposure {:.0}/10", detail.exposure), Style::default().fg(Color::DarkGray)),
            ]));
            lines.push(Line::from(format!("      {}", detail.description)));
            lines.push(Line::from(vec![
                Span::styled("      HOW TO FIX: ", Style::default().fg(Color::Yellow).bold()),
                Span::raw(detail.remediation),
            ]));
        }
    }
    lines
}

fn bucket_style(bucket: SeverityBucket) -> Style {
    match bucket {
        SeverityBucket::High => Style::default().fg(Color::Red).bold(),
        SeverityBucket::Medium => Style::default().fg(Color::Yellow),
        SeverityBucket::Low => Style::default().fg(Color::Cyan),
        SeverityBucket::Informational => Style::default().fg(Color::Blue),
    }
}

fn alert_lines(result: &ScanResult) -> Vec<Line<'static>> {
    if result.alerts.is_empty() {
        return vec![Line::from(Span::styled("✓ No alerts raised.", Style::default().fg(Color::Green)))];
    }

    let groups = group_by_severity(&result.alerts);
    let mut lines = Vec::new();
    for (bucket, alerts) in groups.iter() {
        if alerts.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            format!("{} ({})", bucket, alerts.len()),
            bucket_style(bucket).underlined(),
        )));
        for alert in alerts {
            let mut spans = vec![Span::raw(format!("  • {}", alert.name))];
            if let Some(url) = &alert.url {
                spans.push(Span::styled(format!("  {url}"), Style::default().fg(Color::DarkGray)));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    if !groups.unrecognized.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Other ({})", groups.unrecognized.len()),
            Style::default().fg(Color::Magenta).underlined(),
        )));
        for alert in &groups.unrecognized {
            lines.push(Line::from(format!("  • {} [{}]", alert.name, alert.severity)));
        }
    }
    lines
}

fn page_lines(result: &ScanResult) -> Vec<Line<'static>> {
    let mut lines = vec![heading(format!("Pages ({})", result.pages.len()))];
    if result.pages.is_empty() {
        lines.push(Line::from("  No pages crawled."));
    }
    for page in &result.pages {
        let depth = page.depth.map(|d| format!("[{d}] ")).unwrap_or_default();
        let mut spans = vec![
            Span::styled(format!("  {depth}"), Style::default().fg(Color::DarkGray)),
            Span::raw(page.url.clone()),
        ];
        if let Some(title) = &page.title {
            spans.push(Span::styled(format!("  {title}"), Style::default().fg(Color::Cyan)));
        }
        if let Some(error) = &page.error {
            spans.push(Span::styled(format!("  ({error})"), Style::default().fg(Color::Red)));
        }
        lines.push(Line::from(spans));
    }

    for (title, urls) in [("XHR calls", &result.xhr_calls), ("JavaScript files", &result.js_files)] {
        if urls.is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(heading(format!("{title} ({})", urls.len())));
        lines.extend(urls.iter().map(|u| Line::from(format!("  {u}"))));
    }
    lines
}

fn ai_lines(result: &ScanResult) -> Vec<Line<'static>> {
    if let Some(failure) = analysis_failure(result) {
        return vec![Line::from(Span::styled(failure.user_message(), Style::default().fg(Color::Red)))];
    }

    let summary = match &result.ai {
        Some(AiSection::Summary(summary)) => summary,
        _ if result.llm_used => return vec![Line::from("The scan service returned no AI narrative.")],
        _ => return vec![Line::from("AI analysis was not requested for this scan (F3 toggles it).")],
    };

    let mut lines = Vec::new();
    for (title, body) in [
        ("EXECUTIVE SUMMARY", &summary.executive_summary),
        ("TECHNICAL ANALYSIS", &summary.technical_analysis),
        ("CONCLUSION", &summary.conclusion),
    ] {
        if body.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(title, Style::default().fg(Color::Yellow).bold())));
        lines.push(Line::from(body.clone()));
        lines.push(Line::from(""));
    }
    if !summary.remediation.is_empty() {
        lines.push(Line::from(Span::styled("REMEDIATION", Style::default().fg(Color::Yellow).bold())));
        lines.extend(summary.remediation.iter().map(|step| Line::from(format!("  - {step}"))));
    }
    lines
}
