// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use chrono::Utc;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

/// Renders the score overview: the normalized score with an animated gauge,
/// point totals, the certificate summary and the detected web server.
///
/// Nothing is drawn inside the border until a report is available.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & rating
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(7), // Certificate
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Server
        ])
        .split(area);

    if !matches!(app.state, AppState::Finished) {
        return;
    }
    let Some(report) = &app.report else {
        return;
    };

    // --- Score & Rating ---
    let percent = app.target_score();
    let (rating_text, rating_style) = match percent {
        90..=100 => ("Excellent", Style::default().fg(Color::Green)),
        75..=89 => ("Good", Style::default().fg(Color::Cyan)),
        50..=74 => ("Needs Improvement", Style::default().fg(Color::Yellow)),
        _ => ("Poor", Style::default().fg(Color::Red)),
    };
    let score_line = Line::from(format!(
        "{:.2} ({}/{} points, {})",
        report.score.normalized, report.score.achieved_total, report.score.max_total, rating_text
    ))
    .style(rating_style);
    let score_text = Text::from(vec![Line::from("Overall Score".bold()), score_line]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    let score_gauge = Gauge::default()
        .percent(app.displayed_score as u16)
        .label("")
        .style(Style::default().fg(if app.displayed_score >= 80 {
            Color::Green
        } else if app.displayed_score >= 50 {
            Color::Yellow
        } else {
            Color::Red
        }));
    frame.render_widget(score_gauge, summary_chunks[1]);

    // --- Certificate ---
    let cert = &report.certificate;
    let cert_block = Block::default().title("CERTIFICATE".bold());
    let cert_lines = match &cert.error {
        Some(e) => vec![Line::from(Span::styled(
            format!("Unavailable: {e}"),
            Style::default().fg(Color::Red),
        ))],
        None => {
            let valid = cert.is_valid_at(Utc::now());
            let (status, style) = if valid {
                ("✓ Currently valid", Style::default().fg(Color::Green))
            } else {
                ("✗ Outside validity period", Style::default().fg(Color::Red))
            };
            let mut lines = vec![Line::from(Span::styled(status, style))];
            if let Some(subject) = &cert.subject_common_name {
                lines.push(Line::from(format!("Subject: {subject}")));
            }
            if let Some(issuer) = &cert.issuer_common_name {
                lines.push(Line::from(format!("Issuer:  {issuer}")));
            }
            if let Some(until) = cert.not_after {
                lines.push(Line::from(format!("Expires: {}", until.date_naive())));
            }
            if let Some(ip) = &cert.ip {
                lines.push(Line::from(format!("Address: {ip}")));
            }
            if !cert.subject_alt_names.is_empty() {
                lines.push(Line::from(format!("SANs:    {}", cert.subject_alt_names.len())));
            }
            lines
        }
    };
    frame.render_widget(
        Paragraph::new(cert_lines).block(cert_block).wrap(Wrap { trim: true }),
        summary_chunks[3],
    );

    // --- Server ---
    let server_block = Block::default().title("WEB SERVER".bold());
    let server_lines = match &report.server {
        Some(server) => vec![
            Line::from(Span::styled(server.name.clone(), Style::default().fg(Color::Cyan))),
            Line::from(format!("Vendor: {}", server.vendor)),
            Line::from(server.description.clone()),
        ],
        None => vec![Line::from("Not identified.")],
    };
    frame.render_widget(
        Paragraph::new(server_lines).block(server_block).wrap(Wrap { trim: true }),
        summary_chunks[5],
    );
}
