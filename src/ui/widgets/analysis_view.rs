// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use vanguard_score::core::knowledge_base::{self, CheckCategory};
use vanguard_score::core::models::CheckResult;

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Analysis Report (Navigate with ↑ ↓)");

    if !matches!(app.state, AppState::Finished) {
        let content = match app.state {
            AppState::Idle => Paragraph::new("Enter a URL and press Enter. Results will appear here...")
                .alignment(Alignment::Center),
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw("Scoring... Please wait."),
                ]))
                .alignment(Alignment::Center)
            }
            AppState::Finished => Paragraph::new(""),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    if let Some(error) = &app.error {
        let text = Text::from(vec![
            Line::from(""),
            Line::from("SCORE UNAVAILABLE".bold().fg(Color::Red)),
            Line::from(""),
            Line::from(error.as_str()),
        ]);
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(main_block);
        frame.render_widget(p, area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Min(0)])
        .split(inner_area);

    let items: Vec<ListItem> = app.findings.iter().map(finding_line).map(ListItem::new).collect();
    let findings_list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(findings_list, chunks[0], &mut app.analysis_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    match app.selected_finding() {
        Some(finding) => {
            let p = Paragraph::new(finding_details(finding))
                .wrap(Wrap { trim: true })
                .block(detail_block);
            frame.render_widget(p, chunks[1]);
        }
        None => {
            let p = Paragraph::new("No applicable checks for this target.")
                .alignment(Alignment::Center)
                .block(detail_block);
            frame.render_widget(p, chunks[1]);
        }
    }
}

fn category_prefix(category: CheckCategory) -> &'static str {
    match category {
        CheckCategory::Transport => "[TRANSPORT] ",
        CheckCategory::Headers => "[HEADERS] ",
        CheckCategory::Mail => "[MAIL] ",
        CheckCategory::Disclosure => "[INCIDENTS] ",
    }
}

fn finding_line(finding: &CheckResult) -> Line<'static> {
    let Some(detail) = knowledge_base::get_check_detail(finding.kind) else {
        return Line::from(finding.kind.to_string());
    };
    let (icon, style) = if finding.passed() {
        ("✓ ", Style::default().fg(Color::Green))
    } else {
        ("✗ ", Style::default().fg(Color::Red))
    };
    let contribution = finding.contribution;
    Line::from(vec![
        Span::styled(icon, style),
        Span::styled(category_prefix(detail.category), Style::default().fg(Color::DarkGray)),
        Span::styled(detail.badge_title, style),
        Span::styled(
            format!(" ({}/{})", contribution.achieved, contribution.maximum),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn finding_details(finding: &CheckResult) -> Text<'static> {
    let Some(detail) = knowledge_base::get_check_detail(finding.kind) else {
        return Text::from("No details available.");
    };
    let category = Line::from(Span::styled(
        detail.category.to_string(),
        Style::default().fg(Color::DarkGray),
    ));
    if finding.passed() {
        return Text::from(vec![
            category,
            Line::from(""),
            Line::from(Span::styled(
                format!("BADGE EARNED: {}", detail.badge_title),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(detail.badge_description),
        ]);
    }
    let mut lines = vec![category, Line::from("")];
    if let Some(weakness) = knowledge_base::weakness_for(finding) {
        lines.push(Line::from("WHAT IT IS:".yellow().bold()));
        lines.push(Line::from(weakness));
        lines.push(Line::from(""));
    }
    lines.push(Line::from("HOW TO FIX:".yellow().bold()));
    lines.push(Line::from(detail.remediation));
    Text::from(lines)
}
