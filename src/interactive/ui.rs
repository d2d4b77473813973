//! Top-level layout and drawing for the interactive UI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, AppMode};
use super::utils::{centered_rect, get_message_style};
use super::{filter_form, occupancy_chart, week_detail};

/// Draw the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and range
            Constraint::Min(8),    // Chart
            Constraint::Length(4), // Messages
            Constraint::Length(1), // Key hints
        ])
        .split(f.size());

    draw_title(f, app, chunks[0]);
    occupancy_chart::render(f, app, chunks[1]);
    draw_messages(f, app, chunks[2]);
    draw_key_hints(f, chunks[3]);

    // Modal overlays
    match app.mode {
        AppMode::Filter => {
            if let Some(form) = &app.filter_form {
                filter_form::render(f, form, centered_rect(64, 70, f.size()));
            }
        }
        AppMode::Detail => {
            week_detail::render(f, app, centered_rect(90, 70, f.size()));
        }
        AppMode::Help => {
            draw_help(f, centered_rect(60, 70, f.size()));
        }
        AppMode::Normal => {}
    }
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let loading = if app.loading { " · refreshing..." } else { "" };
    let line = Line::from(vec![
        Span::styled(
            format!(
                " {} to {} ",
                app.range_start.format("%Y-%m-%d"),
                app.range_end.format("%Y-%m-%d")
            ),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "· {} of {} projects · {}{}",
                app.filtered_count(),
                app.projects.len(),
                app.criteria_description(),
                loading
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Bezettingsoverzicht ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .messages
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|m| {
            Line::from(Span::styled(
                format!("{} {}", m.icon(), m.text),
                get_message_style(m.message_type),
            ))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_key_hints(f: &mut Frame, area: Rect) {
    let hints = " ↑↓ week · Enter detail · Tab shift range · f filter · x clear · r refresh · ? help · q quit";
    let paragraph = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    f.render_widget(Clear, area);

    let entries = [
        ("↑ / ←", "Select previous week"),
        ("↓ / →", "Select next week"),
        ("Tab / Shift-Tab", "Shift the range one week"),
        ("PageDown / PageUp", "Shift the range four weeks"),
        ("Home", "Jump back to the window around today"),
        ("Enter", "Open the drill-down for the selected week"),
        ("c", "Copy drill-down to clipboard (in detail view)"),
        ("f", "Edit filter criteria"),
        ("x", "Clear all filters"),
        ("r", "Refresh projects from the dashboard"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, description) in entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<18}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description, Style::default().fg(Color::White)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  One active project = one crew for every week it touches.",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

// Made with Bob
