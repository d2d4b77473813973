//! Occupancy bar chart: one row per calendar week

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::App;
use crate::utils::format_week_range;

/// Render the weekly occupancy chart
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if app.buckets.is_empty() {
        lines.push(Line::from(Span::styled(
            "No weeks in the selected range",
            Style::default().fg(Color::Gray),
        )));
    } else {
        // Keep the selected week inside the visible window
        let visible = area.height.saturating_sub(2) as usize;
        let first = if visible == 0 || app.selected_week < visible {
            0
        } else {
            app.selected_week + 1 - visible
        };

        let bar_width = 30usize;
        let scale = app.summary.max_occupancy.max(1);

        for (idx, bucket) in app.buckets.iter().enumerate().skip(first).take(visible.max(1)) {
            let is_selected = idx == app.selected_week;
            let filled = (bucket.occupancy * bar_width / scale).min(bar_width);

            // Selection is shown by tinting every span's background
            let sel = |style: Style| {
                if is_selected {
                    style.bg(Color::DarkGray)
                } else {
                    style
                }
            };

            let bar_color = if bucket.occupancy == 0 {
                Color::DarkGray
            } else {
                Color::Green
            };

            let label_style = if is_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{:<9}", bucket.label()), sel(label_style)),
                Span::styled(
                    format!("{:<24}", format_week_range(bucket)),
                    sel(Style::default().fg(Color::Gray)),
                ),
                Span::styled("█".repeat(filled), sel(Style::default().fg(bar_color))),
                Span::styled(" ".repeat(bar_width - filled), sel(Style::default())),
                Span::styled(
                    format!(" {:>3}", bucket.occupancy),
                    sel(Style::default().fg(Color::Yellow)),
                ),
            ]));
        }
    }

    let peak = app.buckets.iter().map(|b| b.occupancy).max().unwrap_or(0);
    let title = format!(
        " Crew occupancy · avg {:.1} · peak {} · axis {} ",
        app.summary.avg_occupancy, peak, app.summary.max_occupancy
    );

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

// Made with Bob
