//! Drill-down panel: the projects behind one week's occupancy count

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Row, Table},
    Frame,
};

use super::app::App;
use super::utils::{get_status_color, truncate_str};
use crate::utils::format_week_range;

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render the drill-down popup for the selected week
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(bucket) = app.selected_bucket() else {
        return;
    };

    f.render_widget(Clear, area);

    let projects = app.selected_week_projects();

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Status"),
        Cell::from("Manager"),
        Cell::from("Location"),
        Cell::from("Start"),
        Cell::from("End"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .height(1);

    let rows: Vec<Row> = projects
        .iter()
        .map(|project| {
            let status = project.status.as_deref().unwrap_or("-");
            Row::new(vec![
                Cell::from(truncate_str(project.name.as_deref().unwrap_or("(unnamed)"), 30)),
                Cell::from(truncate_str(status, 16))
                    .style(Style::default().fg(get_status_color(status))),
                Cell::from(truncate_str(project.manager.as_deref().unwrap_or("-"), 18)),
                Cell::from(truncate_str(project.location.as_deref().unwrap_or("-"), 14)),
                Cell::from(fmt_date(project.start)),
                Cell::from(fmt_date(project.end)),
            ])
            .height(1)
        })
        .collect();

    let widths = vec![
        Constraint::Percentage(28),
        Constraint::Percentage(16),
        Constraint::Percentage(18),
        Constraint::Percentage(14),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let title = format!(
        " {} crews in {} ({}) · c copy · Esc close ",
        projects.len(),
        bucket.label(),
        format_week_range(bucket)
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

// Made with Bob
