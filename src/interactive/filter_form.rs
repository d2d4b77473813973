//! Filter form for the interactive occupancy view
//!
//! The form edits a [`FilterCriteria`] value as a whole: the user types into
//! plain text inputs, and only on apply is a fresh criteria value handed back
//! to the app, which recomputes the overview from scratch. No filter state
//! leaks into the counting logic.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::Input;

use crate::occupancy::FilterCriteria;

/// The editable criteria fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    Status,
    Organization,
    Manager,
    Location,
    Category,
    Discipline,
}

impl FilterField {
    pub fn all() -> [FilterField; 7] {
        [
            FilterField::Search,
            FilterField::Status,
            FilterField::Organization,
            FilterField::Manager,
            FilterField::Location,
            FilterField::Category,
            FilterField::Discipline,
        ]
    }

    pub fn next(&self) -> FilterField {
        match self {
            FilterField::Search => FilterField::Status,
            FilterField::Status => FilterField::Organization,
            FilterField::Organization => FilterField::Manager,
            FilterField::Manager => FilterField::Location,
            FilterField::Location => FilterField::Category,
            FilterField::Category => FilterField::Discipline,
            FilterField::Discipline => FilterField::Search,
        }
    }

    pub fn previous(&self) -> FilterField {
        match self {
            FilterField::Search => FilterField::Discipline,
            FilterField::Status => FilterField::Search,
            FilterField::Organization => FilterField::Status,
            FilterField::Manager => FilterField::Organization,
            FilterField::Location => FilterField::Manager,
            FilterField::Category => FilterField::Location,
            FilterField::Discipline => FilterField::Category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Search => "Search",
            FilterField::Status => "Status",
            FilterField::Organization => "Organization",
            FilterField::Manager => "Manager",
            FilterField::Location => "Location",
            FilterField::Category => "Category",
            FilterField::Discipline => "Discipline",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            FilterField::Search => "matches name, id, location and manager",
            FilterField::Organization => "type \"none\" for projects without one",
            _ => "exact match, leave blank for all",
        }
    }
}

/// Editing state for the filter popup
#[derive(Debug, Clone)]
pub struct FilterForm {
    pub search: Input,
    pub status: Input,
    pub organization: Input,
    pub manager: Input,
    pub location: Input,
    pub category: Input,
    pub discipline: Input,
    pub current_field: FilterField,
}

impl FilterForm {
    /// Prefill the form with the currently active criteria
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let input = |v: &Option<String>| Input::new(v.clone().unwrap_or_default());
        Self {
            search: input(&criteria.search),
            status: input(&criteria.status),
            organization: input(&criteria.organization),
            manager: input(&criteria.manager),
            location: input(&criteria.location),
            category: input(&criteria.category),
            discipline: input(&criteria.discipline),
            current_field: FilterField::Search,
        }
    }

    /// Collect the form into a criteria value; blank fields become None
    pub fn to_criteria(&self) -> FilterCriteria {
        let value = |input: &Input| {
            let trimmed = input.value().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        FilterCriteria {
            search: value(&self.search),
            status: value(&self.status),
            organization: value(&self.organization),
            manager: value(&self.manager),
            location: value(&self.location),
            category: value(&self.category),
            discipline: value(&self.discipline),
        }
    }

    pub fn input(&self, field: FilterField) -> &Input {
        match field {
            FilterField::Search => &self.search,
            FilterField::Status => &self.status,
            FilterField::Organization => &self.organization,
            FilterField::Manager => &self.manager,
            FilterField::Location => &self.location,
            FilterField::Category => &self.category,
            FilterField::Discipline => &self.discipline,
        }
    }

    pub fn current_input_mut(&mut self) -> &mut Input {
        match self.current_field {
            FilterField::Search => &mut self.search,
            FilterField::Status => &mut self.status,
            FilterField::Organization => &mut self.organization,
            FilterField::Manager => &mut self.manager,
            FilterField::Location => &mut self.location,
            FilterField::Category => &mut self.category,
            FilterField::Discipline => &mut self.discipline,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.next();
    }

    pub fn previous_field(&mut self) {
        self.current_field = self.current_field.previous();
    }
}

/// Render the filter popup
pub fn render(f: &mut Frame, form: &FilterForm, area: Rect) {
    f.render_widget(Clear, area);

    let mut lines = Vec::new();
    lines.push(Line::from(""));

    for field in FilterField::all() {
        let is_current = field == form.current_field;
        let label_style = if is_current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let value = form.input(field).value();
        let shown = if value.is_empty() && !is_current {
            Span::styled("(any)", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::White))
        };

        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", field.label()), label_style),
            shown,
        ]));

        if is_current {
            lines.push(Line::from(Span::styled(
                format!("  {:<14}{}", "", field.hint()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab/↓ next · Shift-Tab/↑ previous · Enter apply · Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Filter projects ")
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(lines).block(block), area);

    // Place the terminal cursor inside the active input
    let active_row_offset = FilterField::all()
        .iter()
        .position(|fld| *fld == form.current_field)
        .unwrap_or(0) as u16;
    let value_width = form.input(form.current_field).visual_cursor() as u16;
    f.set_cursor(
        area.x + 1 + 2 + 14 + value_width,
        area.y + 2 + active_row_offset,
    );
}


// Made with Bob
