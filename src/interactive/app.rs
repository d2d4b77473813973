//! Application state and logic for the interactive occupancy browser

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler as InputEventHandler;

use crate::cache::ProjectCache;
use crate::dashboard::{self, DashboardClient};
use crate::occupancy::{self, FilterCriteria, OccupancySummary, ProjectInterval, WeekBucket};
use crate::utils;

use super::filter_form::FilterForm;
use super::messages::Message;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Chart view and week navigation
    Normal,
    /// Editing filter criteria
    Filter,
    /// Drill-down into the selected week
    Detail,
    /// Help screen
    Help,
}

/// Main application state
pub struct App {
    /// Dashboard client
    pub client: DashboardClient,
    /// On-disk snapshot of the last fetched register
    pub cache: ProjectCache,
    /// All known projects, unfiltered
    pub projects: Vec<ProjectInterval>,
    /// Active filter criteria
    pub criteria: FilterCriteria,
    /// View range (both bounds inclusive)
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    /// Derived: the occupancy buckets for (projects, criteria, range)
    pub buckets: Vec<WeekBucket>,
    /// Derived: chart scale and average for the current buckets
    pub summary: OccupancySummary,
    /// Index of the selected week in `buckets`
    pub selected_week: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Messages to display
    pub messages: Vec<Message>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Filter form state while in Filter mode
    pub filter_form: Option<FilterForm>,
}

impl App {
    /// Create a new App instance, seeded from the cache when possible
    pub async fn new(client: DashboardClient) -> Result<Self> {
        let today = Local::now().naive_local().date();
        let (range_start, range_end) = utils::default_view_range(today);

        let cache = ProjectCache::load().unwrap_or_default();
        let projects = dashboard::to_intervals(&cache.projects);
        let from_cache = !projects.is_empty();
        let cache_stale = cache.is_stale(24);

        let mut app = App {
            client,
            cache,
            projects,
            criteria: FilterCriteria::default(),
            range_start,
            range_end,
            buckets: Vec::new(),
            summary: occupancy::summarize(&[]),
            selected_week: 0,
            mode: AppMode::Normal,
            messages: vec![Message::info("Initializing...")],
            loading: false,
            filter_form: None,
        };

        app.recompute();
        app.select_week_containing(today);

        if !from_cache || cache_stale {
            app.refresh().await?;
        } else {
            app.messages.push(Message::info(format!(
                "Loaded {} projects from cache - press 'r' to refresh",
                app.projects.len()
            )));
        }

        Ok(app)
    }

    /// Recompute buckets and summary from scratch.
    ///
    /// This is the only way the derived state changes; every filter, range or
    /// data change funnels through here, so the view can never drift from
    /// its inputs.
    pub fn recompute(&mut self) {
        self.buckets = occupancy::compute_occupancy(
            &self.projects,
            &self.criteria,
            self.range_start,
            self.range_end,
        );
        self.summary = occupancy::summarize(&self.buckets);
        if self.selected_week >= self.buckets.len() {
            self.selected_week = self.buckets.len().saturating_sub(1);
        }
    }

    /// The currently selected bucket, if any
    pub fn selected_bucket(&self) -> Option<&WeekBucket> {
        self.buckets.get(self.selected_week)
    }

    /// Drill-down list for the selected week, recomputed on demand with the
    /// same predicate that produced the counts
    pub fn selected_week_projects(&self) -> Vec<ProjectInterval> {
        match self.selected_bucket() {
            Some(bucket) => occupancy::projects_in_week(&self.projects, &self.criteria, bucket),
            None => Vec::new(),
        }
    }

    /// Short description of the active filters for the title bar
    pub fn criteria_description(&self) -> String {
        if self.criteria.is_empty() {
            return "no filters".to_string();
        }

        let mut parts = Vec::new();
        let mut push = |label: &str, value: &Option<String>| {
            if let Some(v) = value {
                parts.push(format!("{}={}", label, v));
            }
        };
        push("search", &self.criteria.search);
        push("status", &self.criteria.status);
        push("organization", &self.criteria.organization);
        push("manager", &self.criteria.manager);
        push("location", &self.criteria.location);
        push("category", &self.criteria.category);
        push("discipline", &self.criteria.discipline);
        parts.join(", ")
    }

    /// Count of projects passing the active filters
    pub fn filtered_count(&self) -> usize {
        occupancy::filter_projects(&self.projects, &self.criteria).len()
    }

    /// Refetch the project register from the dashboard
    pub async fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        self.messages.push(Message::info("Refreshing project list..."));

        match self.client.get_projects().await {
            Ok(records) => {
                self.projects = dashboard::to_intervals(&records);
                self.cache.update(records);
                if let Err(e) = self.cache.save() {
                    tracing::warn!("Failed to update project cache: {}", e);
                }
                self.recompute();
                self.messages.clear();
                self.messages.push(Message::success(format!(
                    "Loaded {} projects from the dashboard",
                    self.projects.len()
                )));
            }
            Err(e) => {
                self.messages.push(Message::error(format!("Refresh failed: {}", e)));
            }
        }

        self.loading = false;
        Ok(())
    }

    /// Drop expired messages
    pub fn prune_messages(&mut self) {
        if self.messages.len() > 1 {
            self.messages.retain(|m| !m.is_expired());
        }
    }

    /// Handle keyboard events; returns false when the app should exit
    pub async fn handle_event(&mut self, event: KeyEvent) -> Result<bool> {
        match self.mode {
            AppMode::Normal => self.handle_normal_mode(event).await,
            AppMode::Filter => self.handle_filter_mode(event),
            AppMode::Detail => self.handle_detail_mode(event),
            AppMode::Help => self.handle_help_mode(event),
        }
    }

    async fn handle_normal_mode(&mut self, event: KeyEvent) -> Result<bool> {
        match event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                return Ok(false); // Exit application
            }
            KeyCode::Char('?') => {
                self.mode = AppMode::Help;
            }
            // Arrow keys: move the week selection
            KeyCode::Up | KeyCode::Left => {
                self.selected_week = self.selected_week.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Right => {
                if self.selected_week + 1 < self.buckets.len() {
                    self.selected_week += 1;
                }
            }
            // Tab: slide the whole range a week at a time
            KeyCode::Tab => {
                if event.modifiers.contains(KeyModifiers::SHIFT) {
                    self.shift_range(-7);
                } else {
                    self.shift_range(7);
                }
            }
            KeyCode::BackTab => {
                self.shift_range(-7);
            }
            // Page keys: slide four weeks
            KeyCode::PageUp => {
                self.shift_range(-28);
            }
            KeyCode::PageDown => {
                self.shift_range(28);
            }
            // Jump back to the window around today
            KeyCode::Home => {
                let today = Local::now().naive_local().date();
                let (start, end) = utils::default_view_range(today);
                self.range_start = start;
                self.range_end = end;
                self.recompute();
                self.select_week_containing(today);
            }
            // Open the drill-down for the selected week
            KeyCode::Enter => {
                if self.selected_bucket().is_some() {
                    self.mode = AppMode::Detail;
                }
            }
            // Edit filters
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.filter_form = Some(FilterForm::from_criteria(&self.criteria));
                self.mode = AppMode::Filter;
            }
            // Clear filters
            KeyCode::Char('x') | KeyCode::Char('X') => {
                if !self.criteria.is_empty() {
                    self.criteria = FilterCriteria::default();
                    self.recompute();
                    self.messages.clear();
                    self.messages.push(Message::info("Filters cleared"));
                }
            }
            // Refresh data
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.refresh().await?;
            }
            _ => {}
        }
        Ok(true)
    }

    fn handle_filter_mode(&mut self, event: KeyEvent) -> Result<bool> {
        if let Some(form) = &mut self.filter_form {
            match event.code {
                KeyCode::Esc => {
                    self.filter_form = None;
                    self.mode = AppMode::Normal;
                    self.messages.clear();
                    self.messages.push(Message::info("Filter unchanged"));
                }
                KeyCode::Enter => {
                    self.criteria = form.to_criteria();
                    self.filter_form = None;
                    self.mode = AppMode::Normal;
                    self.recompute();
                    self.messages.clear();
                    self.messages.push(Message::success(format!(
                        "Filter applied: {} ({} of {} projects)",
                        self.criteria_description(),
                        self.filtered_count(),
                        self.projects.len()
                    )));
                }
                KeyCode::Tab | KeyCode::Down => {
                    if event.modifiers.contains(KeyModifiers::SHIFT) {
                        form.previous_field();
                    } else {
                        form.next_field();
                    }
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.previous_field();
                }
                // Everything else edits the active input
                _ => {
                    form.current_input_mut().handle_event(&Event::Key(event));
                }
            }
        }
        Ok(true)
    }

    fn handle_detail_mode(&mut self, event: KeyEvent) -> Result<bool> {
        match event.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.copy_week_to_clipboard();
            }
            _ => {}
        }
        Ok(true)
    }

    fn handle_help_mode(&mut self, event: KeyEvent) -> Result<bool> {
        match event.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
        Ok(true)
    }

    /// Slide the view range by the given number of days
    fn shift_range(&mut self, days: i64) {
        self.range_start += chrono::Duration::days(days);
        self.range_end += chrono::Duration::days(days);
        self.recompute();
    }

    /// Move the selection onto the bucket containing the given date
    fn select_week_containing(&mut self, date: NaiveDate) {
        if let Some(idx) = self
            .buckets
            .iter()
            .position(|b| b.week_start <= date && date <= b.week_end)
        {
            self.selected_week = idx;
        }
    }

    /// Copy the selected week's drill-down list to the system clipboard
    fn copy_week_to_clipboard(&mut self) {
        let Some(bucket) = self.selected_bucket() else {
            return;
        };

        let mut text = format!(
            "Projects active in {} ({})\n",
            bucket.label(),
            utils::format_week_range(bucket)
        );
        for project in self.selected_week_projects() {
            let fmt_date = |d: Option<NaiveDate>| {
                d.map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            text.push_str(&format!(
                "- {} | {} | {} | {} | {}..{}\n",
                project.name.as_deref().unwrap_or("(unnamed)"),
                project.status.as_deref().unwrap_or("-"),
                project.manager.as_deref().unwrap_or("-"),
                project.location.as_deref().unwrap_or("-"),
                fmt_date(project.start),
                fmt_date(project.end),
            ));
        }

        self.messages.clear();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(_) => {
                self.messages
                    .push(Message::success("Week copied to clipboard"));
            }
            Err(e) => {
                self.messages
                    .push(Message::error(format!("Clipboard unavailable: {}", e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let client = DashboardClient::new(
            "https://dashboard.invalid".to_string(),
            "test-key".to_string(),
        );
        let today = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        let (range_start, range_end) = utils::default_view_range(today);

        let mut app = App {
            client,
            cache: ProjectCache::new(),
            projects: vec![
                ProjectInterval {
                    id: "p1".to_string(),
                    name: Some("Kademuur Westhaven".to_string()),
                    status: Some("In uitvoering".to_string()),
                    manager: Some("J. de Vries".to_string()),
                    location: Some("Westhaven".to_string()),
                    organization: None,
                    category: None,
                    discipline: None,
                    start: NaiveDate::from_ymd_opt(2026, 3, 2),
                    end: NaiveDate::from_ymd_opt(2026, 4, 10),
                },
                ProjectInterval {
                    id: "p2".to_string(),
                    name: Some("Brugrenovatie A12".to_string()),
                    status: Some("Afgerond".to_string()),
                    manager: None,
                    location: None,
                    organization: None,
                    category: None,
                    discipline: None,
                    start: NaiveDate::from_ymd_opt(2026, 1, 5),
                    end: NaiveDate::from_ymd_opt(2026, 2, 20),
                },
            ],
            criteria: FilterCriteria::default(),
            range_start,
            range_end,
            buckets: Vec::new(),
            summary: occupancy::summarize(&[]),
            selected_week: 0,
            mode: AppMode::Normal,
            messages: Vec::new(),
            loading: false,
            filter_form: None,
        };
        app.recompute();
        app.select_week_containing(today);
        app
    }

    #[test]
    fn test_recompute_derives_buckets() {
        let app = test_app();
        assert!(!app.buckets.is_empty());
        // 12 Monday-aligned weeks in the default window
        assert_eq!(app.buckets.len(), 12);
    }

    #[test]
    fn test_selection_follows_today() {
        let app = test_app();
        let bucket = app.selected_bucket().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        assert!(bucket.week_start <= today && today <= bucket.week_end);
    }

    #[test]
    fn test_drilldown_matches_bucket_count() {
        let app = test_app();
        for (idx, bucket) in app.buckets.iter().enumerate() {
            let mut probe = test_app();
            probe.selected_week = idx;
            assert_eq!(probe.selected_week_projects().len(), bucket.occupancy);
        }
    }

    #[test]
    fn test_shift_range_keeps_week_count() {
        let mut app = test_app();
        let before = app.buckets.len();
        app.shift_range(7);
        assert_eq!(app.buckets.len(), before);
        app.shift_range(-28);
        assert_eq!(app.buckets.len(), before);
    }

    #[test]
    fn test_filter_change_recomputes() {
        let mut app = test_app();
        let unfiltered: usize = app.buckets.iter().map(|b| b.occupancy).sum();

        app.criteria = FilterCriteria {
            status: Some("In uitvoering".to_string()),
            ..FilterCriteria::default()
        };
        app.recompute();
        let filtered: usize = app.buckets.iter().map(|b| b.occupancy).sum();
        assert!(filtered < unfiltered);
        assert_eq!(app.filtered_count(), 1);
    }

    #[test]
    fn test_criteria_description() {
        let mut app = test_app();
        assert_eq!(app.criteria_description(), "no filters");

        app.criteria.search = Some("sluis".to_string());
        app.criteria.status = Some("In uitvoering".to_string());
        assert_eq!(
            app.criteria_description(),
            "search=sluis, status=In uitvoering"
        );
    }

    #[test]
    fn test_selection_clamped_after_range_shrink() {
        let mut app = test_app();
        app.selected_week = app.buckets.len() - 1;
        app.range_end = app.range_start; // one-week range
        app.recompute();
        assert_eq!(app.buckets.len(), 1);
        assert_eq!(app.selected_week, 0);
    }
}

// Made with Bob
