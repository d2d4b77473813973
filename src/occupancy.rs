//! Weekly crew-occupancy engine
//!
//! This module is the computational core behind the occupancy overview: given
//! a list of project intervals and a date range, it produces Monday-aligned
//! week buckets with the number of simultaneously active projects per week.
//! Everything in here is a pure function over its arguments - no I/O, no
//! shared state, no clock access - so the same inputs always give the same
//! buckets.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Sentinel value for the organization filter meaning "no organization set".
pub const ORGANIZATION_NONE: &str = "none";

/// A project reduced to the fields the occupancy engine cares about.
///
/// `end` is derived by the caller as "planned end date, falling back to the
/// actual end date". A project without both a start and a derived end is
/// carried along for display purposes but never contributes to any bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInterval {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub manager: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
    pub category: Option<String>,
    pub discipline: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ProjectInterval {
    /// The inclusive overlap test: does this project's interval touch the
    /// bucket's week? Projects missing a start or end date never overlap.
    fn overlaps(&self, bucket: &WeekBucket) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= bucket.week_end && end >= bucket.week_start,
            _ => false,
        }
    }
}

/// Filter criteria for the project list.
///
/// Every field is independently optional; an unset field imposes no
/// constraint. Set fields combine with logical AND. The `organization` field
/// accepts [`ORGANIZATION_NONE`] to select projects without an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against name, id, location and manager
    pub search: Option<String>,
    pub status: Option<String>,
    pub organization: Option<String>,
    pub manager: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub discipline: Option<String>,
}

impl FilterCriteria {
    /// True if no criterion is set (filtering becomes the identity)
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.status.is_none()
            && self.organization.is_none()
            && self.manager.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.discipline.is_none()
    }

    /// Check a single project against all set criteria
    pub fn matches(&self, project: &ProjectInterval) -> bool {
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let haystacks = [
                    Some(project.id.as_str()),
                    project.name.as_deref(),
                    project.location.as_deref(),
                    project.manager.as_deref(),
                ];
                let hit = haystacks
                    .iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }

        if let Some(status) = &self.status {
            if project.status.as_deref() != Some(status.as_str()) {
                return false;
            }
        }

        if let Some(organization) = &self.organization {
            if organization == ORGANIZATION_NONE {
                // Absent or empty both count as "no organization"
                if project.organization.as_deref().map_or(false, |o| !o.is_empty()) {
                    return false;
                }
            } else if project.organization.as_deref() != Some(organization.as_str()) {
                return false;
            }
        }

        if let Some(manager) = &self.manager {
            if project.manager.as_deref() != Some(manager.as_str()) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if project.location.as_deref() != Some(location.as_str()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if project.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(discipline) = &self.discipline {
            if project.discipline.as_deref() != Some(discipline.as_str()) {
                return false;
            }
        }

        true
    }
}

/// One Monday-aligned calendar week with its occupancy count.
///
/// `week_start` is the Monday, `week_end` the following Sunday; both bounds
/// are inclusive. `week_number` uses the dashboard's day-of-year formula
/// `ceil((days_since_jan1 + jan1_weekday + 1) / 7)` with Sunday counted as 0.
/// That formula can disagree with ISO-8601 week numbers around year
/// boundaries (a late-December Monday can land in week 53 where ISO says
/// week 1 of the next year); it is kept as-is so the numbers match what the
/// dashboard has always shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: u32,
    pub year: i32,
    pub occupancy: usize,
}

impl WeekBucket {
    /// Build the bucket for the week beginning at `week_start` (a Monday)
    fn starting_at(week_start: NaiveDate) -> Self {
        let year = week_start.year();
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1st is a valid date");
        let days_since_jan1 = (week_start - jan1).num_days();
        let jan1_weekday = jan1.weekday().num_days_from_sunday() as i64;
        // Integer ceil of (days_since_jan1 + jan1_weekday + 1) / 7
        let week_number = ((days_since_jan1 + jan1_weekday + 1 + 6) / 7) as u32;

        WeekBucket {
            week_start,
            week_end: week_start + Duration::days(6),
            week_number,
            year,
            occupancy: 0,
        }
    }

    /// Short display label, e.g. "W05 2026"
    pub fn label(&self) -> String {
        format!("W{:02} {}", self.week_number, self.year)
    }
}

/// Chart-friendly aggregates over a bucket list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancySummary {
    /// True maximum rounded up to the next multiple of 5, and never below 1,
    /// so a chart axis always has a usable scale
    pub max_occupancy: usize,
    /// Arithmetic mean of the per-week counts; 0 when there are no buckets
    pub avg_occupancy: f64,
}

/// Apply the filter criteria, preserving input order.
pub fn filter_projects(
    projects: &[ProjectInterval],
    criteria: &FilterCriteria,
) -> Vec<ProjectInterval> {
    projects
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

/// Produce the Monday-aligned week buckets covering the given range.
///
/// The first bucket starts on the Monday on or before `range_start`; buckets
/// are emitted while their Monday is on or before `range_end`. A reversed
/// range yields no buckets.
pub fn week_buckets(range_start: NaiveDate, range_end: NaiveDate) -> Vec<WeekBucket> {
    if range_start > range_end {
        return Vec::new();
    }

    let mut buckets = Vec::new();
    let mut cursor = week_start_of(range_start);
    while cursor <= range_end {
        buckets.push(WeekBucket::starting_at(cursor));
        cursor += Duration::days(7);
    }
    buckets
}

/// The Monday on or before the given date
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    date - Duration::days(weekday as i64)
}

/// Count the projects whose interval overlaps the bucket's week.
///
/// Each overlapping project counts as exactly one crew, however much of the
/// week it actually covers. The check is applied per bucket with no state
/// carried between buckets.
pub fn week_occupancy(projects: &[ProjectInterval], bucket: &WeekBucket) -> usize {
    projects.iter().filter(|p| p.overlaps(bucket)).count()
}

/// The drill-down: full records of the projects behind one bucket's count.
///
/// Uses the same overlap test as [`week_occupancy`], so the returned list
/// always has exactly `bucket.occupancy` entries for the same filtered input.
pub fn contributing_projects(
    projects: &[ProjectInterval],
    bucket: &WeekBucket,
) -> Vec<ProjectInterval> {
    projects
        .iter()
        .filter(|p| p.overlaps(bucket))
        .cloned()
        .collect()
}

/// Derive the chart scale and average from a computed bucket list.
pub fn summarize(buckets: &[WeekBucket]) -> OccupancySummary {
    let true_max = buckets.iter().map(|b| b.occupancy).max().unwrap_or(0);
    let max_occupancy = if true_max == 0 {
        1
    } else {
        (true_max + 4) / 5 * 5
    };

    let avg_occupancy = if buckets.is_empty() {
        0.0
    } else {
        let total: usize = buckets.iter().map(|b| b.occupancy).sum();
        total as f64 / buckets.len() as f64
    };

    OccupancySummary {
        max_occupancy,
        avg_occupancy,
    }
}

/// Compute the full occupancy overview: filter, bucketize, count.
pub fn compute_occupancy(
    projects: &[ProjectInterval],
    criteria: &FilterCriteria,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<WeekBucket> {
    let filtered = filter_projects(projects, criteria);
    let mut buckets = week_buckets(range_start, range_end);
    for bucket in &mut buckets {
        bucket.occupancy = week_occupancy(&filtered, bucket);
    }
    buckets
}

/// Drill down into one week using the same filtered set as
/// [`compute_occupancy`] would for the same criteria.
pub fn projects_in_week(
    projects: &[ProjectInterval],
    criteria: &FilterCriteria,
    bucket: &WeekBucket,
) -> Vec<ProjectInterval> {
    let filtered = filter_projects(projects, criteria);
    contributing_projects(&filtered, bucket)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> ProjectInterval {
        ProjectInterval {
            id: id.to_string(),
            name: Some(format!("Project {}", id)),
            status: None,
            manager: None,
            location: None,
            organization: None,
            category: None,
            discipline: None,
            start,
            end,
        }
    }

    #[test]
    fn test_week_start_of() {
        // 2024-01-03 is a Wednesday
        assert_eq!(week_start_of(date(2024, 1, 3)), date(2024, 1, 1));
        // A Monday maps to itself
        assert_eq!(week_start_of(date(2024, 1, 1)), date(2024, 1, 1));
        // A Sunday goes six days back
        assert_eq!(week_start_of(date(2024, 1, 7)), date(2024, 1, 1));
    }

    #[test]
    fn test_buckets_are_contiguous_and_monday_aligned() {
        let buckets = week_buckets(date(2024, 3, 6), date(2024, 4, 2));
        assert!(!buckets.is_empty());
        assert_eq!(buckets[0].week_start, date(2024, 3, 4)); // Monday before Mar 6
        for pair in buckets.windows(2) {
            assert_eq!(pair[1].week_start, pair[0].week_start + Duration::days(7));
        }
        for bucket in &buckets {
            assert_eq!(bucket.week_end, bucket.week_start + Duration::days(6));
            assert_eq!(bucket.week_start.weekday(), chrono::Weekday::Mon);
        }
    }

    #[test]
    fn test_reversed_range_yields_no_buckets() {
        let buckets = week_buckets(date(2024, 6, 10), date(2024, 6, 1));
        assert!(buckets.is_empty());

        // Even when Monday alignment would land inside the range: Jun 5 2024
        // is a Wednesday whose Monday (Jun 3) is before the "end" Jun 3.
        let buckets = week_buckets(date(2024, 6, 5), date(2024, 6, 3));
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_week_number_formula() {
        // 2024-01-01 is a Monday; Jan 1 falls on day-of-week 1 (Sunday = 0)
        assert_eq!(WeekBucket::starting_at(date(2024, 1, 1)).week_number, 1);
        assert_eq!(WeekBucket::starting_at(date(2024, 1, 8)).week_number, 2);

        let bucket = WeekBucket::starting_at(date(2024, 3, 4));
        assert_eq!(bucket.year, 2024);
        assert_eq!(bucket.label(), format!("W{:02} 2024", bucket.week_number));
    }

    #[test]
    fn test_week_number_diverges_from_iso_at_year_end() {
        // 2024-12-30 is a Monday. ISO-8601 calls this 2025-W01; the
        // day-of-year formula keeps it in week 53 of 2024.
        let bucket = WeekBucket::starting_at(date(2024, 12, 30));
        assert_eq!(bucket.week_number, 53);
        assert_eq!(bucket.year, 2024);

        // A range starting on New Year's Day aligns back into the old year
        let buckets = week_buckets(date(2026, 1, 1), date(2026, 1, 4));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].week_start, date(2025, 12, 29));
        assert_eq!(buckets[0].year, 2025);
        assert_eq!(buckets[0].week_number, 53);
    }

    #[test]
    fn test_overlap_is_inclusive_on_both_boundaries() {
        let bucket = WeekBucket::starting_at(date(2024, 1, 8)); // Jan 8..14
        let ends_on_monday = project("a", Some(date(2024, 1, 1)), Some(date(2024, 1, 8)));
        let starts_on_sunday = project("b", Some(date(2024, 1, 14)), Some(date(2024, 1, 20)));
        let before = project("c", Some(date(2024, 1, 1)), Some(date(2024, 1, 7)));
        let after = project("d", Some(date(2024, 1, 15)), Some(date(2024, 1, 20)));

        assert!(ends_on_monday.overlaps(&bucket));
        assert!(starts_on_sunday.overlaps(&bucket));
        assert!(!before.overlaps(&bucket));
        assert!(!after.overlaps(&bucket));
    }

    #[test]
    fn test_single_week_containment() {
        // A project wholly inside one week contributes there and nowhere else
        let projects = vec![project("a", Some(date(2024, 1, 9)), Some(date(2024, 1, 11)))];
        let buckets = compute_occupancy(
            &projects,
            &FilterCriteria::default(),
            date(2024, 1, 1),
            date(2024, 1, 21),
        );
        let counts: Vec<usize> = buckets.iter().map(|b| b.occupancy).collect();
        assert_eq!(counts, vec![0, 1, 0]);
    }

    #[test]
    fn test_missing_dates_are_silently_excluded() {
        let projects = vec![
            project("no-start", None, Some(date(2024, 1, 10))),
            project("no-end", Some(date(2024, 1, 10)), None),
            project("neither", None, None),
            project("ok", Some(date(2024, 1, 10)), Some(date(2024, 1, 10))),
        ];
        let buckets = compute_occupancy(
            &projects,
            &FilterCriteria::default(),
            date(2024, 1, 1),
            date(2024, 1, 14),
        );
        assert_eq!(buckets.iter().map(|b| b.occupancy).sum::<usize>(), 1);

        for bucket in &buckets {
            for p in projects_in_week(&projects, &FilterCriteria::default(), bucket) {
                assert_eq!(p.id, "ok");
            }
        }
    }

    #[test]
    fn test_non_chronological_interval_never_contributes() {
        let projects = vec![project("rev", Some(date(2024, 1, 20)), Some(date(2024, 1, 5)))];
        let buckets = compute_occupancy(
            &projects,
            &FilterCriteria::default(),
            date(2024, 1, 1),
            date(2024, 1, 28),
        );
        assert!(buckets.iter().all(|b| b.occupancy == 0));
    }

    #[test]
    fn test_end_to_end_overview() {
        // Two projects overlapping in the middle week of a three-week range
        let projects = vec![
            project("A", Some(date(2024, 1, 1)), Some(date(2024, 1, 10))),
            project("B", Some(date(2024, 1, 8)), Some(date(2024, 1, 20))),
        ];
        let criteria = FilterCriteria::default();
        let buckets = compute_occupancy(&projects, &criteria, date(2024, 1, 1), date(2024, 1, 21));

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].week_start, date(2024, 1, 1));
        assert_eq!(buckets[0].occupancy, 1);
        assert_eq!(buckets[1].occupancy, 2);
        assert_eq!(buckets[2].occupancy, 1);

        let middle = projects_in_week(&projects, &criteria, &buckets[1]);
        let ids: Vec<&str> = middle.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        let summary = summarize(&buckets);
        assert_eq!(summary.max_occupancy, 5);
        assert!((summary.avg_occupancy - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_occupancy_is_idempotent() {
        let projects = vec![
            project("A", Some(date(2024, 2, 1)), Some(date(2024, 3, 15))),
            project("B", Some(date(2024, 2, 20)), Some(date(2024, 2, 25))),
        ];
        let criteria = FilterCriteria {
            search: Some("project".to_string()),
            ..FilterCriteria::default()
        };
        let first = compute_occupancy(&projects, &criteria, date(2024, 2, 1), date(2024, 3, 31));
        let second = compute_occupancy(&projects, &criteria, date(2024, 2, 1), date(2024, 3, 31));
        assert_eq!(first, second);
    }

    #[test]
    fn test_drilldown_matches_count() {
        let projects: Vec<ProjectInterval> = (0..10)
            .map(|i| {
                project(
                    &format!("p{}", i),
                    Some(date(2024, 1, 1) + Duration::days(i * 3)),
                    Some(date(2024, 1, 1) + Duration::days(i * 3 + 10)),
                )
            })
            .collect();
        let criteria = FilterCriteria::default();
        let buckets = compute_occupancy(&projects, &criteria, date(2024, 1, 1), date(2024, 3, 1));
        for bucket in &buckets {
            let drilldown = projects_in_week(&projects, &criteria, bucket);
            assert_eq!(drilldown.len(), bucket.occupancy);
        }
    }

    #[test]
    fn test_scale_rounding() {
        let mut buckets = week_buckets(date(2024, 1, 1), date(2024, 1, 21));
        assert_eq!(buckets.len(), 3);

        // All zero: axis max clamps to 1
        assert_eq!(summarize(&buckets).max_occupancy, 1);

        buckets[1].occupancy = 11;
        assert_eq!(summarize(&buckets).max_occupancy, 15);

        buckets[1].occupancy = 15;
        assert_eq!(summarize(&buckets).max_occupancy, 15);

        // Raw counts are left untouched by summarize
        assert_eq!(buckets[1].occupancy, 15);
    }

    #[test]
    fn test_summary_of_empty_bucket_list() {
        let buckets = week_buckets(date(2024, 6, 10), date(2024, 6, 1));
        let summary = summarize(&buckets);
        assert_eq!(summary.max_occupancy, 1);
        assert_eq!(summary.avg_occupancy, 0.0);
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let projects = vec![
            project("A", Some(date(2024, 1, 1)), Some(date(2024, 1, 10))),
            project("B", None, None),
        ];
        let filtered = filter_projects(&projects, &FilterCriteria::default());
        assert_eq!(filtered, projects);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut p = project("PRJ-042", Some(date(2024, 1, 1)), Some(date(2024, 1, 10)));
        p.name = Some("Sluiscomplex Terneuzen".to_string());
        p.location = Some("Zeeland".to_string());
        p.manager = Some("J. de Vries".to_string());
        let projects = vec![p];

        for needle in ["sluis", "prj-042", "zeeland", "vries"] {
            let criteria = FilterCriteria {
                search: Some(needle.to_uppercase()),
                ..FilterCriteria::default()
            };
            assert_eq!(filter_projects(&projects, &criteria).len(), 1, "{}", needle);
        }

        let criteria = FilterCriteria {
            search: Some("does-not-occur".to_string()),
            ..FilterCriteria::default()
        };
        assert!(filter_projects(&projects, &criteria).is_empty());
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let mut a = project("a", None, None);
        a.status = Some("In uitvoering".to_string());
        a.category = Some("Kademuur".to_string());
        let mut b = project("b", None, None);
        b.status = Some("In uitvoering".to_string());
        b.category = Some("Brug".to_string());
        let projects = vec![a, b];

        let criteria = FilterCriteria {
            status: Some("In uitvoering".to_string()),
            category: Some("Brug".to_string()),
            ..FilterCriteria::default()
        };
        let filtered = filter_projects(&projects, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn test_organization_none_sentinel() {
        let mut with_org = project("a", None, None);
        with_org.organization = Some("Aannemer Noord".to_string());
        let mut empty_org = project("b", None, None);
        empty_org.organization = Some(String::new());
        let without_org = project("c", None, None);
        let projects = vec![with_org, empty_org, without_org];

        let criteria = FilterCriteria {
            organization: Some(ORGANIZATION_NONE.to_string()),
            ..FilterCriteria::default()
        };
        let filtered = filter_projects(&projects, &criteria);
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);

        let criteria = FilterCriteria {
            organization: Some("Aannemer Noord".to_string()),
            ..FilterCriteria::default()
        };
        let filtered = filter_projects(&projects, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn test_filter_preserves_order() {
        let projects: Vec<ProjectInterval> = ["z", "m", "a", "q"]
            .iter()
            .map(|id| project(id, None, None))
            .collect();
        let filtered = filter_projects(&projects, &FilterCriteria::default());
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m", "a", "q"]);
    }

    #[test]
    fn test_coverage_over_full_interval() {
        // A valid project contributes to every bucket its interval touches
        // and to none outside it
        let projects = vec![project("long", Some(date(2024, 1, 10)), Some(date(2024, 2, 20)))];
        let criteria = FilterCriteria::default();
        let buckets = compute_occupancy(&projects, &criteria, date(2024, 1, 1), date(2024, 3, 10));
        for bucket in &buckets {
            let touches = date(2024, 1, 10) <= bucket.week_end && date(2024, 2, 20) >= bucket.week_start;
            assert_eq!(bucket.occupancy, usize::from(touches), "{}", bucket.week_start);
        }
    }
}

// Made with Bob
