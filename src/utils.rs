use anyhow::{anyhow, Result};
use chrono::prelude::*;
use std::time::{Duration, Instant};

use crate::occupancy::WeekBucket;

/// Utility functions for the bezetting application

// ===== STRING UTILITIES =====

/// Masks an API key for safe logging (shows first 4 characters, masks the rest)
pub fn mask_api_key(api_key: &str) -> String {
    if api_key.len() <= 4 {
        "*".repeat(api_key.len())
    } else {
        let visible_part = &api_key[..4];
        let masked_part = "*".repeat(api_key.len() - 4);
        format!("{}{}", visible_part, masked_part)
    }
}

/// Truncates a string to a maximum length, adding "..." if truncated
pub fn truncate_string(s: &str, max_length: usize) -> String {
    if s.len() <= max_length {
        s.to_string()
    } else {
        format!("{}...", &s[..max_length.saturating_sub(3)])
    }
}

// ===== DATE/TIME UTILITIES =====

/// Validates a date string in multiple formats (YYYY-MM-DD, YYYY.MM.DD, YYYY/MM/DD)
pub fn validate_date(date_str: &str) -> Result<()> {
    let formats = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

    for format in &formats {
        if NaiveDate::parse_from_str(date_str, format).is_ok() {
            return Ok(());
        }
    }

    Err(anyhow!(
        "Invalid date format: {}. Please use YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD format.",
        date_str
    ))
}

/// Parses a date string in any of the accepted formats.
///
/// Returns None for blank or unparseable input; callers that treat a missing
/// date as "project excluded from the overview" rely on that.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }

    // Date columns sometimes carry a time part; the calendar day is enough
    let day_part = trimmed.split(|c| c == 'T' || c == ' ').next().unwrap_or(trimmed);

    let formats = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];
    for format in &formats {
        if let Ok(date) = NaiveDate::parse_from_str(day_part, format) {
            return Some(date);
        }
    }
    None
}

/// Default view window around a reference day: four weeks back from that
/// week's Monday, eight weeks ahead
pub fn default_view_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = crate::occupancy::week_start_of(today);
    (
        monday - chrono::Duration::days(28),
        monday + chrono::Duration::days(55),
    )
}

/// Formats a bucket's date window, e.g. "2026-03-02..2026-03-08"
pub fn format_week_range(bucket: &WeekBucket) -> String {
    format!(
        "{}..{}",
        bucket.week_start.format("%Y-%m-%d"),
        bucket.week_end.format("%Y-%m-%d")
    )
}

/// Formats a duration for human-readable output
pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() > 0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if duration.as_millis() > 0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{}μs", duration.as_micros())
    }
}

// ===== CHART UTILITIES =====

/// Renders a occupancy bar scaled against the chart maximum
pub fn create_occupancy_bar(occupancy: usize, max_occupancy: usize, width: usize) -> String {
    if max_occupancy == 0 {
        return String::new();
    }

    let filled = occupancy * width / max_occupancy;
    "█".repeat(filled.min(width))
}

/// Formats the average occupancy for the overview footer
pub fn format_avg_occupancy(avg: f64) -> String {
    format!("{:.1} crews/week", avg)
}

// ===== PERFORMANCE UTILITIES =====

/// A simple timer for performance measurement
pub struct Timer {
    start: Instant,
    message: String,
}

impl Timer {
    /// Creates a new timer with a message
    pub fn new(message: &str) -> Self {
        Timer {
            start: Instant::now(),
            message: message.to_string(),
        }
    }

    /// Stops the timer and returns the duration
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }

    /// Stops the timer and returns a formatted message
    pub fn stop_with_message(self) -> String {
        let duration = self.start.elapsed();
        format!("{} took {}", self.message, format_duration(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::week_buckets;
    use std::thread;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("12345678"), "1234****");
        assert_eq!(mask_api_key("1234"), "****");
        assert_eq!(mask_api_key("123"), "***");
        assert_eq!(mask_api_key(""), "");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("very long string", 9), "very l...");
        assert_eq!(truncate_string("abc", 3), "abc");
        assert_eq!(truncate_string("abcd", 3), "...");
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-03-15").is_ok());
        assert!(validate_date("2026.03.15").is_ok());
        assert!(validate_date("2026/03/15").is_ok());
        assert!(validate_date("invalid-date").is_err());
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(parse_date("2026-03-15"), Some(expected));
        assert_eq!(parse_date("2026.03.15"), Some(expected));
        assert_eq!(parse_date("2026/03/15"), Some(expected));
        assert_eq!(parse_date("2026-03-15T00:00:00"), Some(expected));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("null"), None);
        assert_eq!(parse_date("not-a-date"), None);
    }

    #[test]
    fn test_default_view_range() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(); // Thursday
        let (start, end) = default_view_range(today);
        assert_eq!(start.weekday(), Weekday::Mon);
        assert!(start <= today && today <= end);
        assert_eq!((end - start).num_days(), 83); // 12 whole weeks
    }

    #[test]
    fn test_format_week_range() {
        let buckets = week_buckets(
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
        );
        assert_eq!(format_week_range(&buckets[0]), "2026-03-02..2026-03-08");
    }

    #[test]
    fn test_format_duration() {
        let duration = StdDuration::from_secs(2);
        assert_eq!(format_duration(duration), "2.00s");

        let duration = StdDuration::from_millis(150);
        assert_eq!(format_duration(duration), "150ms");

        let duration = StdDuration::from_micros(500);
        assert_eq!(format_duration(duration), "500μs");
    }

    #[test]
    fn test_create_occupancy_bar() {
        assert_eq!(create_occupancy_bar(5, 10, 10), "█".repeat(5));
        assert_eq!(create_occupancy_bar(0, 10, 10), "");
        assert_eq!(create_occupancy_bar(10, 10, 10), "█".repeat(10));
        // Counts above the axis max never overflow the bar width
        assert_eq!(create_occupancy_bar(20, 10, 10), "█".repeat(10));
        assert_eq!(create_occupancy_bar(3, 0, 10), "");
    }

    #[test]
    fn test_format_avg_occupancy() {
        assert_eq!(format_avg_occupancy(4.0 / 3.0), "1.3 crews/week");
        assert_eq!(format_avg_occupancy(0.0), "0.0 crews/week");
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("test operation");
        thread::sleep(StdDuration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_timer_message() {
        let timer = Timer::new("fetch");
        let message = timer.stop_with_message();
        assert!(message.starts_with("fetch took "));
    }
}
