//! Work-week date logic for the class-log views.
//!
//! Everything here is a pure function of a reference date, so the UI only
//! has to supply "today" (from the browser clock) and the navigation offset.
//! Dates are compared as calendar days; timestamps never leak into keys.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of school days shown in a week view
pub const WORK_WEEK_LEN: usize = 5;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,
    #[error("unrecognised date: {0}")]
    Unrecognised(String),
}

/// One column of a work-week grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`, used as the lookup key for class logs
    pub date_key: String,
    pub weekday_name: String,
}

impl WeekDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            date_key: date_key(date),
            weekday_name: weekday_name(date.weekday()).to_string(),
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday on or before `date`. A Sunday maps to the Monday six days earlier.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday through Friday of the week starting at `monday`
pub fn work_week(monday: NaiveDate) -> Vec<WeekDay> {
    (0..WORK_WEEK_LEN as i64)
        .map(|offset| WeekDay::new(monday + Duration::days(offset)))
        .collect()
}

/// The school days of the week containing `reference` that have already
/// started, i.e. Monday..Friday with anything after `reference` dropped.
pub fn compute_work_week(reference: NaiveDate) -> Vec<WeekDay> {
    work_week(monday_of(reference))
        .into_iter()
        .filter(|day| day.date <= reference)
        .collect()
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS`
/// (read as UTC) and return the UTC calendar day.
pub fn parse_calendar_day(input: &str) -> Result<NaiveDate, DateParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_KEY_FORMAT) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.date())
        .map_err(|_| DateParseError::Unrecognised(input.to_string()))
}

/// Zero the time-of-day in UTC and re-serialise as an ISO-8601 string.
/// Idempotent: feeding the output back in returns the same string.
pub fn normalize_to_utc_midnight(input: &str) -> Result<String, DateParseError> {
    let day = parse_calendar_day(input)?;
    Ok(day.format("%Y-%m-%dT00:00:00.000Z").to_string())
}

/// Serde adapter for calendar days coming from the log API, which sends
/// either plain dates or full timestamps.
pub mod calendar_day {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date_key(*date))
    }

    /// Offsets are folded into UTC first, so a late-evening timestamp from
    /// another zone lands on the same day key the server stored.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let normalized = normalize_to_utc_midnight(&raw).map_err(serde::de::Error::custom)?;
        parse_calendar_day(&normalized).map_err(serde::de::Error::custom)
    }
}

/// Inclusive date range for a log fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// The displayed week plus the real current week it may not run past
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    monday: NaiveDate,
    current_monday: NaiveDate,
}

impl WeekWindow {
    /// Window showing the week that contains `today`
    pub fn current(today: NaiveDate) -> Self {
        let monday = monday_of(today);
        Self {
            monday,
            current_monday: monday,
        }
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn is_current_week(&self) -> bool {
        self.monday == self.current_monday
    }

    pub fn prev_week(&mut self) {
        self.monday -= Duration::days(7);
    }

    /// True when moving forward would show a week after the real one
    pub fn is_next_disabled(&self) -> bool {
        self.monday + Duration::days(7) > self.current_monday
    }

    /// Returns whether the window moved
    pub fn next_week(&mut self) -> bool {
        if self.is_next_disabled() {
            return false;
        }
        self.monday += Duration::days(7);
        true
    }

    pub fn days(&self) -> Vec<WeekDay> {
        work_week(self.monday)
    }

    /// School days of the displayed week that have started by `today`:
    /// all five for a past week, Monday up to `today` for the current one.
    pub fn elapsed_days(&self, today: NaiveDate) -> Vec<WeekDay> {
        if self.monday == monday_of(today) {
            compute_work_week(today)
        } else if self.monday < today {
            self.days()
        } else {
            Vec::new()
        }
    }

    pub fn friday(&self) -> NaiveDate {
        self.monday + Duration::days(WORK_WEEK_LEN as i64 - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date <= self.friday()
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: date_key(self.monday),
            end: date_key(self.friday()),
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} – {}",
            self.monday.format("%b %-d"),
            self.friday().format("%b %-d, %Y")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_of() {
        // 2026-10-12 is a Monday
        assert_eq!(monday_of(day(2026, 10, 12)), day(2026, 10, 12));
        assert_eq!(monday_of(day(2026, 10, 15)), day(2026, 10, 12));
        assert_eq!(monday_of(day(2026, 10, 17)), day(2026, 10, 12)); // Saturday
        assert_eq!(monday_of(day(2026, 10, 18)), day(2026, 10, 12)); // Sunday
    }

    #[test]
    fn test_compute_work_week_midweek() {
        let days = compute_work_week(day(2026, 10, 14));
        let keys: Vec<&str> = days.iter().map(|d| d.date_key.as_str()).collect();
        assert_eq!(keys, vec!["2026-10-12", "2026-10-13", "2026-10-14"]);
        assert_eq!(days[0].weekday_name, "Monday");
        assert_eq!(days[2].weekday_name, "Wednesday");
    }

    #[test]
    fn test_compute_work_week_weekend_returns_full_week() {
        for reference in [day(2026, 10, 17), day(2026, 10, 18)] {
            let days = compute_work_week(reference);
            assert_eq!(days.len(), 5);
            assert_eq!(days[0].date, day(2026, 10, 12));
            assert_eq!(days[4].date, day(2026, 10, 16));
        }
    }

    #[test]
    fn test_compute_work_week_properties() {
        let mut reference = day(2024, 2, 20);
        for _ in 0..60 {
            let days = compute_work_week(reference);
            assert!(days.len() <= WORK_WEEK_LEN);
            assert!(days.iter().all(|d| d.date <= reference));
            assert!(days.windows(2).all(|w| w[0].date < w[1].date));
            if let Some(first) = days.first() {
                assert_eq!(first.date.weekday(), Weekday::Mon);
            }
            reference += Duration::days(1);
        }
    }

    #[test]
    fn test_normalize_to_utc_midnight() {
        assert_eq!(
            normalize_to_utc_midnight("2026-10-14").unwrap(),
            "2026-10-14T00:00:00.000Z"
        );
        assert_eq!(
            normalize_to_utc_midnight("2026-10-14T15:42:10.123Z").unwrap(),
            "2026-10-14T00:00:00.000Z"
        );
        // 01:00 at +03:00 is still the previous day in UTC
        assert_eq!(
            normalize_to_utc_midnight("2026-10-14T01:00:00+03:00").unwrap(),
            "2026-10-13T00:00:00.000Z"
        );
        assert_eq!(
            normalize_to_utc_midnight("2026-10-14T09:30:00").unwrap(),
            "2026-10-14T00:00:00.000Z"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in [
            "2026-10-14",
            "2026-10-14T23:59:59Z",
            "2026-01-01T05:00:00-08:00",
            "2024-02-29T12:00:00.5+01:00",
        ] {
            let once = normalize_to_utc_midnight(input).unwrap();
            let twice = normalize_to_utc_midnight(&once).unwrap();
            assert_eq!(once, twice, "input {}", input);
        }
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_to_utc_midnight("  "), Err(DateParseError::Empty));
        assert!(matches!(
            normalize_to_utc_midnight("next tuesday"),
            Err(DateParseError::Unrecognised(_))
        ));
    }

    #[test]
    fn test_week_window_navigation() {
        let today = day(2026, 10, 14);
        let mut window = WeekWindow::current(today);
        assert!(window.is_current_week());
        assert!(window.is_next_disabled());
        assert!(!window.next_week());
        assert_eq!(window.monday(), day(2026, 10, 12));

        window.prev_week();
        assert_eq!(window.monday(), day(2026, 10, 5));
        assert!(!window.is_next_disabled());

        assert!(window.next_week());
        assert_eq!(window.monday(), day(2026, 10, 12));
        assert!(window.is_next_disabled());
    }

    #[test]
    fn test_week_window_range_and_label() {
        let window = WeekWindow::current(day(2026, 10, 18));
        assert_eq!(
            window.date_range(),
            DateRange {
                start: "2026-10-12".to_string(),
                end: "2026-10-16".to_string(),
            }
        );
        assert!(window.contains(day(2026, 10, 16)));
        assert!(!window.contains(day(2026, 10, 17)));
        assert_eq!(window.label(), "Oct 12 – Oct 16, 2026");
        assert_eq!(window.days().len(), 5);
    }

    #[test]
    fn test_elapsed_days_follow_today() {
        // Wednesday of the current week
        let mut window = WeekWindow::current(day(2026, 10, 14));
        let elapsed = window.elapsed_days(day(2026, 10, 14));
        let names: Vec<&str> = elapsed.iter().map(|d| d.weekday_name.as_str()).collect();
        assert_eq!(names, vec!["Monday", "Tuesday", "Wednesday"]);

        window.prev_week();
        assert_eq!(window.elapsed_days(day(2026, 10, 14)).len(), WORK_WEEK_LEN);

        // Weekend: the whole current week has happened
        let weekend = WeekWindow::current(day(2026, 10, 18));
        assert_eq!(weekend.elapsed_days(day(2026, 10, 18)).len(), WORK_WEEK_LEN);
    }
}
