//! Calendar helpers for log dates and weekly windows
//!
//! Weeks start on Monday (ISO 8601). All windows are inclusive on both ends.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Most recent Monday on or before `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Inclusive date range covering one Monday..Sunday week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let start = start_of_week(date);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The week immediately before this one
    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
            end: self.end - Duration::days(7),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_start_of_week_on_monday_is_identity() {
        // 2024-05-06 is a Monday
        assert_eq!(start_of_week(d(2024, 5, 6)), d(2024, 5, 6));
    }

    #[test]
    fn test_start_of_week_on_sunday() {
        assert_eq!(start_of_week(d(2024, 5, 12)), d(2024, 5, 6));
    }

    #[test]
    fn test_start_of_week_crosses_month_boundary() {
        // 2024-06-01 is a Saturday
        assert_eq!(start_of_week(d(2024, 6, 1)), d(2024, 5, 27));
    }

    #[test]
    fn test_week_window_bounds_inclusive() {
        let week = WeekWindow::containing(d(2024, 5, 8));
        assert_eq!(week.start, d(2024, 5, 6));
        assert_eq!(week.end, d(2024, 5, 12));
        assert!(week.contains(d(2024, 5, 6)));
        assert!(week.contains(d(2024, 5, 12)));
        assert!(!week.contains(d(2024, 5, 13)));
        assert!(!week.contains(d(2024, 5, 5)));
    }

    #[test]
    fn test_previous_week() {
        let prev = WeekWindow::containing(d(2024, 5, 8)).previous();
        assert_eq!(prev.start, d(2024, 4, 29));
        assert_eq!(prev.end, d(2024, 5, 5));
    }

    #[test]
    fn test_today_is_recent() {
        assert!(today() > d(2000, 1, 1));
    }
}
