//! Reporting periods and calendar-aware range resolution
//!
//! Every named period resolves to a half-open `[start, end)` window plus
//! the immediately preceding window used for trend comparison. Month and
//! year boundaries respect the calendar; only `last_90_days` is a fixed
//! rolling window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{ShopError, ValidationError};

/// Named reporting period for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingPeriod {
    ThisMonth,
    LastMonth,
    Last90Days,
    ThisYear,
    AllTime,
}

impl ReportingPeriod {
    pub fn label(self) -> &'static str {
        match self {
            ReportingPeriod::ThisMonth => "this_month",
            ReportingPeriod::LastMonth => "last_month",
            ReportingPeriod::Last90Days => "last_90_days",
            ReportingPeriod::ThisYear => "this_year",
            ReportingPeriod::AllTime => "all_time",
        }
    }

    /// Resolve `(current, previous)` windows relative to `now`.
    ///
    /// `all_time` has no meaningful predecessor: its previous window is
    /// empty and trends fall back to the zero-previous convention.
    pub fn resolve(self, now: DateTime<Utc>) -> (PeriodWindow, PeriodWindow) {
        match self {
            ReportingPeriod::ThisMonth => {
                let start = month_floor(now);
                let prev_start = prev_month_floor(start);
                (
                    PeriodWindow::new(start, now),
                    PeriodWindow::new(prev_start, start),
                )
            }
            ReportingPeriod::LastMonth => {
                let this_start = month_floor(now);
                let last_start = prev_month_floor(this_start);
                let before_start = prev_month_floor(last_start);
                (
                    PeriodWindow::new(last_start, this_start),
                    PeriodWindow::new(before_start, last_start),
                )
            }
            ReportingPeriod::Last90Days => {
                let start = now - Duration::days(90);
                (
                    PeriodWindow::new(start, now),
                    PeriodWindow::new(now - Duration::days(180), start),
                )
            }
            ReportingPeriod::ThisYear => {
                let start = year_floor(now);
                let prev_start = year_floor(start - Duration::days(1));
                (
                    PeriodWindow::new(start, now),
                    PeriodWindow::new(prev_start, start),
                )
            }
            ReportingPeriod::AllTime => {
                let epoch = DateTime::<Utc>::UNIX_EPOCH;
                (
                    PeriodWindow::new(epoch, now),
                    PeriodWindow::new(epoch, epoch),
                )
            }
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportingPeriod {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "this_month" => Ok(ReportingPeriod::ThisMonth),
            "last_month" => Ok(ReportingPeriod::LastMonth),
            "last_90_days" => Ok(ReportingPeriod::Last90Days),
            "this_year" => Ok(ReportingPeriod::ThisYear),
            "all_time" => Ok(ReportingPeriod::AllTime),
            other => Err(ValidationError::UnknownEnumValue {
                field: "period".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Midnight on the first of `t`'s month.
pub(crate) fn month_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    let date = t.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("the first of a month always exists");
    Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).expect("midnight always exists"))
}

/// Midnight on the first of the month before `t`'s month.
pub(crate) fn prev_month_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    month_floor(month_floor(t) - Duration::days(1))
}

/// Midnight on the first of the month after `t`'s month.
pub(crate) fn next_month_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    month_floor(month_floor(t) + Duration::days(32))
}

/// Midnight on January 1st of `t`'s year.
pub(crate) fn year_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(t.date_naive().year(), 1, 1)
        .expect("January 1st always exists");
    Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).expect("midnight always exists"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_this_month_windows() {
        let now = at(2026, 8, 6, 12);
        let (cur, prev) = ReportingPeriod::ThisMonth.resolve(now);
        assert_eq!(cur.start, at(2026, 8, 1, 0));
        assert_eq!(cur.end, now);
        assert_eq!(prev.start, at(2026, 7, 1, 0));
        assert_eq!(prev.end, at(2026, 8, 1, 0));
    }

    #[test]
    fn test_last_month_windows() {
        let now = at(2026, 8, 6, 12);
        let (cur, prev) = ReportingPeriod::LastMonth.resolve(now);
        assert_eq!(cur.start, at(2026, 7, 1, 0));
        assert_eq!(cur.end, at(2026, 8, 1, 0));
        assert_eq!(prev.start, at(2026, 6, 1, 0));
        assert_eq!(prev.end, at(2026, 7, 1, 0));
    }

    #[test]
    fn test_month_rollover_at_january() {
        let now = at(2026, 1, 15, 0);
        let (cur, prev) = ReportingPeriod::ThisMonth.resolve(now);
        assert_eq!(cur.start, at(2026, 1, 1, 0));
        assert_eq!(prev.start, at(2025, 12, 1, 0));
        assert_eq!(prev.end, at(2026, 1, 1, 0));
    }

    #[test]
    fn test_last_90_days_is_rolling() {
        let now = at(2026, 8, 6, 12);
        let (cur, prev) = ReportingPeriod::Last90Days.resolve(now);
        assert_eq!(cur.span(), Duration::days(90));
        assert_eq!(prev.span(), Duration::days(90));
        assert_eq!(prev.end, cur.start);
    }

    #[test]
    fn test_this_year_windows() {
        let now = at(2026, 8, 6, 12);
        let (cur, prev) = ReportingPeriod::ThisYear.resolve(now);
        assert_eq!(cur.start, at(2026, 1, 1, 0));
        assert_eq!(prev.start, at(2025, 1, 1, 0));
        assert_eq!(prev.end, at(2026, 1, 1, 0));
    }

    #[test]
    fn test_all_time_has_empty_previous() {
        let now = at(2026, 8, 6, 12);
        let (cur, prev) = ReportingPeriod::AllTime.resolve(now);
        assert!(!cur.is_empty());
        assert!(prev.is_empty());
    }

    #[test]
    fn test_window_contains_is_half_open() {
        let window = PeriodWindow::new(at(2026, 8, 1, 0), at(2026, 9, 1, 0));
        assert!(window.contains(at(2026, 8, 1, 0)));
        assert!(window.contains(at(2026, 8, 31, 23)));
        assert!(!window.contains(at(2026, 9, 1, 0)));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(
            "this_month".parse::<ReportingPeriod>().unwrap(),
            ReportingPeriod::ThisMonth
        );
        assert_eq!(
            "last_90_days".parse::<ReportingPeriod>().unwrap(),
            ReportingPeriod::Last90Days
        );
        assert!("fortnight".parse::<ReportingPeriod>().is_err());
    }

    #[test]
    fn test_next_month_floor_rollover() {
        assert_eq!(next_month_floor(at(2026, 12, 20, 5)), at(2027, 1, 1, 0));
        assert_eq!(next_month_floor(at(2026, 1, 31, 0)), at(2026, 2, 1, 0));
    }
}
