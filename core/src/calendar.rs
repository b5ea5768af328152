//! Calendar days, week construction, weekday indexing.
//!
//! RULE: weekday indices follow the 0 = Sunday .. 6 = Saturday convention
//! everywhere (base schedules, special schedule patterns, mix profiles).

use crate::{
    error::{PlannerError, PlannerResult},
    types::WeekdayIndex,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_holiday: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, is_holiday: false, label: None }
    }

    pub fn holiday(date: NaiveDate, label: &str) -> Self {
        Self { date, is_holiday: true, label: Some(label.to_string()) }
    }

    pub fn weekday(&self) -> WeekdayIndex {
        weekday_index(self.date)
    }
}

pub fn weekday_index(date: NaiveDate) -> WeekdayIndex {
    date.weekday().num_days_from_sunday() as WeekdayIndex
}

/// Seven consecutive days starting at `start`, picking up holiday flags
/// from `calendar` where it has an entry for the date.
pub fn week_days(start: NaiveDate, calendar: &[CalendarDay]) -> Vec<CalendarDay> {
    (0..DAYS_PER_WEEK as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            calendar
                .iter()
                .find(|d| d.date == date)
                .cloned()
                .unwrap_or_else(|| CalendarDay::new(date))
        })
        .collect()
}

/// Contract check for anything that consumes a week.
pub fn validate_week(days: &[CalendarDay]) -> PlannerResult<()> {
    if days.len() != DAYS_PER_WEEK {
        return Err(PlannerError::InvalidWeek { days: days.len() });
    }
    for pair in days.windows(2) {
        let expected = pair[0].date + Duration::days(1);
        if pair[1].date != expected {
            return Err(PlannerError::NonConsecutiveWeek {
                expected,
                actual: pair[1].date,
            });
        }
    }
    Ok(())
}

/// ISO-8601 week label, e.g. `2024-W14`.
pub fn iso_week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
