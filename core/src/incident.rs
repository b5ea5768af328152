//! Incidents and the date-range resolver that expands them into dates.
//!
//! RULE: formal incidents (VACACIONES, LICENCIA) are range-based hard
//! blocks; AUSENCIA, OVERRIDE and SWAP are single-day entries. Every
//! incident goes through the same resolver so an unexpected multi-day
//! OVERRIDE still lands on each of its days.

use crate::{
    calendar::{weekday_index, CalendarDay},
    representative::Representative,
    types::{IncidentId, RepresentativeId, ShiftAssignment},
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    Vacaciones,
    Licencia,
    Ausencia,
    Override,
    Swap,
}

impl IncidentType {
    /// VACACIONES and LICENCIA.
    pub fn is_formal(&self) -> bool {
        matches!(self, IncidentType::Vacaciones | IncidentType::Licencia)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Vacaciones => "VACACIONES",
            IncidentType::Licencia   => "LICENCIA",
            IncidentType::Ausencia   => "AUSENCIA",
            IncidentType::Override   => "OVERRIDE",
            IncidentType::Swap       => "SWAP",
        }
    }
}

/// Where an incident's responsibility originates. A COVERAGE-sourced
/// AUSENCIA belongs to the covering representative and names the slot
/// owner in `slot_owner_id`; callers validate that before it gets here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentSource {
    Base,
    Coverage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub id: IncidentId,
    pub representative_id: RepresentativeId,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub start_date: NaiveDate,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub assignment: Option<ShiftAssignment>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub source: Option<IncidentSource>,
    #[serde(default)]
    pub slot_owner_id: Option<RepresentativeId>,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_duration() -> u32 {
    1
}

impl Incident {
    pub fn new(
        id: &str,
        representative_id: &str,
        incident_type: IncidentType,
        start_date: NaiveDate,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.to_string(),
            representative_id: representative_id.to_string(),
            incident_type,
            start_date,
            duration: 1,
            assignment: None,
            created_at,
            source: None,
            slot_owner_id: None,
            note: None,
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_assignment(mut self, assignment: ShiftAssignment) -> Self {
        self.assignment = Some(assignment);
        self
    }
}

/// Most recently created incident of `incident_type`. On an exact
/// `created_at` tie the later one in input order wins.
pub fn latest_of_type<'a>(incidents: &[&'a Incident], incident_type: IncidentType) -> Option<&'a Incident> {
    incidents
        .iter()
        .filter(|i| i.incident_type == incident_type)
        .max_by_key(|i| i.created_at)
        .copied()
}

/// Most recently created formal incident (VACACIONES or LICENCIA).
pub fn latest_formal<'a>(incidents: &[&'a Incident]) -> Option<&'a Incident> {
    incidents
        .iter()
        .filter(|i| i.incident_type.is_formal())
        .max_by_key(|i| i.created_at)
        .copied()
}

// ── Date-range resolution ────────────────────────────────────────────────────

/// Concrete dates an incident occupies.
///
/// `dates` lists only counted days. `[start, return_date)` is the full
/// interval the incident consumes, including non-counted days in between.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedRange {
    pub dates: Vec<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

impl ResolvedRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// `date in [start, return_date)`.
    pub fn blocks(&self, date: NaiveDate) -> bool {
        match (self.start, self.return_date) {
            (Some(start), Some(ret)) => start <= date && date < ret,
            _ => false,
        }
    }
}

/// Expands an incident into concrete dates. The representative may be
/// unknown (deleted or never loaded); implementations must tolerate that.
pub trait IncidentDateResolver {
    fn resolve(
        &self,
        incident: &Incident,
        calendar: &[CalendarDay],
        representative: Option<&Representative>,
    ) -> ResolvedRange;
}

/// Default resolver.
///
/// - VACACIONES: `duration` counts working days (base schedule WORKING, not
///   a holiday; Mon-Fri when the representative is unknown).
/// - LICENCIA and single-day types: `duration` consecutive calendar days.
pub struct CalendarIncidentResolver {
    max_scan_days: u32,
}

impl CalendarIncidentResolver {
    pub fn new(max_scan_days: u32) -> Self {
        Self { max_scan_days: max_scan_days.max(1) }
    }

    fn counted_days(
        &self,
        incident: &Incident,
        calendar: &[CalendarDay],
        representative: Option<&Representative>,
    ) -> ResolvedRange {
        let holidays: HashSet<NaiveDate> = calendar
            .iter()
            .filter(|d| d.is_holiday)
            .map(|d| d.date)
            .collect();
        let is_counted = |date: NaiveDate| {
            if holidays.contains(&date) {
                return false;
            }
            let weekday = weekday_index(date);
            match representative {
                Some(rep) => rep.works_on(weekday),
                None => (1..=5).contains(&weekday),
            }
        };

        let wanted = incident.duration.max(1) as usize;
        let mut dates = Vec::with_capacity(wanted);
        let mut return_date = None;
        for offset in 0..self.max_scan_days as i64 {
            let date = incident.start_date + Duration::days(offset);
            if !is_counted(date) {
                continue;
            }
            if dates.len() < wanted {
                dates.push(date);
            } else {
                return_date = Some(date);
                break;
            }
        }

        if dates.len() < wanted {
            log::warn!(
                "incident {}: only {} of {} counted days found within {} days",
                incident.id,
                dates.len(),
                wanted,
                self.max_scan_days
            );
        }

        let end = dates.last().copied();
        ResolvedRange {
            start: Some(incident.start_date),
            end,
            return_date: return_date.or_else(|| end.map(|e| e + Duration::days(1))),
            dates,
        }
    }

    fn consecutive_days(&self, incident: &Incident) -> ResolvedRange {
        let span = incident.duration.clamp(1, self.max_scan_days) as i64;
        let dates: Vec<NaiveDate> = (0..span)
            .map(|offset| incident.start_date + Duration::days(offset))
            .collect();
        let end = dates.last().copied();
        ResolvedRange {
            start: Some(incident.start_date),
            end,
            return_date: end.map(|e| e + Duration::days(1)),
            dates,
        }
    }
}

impl Default for CalendarIncidentResolver {
    fn default() -> Self {
        Self::new(366)
    }
}

impl IncidentDateResolver for CalendarIncidentResolver {
    fn resolve(
        &self,
        incident: &Incident,
        calendar: &[CalendarDay],
        representative: Option<&Representative>,
    ) -> ResolvedRange {
        match incident.incident_type {
            IncidentType::Vacaciones => self.counted_days(incident, calendar, representative),
            _ => self.consecutive_days(incident),
        }
    }
}
