//! Weekly schedule builder: runs the day resolution engine over
//! 7 days x N representatives and flattens each result into the
//! `DailyPresence` shape consumed by planner views, reports and the
//! snapshot ledger.
//!
//! Build steps:
//!   1. Reject any week that is not exactly 7 consecutive days.
//!   2. Expand every incident through the date-range resolver into a
//!      (representative, date) -> incidents index.
//!   3. Partition special schedules into GLOBAL and INDIVIDUAL.
//!   4. For each active representative and day: coverage lookup, day
//!      resolution, flatten.

use crate::{
    calendar::{validate_week, CalendarDay},
    coverage::{find_coverage_for_day, Coverage, CoverageLookup, CoverageRef},
    day_metrics::Badge,
    day_resolution::{resolve_day, DayContext, DayResolution, PlanSource},
    error::PlannerResult,
    incident::{Incident, IncidentDateResolver, IncidentType},
    representative::{find_representative, Representative},
    special_schedule::{PartitionedSchedules, SpecialSchedule, SpecialScheduleAdapter},
    types::{DayStatus, IncidentId, RepresentativeId, ShiftAssignment, ShiftType},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Audit-visible source of a flattened day. SPECIAL folds into BASE.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceSource {
    Base,
    Override,
    Swap,
    Incident,
}

/// One representative's day, flattened for legacy consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyPresence {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub source: PresenceSource,
    #[serde(rename = "type")]
    pub incident_type: Option<IncidentType>,
    pub incident_id: Option<IncidentId>,
    pub assignment: ShiftAssignment,
    pub badge: Option<Badge>,
    pub appears_in_planner: bool,
    pub appears_in_shifts: Vec<ShiftType>,
    pub counts_as_worked: bool,
    pub counts_for_incentives: bool,
    pub counts_as_absence: bool,
    pub covered_by: Option<CoverageRef>,
    pub covering: Option<CoverageRef>,
}

impl DailyPresence {
    /// Physically present: WORKING and not recorded as an absence.
    pub fn attended(&self) -> bool {
        self.status == DayStatus::Working && !self.counts_as_absence
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentWeek {
    pub representative_id: RepresentativeId,
    pub days: BTreeMap<NaiveDate, DailyPresence>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyPlan {
    pub week_start: NaiveDate,
    pub agents: Vec<AgentWeek>,
}

impl WeeklyPlan {
    pub fn agent(&self, representative_id: &str) -> Option<&AgentWeek> {
        self.agents.iter().find(|a| a.representative_id == representative_id)
    }

    pub fn day(&self, representative_id: &str, date: NaiveDate) -> Option<&DailyPresence> {
        self.agent(representative_id).and_then(|a| a.days.get(&date))
    }

    pub fn assignment(&self, representative_id: &str, date: NaiveDate) -> ShiftAssignment {
        self.day(representative_id, date)
            .map_or(ShiftAssignment::None, |d| d.assignment)
    }
}

/// Borrowed fact slices for one build.
pub struct WeekInput<'a> {
    /// The 7 days being planned.
    pub week: &'a [CalendarDay],
    /// All known calendar days (holidays), used for range expansion.
    pub calendar: &'a [CalendarDay],
    pub representatives: &'a [Representative],
    pub incidents: &'a [Incident],
    pub special_schedules: &'a [SpecialSchedule],
    pub coverages: &'a [Coverage],
}

pub fn build_weekly_plan(
    input: &WeekInput<'_>,
    adapter: &dyn SpecialScheduleAdapter,
    resolver: &dyn IncidentDateResolver,
) -> PlannerResult<WeeklyPlan> {
    validate_week(input.week)?;
    let week_start = input.week[0].date;

    let index = index_incidents(input, resolver);
    let schedules = PartitionedSchedules::new(input.special_schedules);

    let mut agents = Vec::new();
    for rep in input.representatives.iter().filter(|r| r.is_active) {
        let rep_schedules = schedules.for_representative(&rep.id);
        let mut days = BTreeMap::new();

        for day in input.week {
            let incidents = index
                .get(&(rep.id.as_str(), day.date))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let coverage = find_coverage_for_day(&rep.id, day.date, input.coverages, None);

            let resolution = resolve_day(
                &DayContext {
                    representative: rep,
                    date: day.date,
                    incidents,
                    special_schedules: &rep_schedules,
                    coverage: Some(&coverage),
                },
                adapter,
            );
            days.insert(day.date, flatten(day.date, resolution, coverage));
        }

        agents.push(AgentWeek { representative_id: rep.id.clone(), days });
    }

    log::debug!(
        "weekly plan {week_start}: {} agents, {} indexed incident days",
        agents.len(),
        index.len()
    );

    Ok(WeeklyPlan { week_start, agents })
}

/// (representative, date) -> incidents touching that day, restricted to the week.
fn index_incidents<'a>(
    input: &WeekInput<'a>,
    resolver: &dyn IncidentDateResolver,
) -> HashMap<(&'a str, NaiveDate), Vec<&'a Incident>> {
    let week_dates: HashSet<NaiveDate> = input.week.iter().map(|d| d.date).collect();
    let mut index: HashMap<(&'a str, NaiveDate), Vec<&'a Incident>> = HashMap::new();

    for incident in input.incidents {
        let rep = find_representative(input.representatives, &incident.representative_id);
        if rep.is_none() {
            log::warn!(
                "incident {} references unknown representative {}",
                incident.id,
                incident.representative_id
            );
        }
        let range = resolver.resolve(incident, input.calendar, rep);
        for date in range.dates.into_iter().filter(|d| week_dates.contains(d)) {
            index
                .entry((incident.representative_id.as_str(), date))
                .or_default()
                .push(incident);
        }
    }
    index
}

/// Collapse the three layers into the legacy shape. OVERRIDE stays the
/// visible source even when an AUSENCIA overlays the same day.
fn flatten(
    date: NaiveDate,
    resolution: DayResolution,
    coverage: CoverageLookup,
) -> DailyPresence {
    let DayResolution { plan, reality, computed } = resolution;

    let source = match (reality.incident_type, plan.source) {
        (Some(t), _) if t.is_formal() => PresenceSource::Incident,
        (_, PlanSource::Override) => PresenceSource::Override,
        (Some(IncidentType::Ausencia), _) => PresenceSource::Incident,
        (_, PlanSource::Swap) => PresenceSource::Swap,
        (_, PlanSource::Base | PlanSource::Special) => PresenceSource::Base,
    };

    DailyPresence {
        date,
        status: reality.status,
        source,
        incident_type: reality.incident_type,
        incident_id: reality.incident_id,
        assignment: plan.assignment,
        badge: computed.display.badge,
        appears_in_planner: computed.display.appears_in_planner,
        appears_in_shifts: computed.display.appears_in_shifts,
        counts_as_worked: computed.metrics.counts_as_worked,
        counts_for_incentives: computed.metrics.counts_for_incentives,
        counts_as_absence: computed.metrics.counts_as_absence,
        covered_by: coverage.covered_by,
        covering: coverage.covering,
    }
}
