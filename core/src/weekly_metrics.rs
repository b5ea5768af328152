//! Weekly metrics aggregator: rolls each agent's per-day computed flags
//! into attendance and incentive summaries.

use crate::{
    day_metrics::Badge,
    incident::IncidentType,
    types::RepresentativeId,
    weekly_plan::WeeklyPlan,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyAttendance {
    pub representative_id: RepresentativeId,
    /// Days with at least one assigned shift.
    pub planned_days: u32,
    pub worked_days: u32,
    pub incentive_days: u32,
    pub absence_days: u32,
    pub covered_days: u32,
    pub covering_days: u32,
    /// VACACIONES / LICENCIA days.
    pub time_off_days: u32,
    /// Worked at least once and never absent.
    pub incentive_eligible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyMetrics {
    pub week_start: NaiveDate,
    pub by_representative: Vec<WeeklyAttendance>,
    pub total_worked_days: u32,
    pub total_absence_days: u32,
    pub incentive_eligible_count: u32,
}

pub fn aggregate_weekly_metrics(plan: &WeeklyPlan) -> WeeklyMetrics {
    let by_representative: Vec<WeeklyAttendance> = plan
        .agents
        .iter()
        .map(|agent| {
            let mut a = WeeklyAttendance {
                representative_id: agent.representative_id.clone(),
                ..Default::default()
            };
            for day in agent.days.values() {
                a.planned_days += u32::from(!day.assignment.is_none());
                a.worked_days += u32::from(day.counts_as_worked);
                a.incentive_days += u32::from(day.counts_for_incentives);
                a.absence_days += u32::from(day.counts_as_absence);
                a.covered_days += u32::from(day.badge == Some(Badge::Cubierto));
                a.covering_days += u32::from(day.badge == Some(Badge::Cubriendo));
                a.time_off_days += u32::from(
                    day.incident_type.is_some_and(|t: IncidentType| t.is_formal()),
                );
            }
            a.incentive_eligible = a.worked_days > 0 && a.absence_days == 0;
            a
        })
        .collect();

    WeeklyMetrics {
        week_start: plan.week_start,
        total_worked_days: by_representative.iter().map(|a| a.worked_days).sum(),
        total_absence_days: by_representative.iter().map(|a| a.absence_days).sum(),
        incentive_eligible_count: by_representative
            .iter()
            .filter(|a| a.incentive_eligible)
            .count() as u32,
        by_representative,
    }
}
