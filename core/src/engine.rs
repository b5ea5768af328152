//! The planner engine: one facade over the whole pipeline.
//!
//! PIPELINE (fixed order):
//!   1. Weekly schedule builder   (facts -> WeeklyPlan)
//!   2. Weekly metrics aggregator (WeeklyPlan -> WeeklyMetrics)
//!   3. Weekly snapshot ledger    (WeeklyPlan + coverages -> WeeklySnapshot)
//!   Effective duty queries read the WeeklyPlan plus swap events.
//!
//! RULES:
//!   - Facts are supplied fresh by the caller on every call; nothing is
//!     cached between calls.
//!   - Inputs are never mutated; every output is freshly built.
//!   - Identical facts produce byte-identical output.

use crate::{
    calendar::{week_days, CalendarDay},
    config::PlannerConfig,
    coverage::Coverage,
    effective_duty::{resolve_effective_duty, should_work_punitive, DutyContext, DutyQuery, EffectiveDuty},
    error::PlannerResult,
    incident::{CalendarIncidentResolver, Incident, IncidentDateResolver},
    representative::Representative,
    snapshot::{build_weekly_snapshot, CoverageSlotLookup, SlotResponsibilityLookup, WeeklySnapshot},
    special_schedule::{PatternScheduleAdapter, SpecialSchedule, SpecialScheduleAdapter},
    swap::SwapEvent,
    types::ShiftType,
    weekly_metrics::{aggregate_weekly_metrics, WeeklyMetrics},
    weekly_plan::{build_weekly_plan, WeekInput, WeeklyPlan},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four durable fact types plus special schedules and the calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanningFacts {
    pub representatives: Vec<Representative>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub swaps: Vec<SwapEvent>,
    #[serde(default)]
    pub coverages: Vec<Coverage>,
    #[serde(default)]
    pub special_schedules: Vec<SpecialSchedule>,
    #[serde(default)]
    pub calendar: Vec<CalendarDay>,
}

pub struct PlannerEngine {
    pub config: PlannerConfig,
    adapter: Box<dyn SpecialScheduleAdapter>,
    resolver: Box<dyn IncidentDateResolver>,
}

impl PlannerEngine {
    pub fn new(
        config: PlannerConfig,
        adapter: Box<dyn SpecialScheduleAdapter>,
        resolver: Box<dyn IncidentDateResolver>,
    ) -> Self {
        Self { config, adapter, resolver }
    }

    /// Engine wired with the default pattern adapter and calendar resolver.
    pub fn build(config: PlannerConfig) -> Self {
        let adapter = Box::new(PatternScheduleAdapter::new(config.mix_profiles.clone()));
        let resolver = Box::new(CalendarIncidentResolver::new(config.max_range_scan_days));
        Self::new(config, adapter, resolver)
    }

    pub fn build_test() -> Self {
        Self::build(PlannerConfig::default_test())
    }

    /// Plan an explicit list of days. Fails unless it is exactly one week.
    pub fn plan_days(&self, facts: &PlanningFacts, week: &[CalendarDay]) -> PlannerResult<WeeklyPlan> {
        let input = WeekInput {
            week,
            calendar: &facts.calendar,
            representatives: &facts.representatives,
            incidents: &facts.incidents,
            special_schedules: &facts.special_schedules,
            coverages: &facts.coverages,
        };
        build_weekly_plan(&input, self.adapter.as_ref(), self.resolver.as_ref())
    }

    /// Plan the 7 days starting at `week_start`.
    pub fn build_weekly_plan(&self, facts: &PlanningFacts, week_start: NaiveDate) -> PlannerResult<WeeklyPlan> {
        let week = week_days(week_start, &facts.calendar);
        self.plan_days(facts, &week)
    }

    pub fn weekly_metrics(&self, plan: &WeeklyPlan) -> WeeklyMetrics {
        aggregate_weekly_metrics(plan)
    }

    /// Snapshot with slot responsibility taken from the coverage records.
    pub fn weekly_snapshot(&self, facts: &PlanningFacts, plan: &WeeklyPlan) -> WeeklySnapshot {
        self.weekly_snapshot_with(plan, &CoverageSlotLookup::new(&facts.coverages))
    }

    pub fn weekly_snapshot_with(
        &self,
        plan: &WeeklyPlan,
        lookup: &dyn SlotResponsibilityLookup,
    ) -> WeeklySnapshot {
        build_weekly_snapshot(plan, lookup, &self.config.snapshot_namespace)
    }

    pub fn effective_duty(
        &self,
        facts: &PlanningFacts,
        plan: &WeeklyPlan,
        representative_id: &str,
        date: NaiveDate,
        shift: ShiftType,
    ) -> EffectiveDuty {
        resolve_effective_duty(
            &Self::duty_context(facts, plan),
            self.resolver.as_ref(),
            DutyQuery { representative_id, date, shift },
        )
    }

    pub fn should_work_punitive(
        &self,
        facts: &PlanningFacts,
        plan: &WeeklyPlan,
        representative_id: &str,
        date: NaiveDate,
        shift: ShiftType,
    ) -> bool {
        should_work_punitive(
            &Self::duty_context(facts, plan),
            self.resolver.as_ref(),
            DutyQuery { representative_id, date, shift },
        )
    }

    fn duty_context<'a>(facts: &'a PlanningFacts, plan: &'a WeeklyPlan) -> DutyContext<'a> {
        DutyContext {
            plan,
            swaps: &facts.swaps,
            incidents: &facts.incidents,
            calendar: &facts.calendar,
            representatives: &facts.representatives,
        }
    }
}
