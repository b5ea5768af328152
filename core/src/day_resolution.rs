//! Day resolution engine: the Plan / Reality / Computed picture for one
//! representative on one date.
//!
//! PLAN (organizational intent), first match wins:
//!   1. formal incident       -> NONE (the hard block purges the plan too)
//!   2. OVERRIDE incident     -> its assignment (legacy: toggle the natural day)
//!   3. legacy SWAP incident  -> its assignment
//!   4. special schedule adapter
//!
//! REALITY (what happened), first match wins:
//!   1. formal incident       -> OFF
//!   2. AUSENCIA              -> WORKING. An absence annotates the day; it
//!                              never turns it OFF.
//!   3. otherwise             -> OFF iff the plan assigns nothing
//!
//! RULE: the three layers are separate immutable records. Only the weekly
//! plan adapter flattens them for legacy consumers.

use crate::{
    coverage::CoverageLookup,
    day_metrics::{compute_day_metrics, DayComputed},
    incident::{latest_formal, latest_of_type, Incident, IncidentType},
    representative::Representative,
    special_schedule::{ResolvedDayKind, ScheduleResolution, SpecialSchedule, SpecialScheduleAdapter},
    types::{DayStatus, IncidentId, ShiftAssignment},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanSource {
    Base,
    Override,
    Swap,
    Special,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayPlan {
    pub assignment: ShiftAssignment,
    pub source: PlanSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayReality {
    pub status: DayStatus,
    pub incident_type: Option<IncidentType>,
    pub incident_id: Option<IncidentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayResolution {
    pub plan: DayPlan,
    pub reality: DayReality,
    pub computed: DayComputed,
}

/// Everything the engine needs for one (representative, date).
pub struct DayContext<'a> {
    pub representative: &'a Representative,
    pub date: NaiveDate,
    /// Incidents already known to touch this representative on this date.
    pub incidents: &'a [&'a Incident],
    /// GLOBAL followed by INDIVIDUAL special schedules.
    pub special_schedules: &'a [&'a SpecialSchedule],
    pub coverage: Option<&'a CoverageLookup>,
}

pub fn resolve_day(ctx: &DayContext<'_>, adapter: &dyn SpecialScheduleAdapter) -> DayResolution {
    let formal = latest_formal(ctx.incidents);
    let ausencia = latest_of_type(ctx.incidents, IncidentType::Ausencia);

    let plan = resolve_plan(ctx, formal, adapter);

    let reality = if let Some(incident) = formal {
        DayReality {
            status: DayStatus::Off,
            incident_type: Some(incident.incident_type),
            incident_id: Some(incident.id.clone()),
        }
    } else if let Some(incident) = ausencia {
        DayReality {
            status: DayStatus::Working,
            incident_type: Some(IncidentType::Ausencia),
            incident_id: Some(incident.id.clone()),
        }
    } else {
        DayReality {
            status: if plan.assignment.is_none() { DayStatus::Off } else { DayStatus::Working },
            incident_type: None,
            incident_id: None,
        }
    };

    let computed = compute_day_metrics(&plan, &reality, ctx.coverage);
    DayResolution { plan, reality, computed }
}

fn resolve_plan(
    ctx: &DayContext<'_>,
    formal: Option<&Incident>,
    adapter: &dyn SpecialScheduleAdapter,
) -> DayPlan {
    if formal.is_some() {
        return DayPlan { assignment: ShiftAssignment::None, source: PlanSource::Base };
    }

    if let Some(incident) = latest_of_type(ctx.incidents, IncidentType::Override) {
        let assignment = match incident.assignment {
            Some(assignment) => assignment,
            None => toggle(natural_plan(ctx, adapter).assignment, ctx.representative),
        };
        return DayPlan { assignment, source: PlanSource::Override };
    }

    let swap = latest_of_type(ctx.incidents, IncidentType::Swap)
        .and_then(|incident| incident.assignment);
    if let Some(assignment) = swap {
        return DayPlan { assignment, source: PlanSource::Swap };
    }

    natural_plan(ctx, adapter)
}

/// What base + special schedules alone say about the day.
fn natural_plan(ctx: &DayContext<'_>, adapter: &dyn SpecialScheduleAdapter) -> DayPlan {
    let resolution = adapter.resolve(
        ctx.representative,
        ctx.date,
        &ctx.representative.base_schedule,
        ctx.special_schedules,
    );
    plan_from_schedule(&resolution)
}

pub fn plan_from_schedule(resolution: &ScheduleResolution) -> DayPlan {
    let source = if resolution.is_special() { PlanSource::Special } else { PlanSource::Base };
    let assignment = match (resolution.kind, resolution.shift) {
        (ResolvedDayKind::Off, _) => ShiftAssignment::None,
        (ResolvedDayKind::Mixto, _) => ShiftAssignment::Both,
        (ResolvedDayKind::Override | ResolvedDayKind::Base, Some(shift)) => ShiftAssignment::Single { shift },
        (ResolvedDayKind::Override | ResolvedDayKind::Base, None) => ShiftAssignment::None,
    };
    DayPlan { assignment, source }
}

/// Assignment-less OVERRIDE: an off day becomes a base-shift day, a
/// working day becomes off.
fn toggle(natural: ShiftAssignment, representative: &Representative) -> ShiftAssignment {
    if natural.is_none() {
        ShiftAssignment::Single { shift: representative.base_shift }
    } else {
        ShiftAssignment::None
    }
}
