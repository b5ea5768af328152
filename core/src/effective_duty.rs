//! Effective duty resolver: "should this representative work this shift
//! on this date?", including swap events the weekly plan does not carry.
//!
//! Priority, first match wins:
//!   1. Formal incident blocking the date (listed date, or inside the
//!      half-open [start, return_date) interval)   -> NONE, no duty
//!   2. AUSENCIA on a slot the plan assigns         -> NONE, no duty
//!   3. Swap events for the date:
//!        COVER  from -> COVERED (no duty), to -> COVERING (duty)
//!        DOUBLE       -> DOUBLE (duty, additive)
//!        SWAP   own shift -> SWAPPED_OUT, counterpart's -> SWAPPED_IN
//!   4. Weekly plan assignment                      -> BASE or NONE
//!
//! RULE: reason strings are shown verbatim in audit views and UI; do not
//! reword them.
//!
//! Unknown representative ids never fail a query: they are logged and
//! passed through to the date resolver as `None`.

use crate::{
    calendar::CalendarDay,
    incident::{Incident, IncidentDateResolver, IncidentType},
    representative::{find_representative, Representative},
    swap::SwapEvent,
    types::ShiftType,
    weekly_plan::WeeklyPlan,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const REASON_BASE: &str = "Turno base";
pub const REASON_NO_SHIFT: &str = "Sin turno asignado";
pub const REASON_DOUBLE: &str = "Turno doble";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyRole {
    Base,
    Covering,
    Covered,
    Double,
    SwappedIn,
    SwappedOut,
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutySource {
    Incident,
    Swap,
    Plan,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveDuty {
    pub should_work: bool,
    pub role: DutyRole,
    pub reason: String,
    pub source: DutySource,
}

impl EffectiveDuty {
    fn new(should_work: bool, role: DutyRole, reason: impl Into<String>, source: DutySource) -> Self {
        Self { should_work, role, reason: reason.into(), source }
    }
}

pub struct DutyContext<'a> {
    pub plan: &'a WeeklyPlan,
    pub swaps: &'a [SwapEvent],
    pub incidents: &'a [Incident],
    pub calendar: &'a [CalendarDay],
    pub representatives: &'a [Representative],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyQuery<'q> {
    pub representative_id: &'q str,
    pub date: NaiveDate,
    pub shift: ShiftType,
}

pub fn resolve_effective_duty(
    ctx: &DutyContext<'_>,
    resolver: &dyn IncidentDateResolver,
    query: DutyQuery<'_>,
) -> EffectiveDuty {
    let representative = find_representative(ctx.representatives, query.representative_id);
    if representative.is_none() {
        log::warn!(
            "duty query for unknown representative {} on {}",
            query.representative_id,
            query.date
        );
    }

    let own_incidents: Vec<&Incident> = ctx
        .incidents
        .iter()
        .filter(|i| i.representative_id == query.representative_id)
        .collect();

    // 1. Formal incident blocking the date.
    let blocking = own_incidents
        .iter()
        .filter(|i| i.incident_type.is_formal())
        .filter(|i| {
            let range = resolver.resolve(i, ctx.calendar, representative);
            range.contains(query.date) || range.blocks(query.date)
        })
        .max_by_key(|i| i.created_at);
    if let Some(incident) = blocking {
        return EffectiveDuty::new(false, DutyRole::None, incident.incident_type.as_str(), DutySource::Incident);
    }

    let planned = ctx
        .plan
        .assignment(query.representative_id, query.date)
        .covers(query.shift);

    // 2. Planned slot, but the representative did not show up.
    if planned {
        let absent = own_incidents
            .iter()
            .filter(|i| i.incident_type == IncidentType::Ausencia)
            .any(|i| resolver.resolve(i, ctx.calendar, representative).contains(query.date));
        if absent {
            return EffectiveDuty::new(false, DutyRole::None, IncidentType::Ausencia.as_str(), DutySource::Incident);
        }
    }

    // 3. Swap events.
    for event in ctx.swaps.iter().filter(|e| e.date() == query.date) {
        if let Some(duty) = duty_from_swap(ctx, event, &query) {
            return duty;
        }
    }

    // 4. Weekly plan.
    if planned {
        EffectiveDuty::new(true, DutyRole::Base, REASON_BASE, DutySource::Plan)
    } else {
        EffectiveDuty::new(false, DutyRole::None, REASON_NO_SHIFT, DutySource::Plan)
    }
}

/// Punitive responsibility: whether missing this slot is the
/// representative's fault. A thin projection of the effective duty.
pub fn should_work_punitive(
    ctx: &DutyContext<'_>,
    resolver: &dyn IncidentDateResolver,
    query: DutyQuery<'_>,
) -> bool {
    resolve_effective_duty(ctx, resolver, query).should_work
}

fn duty_from_swap(ctx: &DutyContext<'_>, event: &SwapEvent, query: &DutyQuery<'_>) -> Option<EffectiveDuty> {
    let me = query.representative_id;
    match event {
        SwapEvent::Cover { shift, from_representative_id, to_representative_id, .. } => {
            if *shift != query.shift {
                return None;
            }
            if from_representative_id == me {
                let name = display_name(ctx, to_representative_id);
                Some(EffectiveDuty::new(false, DutyRole::Covered, format!("Cubierto por {name}"), DutySource::Swap))
            } else if to_representative_id == me {
                let name = display_name(ctx, from_representative_id);
                Some(EffectiveDuty::new(true, DutyRole::Covering, format!("Cubriendo a {name}"), DutySource::Swap))
            } else {
                None
            }
        }
        SwapEvent::Double { shift, representative_id, .. } => {
            (*shift == query.shift && representative_id == me)
                .then(|| EffectiveDuty::new(true, DutyRole::Double, REASON_DOUBLE, DutySource::Swap))
        }
        SwapEvent::Swap { from_representative_id, from_shift, to_representative_id, to_shift, .. } => {
            // Each party gives up its own shift and takes the counterpart's.
            let (given_up, taken, counterpart) = if from_representative_id == me {
                (*from_shift, *to_shift, to_representative_id)
            } else if to_representative_id == me {
                (*to_shift, *from_shift, from_representative_id)
            } else {
                return None;
            };
            let reason = format!("Intercambio con {}", display_name(ctx, counterpart));
            if query.shift == taken {
                Some(EffectiveDuty::new(true, DutyRole::SwappedIn, reason, DutySource::Swap))
            } else if query.shift == given_up {
                Some(EffectiveDuty::new(false, DutyRole::SwappedOut, reason, DutySource::Swap))
            } else {
                None
            }
        }
    }
}

fn display_name(ctx: &DutyContext<'_>, representative_id: &str) -> String {
    match find_representative(ctx.representatives, representative_id) {
        Some(rep) => rep.name.clone(),
        None => {
            log::warn!("swap event references unknown representative {representative_id}");
            representative_id.to_string()
        }
    }
}
