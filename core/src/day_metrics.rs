//! Day metrics computer: the derived "Computed" layer.
//!
//! Pure function of (plan, reality, coverage). Rules are evaluated in
//! priority order and the first match wins:
//!   1. VACACIONES / LICENCIA  -> hidden, badge = incident, no metrics
//!   2. AUSENCIA               -> visible, badge AUSENCIA, worked + absence
//!   3. covered                -> visible, badge CUBIERTO
//!   4. covering               -> visible, badge CUBRIENDO
//!   5. legacy SWAP plan       -> visible, badge CUBRIENDO
//!   6. WORKING                -> visible, no badge
//!   7. otherwise              -> hidden, no metrics

use crate::{
    coverage::CoverageLookup,
    day_resolution::{DayPlan, DayReality, PlanSource},
    incident::IncidentType,
    types::{DayStatus, ShiftType},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Vacaciones,
    Licencia,
    Ausencia,
    Cubierto,
    Cubriendo,
}

impl Badge {
    fn for_formal(incident_type: IncidentType) -> Badge {
        match incident_type {
            IncidentType::Licencia => Badge::Licencia,
            _ => Badge::Vacaciones,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayDisplay {
    pub appears_in_planner: bool,
    /// Covering never moves an agent to the covered shift's column: this
    /// is always the agent's own planned shifts.
    pub appears_in_shifts: Vec<ShiftType>,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayMetrics {
    pub counts_as_worked: bool,
    pub counts_for_incentives: bool,
    pub counts_as_absence: bool,
}

impl DayMetrics {
    const NONE: DayMetrics = DayMetrics {
        counts_as_worked: false,
        counts_for_incentives: false,
        counts_as_absence: false,
    };

    const WORKED: DayMetrics = DayMetrics {
        counts_as_worked: true,
        counts_for_incentives: true,
        counts_as_absence: false,
    };
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayComputed {
    pub display: DayDisplay,
    pub metrics: DayMetrics,
}

impl DayComputed {
    fn hidden(badge: Option<Badge>) -> Self {
        Self {
            display: DayDisplay { appears_in_planner: false, appears_in_shifts: vec![], badge },
            metrics: DayMetrics::NONE,
        }
    }

    fn visible(plan: &DayPlan, badge: Option<Badge>, metrics: DayMetrics) -> Self {
        Self {
            display: DayDisplay {
                appears_in_planner: true,
                appears_in_shifts: plan.assignment.shifts(),
                badge,
            },
            metrics,
        }
    }
}

pub fn compute_day_metrics(
    plan: &DayPlan,
    reality: &DayReality,
    coverage: Option<&CoverageLookup>,
) -> DayComputed {
    match reality.incident_type {
        Some(t) if t.is_formal() => return DayComputed::hidden(Some(Badge::for_formal(t))),
        Some(IncidentType::Ausencia) => {
            return DayComputed::visible(
                plan,
                Some(Badge::Ausencia),
                DayMetrics {
                    counts_as_worked: true,
                    counts_for_incentives: false,
                    counts_as_absence: true,
                },
            )
        }
        _ => {}
    }

    if let Some(cov) = coverage {
        if cov.is_covered {
            return DayComputed::visible(plan, Some(Badge::Cubierto), DayMetrics::WORKED);
        }
        if cov.is_covering {
            return DayComputed::visible(plan, Some(Badge::Cubriendo), DayMetrics::WORKED);
        }
    }

    if plan.source == PlanSource::Swap {
        return DayComputed::visible(plan, Some(Badge::Cubriendo), DayMetrics::WORKED);
    }

    if reality.status == DayStatus::Working {
        return DayComputed::visible(plan, None, DayMetrics::WORKED);
    }

    DayComputed::hidden(None)
}
