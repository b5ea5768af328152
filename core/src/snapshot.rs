//! Weekly snapshot: slot-level double-entry ledger.
//!
//! A slot is one (representative, date, shift). NONE = 0 slots,
//! SINGLE = 1, BOTH = 2.
//!
//! PASS 1 walks every agent once as slot OWNER (coverage records are never
//! iterated directly, so each slot is visited exactly once):
//!   - BASE slot:     executed if the owner attended, else absence.
//!   - COVERAGE slot: the covering representative gets covering credit;
//!                    the owner's slot is covered if the covering
//!                    representative attended, else it stays uncovered.
//!                    Covers taken from swap events are not in the plan:
//!                    the owner's own status is ignored and the covering
//!                    representative attends unless absent or on leave.
//!   Days without a slot: CUBRIENDO safety net, then voluntary work.
//! PASS 2 derives uncovered = max(0, planned - executed - absences - covered).
//!
//! INVARIANT (per representative, every snapshot):
//!   planned = executed + absences + covered + uncovered
//!
//! RULE: a covering representative who also has their own slot that day
//! is credited for attendance exactly once, by their own slot. Coverage on
//! a day without an own slot adds one planned slot for the covering
//! representative, so the invariant stays exact.
//!
//! The accumulator lives for exactly one `build_weekly_snapshot` call.

use crate::{
    calendar::iso_week_label,
    coverage::Coverage,
    day_metrics::Badge,
    swap::SwapEvent,
    types::{DayStatus, RepresentativeId, ShiftType},
    weekly_plan::{DailyPresence, WeeklyPlan},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

// ── Slot responsibility ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResponsibility {
    /// The owner is responsible for the slot.
    Base,
    /// Someone else stands in for the owner. `in_plan` is true when the
    /// weekly plan already carries the CUBIERTO / CUBRIENDO badges for it.
    Coverage { covering_rep_id: RepresentativeId, in_plan: bool },
}

/// Who answers for an owner's slot.
pub trait SlotResponsibilityLookup {
    fn responsibility(&self, owner_id: &str, date: NaiveDate, shift: ShiftType) -> SlotResponsibility;
}

/// Responsibility from ACTIVE coverage records.
pub struct CoverageSlotLookup<'a> {
    coverages: &'a [Coverage],
}

impl<'a> CoverageSlotLookup<'a> {
    pub fn new(coverages: &'a [Coverage]) -> Self {
        Self { coverages }
    }
}

impl SlotResponsibilityLookup for CoverageSlotLookup<'_> {
    fn responsibility(&self, owner_id: &str, date: NaiveDate, shift: ShiftType) -> SlotResponsibility {
        self.coverages
            .iter()
            .find(|c| c.is_active() && c.covered_rep_id == owner_id && c.date == date && c.shift == shift)
            .map_or(SlotResponsibility::Base, |c| SlotResponsibility::Coverage {
                covering_rep_id: c.covering_rep_id.clone(),
                in_plan: true,
            })
    }
}

/// Responsibility from COVER swap events. Swap events never reach the
/// weekly plan, so neither side's day reflects the cover.
pub struct SwapSlotLookup<'a> {
    swaps: &'a [SwapEvent],
}

impl<'a> SwapSlotLookup<'a> {
    pub fn new(swaps: &'a [SwapEvent]) -> Self {
        Self { swaps }
    }
}

impl SlotResponsibilityLookup for SwapSlotLookup<'_> {
    fn responsibility(&self, owner_id: &str, date: NaiveDate, shift: ShiftType) -> SlotResponsibility {
        self.swaps
            .iter()
            .find_map(|event| match event {
                SwapEvent::Cover { date: d, shift: s, from_representative_id, to_representative_id }
                    if *d == date && *s == shift && from_representative_id == owner_id =>
                {
                    Some(SlotResponsibility::Coverage {
                        covering_rep_id: to_representative_id.clone(),
                        in_plan: false,
                    })
                }
                _ => None,
            })
            .unwrap_or(SlotResponsibility::Base)
    }
}

// ── Snapshot records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepresentativeSlots {
    pub representative_id: RepresentativeId,
    pub planned_slots: u32,
    pub executed_slots: u32,
    pub absence_slots: u32,
    pub covered_slots: u32,
    pub covering_slots: u32,
    pub uncovered_slots: u32,
}

impl RepresentativeSlots {
    pub fn invariant_holds(&self) -> bool {
        self.planned_slots
            == self.executed_slots + self.absence_slots + self.covered_slots + self.uncovered_slots
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotTotals {
    pub planned_slots: u32,
    pub executed_slots: u32,
    pub absence_slots: u32,
    pub covered_slots: u32,
    pub covering_slots: u32,
    pub uncovered_slots: u32,
    /// covered + covering.
    pub coverage_slots: u32,
    pub invariant_violations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySnapshot {
    pub id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub iso_week: String,
    pub totals: SnapshotTotals,
    pub by_representative: Vec<RepresentativeSlots>,
}

impl WeeklySnapshot {
    pub fn representative(&self, representative_id: &str) -> Option<&RepresentativeSlots> {
        self.by_representative
            .iter()
            .find(|r| r.representative_id == representative_id)
    }
}

/// Deterministic snapshot id for a week.
pub fn snapshot_id(namespace: &str, week_start: NaiveDate) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{namespace}:{week_start}").as_bytes())
}

// ── Ledger ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct SlotTally {
    planned: u32,
    executed: u32,
    absences: u32,
    covered: u32,
    covering: u32,
}

/// Per-snapshot accumulator. Created and dropped inside one build.
struct Ledger<'p> {
    plan: &'p WeeklyPlan,
    tallies: HashMap<&'p str, SlotTally>,
    covering_credited: HashSet<(&'p str, NaiveDate)>,
}

impl<'p> Ledger<'p> {
    fn new(plan: &'p WeeklyPlan) -> Self {
        Self {
            plan,
            tallies: HashMap::new(),
            covering_credited: HashSet::new(),
        }
    }

    fn tally(&mut self, representative_id: &'p str) -> &mut SlotTally {
        self.tallies.entry(representative_id).or_default()
    }

    fn post_owned_slots(&mut self, lookup: &dyn SlotResponsibilityLookup) {
        let plan = self.plan;
        for agent in &plan.agents {
            let owner = agent.representative_id.as_str();
            self.tally(owner);
            for (date, day) in &agent.days {
                for shift in day.assignment.shifts() {
                    self.tally(owner).planned += 1;
                    match lookup.responsibility(owner, *date, shift) {
                        SlotResponsibility::Base => {
                            if day.attended() {
                                self.tally(owner).executed += 1;
                            } else {
                                self.tally(owner).absences += 1;
                            }
                        }
                        SlotResponsibility::Coverage { covering_rep_id, in_plan } => {
                            self.post_coverage(owner, day, &covering_rep_id, in_plan);
                        }
                    }
                }
            }
        }
    }

    /// Cross-post one covered slot to both books.
    fn post_coverage(
        &mut self,
        owner: &'p str,
        owner_day: &DailyPresence,
        covering_rep_id: &str,
        in_plan: bool,
    ) {
        let date = owner_day.date;

        // Owner came in anyway: the slot is executed by the owner. A plan
        // that does not carry the cover says nothing about the owner's day.
        let owner_worked =
            in_plan && owner_day.attended() && owner_day.badge != Some(Badge::Cubierto);
        if owner_worked {
            self.tally(owner).executed += 1;
        }

        let plan = self.plan;
        let Some((covering, covering_day)) = plan
            .agent(covering_rep_id)
            .and_then(|a| a.days.get(&date).map(|d| (a.representative_id.as_str(), d)))
        else {
            log::warn!(
                "coverage of {owner} on {date} names {covering_rep_id}, who is not in the plan; slot left uncovered"
            );
            return;
        };

        self.tally(covering).covering += 1;
        self.covering_credited.insert((covering, date));

        let base_credited = !covering_day.assignment.is_none();
        if covering_attends(covering_day, in_plan) {
            if !owner_worked {
                self.tally(owner).covered += 1;
            }
            if !base_credited {
                let t = self.tally(covering);
                t.planned += 1;
                t.executed += 1;
            }
        } else if !base_credited {
            let t = self.tally(covering);
            t.planned += 1;
            t.absences += 1;
        }
    }

    /// Days with no slot of their own: CUBRIENDO safety net, voluntary work.
    fn post_unassigned_days(&mut self) {
        let plan = self.plan;
        for agent in &plan.agents {
            let rep = agent.representative_id.as_str();
            for (date, day) in agent.days.iter().filter(|(_, d)| d.assignment.is_none()) {
                let covering_badge = day.badge == Some(Badge::Cubriendo);
                if covering_badge && !self.covering_credited.contains(&(rep, *date)) {
                    let t = self.tally(rep);
                    t.covering += 1;
                    t.planned += 1;
                    if covering_attends(day, true) {
                        t.executed += 1;
                    } else {
                        t.absences += 1;
                    }
                } else if !covering_badge && day.attended() {
                    let t = self.tally(rep);
                    t.planned += 1;
                    t.executed += 1;
                }
            }
        }
    }

    fn finish(self) -> Vec<RepresentativeSlots> {
        self.plan
            .agents
            .iter()
            .map(|agent| {
                let t = self
                    .tallies
                    .get(agent.representative_id.as_str())
                    .copied()
                    .unwrap_or_default();
                let uncovered = t.planned.saturating_sub(t.executed + t.absences + t.covered);
                RepresentativeSlots {
                    representative_id: agent.representative_id.clone(),
                    planned_slots: t.planned,
                    executed_slots: t.executed,
                    absence_slots: t.absences,
                    covered_slots: t.covered,
                    covering_slots: t.covering,
                    uncovered_slots: uncovered,
                }
            })
            .collect()
    }
}

/// A covering representative attends unless the day is an absence. When
/// the plan carries the cover, a day off needs the CUBRIENDO badge; when it
/// does not, only an absence or a formal incident keeps them away.
fn covering_attends(day: &DailyPresence, in_plan: bool) -> bool {
    if day.counts_as_absence {
        return false;
    }
    if in_plan {
        day.status == DayStatus::Working || day.badge == Some(Badge::Cubriendo)
    } else {
        !day.incident_type.is_some_and(|t| t.is_formal())
    }
}

pub fn build_weekly_snapshot(
    plan: &WeeklyPlan,
    lookup: &dyn SlotResponsibilityLookup,
    namespace: &str,
) -> WeeklySnapshot {
    let mut ledger = Ledger::new(plan);
    ledger.post_owned_slots(lookup);
    ledger.post_unassigned_days();
    let by_representative = ledger.finish();

    let mut totals = SnapshotTotals::default();
    for r in &by_representative {
        totals.planned_slots += r.planned_slots;
        totals.executed_slots += r.executed_slots;
        totals.absence_slots += r.absence_slots;
        totals.covered_slots += r.covered_slots;
        totals.covering_slots += r.covering_slots;
        totals.uncovered_slots += r.uncovered_slots;
        if !r.invariant_holds() {
            totals.invariant_violations += 1;
            log::warn!(
                "slot invariant violated for {} in week {}: {:?}",
                r.representative_id,
                plan.week_start,
                r
            );
        }
    }
    totals.coverage_slots = totals.covered_slots + totals.covering_slots;

    log::debug!(
        "snapshot {}: planned={} executed={} absences={} covered={} uncovered={}",
        plan.week_start,
        totals.planned_slots,
        totals.executed_slots,
        totals.absence_slots,
        totals.covered_slots,
        totals.uncovered_slots
    );

    WeeklySnapshot {
        id: snapshot_id(namespace, plan.week_start),
        week_start: plan.week_start,
        week_end: plan.week_start + Duration::days(6),
        iso_week: iso_week_label(plan.week_start),
        totals,
        by_representative,
    }
}
