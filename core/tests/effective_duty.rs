//! Effective duty resolver tests: incident blocking (including the
//! half-open vacation interval), AUSENCIA, swap events, plan fallback.

use chrono::{NaiveDate, NaiveDateTime};
use shiftdesk_core::{
    effective_duty::{DutyRole, DutySource},
    engine::{PlannerEngine, PlanningFacts},
    incident::{Incident, IncidentType},
    representative::Representative,
    swap::SwapEvent,
    types::ShiftType,
    weekly_plan::WeeklyPlan,
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn at(hour: u32) -> NaiveDateTime {
    d("2024-03-01").and_hms_opt(hour, 0, 0).unwrap()
}

const MONDAY: &str = "2024-04-01";

fn roster() -> Vec<Representative> {
    vec![
        Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1, 2, 3, 4, 5]),
        Representative::new("bea", "Bea", ShiftType::Night).working_on(&[1, 2, 3, 4, 5]),
    ]
}

fn setup(incidents: Vec<Incident>, swaps: Vec<SwapEvent>) -> (PlannerEngine, PlanningFacts, WeeklyPlan) {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = PlannerEngine::build_test();
    let facts = PlanningFacts {
        representatives: roster(),
        incidents,
        swaps,
        ..Default::default()
    };
    let plan = engine.build_weekly_plan(&facts, d(MONDAY)).expect("weekly plan");
    (engine, facts, plan)
}

// ─────────────────────────────────────────────────────────────────────────────
// Swap events
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn exchange_is_symmetric() {
    let swap = SwapEvent::Swap {
        date: d(MONDAY),
        from_representative_id: "ana".into(),
        from_shift: ShiftType::Day,
        to_representative_id: "bea".into(),
        to_shift: ShiftType::Night,
    };
    let (engine, facts, plan) = setup(vec![], vec![swap]);

    let ana_night = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Night);
    assert!(ana_night.should_work);
    assert_eq!(ana_night.role, DutyRole::SwappedIn);
    assert_eq!(ana_night.reason, "Intercambio con Bea");

    let ana_day = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Day);
    assert!(!ana_day.should_work);
    assert_eq!(ana_day.role, DutyRole::SwappedOut);

    let bea_day = engine.effective_duty(&facts, &plan, "bea", d(MONDAY), ShiftType::Day);
    assert!(bea_day.should_work);
    assert_eq!(bea_day.role, DutyRole::SwappedIn);
    assert_eq!(bea_day.reason, "Intercambio con Ana");

    let bea_night = engine.effective_duty(&facts, &plan, "bea", d(MONDAY), ShiftType::Night);
    assert!(!bea_night.should_work);
    assert_eq!(bea_night.role, DutyRole::SwappedOut);
}

#[test]
fn cover_releases_owner_and_binds_cover() {
    let cover = SwapEvent::Cover {
        date: d(MONDAY),
        shift: ShiftType::Day,
        from_representative_id: "ana".into(),
        to_representative_id: "bea".into(),
    };
    let (engine, facts, plan) = setup(vec![], vec![cover]);

    let ana = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Day);
    assert!(!ana.should_work);
    assert_eq!(ana.role, DutyRole::Covered);
    assert_eq!(ana.reason, "Cubierto por Bea");
    assert_eq!(ana.source, DutySource::Swap);

    let bea = engine.effective_duty(&facts, &plan, "bea", d(MONDAY), ShiftType::Day);
    assert!(bea.should_work);
    assert_eq!(bea.role, DutyRole::Covering);
    assert_eq!(bea.reason, "Cubriendo a Ana");

    // Bea's own night shift is untouched.
    let bea_night = engine.effective_duty(&facts, &plan, "bea", d(MONDAY), ShiftType::Night);
    assert_eq!(bea_night.role, DutyRole::Base);
}

#[test]
fn double_is_additive() {
    let double = SwapEvent::Double {
        date: d(MONDAY),
        shift: ShiftType::Night,
        representative_id: "ana".into(),
    };
    let (engine, facts, plan) = setup(vec![], vec![double]);

    let night = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Night);
    assert!(night.should_work);
    assert_eq!(night.role, DutyRole::Double);

    let day = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Day);
    assert!(day.should_work);
    assert_eq!(day.role, DutyRole::Base);
    assert_eq!(day.reason, "Turno base");
}

#[test]
fn swap_naming_unknown_representative_falls_back_to_id() {
    let cover = SwapEvent::Cover {
        date: d(MONDAY),
        shift: ShiftType::Night,
        from_representative_id: "ghost".into(),
        to_representative_id: "ana".into(),
    };
    let (engine, facts, plan) = setup(vec![], vec![cover]);

    let ana = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Night);
    assert!(ana.should_work);
    assert_eq!(ana.reason, "Cubriendo a ghost");
}

// ─────────────────────────────────────────────────────────────────────────────
// Incidents
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn weekend_inside_vacation_is_blocked() {
    // Friday + Monday counted; Saturday and Sunday sit inside [start, return).
    let vac = Incident::new("v1", "ana", IncidentType::Vacaciones, d("2024-04-05"), at(9)).with_duration(2);
    let double = SwapEvent::Double {
        date: d("2024-04-06"),
        shift: ShiftType::Day,
        representative_id: "ana".into(),
    };
    let (engine, facts, plan) = setup(vec![vac], vec![double]);

    let sat = engine.effective_duty(&facts, &plan, "ana", d("2024-04-06"), ShiftType::Day);
    assert!(!sat.should_work);
    assert_eq!(sat.role, DutyRole::None);
    assert_eq!(sat.reason, "VACACIONES");
    assert_eq!(sat.source, DutySource::Incident);

    let next_mon = engine.effective_duty(&facts, &plan, "ana", d("2024-04-08"), ShiftType::Day);
    assert_eq!(next_mon.reason, "VACACIONES");

    // Return day is outside the half-open interval.
    let tue = engine.effective_duty(&facts, &plan, "ana", d("2024-04-09"), ShiftType::Day);
    assert_ne!(tue.reason, "VACACIONES");
}

#[test]
fn ausencia_on_planned_slot_means_no_duty() {
    let aus = Incident::new("a1", "ana", IncidentType::Ausencia, d(MONDAY), at(9));
    let (engine, facts, plan) = setup(vec![aus], vec![]);

    let duty = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Day);
    assert!(!duty.should_work);
    assert_eq!(duty.role, DutyRole::None);
    assert_eq!(duty.reason, "AUSENCIA");
}

#[test]
fn ausencia_on_unplanned_slot_does_not_hide_a_cover() {
    let aus = Incident::new("a1", "ana", IncidentType::Ausencia, d("2024-04-06"), at(9));
    let cover = SwapEvent::Cover {
        date: d("2024-04-06"),
        shift: ShiftType::Day,
        from_representative_id: "bea".into(),
        to_representative_id: "ana".into(),
    };
    let (engine, facts, plan) = setup(vec![aus], vec![cover]);

    let duty = engine.effective_duty(&facts, &plan, "ana", d("2024-04-06"), ShiftType::Day);
    assert!(duty.should_work);
    assert_eq!(duty.role, DutyRole::Covering);
}

#[test]
fn plan_fallback_and_punitive_projection() {
    let (engine, facts, plan) = setup(vec![], vec![]);

    let day = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Day);
    assert_eq!(day.role, DutyRole::Base);
    assert_eq!(day.source, DutySource::Plan);
    assert!(engine.should_work_punitive(&facts, &plan, "ana", d(MONDAY), ShiftType::Day));

    let night = engine.effective_duty(&facts, &plan, "ana", d(MONDAY), ShiftType::Night);
    assert_eq!(night.role, DutyRole::None);
    assert!(!engine.should_work_punitive(&facts, &plan, "ana", d(MONDAY), ShiftType::Night));

    // Unknown representative degrades instead of failing.
    let ghost = engine.effective_duty(&facts, &plan, "ghost", d(MONDAY), ShiftType::Day);
    assert!(!ghost.should_work);
}
