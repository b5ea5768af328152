//! Day resolution tests: plan/reality precedence, AUSENCIA overlay,
//! OVERRIDE and formal incidents, mix profiles, special schedules.

use chrono::{NaiveDate, NaiveDateTime};
use shiftdesk_core::{
    config::PlannerConfig,
    day_metrics::Badge,
    day_resolution::{resolve_day, DayContext, PlanSource},
    engine::{PlannerEngine, PlanningFacts},
    incident::{Incident, IncidentType},
    representative::{MixProfileType, Representative},
    special_schedule::{PatternScheduleAdapter, SpecialDayKind, SpecialSchedule, SpecialScheduleScope},
    types::{DayStatus, ShiftAssignment, ShiftType},
    weekly_plan::{DailyPresence, PresenceSource},
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn at(hour: u32) -> NaiveDateTime {
    d("2024-03-01").and_hms_opt(hour, 0, 0).unwrap()
}

const WEEK: &str = "2024-04-01"; // Monday

fn day_for(facts: &PlanningFacts, rep: &str, date: &str) -> DailyPresence {
    let engine = PlannerEngine::build_test();
    let plan = engine.build_weekly_plan(facts, d(WEEK)).expect("weekly plan");
    plan.day(rep, d(date)).cloned().expect("day present")
}

fn facts(representatives: Vec<Representative>, incidents: Vec<Incident>) -> PlanningFacts {
    PlanningFacts {
        representatives,
        incidents,
        ..Default::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base pattern and formal incidents
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn base_monday_is_working_single_shift() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let day = day_for(&facts(vec![rep], vec![]), "ana", "2024-04-01");

    assert_eq!(day.status, DayStatus::Working);
    assert_eq!(day.assignment, ShiftAssignment::Single { shift: ShiftType::Day });
    assert_eq!(day.source, PresenceSource::Base);
    assert!(day.appears_in_planner);
    assert_eq!(day.badge, None);
}

#[test]
fn vacation_forces_off_and_none() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let vac = Incident::new("v1", "ana", IncidentType::Vacaciones, d("2024-04-01"), at(9));
    let day = day_for(&facts(vec![rep], vec![vac]), "ana", "2024-04-01");

    assert_eq!(day.status, DayStatus::Off);
    assert_eq!(day.assignment, ShiftAssignment::None);
    assert_eq!(day.incident_type, Some(IncidentType::Vacaciones));
    assert_eq!(day.source, PresenceSource::Incident);
    assert!(!day.appears_in_planner);
    assert!(!day.counts_as_worked && !day.counts_for_incentives && !day.counts_as_absence);
}

#[test]
fn licencia_blocks_even_a_special_schedule_workday() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let special = SpecialSchedule {
        id: "s1".into(),
        scope: SpecialScheduleScope::Individual,
        target_representative_id: Some("ana".into()),
        start_date: d("2024-04-01"),
        end_date: d("2024-04-07"),
        pattern: [(1, SpecialDayKind::Mixto)].into(),
        note: None,
    };
    let mut f = facts(
        vec![rep],
        vec![Incident::new("l1", "ana", IncidentType::Licencia, d("2024-04-01"), at(9))],
    );
    f.special_schedules.push(special);
    let day = day_for(&f, "ana", "2024-04-01");

    assert_eq!(day.status, DayStatus::Off);
    assert_eq!(day.assignment, ShiftAssignment::None);
}

#[test]
fn licencia_makes_override_inert() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let over = Incident::new("o1", "ana", IncidentType::Override, d("2024-04-01"), at(12))
        .with_assignment(ShiftAssignment::Single { shift: ShiftType::Night });
    let lic = Incident::new("l1", "ana", IncidentType::Licencia, d("2024-04-01"), at(8));
    let day = day_for(&facts(vec![rep], vec![over, lic]), "ana", "2024-04-01");

    assert_eq!(day.status, DayStatus::Off);
    assert_eq!(day.assignment, ShiftAssignment::None);
    assert_eq!(day.source, PresenceSource::Incident);
    assert_eq!(day.incident_type, Some(IncidentType::Licencia));
    assert_eq!(day.badge, Some(Badge::Licencia));
}

// ─────────────────────────────────────────────────────────────────────────────
// AUSENCIA overlay
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ausencia_never_turns_the_day_off() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let aus = Incident::new("a1", "ana", IncidentType::Ausencia, d("2024-04-01"), at(9));
    let day = day_for(&facts(vec![rep], vec![aus]), "ana", "2024-04-01");

    assert_eq!(day.status, DayStatus::Working);
    assert_eq!(day.assignment, ShiftAssignment::Single { shift: ShiftType::Day });
    assert_eq!(day.incident_type, Some(IncidentType::Ausencia));
    assert_eq!(day.source, PresenceSource::Incident);
    assert_eq!(day.badge, Some(Badge::Ausencia));
    assert!(day.counts_as_worked);
    assert!(!day.counts_for_incentives);
    assert!(day.counts_as_absence);
}

#[test]
fn override_stays_visible_source_under_ausencia() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day);
    let over = Incident::new("o1", "ana", IncidentType::Override, d("2024-04-06"), at(9))
        .with_assignment(ShiftAssignment::Single { shift: ShiftType::Day });
    let aus = Incident::new("a1", "ana", IncidentType::Ausencia, d("2024-04-06"), at(10));
    let day = day_for(&facts(vec![rep], vec![over, aus]), "ana", "2024-04-06");

    assert_eq!(day.status, DayStatus::Working);
    assert_eq!(day.source, PresenceSource::Override);
    assert_eq!(day.incident_type, Some(IncidentType::Ausencia));
}

// ─────────────────────────────────────────────────────────────────────────────
// OVERRIDE
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn override_on_saturday_without_base_entry_works() {
    let rep = Representative::new("ana", "Ana", ShiftType::Night).working_on(&[1, 2, 3, 4, 5]);
    let over = Incident::new("o1", "ana", IncidentType::Override, d("2024-04-06"), at(9))
        .with_assignment(ShiftAssignment::Single { shift: ShiftType::Day });
    let day = day_for(&facts(vec![rep], vec![over]), "ana", "2024-04-06");

    assert_eq!(day.status, DayStatus::Working);
    assert_eq!(day.source, PresenceSource::Override);
    assert_eq!(day.assignment, ShiftAssignment::Single { shift: ShiftType::Day });
}

#[test]
fn assignment_less_override_toggles_the_natural_day() {
    let rep = Representative::new("ana", "Ana", ShiftType::Night).working_on(&[1]);
    let monday = Incident::new("o1", "ana", IncidentType::Override, d("2024-04-01"), at(9));
    let saturday = Incident::new("o2", "ana", IncidentType::Override, d("2024-04-06"), at(9));
    let f = facts(vec![rep], vec![monday, saturday]);

    let mon = day_for(&f, "ana", "2024-04-01");
    assert_eq!(mon.status, DayStatus::Off);
    assert_eq!(mon.assignment, ShiftAssignment::None);
    assert_eq!(mon.source, PresenceSource::Override);

    let sat = day_for(&f, "ana", "2024-04-06");
    assert_eq!(sat.status, DayStatus::Working);
    assert_eq!(sat.assignment, ShiftAssignment::Single { shift: ShiftType::Night });
}

#[test]
fn most_recent_override_wins() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let later = Incident::new("o2", "ana", IncidentType::Override, d("2024-04-01"), at(15))
        .with_assignment(ShiftAssignment::Single { shift: ShiftType::Night });
    let earlier = Incident::new("o1", "ana", IncidentType::Override, d("2024-04-01"), at(8))
        .with_assignment(ShiftAssignment::Both);
    let day = day_for(&facts(vec![rep], vec![later, earlier]), "ana", "2024-04-01");

    assert_eq!(day.assignment, ShiftAssignment::Single { shift: ShiftType::Night });
}

#[test]
fn legacy_swap_incident_sets_swap_source() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let swap = Incident::new("s1", "ana", IncidentType::Swap, d("2024-04-01"), at(9))
        .with_assignment(ShiftAssignment::Single { shift: ShiftType::Night });
    let day = day_for(&facts(vec![rep], vec![swap]), "ana", "2024-04-01");

    assert_eq!(day.source, PresenceSource::Swap);
    assert_eq!(day.badge, Some(Badge::Cubriendo));
    assert_eq!(day.appears_in_shifts, vec![ShiftType::Night]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Mix profiles and special schedules
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn weekday_mix_profile_counts_both_shifts_mon_to_thu() {
    let rep = Representative::new("mia", "Mia", ShiftType::Day)
        .working_on(&[1, 3, 4, 5])
        .off_on(&[2])
        .with_mix_profile(MixProfileType::Weekday);
    let f = facts(vec![rep], vec![]);

    assert_eq!(day_for(&f, "mia", "2024-04-01").assignment, ShiftAssignment::Both);
    assert_eq!(day_for(&f, "mia", "2024-04-04").assignment, ShiftAssignment::Both);
    assert_eq!(
        day_for(&f, "mia", "2024-04-05").assignment,
        ShiftAssignment::Single { shift: ShiftType::Day }
    );
    // Explicit OFF on a mixed weekday still wins.
    let tue = day_for(&f, "mia", "2024-04-02");
    assert_eq!(tue.assignment, ShiftAssignment::None);
    assert_eq!(tue.status, DayStatus::Off);
}

#[test]
fn override_both_beats_mix_eligibility() {
    let rep = Representative::new("mia", "Mia", ShiftType::Day)
        .working_on(&[5])
        .with_mix_profile(MixProfileType::Weekday);
    let over = Incident::new("o1", "mia", IncidentType::Override, d("2024-04-05"), at(9))
        .with_assignment(ShiftAssignment::Both);
    let day = day_for(&facts(vec![rep], vec![over]), "mia", "2024-04-05");

    assert_eq!(day.assignment, ShiftAssignment::Both);
    assert_eq!(day.source, PresenceSource::Override);
}

#[test]
fn individual_special_schedule_overrides_global() {
    let ana = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[3]);
    let bea = Representative::new("bea", "Bea", ShiftType::Day).working_on(&[3]);
    let mut f = facts(vec![ana, bea], vec![]);
    f.special_schedules = vec![
        SpecialSchedule {
            id: "ind".into(),
            scope: SpecialScheduleScope::Individual,
            target_representative_id: Some("ana".into()),
            start_date: d("2024-04-03"),
            end_date: d("2024-04-03"),
            pattern: [(3, SpecialDayKind::Night)].into(),
            note: None,
        },
        SpecialSchedule {
            id: "glob".into(),
            scope: SpecialScheduleScope::Global,
            target_representative_id: None,
            start_date: d("2024-04-01"),
            end_date: d("2024-04-07"),
            pattern: [(3, SpecialDayKind::Off)].into(),
            note: Some("Cierre".into()),
        },
    ];

    let ana_day = day_for(&f, "ana", "2024-04-03");
    assert_eq!(ana_day.assignment, ShiftAssignment::Single { shift: ShiftType::Night });
    assert_eq!(ana_day.source, PresenceSource::Base);

    let bea_day = day_for(&f, "bea", "2024-04-03");
    assert_eq!(bea_day.assignment, ShiftAssignment::None);
    assert_eq!(bea_day.status, DayStatus::Off);
}

#[test]
fn direct_resolution_keeps_special_source() {
    let rep = Representative::new("ana", "Ana", ShiftType::Day).working_on(&[1]);
    let special = SpecialSchedule {
        id: "s".into(),
        scope: SpecialScheduleScope::Global,
        target_representative_id: None,
        start_date: d("2024-04-01"),
        end_date: d("2024-04-01"),
        pattern: [(1, SpecialDayKind::Mixto)].into(),
        note: None,
    };
    let adapter = PatternScheduleAdapter::new(PlannerConfig::default_test().mix_profiles);
    let out = resolve_day(
        &DayContext {
            representative: &rep,
            date: d("2024-04-01"),
            incidents: &[],
            special_schedules: &[&special],
            coverage: None,
        },
        &adapter,
    );

    assert_eq!(out.plan.source, PlanSource::Special);
    assert_eq!(out.plan.assignment, ShiftAssignment::Both);
    assert_eq!(out.reality.status, DayStatus::Working);
    assert_eq!(out.computed.display.appears_in_shifts, vec![ShiftType::Day, ShiftType::Night]);
}
