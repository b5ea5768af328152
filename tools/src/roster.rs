//! Deterministic synthetic roster for dry runs without an input file.
//!
//! Same seed and week always yield the same facts. All draws come from a
//! single Pcg64Mcg stream, consumed in a fixed order.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use shiftdesk_core::{
    coverage::{Coverage, CoverageStatus},
    engine::PlanningFacts,
    incident::{Incident, IncidentType},
    representative::{MixProfileType, Representative},
    types::{ShiftAssignment, ShiftType},
};

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bea", "Carla", "Diego", "Elena", "Fabián", "Gloria", "Hugo", "Inés", "Javier",
    "Karen", "Luis", "Marta", "Nicolás", "Olga", "Pablo", "Rocío", "Sergio", "Tania", "Vicente",
];

const LAST_NAMES: &[&str] = &[
    "Álvarez", "Benítez", "Castro", "Domínguez", "Espinoza", "Figueroa", "Gómez", "Herrera",
    "Ibarra", "Jiménez", "López", "Morales", "Núñez", "Ortega", "Pérez", "Rojas",
];

/// Working days drawn per agent, out of the 7-day week.
const WORKDAYS_PER_AGENT: usize = 5;

pub fn synthetic_facts(seed: u64, agents: usize, week_start: NaiveDate) -> PlanningFacts {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let created = week_start
        .pred_opt()
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap_or(NaiveDateTime::MIN);

    let representatives: Vec<Representative> = (0..agents)
        .map(|i| random_representative(&mut rng, i))
        .collect();

    let mut incidents = Vec::new();
    let mut coverages = Vec::new();
    for (i, rep) in representatives.iter().enumerate() {
        let offset = Duration::days(rng.gen_range(0..7));
        let date = week_start + offset;
        let roll: f64 = rng.gen();
        let id = format!("inc-{i:03}");
        let incident = if roll < 0.05 {
            Some(
                Incident::new(&id, &rep.id, IncidentType::Vacaciones, date, created)
                    .with_duration(rng.gen_range(1..=5)),
            )
        } else if roll < 0.08 {
            Some(Incident::new(&id, &rep.id, IncidentType::Licencia, date, created))
        } else if roll < 0.18 {
            Some(Incident::new(&id, &rep.id, IncidentType::Ausencia, date, created))
        } else if roll < 0.25 {
            let assignment = if rng.gen_bool(0.5) {
                ShiftAssignment::Both
            } else {
                ShiftAssignment::Single { shift: rep.base_shift }
            };
            Some(Incident::new(&id, &rep.id, IncidentType::Override, date, created).with_assignment(assignment))
        } else {
            None
        };
        incidents.extend(incident);

        if agents > 1 && rng.gen_bool(0.1) {
            let other = &representatives[(i + 1 + rng.gen_range(0..agents - 1)) % agents];
            coverages.push(Coverage {
                id: format!("cov-{i:03}"),
                date,
                shift: rep.base_shift,
                covered_rep_id: rep.id.clone(),
                covering_rep_id: other.id.clone(),
                status: CoverageStatus::Active,
                created_at: created,
                note: None,
            });
        }
    }

    PlanningFacts {
        representatives,
        incidents,
        coverages,
        ..Default::default()
    }
}

fn random_representative(rng: &mut Pcg64Mcg, index: usize) -> Representative {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Agente");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("");
    let shift = if rng.gen_bool(0.5) { ShiftType::Day } else { ShiftType::Night };

    let mut weekdays: Vec<u8> = (0..7).collect();
    weekdays.shuffle(rng);
    weekdays.truncate(WORKDAYS_PER_AGENT);

    let rep = Representative::new(&format!("rep-{index:03}"), &format!("{first} {last}"), shift)
        .working_on(&weekdays);
    match rng.gen_range(0..10) {
        0 => rep.with_mix_profile(MixProfileType::Weekday),
        1 => rep.with_mix_profile(MixProfileType::Weekend),
        _ => rep,
    }
}
