//! Special schedules and the adapter that classifies a representative's day.
//!
//! The day resolution engine never looks inside a special schedule: it asks
//! a `SpecialScheduleAdapter` for a `ScheduleResolution` and maps that to a
//! plan. `PatternScheduleAdapter` is the default implementation.

use crate::{
    calendar::weekday_index,
    config::MixProfileConfig,
    representative::Representative,
    types::{DayStatus, RepresentativeId, ShiftType, WeekdayIndex},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialScheduleScope {
    Global,
    Individual,
}

/// One weekday entry of a special schedule pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialDayKind {
    Off,
    Day,
    Night,
    Mixto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialSchedule {
    pub id: String,
    pub scope: SpecialScheduleScope,
    #[serde(default)]
    pub target_representative_id: Option<RepresentativeId>,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub pattern: BTreeMap<WeekdayIndex, SpecialDayKind>,
    #[serde(default)]
    pub note: Option<String>,
}

impl SpecialSchedule {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

// ── Adapter contract ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedDayKind {
    Off,
    Mixto,
    Override,
    Base,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleSource {
    Base,
    Special,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleResolution {
    #[serde(rename = "type")]
    pub kind: ResolvedDayKind,
    pub shift: Option<ShiftType>,
    pub source: Option<ScheduleSource>,
}

impl ScheduleResolution {
    pub fn is_special(&self) -> bool {
        self.source == Some(ScheduleSource::Special)
    }
}

pub trait SpecialScheduleAdapter {
    /// `special_schedules` are the GLOBAL schedules followed by the
    /// representative's INDIVIDUAL ones.
    fn resolve(
        &self,
        representative: &Representative,
        date: NaiveDate,
        base_schedule: &BTreeMap<WeekdayIndex, DayStatus>,
        special_schedules: &[&SpecialSchedule],
    ) -> ScheduleResolution;
}

/// Default adapter: last applicable special schedule, then the base
/// schedule, then the mix profile.
pub struct PatternScheduleAdapter {
    mix_profiles: MixProfileConfig,
}

impl PatternScheduleAdapter {
    pub fn new(mix_profiles: MixProfileConfig) -> Self {
        Self { mix_profiles }
    }
}

impl SpecialScheduleAdapter for PatternScheduleAdapter {
    fn resolve(
        &self,
        representative: &Representative,
        date: NaiveDate,
        base_schedule: &BTreeMap<WeekdayIndex, DayStatus>,
        special_schedules: &[&SpecialSchedule],
    ) -> ScheduleResolution {
        let weekday = weekday_index(date);

        let special = special_schedules
            .iter()
            .rev()
            .filter(|s| s.covers(date))
            .find_map(|s| s.pattern.get(&weekday));
        if let Some(kind) = special {
            let source = Some(ScheduleSource::Special);
            return match kind {
                SpecialDayKind::Off   => ScheduleResolution { kind: ResolvedDayKind::Off, shift: None, source },
                SpecialDayKind::Mixto => ScheduleResolution { kind: ResolvedDayKind::Mixto, shift: None, source },
                SpecialDayKind::Day   => ScheduleResolution { kind: ResolvedDayKind::Override, shift: Some(ShiftType::Day), source },
                SpecialDayKind::Night => ScheduleResolution { kind: ResolvedDayKind::Override, shift: Some(ShiftType::Night), source },
            };
        }

        let source = Some(ScheduleSource::Base);

        // An explicit (or implicit) OFF is never overridden by a mix profile.
        if base_schedule.get(&weekday) != Some(&DayStatus::Working) {
            return ScheduleResolution { kind: ResolvedDayKind::Off, shift: None, source };
        }

        if let Some(profile) = representative.mix_profile {
            if self.mix_profiles.applies(profile.profile_type, weekday) {
                return ScheduleResolution { kind: ResolvedDayKind::Mixto, shift: None, source };
            }
        }

        ScheduleResolution {
            kind: ResolvedDayKind::Base,
            shift: Some(representative.base_shift),
            source,
        }
    }
}

// ── Partitioning ─────────────────────────────────────────────────────────────

/// Special schedules split by scope: GLOBAL ones apply to everyone,
/// INDIVIDUAL ones are keyed by their target representative.
pub struct PartitionedSchedules<'a> {
    global: Vec<&'a SpecialSchedule>,
    individual: HashMap<&'a str, Vec<&'a SpecialSchedule>>,
}

impl<'a> PartitionedSchedules<'a> {
    pub fn new(schedules: &'a [SpecialSchedule]) -> Self {
        let mut global = Vec::new();
        let mut individual: HashMap<&'a str, Vec<&'a SpecialSchedule>> = HashMap::new();
        for schedule in schedules {
            match (schedule.scope, schedule.target_representative_id.as_deref()) {
                (SpecialScheduleScope::Global, _) => global.push(schedule),
                (SpecialScheduleScope::Individual, Some(target)) => {
                    individual.entry(target).or_default().push(schedule)
                }
                (SpecialScheduleScope::Individual, None) => {
                    log::warn!("special schedule {} is INDIVIDUAL without a target; ignored", schedule.id);
                }
            }
        }
        Self { global, individual }
    }

    /// GLOBAL followed by the representative's INDIVIDUAL schedules.
    pub fn for_representative(&self, representative_id: &str) -> Vec<&'a SpecialSchedule> {
        let mut merged = self.global.clone();
        if let Some(own) = self.individual.get(representative_id) {
            merged.extend(own.iter().copied());
        }
        merged
    }
}
