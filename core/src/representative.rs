//! Representatives and their recurring base pattern.

use crate::types::{DayStatus, RepresentativeId, ShiftType, WeekdayIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MixProfileType {
    Weekday,
    Weekend,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MixProfile {
    #[serde(rename = "type")]
    pub profile_type: MixProfileType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Representative {
    pub id: RepresentativeId,
    pub name: String,
    pub base_shift: ShiftType,
    /// Weekday (0 = Sunday) -> WORKING | OFF. A missing entry means OFF.
    #[serde(default)]
    pub base_schedule: BTreeMap<WeekdayIndex, DayStatus>,
    #[serde(default)]
    pub mix_profile: Option<MixProfile>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Representative {
    pub fn new(id: &str, name: &str, base_shift: ShiftType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_shift,
            base_schedule: BTreeMap::new(),
            mix_profile: None,
            is_active: true,
        }
    }

    /// Builder helper: mark the given weekdays WORKING.
    pub fn working_on(mut self, weekdays: &[WeekdayIndex]) -> Self {
        for day in weekdays {
            self.base_schedule.insert(*day, DayStatus::Working);
        }
        self
    }

    /// Builder helper: mark the given weekdays explicitly OFF.
    pub fn off_on(mut self, weekdays: &[WeekdayIndex]) -> Self {
        for day in weekdays {
            self.base_schedule.insert(*day, DayStatus::Off);
        }
        self
    }

    pub fn with_mix_profile(mut self, profile_type: MixProfileType) -> Self {
        self.mix_profile = Some(MixProfile { profile_type });
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn base_status(&self, weekday: WeekdayIndex) -> DayStatus {
        self.base_schedule
            .get(&weekday)
            .copied()
            .unwrap_or(DayStatus::Off)
    }

    pub fn works_on(&self, weekday: WeekdayIndex) -> bool {
        self.base_status(weekday) == DayStatus::Working
    }
}

/// Look up a representative by id.
pub fn find_representative<'a>(
    representatives: &'a [Representative],
    id: &str,
) -> Option<&'a Representative> {
    representatives.iter().find(|r| r.id == id)
}
