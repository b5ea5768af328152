//! Shared primitive types used across the entire planner.

use serde::{Deserialize, Serialize};

/// A stable, unique identifier for a representative.
pub type RepresentativeId = String;

/// Identifier of an incident record.
pub type IncidentId = String;

/// Identifier of a coverage record.
pub type CoverageId = String;

/// Weekday index, 0 = Sunday .. 6 = Saturday.
pub type WeekdayIndex = u8;

/// One of the two shifts a call-center day is split into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Day,
    Night,
}

impl ShiftType {
    pub const ALL: [ShiftType; 2] = [ShiftType::Day, ShiftType::Night];
}

/// Whether a representative works on a given day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Working,
    Off,
}

/// What a representative is assigned to on one day.
///
/// Slot weight: NONE = 0, SINGLE = 1, BOTH = 2.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftAssignment {
    None,
    Single { shift: ShiftType },
    Both,
}

impl ShiftAssignment {
    /// Shifts this assignment places the representative on, in DAY, NIGHT order.
    pub fn shifts(&self) -> Vec<ShiftType> {
        match self {
            ShiftAssignment::None => vec![],
            ShiftAssignment::Single { shift } => vec![*shift],
            ShiftAssignment::Both => ShiftType::ALL.to_vec(),
        }
    }

    pub fn slot_count(&self) -> u32 {
        match self {
            ShiftAssignment::None => 0,
            ShiftAssignment::Single { .. } => 1,
            ShiftAssignment::Both => 2,
        }
    }

    pub fn covers(&self, shift: ShiftType) -> bool {
        match self {
            ShiftAssignment::None => false,
            ShiftAssignment::Single { shift: s } => *s == shift,
            ShiftAssignment::Both => true,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ShiftAssignment::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_weights() {
        assert_eq!(ShiftAssignment::None.slot_count(), 0);
        assert_eq!(ShiftAssignment::Single { shift: ShiftType::Night }.slot_count(), 1);
        assert_eq!(ShiftAssignment::Both.slot_count(), 2);
        assert_eq!(ShiftAssignment::Both.shifts(), vec![ShiftType::Day, ShiftType::Night]);
    }

    #[test]
    fn assignment_serializes_with_domain_tokens() {
        let json = serde_json::to_string(&ShiftAssignment::Single { shift: ShiftType::Day }).unwrap();
        assert_eq!(json, r#"{"type":"SINGLE","shift":"DAY"}"#);
        let none: ShiftAssignment = serde_json::from_str(r#"{"type":"NONE"}"#).unwrap();
        assert!(none.is_none());
    }
}
