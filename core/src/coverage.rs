//! Coverage: a relational fact that one representative stands in for
//! another's slot.
//!
//! RULE: a coverage never mutates anyone's plan or reality. It is read
//! through `find_coverage_for_day` and cross-posted by the snapshot ledger.
//! Cancelling is a status transition; records are never deleted.

use crate::types::{CoverageId, RepresentativeId, ShiftType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coverage {
    pub id: CoverageId,
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub covered_rep_id: RepresentativeId,
    pub covering_rep_id: RepresentativeId,
    pub status: CoverageStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub note: Option<String>,
}

impl Coverage {
    pub fn is_active(&self) -> bool {
        self.status == CoverageStatus::Active
    }

    /// A cancelled copy of this record.
    pub fn cancel(&self) -> Coverage {
        Coverage {
            status: CoverageStatus::Cancelled,
            ..self.clone()
        }
    }
}

/// Cross-reference to the counterpart of a coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageRef {
    pub representative_id: RepresentativeId,
    pub shift: ShiftType,
    pub coverage_id: CoverageId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageLookup {
    pub is_covered: bool,
    pub is_covering: bool,
    pub covered_by: Option<CoverageRef>,
    pub covering: Option<CoverageRef>,
}

/// Active coverages touching `rep_id` on `date` (and `shift`, when given).
/// The first matching record in input order supplies each cross-reference.
pub fn find_coverage_for_day(
    rep_id: &str,
    date: NaiveDate,
    all_coverages: &[Coverage],
    shift: Option<ShiftType>,
) -> CoverageLookup {
    let relevant = all_coverages
        .iter()
        .filter(|c| c.is_active() && c.date == date)
        .filter(|c| shift.map_or(true, |s| c.shift == s));

    let mut lookup = CoverageLookup::default();
    for coverage in relevant {
        if coverage.covered_rep_id == rep_id && lookup.covered_by.is_none() {
            lookup.is_covered = true;
            lookup.covered_by = Some(CoverageRef {
                representative_id: coverage.covering_rep_id.clone(),
                shift: coverage.shift,
                coverage_id: coverage.id.clone(),
            });
        }
        if coverage.covering_rep_id == rep_id && lookup.covering.is_none() {
            lookup.is_covering = true;
            lookup.covering = Some(CoverageRef {
                representative_id: coverage.covered_rep_id.clone(),
                shift: coverage.shift,
                coverage_id: coverage.id.clone(),
            });
        }
    }
    lookup
}
