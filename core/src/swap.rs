//! Swap events: shift changes agreed between representatives that are
//! NOT baked into the weekly plan. Only the effective duty resolver and
//! the snapshot's swap-based slot lookup read them.

use crate::types::{RepresentativeId, ShiftType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapEvent {
    /// `to` works `from`'s shift; `from` is released from it.
    Cover {
        date: NaiveDate,
        shift: ShiftType,
        from_representative_id: RepresentativeId,
        to_representative_id: RepresentativeId,
    },
    /// An additional shift on top of whatever the representative has.
    Double {
        date: NaiveDate,
        shift: ShiftType,
        representative_id: RepresentativeId,
    },
    /// `from` gives up `from_shift` and takes `to_shift`; `to` does the reverse.
    Swap {
        date: NaiveDate,
        from_representative_id: RepresentativeId,
        from_shift: ShiftType,
        to_representative_id: RepresentativeId,
        to_shift: ShiftType,
    },
}

impl SwapEvent {
    pub fn date(&self) -> NaiveDate {
        match self {
            SwapEvent::Cover { date, .. }
            | SwapEvent::Double { date, .. }
            | SwapEvent::Swap { date, .. } => *date,
        }
    }

    pub fn involves(&self, representative_id: &str) -> bool {
        match self {
            SwapEvent::Cover { from_representative_id, to_representative_id, .. }
            | SwapEvent::Swap { from_representative_id, to_representative_id, .. } => {
                from_representative_id == representative_id || to_representative_id == representative_id
            }
            SwapEvent::Double { representative_id: rep, .. } => rep == representative_id,
        }
    }
}
