//! Shift planning core for call-center representatives.
//!
//! Resolves each representative's day from base pattern, special
//! schedules and incidents, builds the weekly plan, answers effective
//! duty queries over swap events, and reconciles coverage in a
//! slot-level weekly ledger.

pub mod calendar;
pub mod config;
pub mod coverage;
pub mod day_metrics;
pub mod day_resolution;
pub mod effective_duty;
pub mod engine;
pub mod error;
pub mod incident;
pub mod representative;
pub mod snapshot;
pub mod special_schedule;
pub mod swap;
pub mod types;
pub mod weekly_metrics;
pub mod weekly_plan;
