use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid week: expected exactly 7 days, got {days}")]
    InvalidWeek { days: usize },

    #[error("Week days are not consecutive: expected {expected}, got {actual}")]
    NonConsecutiveWeek { expected: NaiveDate, actual: NaiveDate },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
