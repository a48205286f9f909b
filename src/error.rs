//! Engine error taxonomy.
//!
//! Only unrecoverable input and configuration problems surface as errors;
//! coverage shortfalls and compliance failures are report-only violation
//! strings carried in the generation result.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// Fail-fast errors raised before or while generating a roster.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The requested period is inverted.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Generation requires at least one crew member.
    #[error("no crew members available for roster generation")]
    EmptyCrewPool,

    /// Fetching inputs from the backing store failed.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}
