//! Input validation for roster generation.
//!
//! Checks structural integrity of the crew pool and timetable before
//! generation. Detects:
//! - Duplicate crew member IDs
//! - Duplicate flight numbers
//! - Non-positive block durations
//! - Timetable entries requiring no crew at all
//!
//! All problems are accumulated and returned together.

use std::collections::HashSet;

use crate::models::CrewMember;
use crate::timetable::Timetable;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two crew members share the same ID.
    DuplicateCrewId,
    /// Two timetable entries share the same flight number.
    DuplicateFlightNumber,
    /// A timetable entry has a zero or negative block duration.
    NonPositiveDuration,
    /// A timetable entry requires no crew in any position.
    EmptyQuota,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates generation inputs.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_inputs(crew: &[CrewMember], timetable: &Timetable) -> ValidationResult {
    let mut errors = Vec::new();

    let mut crew_ids = HashSet::new();
    for member in crew {
        if !crew_ids.insert(member.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCrewId,
                format!("Duplicate crew member ID: {}", member.id),
            ));
        }
    }

    let entries = timetable.entries();
    let mut flight_numbers = HashSet::new();
    for entry in &entries {
        if !flight_numbers.insert(entry.flight_number.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateFlightNumber,
                format!("Duplicate flight number: {}", entry.flight_number),
            ));
        }

        if entry.duration_hours <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!(
                    "Flight {} has non-positive duration {}h",
                    entry.flight_number, entry.duration_hours
                ),
            ));
        }

        if entry.crew_requirement.total() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyQuota,
                format!("Flight {} requires no crew", entry.flight_number),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
