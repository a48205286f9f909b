//! Roster assignment (output) model.
//!
//! An assignment is the unit of generated output: one crew member occupying
//! one time window, either flying, on ground duty, or resting. The complete
//! generation result pairs the assignment list with the violations
//! encountered while producing it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::CrewRole;

/// Kind of roster event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Flight,
    Off,
    OfficeDuty,
    Standby,
    Rest,
}

impl EventType {
    /// Whether this event counts toward duty-hour limits.
    ///
    /// Only flights and office duty are duty; standby and rest are not.
    #[inline]
    pub fn is_duty(&self) -> bool {
        matches!(self, EventType::Flight | EventType::OfficeDuty)
    }
}

/// Position a crew member is assigned to on a flight.
///
/// Distinct from [`CrewRole`]: both cabin positions draw from the same
/// cabin-crew pool and differ only in the label stamped on the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Captain,
    FirstOfficer,
    SeniorCabinCrew,
    CabinCrew,
}

impl Position {
    /// The crew role pool this position is filled from.
    pub fn required_role(&self) -> CrewRole {
        match self {
            Position::Captain => CrewRole::Captain,
            Position::FirstOfficer => CrewRole::FirstOfficer,
            Position::SeniorCabinCrew | Position::CabinCrew => CrewRole::CabinCrew,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Captain => "Captain",
            Position::FirstOfficer => "First Officer",
            Position::SeniorCabinCrew => "Senior Cabin Crew",
            Position::CabinCrew => "Cabin Crew",
        }
    }

    /// Plural label for coverage-shortfall reports.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Position::Captain => "Captains",
            Position::FirstOfficer => "First Officers",
            Position::SeniorCabinCrew => "Senior Cabin Crew",
            Position::CabinCrew => "Cabin Crew",
        }
    }
}

/// A single generated roster entry.
///
/// Invariant: `end > start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterAssignment {
    /// Assigned crew member.
    pub crew_member_id: String,
    /// Kind of event.
    pub event_type: EventType,
    /// Absolute start instant.
    pub start: DateTime<Utc>,
    /// Absolute end instant.
    pub end: DateTime<Utc>,
    /// Flight number, for flight events.
    pub flight_number: Option<String>,
    /// Assigned position, for flight events.
    pub position: Option<Position>,
}

impl RosterAssignment {
    /// Creates a flight assignment.
    pub fn flight(
        crew_member_id: impl Into<String>,
        flight_number: impl Into<String>,
        position: Position,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            crew_member_id: crew_member_id.into(),
            event_type: EventType::Flight,
            start,
            end,
            flight_number: Some(flight_number.into()),
            position: Some(position),
        }
    }

    /// Creates an off-day event.
    pub fn off(crew_member_id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::plain(crew_member_id, EventType::Off, start, end)
    }

    /// Creates an office-duty event.
    pub fn office_duty(
        crew_member_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self::plain(crew_member_id, EventType::OfficeDuty, start, end)
    }

    /// Creates a non-flight event of the given type.
    pub fn plain(
        crew_member_id: impl Into<String>,
        event_type: EventType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            crew_member_id: crew_member_id.into(),
            event_type,
            start,
            end,
            flight_number: None,
            position: None,
        }
    }

    /// Event duration in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }

    /// Whether this event starts on the given calendar day.
    #[inline]
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start.date_naive() == date
    }
}

/// Complete result of one generation run.
///
/// Violations are deduplicated, first-occurrence order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedRoster {
    /// Every assignment produced (flights and fillers).
    pub assignments: Vec<RosterAssignment>,
    /// Human-readable compliance and coverage violations.
    pub violations: Vec<String>,
}

impl GeneratedRoster {
    /// Whether generation completed without any violation.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// All assignments for a given crew member.
    pub fn assignments_for(&self, crew_member_id: &str) -> Vec<&RosterAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.crew_member_id == crew_member_id)
            .collect()
    }

    /// All flight assignments.
    pub fn flights(&self) -> Vec<&RosterAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.event_type == EventType::Flight)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_position_role_mapping() {
        assert_eq!(Position::Captain.required_role(), CrewRole::Captain);
        assert_eq!(Position::FirstOfficer.required_role(), CrewRole::FirstOfficer);
        assert_eq!(Position::SeniorCabinCrew.required_role(), CrewRole::CabinCrew);
        assert_eq!(Position::CabinCrew.required_role(), CrewRole::CabinCrew);
    }

    #[test]
    fn test_duty_classification() {
        assert!(EventType::Flight.is_duty());
        assert!(EventType::OfficeDuty.is_duty());
        assert!(!EventType::Off.is_duty());
        assert!(!EventType::Standby.is_duty());
        assert!(!EventType::Rest.is_duty());
    }

    #[test]
    fn test_duration_hours() {
        let a = RosterAssignment::flight(
            "C1",
            "BD 821",
            Position::Captain,
            at(2026, 3, 2, 18, 55),
            at(2026, 3, 2, 23, 25),
        );
        assert!((a.duration_hours() - 4.5).abs() < 1e-10);
    }

    #[test]
    fn test_starts_on() {
        let a = RosterAssignment::off("C1", at(2026, 3, 2, 0, 0), at(2026, 3, 2, 23, 59));
        assert!(a.starts_on(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()));
        assert!(!a.starts_on(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));
    }

    #[test]
    fn test_roster_queries() {
        let mut roster = GeneratedRoster::default();
        roster.assignments.push(RosterAssignment::flight(
            "C1",
            "BD 821",
            Position::Captain,
            at(2026, 3, 2, 18, 55),
            at(2026, 3, 2, 23, 25),
        ));
        roster
            .assignments
            .push(RosterAssignment::off("C2", at(2026, 3, 2, 0, 0), at(2026, 3, 2, 23, 59)));

        assert!(roster.is_clean());
        assert_eq!(roster.assignment_count(), 2);
        assert_eq!(roster.assignments_for("C1").len(), 1);
        assert_eq!(roster.flights().len(), 1);

        roster.violations.push("some violation".into());
        assert!(!roster.is_clean());
    }
}
