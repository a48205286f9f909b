//! Crew member model.
//!
//! Crew members are the people assigned to flights: captains, first
//! officers, and cabin crew. Each carries cumulative hour counters that the
//! allocator reads for load balancing; the engine never mutates them.

use serde::{Deserialize, Serialize};

/// Flight-deck or cabin role of a crew member.
///
/// Determines which assignment positions a member can fill: both cabin-crew
/// positions (senior and regular) draw from the [`CrewRole::CabinCrew`] pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewRole {
    Captain,
    FirstOfficer,
    CabinCrew,
}

impl CrewRole {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            CrewRole::Captain => "Captain",
            CrewRole::FirstOfficer => "First Officer",
            CrewRole::CabinCrew => "Cabin Crew",
        }
    }
}

/// A rosterable crew member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    /// Unique identifier.
    pub id: String,
    /// Full name, used in violation reports.
    pub name: String,
    /// Role pool this member belongs to.
    pub role: CrewRole,
    /// Career flight hours. The allocator prefers the least-flown member.
    pub total_flight_hours: f64,
    /// Career duty hours (flight + ground duty).
    pub total_duty_hours: f64,
    /// Baseline rest credit carried into the planning period.
    pub rest_hours: f64,
    /// Certification tags (type ratings, route qualifications).
    pub certifications: Vec<String>,
}

impl CrewMember {
    /// Creates a crew member with zeroed counters.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: CrewRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            total_flight_hours: 0.0,
            total_duty_hours: 0.0,
            rest_hours: 0.0,
            certifications: Vec::new(),
        }
    }

    /// Sets cumulative flight hours.
    pub fn with_flight_hours(mut self, hours: f64) -> Self {
        self.total_flight_hours = hours;
        self
    }

    /// Sets cumulative duty hours.
    pub fn with_duty_hours(mut self, hours: f64) -> Self {
        self.total_duty_hours = hours;
        self
    }

    /// Sets the baseline rest credit.
    pub fn with_rest_hours(mut self, hours: f64) -> Self {
        self.rest_hours = hours;
        self
    }

    /// Adds a certification tag.
    pub fn with_certification(mut self, tag: impl Into<String>) -> Self {
        self.certifications.push(tag.into());
        self
    }

    /// Whether this member holds a given certification.
    pub fn has_certification(&self, tag: &str) -> bool {
        self.certifications.iter().any(|c| c == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_builder() {
        let c = CrewMember::new("C1", "A. Perera", CrewRole::Captain)
            .with_flight_hours(4200.0)
            .with_duty_hours(6100.0)
            .with_rest_hours(36.0)
            .with_certification("A320")
            .with_certification("ETOPS");

        assert_eq!(c.id, "C1");
        assert_eq!(c.role, CrewRole::Captain);
        assert!((c.total_flight_hours - 4200.0).abs() < 1e-10);
        assert!(c.has_certification("A320"));
        assert!(!c.has_certification("B777"));
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(CrewRole::Captain.label(), "Captain");
        assert_eq!(CrewRole::FirstOfficer.label(), "First Officer");
        assert_eq!(CrewRole::CabinCrew.label(), "Cabin Crew");
    }

    #[test]
    fn test_serde_round_trip() {
        let c = CrewMember::new("C2", "N. Silva", CrewRole::CabinCrew).with_flight_hours(900.5);
        let json = serde_json::to_string(&c).unwrap();
        let back: CrewMember = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "C2");
        assert_eq!(back.role, CrewRole::CabinCrew);
        assert!((back.total_flight_hours - 900.5).abs() < 1e-10);
    }
}
