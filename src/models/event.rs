//! Stored history records.
//!
//! The backing store keeps two record kinds: completed or scheduled flight
//! legs (`FlightRecord`) and non-flight calendar events (`CrewEvent`). Both
//! convert into [`RosterAssignment`] so stored history can feed the rules
//! engine and allocator directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventType, RosterAssignment};

/// Classification of a stored flight leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightKind {
    Domestic,
    International,
    Charter,
}

/// Lifecycle status of a stored flight leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A stored flight assignment for one crew member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Record identifier (assigned by the store).
    pub id: String,
    /// Crew member this leg belongs to.
    pub crew_member_id: String,
    /// Flight number (e.g. "BD 821").
    pub flight_number: String,
    /// Route description (e.g. "Colombo - Dubai").
    pub route: String,
    /// Departure instant.
    pub start: DateTime<Utc>,
    /// Arrival instant.
    pub end: DateTime<Utc>,
    /// Block hours.
    pub duration_hours: f64,
    pub kind: FlightKind,
    pub status: FlightStatus,
}

/// Kind of a stored non-flight calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrewEventKind {
    Off,
    Rqf,
    OfficeDuty,
    Standby,
    Leave,
    Flight,
}

impl CrewEventKind {
    /// Maps the stored kind onto the engine's event taxonomy.
    ///
    /// Leave is duty-free and counts as off; RQF is a rest-qualifying
    /// event that does not count as an off day for cadence purposes.
    pub fn event_type(&self) -> EventType {
        match self {
            CrewEventKind::Off => EventType::Off,
            CrewEventKind::Leave => EventType::Off,
            CrewEventKind::Rqf => EventType::Rest,
            CrewEventKind::OfficeDuty => EventType::OfficeDuty,
            CrewEventKind::Standby => EventType::Standby,
            CrewEventKind::Flight => EventType::Flight,
        }
    }
}

/// A stored calendar event for one crew member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewEvent {
    /// Record identifier (assigned by the store).
    pub id: String,
    /// Crew member this event belongs to.
    pub crew_member_id: String,
    pub kind: CrewEventKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Free-form annotation (flight number and position for flight events).
    pub notes: Option<String>,
}

impl From<&FlightRecord> for RosterAssignment {
    fn from(record: &FlightRecord) -> Self {
        RosterAssignment {
            crew_member_id: record.crew_member_id.clone(),
            event_type: EventType::Flight,
            start: record.start,
            end: record.end,
            flight_number: Some(record.flight_number.clone()),
            position: None,
        }
    }
}

impl From<&CrewEvent> for RosterAssignment {
    fn from(event: &CrewEvent) -> Self {
        RosterAssignment {
            crew_member_id: event.crew_member_id.clone(),
            event_type: event.kind.event_type(),
            start: event.start,
            end: event.end,
            flight_number: None,
            position: None,
        }
    }
}

impl RosterAssignment {
    /// Converts a generated assignment into a storable calendar event.
    ///
    /// Flight events carry their flight number and position in the notes so
    /// the grid can render them without a join.
    pub fn to_crew_event(&self) -> CrewEvent {
        let kind = match self.event_type {
            EventType::Flight => CrewEventKind::Flight,
            EventType::Off => CrewEventKind::Off,
            EventType::OfficeDuty => CrewEventKind::OfficeDuty,
            EventType::Standby => CrewEventKind::Standby,
            EventType::Rest => CrewEventKind::Rqf,
        };
        let notes = match (&self.flight_number, self.position) {
            (Some(number), Some(position)) => Some(format!("{number} ({})", position.label())),
            (Some(number), None) => Some(number.clone()),
            _ => None,
        };
        CrewEvent {
            id: String::new(),
            crew_member_id: self.crew_member_id.clone(),
            kind,
            start: self.start,
            end: self.end,
            notes,
        }
    }
}
