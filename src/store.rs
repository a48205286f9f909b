//! Persistence boundary.
//!
//! The engine never persists anything itself; callers reach storage through
//! the [`RosterStore`] contract. Listings are ordered (crew by name, records
//! by start time) and filterable by crew member, matching what the roster
//! grid needs.
//!
//! Applying a generated roster is an at-least-effort batch: one record at a
//! time, per-item error isolation, no rollback. The caller reads the
//! [`ApplyReport`] and decides what to do about failures.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{CrewEvent, CrewMember, FlightRecord, RosterAssignment};

/// Errors raised by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with the given id exists.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record with the given id already exists.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),

    /// The backend itself failed.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// CRUD contract over crew, flight records, and crew events.
pub trait RosterStore {
    /// All crew members, ordered by name.
    fn list_crew_members(&self) -> Result<Vec<CrewMember>, StoreError>;

    /// Flight records ordered by start time, optionally filtered to one
    /// crew member.
    fn list_flight_records(
        &self,
        crew_member_id: Option<&str>,
    ) -> Result<Vec<FlightRecord>, StoreError>;

    /// Crew events ordered by start time, optionally filtered to one crew
    /// member.
    fn list_crew_events(&self, crew_member_id: Option<&str>)
        -> Result<Vec<CrewEvent>, StoreError>;

    /// Adds a crew member.
    fn add_crew_member(&mut self, member: CrewMember) -> Result<(), StoreError>;

    /// Adds a flight record, assigning an id when the record carries none.
    /// Returns the stored id.
    fn add_flight_record(&mut self, record: FlightRecord) -> Result<String, StoreError>;

    /// Adds a crew event, assigning an id when the event carries none.
    /// Returns the stored id.
    fn add_crew_event(&mut self, event: CrewEvent) -> Result<String, StoreError>;

    /// Deletes a flight record by id.
    fn delete_flight_record(&mut self, id: &str) -> Result<(), StoreError>;

    /// Deletes a crew event by id.
    fn delete_crew_event(&mut self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    crew: Vec<CrewMember>,
    flights: Vec<FlightRecord>,
    events: Vec<CrewEvent>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

impl RosterStore for MemoryStore {
    fn list_crew_members(&self) -> Result<Vec<CrewMember>, StoreError> {
        let mut crew = self.crew.clone();
        crew.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(crew)
    }

    fn list_flight_records(
        &self,
        crew_member_id: Option<&str>,
    ) -> Result<Vec<FlightRecord>, StoreError> {
        let mut records: Vec<FlightRecord> = self
            .flights
            .iter()
            .filter(|r| crew_member_id.is_none_or(|id| r.crew_member_id == id))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.start);
        Ok(records)
    }

    fn list_crew_events(
        &self,
        crew_member_id: Option<&str>,
    ) -> Result<Vec<CrewEvent>, StoreError> {
        let mut events: Vec<CrewEvent> = self
            .events
            .iter()
            .filter(|e| crew_member_id.is_none_or(|id| e.crew_member_id == id))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    fn add_crew_member(&mut self, member: CrewMember) -> Result<(), StoreError> {
        if self.crew.iter().any(|c| c.id == member.id) {
            return Err(StoreError::DuplicateId(member.id));
        }
        self.crew.push(member);
        Ok(())
    }

    fn add_flight_record(&mut self, mut record: FlightRecord) -> Result<String, StoreError> {
        if record.id.is_empty() {
            record.id = self.assign_id("F");
        } else if self.flights.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        let id = record.id.clone();
        self.flights.push(record);
        Ok(id)
    }

    fn add_crew_event(&mut self, mut event: CrewEvent) -> Result<String, StoreError> {
        if event.id.is_empty() {
            event.id = self.assign_id("E");
        } else if self.events.iter().any(|e| e.id == event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        let id = event.id.clone();
        self.events.push(event);
        Ok(id)
    }

    fn delete_flight_record(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.flights.len();
        self.flights.retain(|r| r.id != id);
        if self.flights.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_crew_event(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Outcome of applying a generated roster to a store.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Assignments persisted successfully.
    pub applied: usize,
    /// Failed assignments: index into the input slice plus the error.
    pub failed: Vec<(usize, StoreError)>,
}

impl ApplyReport {
    /// Whether every assignment was persisted.
    pub fn all_applied(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Persists generated assignments one at a time.
///
/// A failure on one assignment never aborts the rest; already-applied
/// records are never rolled back.
pub fn apply_assignments<S: RosterStore>(
    store: &mut S,
    assignments: &[RosterAssignment],
) -> ApplyReport {
    let mut report = ApplyReport::default();
    for (index, assignment) in assignments.iter().enumerate() {
        match store.add_crew_event(assignment.to_crew_event()) {
            Ok(_) => report.applied += 1,
            Err(err) => {
                log::warn!("failed to apply assignment {index}: {err}");
                report.failed.push((index, err));
            }
        }
    }
    report
}

/// Loads the full assignment history for the engine.
///
/// Merges flight records and crew events into engine-consumable
/// assignments, ordered by start time.
pub fn load_history<S: RosterStore>(
    store: &S,
    crew_member_id: Option<&str>,
) -> Result<Vec<RosterAssignment>, StoreError> {
    let mut history: Vec<RosterAssignment> = store
        .list_flight_records(crew_member_id)?
        .iter()
        .map(RosterAssignment::from)
        .collect();
    history.extend(
        store
            .list_crew_events(crew_member_id)?
            .iter()
            .map(RosterAssignment::from),
    );
    history.sort_by_key(|a| a.start);
    Ok(history)
}
