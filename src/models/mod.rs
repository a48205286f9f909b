//! Rostering domain models.
//!
//! Provides the core data types for crew, stored history, and generated
//! assignments.
//!
//! # Lifecycles
//!
//! | Type | Lifecycle |
//! |------|-----------|
//! | `CrewMember` | Fetched fresh per generation run, read-only |
//! | `FlightRecord` / `CrewEvent` | Stored history, converted into assignments |
//! | `RosterAssignment` | Created in-memory during generation |
//! | `GeneratedRoster` | Returned to the caller, optionally persisted |

mod assignment;
mod crew;
mod event;

pub use assignment::{EventType, GeneratedRoster, Position, RosterAssignment};
pub use crew::{CrewMember, CrewRole};
pub use event::{CrewEvent, CrewEventKind, FlightKind, FlightRecord, FlightStatus};
