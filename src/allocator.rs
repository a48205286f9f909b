//! Greedy per-flight crew allocation.
//!
//! For a single flight occurrence, picks available crew per required
//! position, preferring the least-flown members (load balancing) and
//! validating every pick against the compliance rules before committing.
//!
//! # Algorithm
//!
//! 1. Compute the occurrence's absolute duty window.
//! 2. Process positions in fixed priority order: Captain, First Officer,
//!    Senior Cabin Crew, Cabin Crew.
//! 3. For each position, collect available members of the matching role —
//!    no existing or just-added assignment closer to the new window than the
//!    rest buffer — sorted ascending by career flight hours.
//! 4. Validate each pick; on failure, record the violation and try the next
//!    available candidate once, then leave the slot unfilled.
//! 5. Report a coverage violation for any position left short.
//!
//! Greedy with no backtracking across flights; global optimality is not
//! attempted.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;

use crate::models::{CrewMember, CrewRole, Position, RosterAssignment};
use crate::rules::{RulesEngine, ValidationContext};
use crate::timetable::FlightScheduleEntry;

/// Position fill order: flight deck first, then cabin seniority.
const POSITION_PRIORITY: [Position; 4] = [
    Position::Captain,
    Position::FirstOfficer,
    Position::SeniorCabinCrew,
    Position::CabinCrew,
];

/// Result of allocating one flight occurrence.
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    /// Committed assignments, in position priority order.
    pub assignments: Vec<RosterAssignment>,
    /// Compliance and coverage violations encountered.
    pub violations: Vec<String>,
}

/// Assigns crew to single flight occurrences.
///
/// Compliance validation is on by default and can be disabled to reproduce
/// unvalidated allocation.
#[derive(Debug, Clone)]
pub struct CrewAllocator {
    rest_buffer: Duration,
    rules: Option<RulesEngine>,
}

impl CrewAllocator {
    /// Creates an allocator with a 12-hour rest buffer and the standard
    /// rule catalog.
    pub fn new() -> Self {
        Self {
            rest_buffer: Duration::hours(12),
            rules: Some(RulesEngine::standard()),
        }
    }

    /// Overrides the rest buffer between assignments.
    pub fn with_rest_buffer(mut self, buffer: Duration) -> Self {
        self.rest_buffer = buffer;
        self
    }

    /// Replaces the rule catalog used for pick validation.
    pub fn with_rules(mut self, rules: RulesEngine) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Disables compliance validation of picks.
    pub fn without_validation(mut self) -> Self {
        self.rules = None;
        self
    }

    /// The rest buffer in effect.
    pub fn rest_buffer(&self) -> Duration {
        self.rest_buffer
    }

    /// Allocates crew for one occurrence of `entry` on `date`.
    ///
    /// `existing` is the union of stored history and assignments generated
    /// earlier in the run; picks never conflict with it or with each other.
    pub fn allocate(
        &self,
        entry: &FlightScheduleEntry,
        date: NaiveDate,
        crew: &[CrewMember],
        existing: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> AllocationOutcome {
        let (start, end) = entry.window(date);
        let mut outcome = AllocationOutcome::default();
        // Running view: existing history plus picks committed below.
        let mut working: Vec<RosterAssignment> = existing.to_vec();

        for position in POSITION_PRIORITY {
            let required = entry.crew_requirement.for_position(position);
            if required == 0 {
                continue;
            }

            let available = self.available_crew(crew, position.required_role(), start, end, &working);
            debug!(
                "{} {date}: {} available for {required} {} slot(s)",
                entry.flight_number,
                available.len(),
                position.label()
            );

            let mut filled = 0u32;
            let mut candidates = available.into_iter();
            while filled < required {
                let Some(primary) = candidates.next() else {
                    break;
                };
                let candidate =
                    RosterAssignment::flight(&primary.id, &entry.flight_number, position, start, end);

                match self.validate(primary, &working, &candidate, ctx) {
                    None => {
                        working.push(candidate.clone());
                        outcome.assignments.push(candidate);
                        filled += 1;
                    }
                    Some(violation) => {
                        outcome.violations.push(violation);
                        // One fallback attempt: the next least-flown
                        // available member, validated once.
                        if let Some(alternative) = candidates.next() {
                            let fallback = RosterAssignment::flight(
                                &alternative.id,
                                &entry.flight_number,
                                position,
                                start,
                                end,
                            );
                            if self.validate(alternative, &working, &fallback, ctx).is_none() {
                                debug!(
                                    "assigned fallback {} for {} {}",
                                    alternative.name, entry.flight_number, position.label()
                                );
                                working.push(fallback.clone());
                                outcome.assignments.push(fallback);
                                filled += 1;
                            }
                        }
                    }
                }
            }

            if filled < required {
                outcome.violations.push(format!(
                    "Insufficient {} for flight {} on {} (need {}, got {})",
                    position.plural_label(),
                    entry.flight_number,
                    date,
                    required,
                    filled
                ));
            }
        }

        outcome
    }

    /// Validates a pick; `None` means compliant, `Some` carries the
    /// violation message.
    fn validate(
        &self,
        member: &CrewMember,
        working: &[RosterAssignment],
        candidate: &RosterAssignment,
        ctx: &ValidationContext,
    ) -> Option<String> {
        let rules = self.rules.as_ref()?;
        let validation = rules.validate(member, working, candidate, ctx);
        if validation.valid {
            None
        } else {
            Some(format!(
                "{} on {}: {}",
                member.name,
                candidate.flight_number.as_deref().unwrap_or("flight"),
                validation.violations.join(", ")
            ))
        }
    }

    /// Members of `role` with no assignment closer than the rest buffer to
    /// the new window, sorted ascending by career flight hours.
    ///
    /// The boundary is inclusive: a gap of exactly the buffer is available.
    fn available_crew<'a>(
        &self,
        crew: &'a [CrewMember],
        role: CrewRole,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        working: &[RosterAssignment],
    ) -> Vec<&'a CrewMember> {
        let mut available: Vec<&CrewMember> = crew
            .iter()
            .filter(|c| c.role == role)
            .filter(|c| {
                working
                    .iter()
                    .filter(|a| a.crew_member_id == c.id)
                    .all(|a| a.end + self.rest_buffer <= start || a.start >= end + self.rest_buffer)
            })
            .collect();
        available.sort_by(|a, b| {
            a.total_flight_hours
                .partial_cmp(&b.total_flight_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        available
    }
}

impl Default for CrewAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use crate::timetable::CrewRequirement;
    use chrono::{TimeZone, Utc};

    fn entry(quota: CrewRequirement) -> FlightScheduleEntry {
        FlightScheduleEntry::new(
            "BD 821",
            "Colombo - Dubai",
            "18:55",
            "22:15",
            "Daily",
            4.5,
            quota,
        )
        .unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn ctx() -> ValidationContext {
        ValidationContext::at(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap())
    }

    fn pool() -> Vec<CrewMember> {
        vec![
            CrewMember::new("CP1", "A. Perera", CrewRole::Captain).with_flight_hours(3000.0),
            CrewMember::new("CP2", "B. Fonseka", CrewRole::Captain).with_flight_hours(1500.0),
            CrewMember::new("FO1", "C. Silva", CrewRole::FirstOfficer).with_flight_hours(800.0),
            CrewMember::new("FA1", "D. Jayasuriya", CrewRole::CabinCrew).with_flight_hours(400.0),
            CrewMember::new("FA2", "E. Bandara", CrewRole::CabinCrew).with_flight_hours(250.0),
            CrewMember::new("FA3", "F. Dias", CrewRole::CabinCrew).with_flight_hours(600.0),
            CrewMember::new("FA4", "G. Herath", CrewRole::CabinCrew).with_flight_hours(100.0),
        ]
    }

    #[test]
    fn test_full_quota_filled() {
        let allocator = CrewAllocator::new();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(1, 1, 3, 1)),
            date(),
            &pool(),
            &[],
            &ctx(),
        );
        assert_eq!(outcome.assignments.len(), 6);
        assert!(outcome.violations.is_empty());
        assert!(outcome
            .assignments
            .iter()
            .all(|a| a.event_type == EventType::Flight));
    }

    #[test]
    fn test_load_balancing_prefers_least_flown() {
        let allocator = CrewAllocator::new();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(1, 1, 0, 0)),
            date(),
            &pool(),
            &[],
            &ctx(),
        );
        // CP2 has fewer hours than CP1.
        let captain = outcome
            .assignments
            .iter()
            .find(|a| a.position == Some(Position::Captain))
            .unwrap();
        assert_eq!(captain.crew_member_id, "CP2");
    }

    #[test]
    fn test_senior_cabin_filled_before_regular() {
        let allocator = CrewAllocator::new();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(0, 0, 2, 1)),
            date(),
            &pool(),
            &[],
            &ctx(),
        );
        // Least-flown attendant (FA4) takes the senior slot.
        let senior = outcome
            .assignments
            .iter()
            .find(|a| a.position == Some(Position::SeniorCabinCrew))
            .unwrap();
        assert_eq!(senior.crew_member_id, "FA4");
        // Senior pick is excluded from the regular cabin slots.
        let regulars: Vec<&str> = outcome
            .assignments
            .iter()
            .filter(|a| a.position == Some(Position::CabinCrew))
            .map(|a| a.crew_member_id.as_str())
            .collect();
        assert_eq!(regulars, vec!["FA2", "FA1"]);
    }

    #[test]
    fn test_shortfall_reported() {
        let allocator = CrewAllocator::new();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(3, 1, 0, 0)),
            date(),
            &pool(),
            &[],
            &ctx(),
        );
        // Only two captains exist.
        assert_eq!(
            outcome
                .assignments
                .iter()
                .filter(|a| a.position == Some(Position::Captain))
                .count(),
            2
        );
        assert!(outcome
            .violations
            .iter()
            .any(|v| v.contains("Insufficient Captains for flight BD 821")
                && v.contains("(need 3, got 2)")));
    }

    #[test]
    fn test_buffer_conflict_blocks_candidate() {
        let allocator = CrewAllocator::new();
        let (start, _) = entry(CrewRequirement::new(1, 0, 0, 0)).window(date());
        // CP2 (least flown, would be picked first) is busy until 2h before
        // departure: inside the 12h buffer.
        let busy = RosterAssignment::flight(
            "CP2",
            "BD 932",
            Position::Captain,
            start - Duration::hours(6),
            start - Duration::hours(2),
        );
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(1, 0, 0, 0)),
            date(),
            &pool(),
            &[busy],
            &ctx(),
        );
        let captain = &outcome.assignments[0];
        assert_eq!(captain.crew_member_id, "CP1");
    }

    #[test]
    fn test_buffer_boundary_inclusive() {
        let allocator = CrewAllocator::new();
        let (start, _) = entry(CrewRequirement::new(1, 0, 0, 0)).window(date());
        // CP2's previous duty ends exactly 12h before departure: available.
        let busy = RosterAssignment::flight(
            "CP2",
            "BD 932",
            Position::Captain,
            start - Duration::hours(16),
            start - Duration::hours(12),
        );
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(1, 0, 0, 0)),
            date(),
            &pool(),
            &[busy],
            &ctx(),
        );
        assert_eq!(outcome.assignments[0].crew_member_id, "CP2");
    }

    #[test]
    fn test_no_double_booking_within_run() {
        // Quota larger than the cabin pool: each attendant used at most once.
        let allocator = CrewAllocator::new();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(0, 0, 4, 2)),
            date(),
            &pool(),
            &[],
            &ctx(),
        );
        let mut ids: Vec<&str> = outcome
            .assignments
            .iter()
            .map(|a| a.crew_member_id.as_str())
            .collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_validation_rejects_over_limit_candidate_with_fallback() {
        // CP2 has 99h flown in the trailing 28 days; a 4.5h flight breaches
        // the 100h rule, so the allocator falls back to CP1.
        let mut history = Vec::new();
        for d in 4..=14 {
            let start = Utc.with_ymd_and_hms(2026, 2, d, 8, 0, 0).unwrap();
            history.push(RosterAssignment::flight(
                "CP2",
                "BD 700",
                Position::Captain,
                start,
                start + Duration::hours(9),
            ));
        }
        let allocator = CrewAllocator::new();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(1, 0, 0, 0)),
            date(),
            &pool(),
            &history,
            &ctx(),
        );
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].crew_member_id, "CP1");
        assert!(outcome
            .violations
            .iter()
            .any(|v| v.contains("B. Fonseka on BD 821")
                && v.contains("Maximum 100 hours of flying")));
    }

    #[test]
    fn test_without_validation_accepts_over_limit_candidate() {
        let mut history = Vec::new();
        for d in 4..=14 {
            let start = Utc.with_ymd_and_hms(2026, 2, d, 8, 0, 0).unwrap();
            history.push(RosterAssignment::flight(
                "CP2",
                "BD 700",
                Position::Captain,
                start,
                start + Duration::hours(9),
            ));
        }
        let allocator = CrewAllocator::new().without_validation();
        let outcome = allocator.allocate(
            &entry(CrewRequirement::new(1, 0, 0, 0)),
            date(),
            &pool(),
            &history,
            &ctx(),
        );
        assert_eq!(outcome.assignments[0].crew_member_id, "CP2");
        assert!(outcome.violations.is_empty());
    }
}
