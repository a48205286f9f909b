//! Compliance rules and rules engine.
//!
//! Provides flight-time, duty-time, rest, and off-day regulations as
//! independent, composable rules, plus an engine that evaluates a crew
//! member's combined assignment history against every rule.
//!
//! # Lookback Anchoring
//!
//! Rules with lookback windows anchor at the [`ValidationContext`]'s "now" —
//! the moment of generation, not the candidate assignment's own date. The
//! same candidate can therefore validate differently depending on when the
//! check runs; rosters are generated prospectively, so this is a design
//! property rather than a defect.
//!
//! # Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use crew_roster::models::{CrewMember, CrewRole, Position, RosterAssignment};
//! use crew_roster::rules::{RulesEngine, ValidationContext};
//!
//! let engine = RulesEngine::standard();
//! let crew = CrewMember::new("C1", "A. Perera", CrewRole::Captain);
//! let ctx = ValidationContext::at(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap());
//! let candidate = RosterAssignment::flight(
//!     "C1",
//!     "BD 821",
//!     Position::Captain,
//!     Utc.with_ymd_and_hms(2026, 3, 2, 18, 55, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2026, 3, 2, 23, 25, 0).unwrap(),
//! );
//! let validation = engine.validate(&crew, &[], &candidate, &ctx);
//! assert!(validation.valid);
//! ```

mod catalog;

pub use catalog::{
    DutyHourTiers, MaxConsecutiveDutyDays, MaxFlightHours12Months, MaxFlightHours28Days,
    MinimumRestBetweenDuties, OffDayCadence,
};

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{CrewMember, RosterAssignment};

/// Regulatory category of a compliance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    FlightTime,
    DutyTime,
    Rest,
    OffDays,
    Fatigue,
}

/// Evaluation state passed to compliance rules.
///
/// Carries the wall-clock anchor for lookback windows. Injectable so tests
/// pin it; production callers use [`ValidationContext::current`].
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    /// Lookback anchor.
    pub now: DateTime<Utc>,
}

impl ValidationContext {
    /// Creates a context anchored at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Creates a context anchored at the current wall clock.
    pub fn current() -> Self {
        Self::at(Utc::now())
    }
}

/// A single compliance regulation.
///
/// Rules are stateless predicates over a crew member's combined assignment
/// history (already filtered to that member, candidate included).
pub trait ComplianceRule: Send + Sync + Debug {
    /// Stable rule identifier (e.g. "max_100_hours_28_days").
    fn id(&self) -> &'static str;

    /// Regulatory category.
    fn category(&self) -> RuleCategory;

    /// Human-readable description, used verbatim in violation reports.
    fn description(&self) -> &'static str;

    /// Returns `true` when the history complies with this rule.
    fn check(
        &self,
        crew: &CrewMember,
        assignments: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> bool;
}

/// Outcome of validating one candidate or one member's history.
#[derive(Debug, Clone)]
pub struct Validation {
    /// Whether every rule passed.
    pub valid: bool,
    /// Descriptions of the failing rules.
    pub violations: Vec<String>,
}

/// Evaluates the fixed rule catalog against assignment histories.
///
/// The catalog is a closed, ordered set; rules are evaluated independently
/// and a candidate is valid only if all of them pass with it included.
#[derive(Clone)]
pub struct RulesEngine {
    rules: Vec<Arc<dyn ComplianceRule>>,
}

impl RulesEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard regulation catalog, in evaluation order.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(MaxFlightHours28Days)
            .with_rule(MaxFlightHours12Months)
            .with_rule(DutyHourTiers)
            .with_rule(MinimumRestBetweenDuties)
            .with_rule(OffDayCadence)
            .with_rule(MaxConsecutiveDutyDays)
    }

    /// Appends a rule to the catalog.
    pub fn with_rule<R: ComplianceRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// The catalog, in evaluation order.
    pub fn rules(&self) -> &[Arc<dyn ComplianceRule>] {
        &self.rules
    }

    /// Validates a candidate assignment against the full catalog.
    ///
    /// Filters `history` to the crew member, appends the candidate, and runs
    /// every rule, collecting the descriptions of those that fail.
    /// Side-effect free.
    pub fn validate(
        &self,
        crew: &CrewMember,
        history: &[RosterAssignment],
        candidate: &RosterAssignment,
        ctx: &ValidationContext,
    ) -> Validation {
        let mut combined: Vec<RosterAssignment> = history
            .iter()
            .filter(|a| a.crew_member_id == crew.id)
            .cloned()
            .collect();
        combined.push(candidate.clone());
        self.run(crew, &combined, ctx, None)
    }

    /// Re-validates a member's existing history without a candidate.
    ///
    /// Violations are prefixed with the member's name, for whole-roster
    /// audit reports.
    pub fn validate_history(
        &self,
        crew: &CrewMember,
        history: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> Validation {
        let own: Vec<RosterAssignment> = history
            .iter()
            .filter(|a| a.crew_member_id == crew.id)
            .cloned()
            .collect();
        self.run(crew, &own, ctx, Some(&crew.name))
    }

    fn run(
        &self,
        crew: &CrewMember,
        assignments: &[RosterAssignment],
        ctx: &ValidationContext,
        prefix: Option<&str>,
    ) -> Validation {
        let mut violations = Vec::new();
        for rule in &self.rules {
            if !rule.check(crew, assignments, ctx) {
                match prefix {
                    Some(name) => violations.push(format!("{name}: {}", rule.description())),
                    None => violations.push(rule.description().to_string()),
                }
            }
        }
        Validation {
            valid: violations.is_empty(),
            violations,
        }
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl Debug for RulesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulesEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
