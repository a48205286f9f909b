//! Roster generation across a date range.
//!
//! Orchestrates the allocator and rules engine over every calendar day in
//! the requested period, then fills uncovered days with off-day or
//! office-duty events.
//!
//! # Algorithm
//!
//! 1. Fail fast on an inverted date range or an empty crew pool.
//! 2. For each day, allocate every timetable entry operating that day
//!    against the running union of existing and newly generated
//!    assignments, so later flights see earlier ones as occupying time.
//! 3. Immediately after the day's flights, give every crew member with no
//!    assignment starting that day a filler event: a full-day off, or an
//!    09:00–17:00 office duty when the policy says so and no mandatory-off
//!    override applies (≥ 6 consecutive working days, or the designated
//!    rest day).
//! 4. Deduplicate violations, preserving first-occurrence order.
//!
//! Generation is synchronous and run-to-completion; all mutable state is
//! local to the call.

mod filler;
mod kpi;

pub use filler::{
    AlwaysOff, AlwaysOfficeDuty, FillerKind, FillerPolicy, RandomFiller,
    DEFAULT_OFFICE_DUTY_PROBABILITY,
};
pub use kpi::RosterKpi;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use log::{debug, info};

use crate::allocator::CrewAllocator;
use crate::error::RosterError;
use crate::models::{CrewMember, GeneratedRoster, RosterAssignment};
use crate::rules::{RulesEngine, ValidationContext};
use crate::store::{load_history, RosterStore};
use crate::timetable::Timetable;

/// Working days before an uncovered day is forced off.
const MAX_CONSECUTIVE_WORKING_DAYS: u32 = 6;

/// Generates rosters over a date range.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use crew_roster::models::{CrewMember, CrewRole};
/// use crew_roster::roster::{AlwaysOff, RosterGenerator};
/// use crew_roster::timetable::Timetable;
///
/// let mut generator = RosterGenerator::new(Timetable::standard())
///     .with_filler_policy(AlwaysOff)
///     .with_now(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
/// let crew = vec![CrewMember::new("C1", "A. Perera", CrewRole::Captain)];
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let roster = generator.generate(day, day, &crew, &[]).unwrap();
/// assert!(!roster.assignments.is_empty());
/// ```
#[derive(Debug)]
pub struct RosterGenerator {
    timetable: Timetable,
    allocator: CrewAllocator,
    filler: Box<dyn FillerPolicy>,
    rest_day: Weekday,
    now: Option<DateTime<Utc>>,
}

impl RosterGenerator {
    /// Creates a generator over the given timetable with default
    /// configuration: standard rules, 12h rest buffer, random filler,
    /// Sunday rest day.
    pub fn new(timetable: Timetable) -> Self {
        Self {
            timetable,
            allocator: CrewAllocator::new(),
            filler: Box::new(RandomFiller::default()),
            rest_day: Weekday::Sun,
            now: None,
        }
    }

    /// Creates a generator over the standard BD timetable.
    pub fn standard() -> Self {
        Self::new(Timetable::standard())
    }

    /// Replaces the allocator.
    pub fn with_allocator(mut self, allocator: CrewAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Overrides the allocator's rest buffer.
    pub fn with_rest_buffer(mut self, buffer: Duration) -> Self {
        self.allocator = self.allocator.with_rest_buffer(buffer);
        self
    }

    /// Replaces the rule catalog used during allocation.
    pub fn with_rules(mut self, rules: RulesEngine) -> Self {
        self.allocator = self.allocator.with_rules(rules);
        self
    }

    /// Replaces the filler policy.
    pub fn with_filler_policy<P: FillerPolicy + 'static>(mut self, policy: P) -> Self {
        self.filler = Box::new(policy);
        self
    }

    /// Changes the designated weekly rest day.
    pub fn with_rest_day(mut self, rest_day: Weekday) -> Self {
        self.rest_day = rest_day;
        self
    }

    /// Pins the lookback anchor instead of reading the wall clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// The timetable this generator operates over.
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Total required heads per day, by position label.
    pub fn crew_requirement_summary(&self) -> HashMap<String, u32> {
        self.timetable.crew_requirement_summary()
    }

    /// Generates a roster for `[start, end]` inclusive.
    ///
    /// `existing` is the stored assignment history; generated assignments
    /// never conflict with it. Fails fast on an inverted range or an empty
    /// crew pool, and otherwise always returns the best-effort assignment
    /// set together with every violation encountered.
    pub fn generate(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        crew: &[CrewMember],
        existing: &[RosterAssignment],
    ) -> Result<GeneratedRoster, RosterError> {
        if start > end {
            return Err(RosterError::InvalidDateRange { start, end });
        }
        if crew.is_empty() {
            return Err(RosterError::EmptyCrewPool);
        }

        let ctx = match self.now {
            Some(now) => ValidationContext::at(now),
            None => ValidationContext::current(),
        };
        info!("generating roster {start}..={end} for {} crew members", crew.len());

        let mut generated: Vec<RosterAssignment> = Vec::new();
        let mut violations: Vec<String> = Vec::new();
        // Running union consulted by the allocator and the filler.
        let mut working: Vec<RosterAssignment> = existing.to_vec();
        let mut consecutive_working: HashMap<String, u32> =
            crew.iter().map(|c| (c.id.clone(), 0)).collect();

        let mut date = start;
        loop {
            for entry in self.timetable.operating_on(date) {
                debug!("processing flight {} for {date}", entry.flight_number);
                let outcome = self.allocator.allocate(entry, date, crew, &working, &ctx);
                working.extend(outcome.assignments.iter().cloned());
                generated.extend(outcome.assignments);
                violations.extend(outcome.violations);
            }

            for member in crew {
                let day_events: Vec<&RosterAssignment> = working
                    .iter()
                    .filter(|a| a.crew_member_id == member.id && a.starts_on(date))
                    .collect();

                if day_events.is_empty() {
                    let filler = self.fill_day(member, date, &mut consecutive_working);
                    working.push(filler.clone());
                    generated.push(filler);
                } else if day_events.iter().any(|a| a.event_type.is_duty()) {
                    *consecutive_working.entry(member.id.clone()).or_insert(0) += 1;
                } else {
                    consecutive_working.insert(member.id.clone(), 0);
                }
            }

            date = match date.succ_opt() {
                Some(next) if next <= end => next,
                _ => break,
            };
        }

        let mut seen = HashSet::new();
        violations.retain(|v| seen.insert(v.clone()));

        info!(
            "generated {} assignments with {} violations",
            generated.len(),
            violations.len()
        );
        Ok(GeneratedRoster {
            assignments: generated,
            violations,
        })
    }

    /// Generates against a store: fetches the crew pool and full assignment
    /// history, then runs [`RosterGenerator::generate`].
    ///
    /// The store is read once, at the start; the rest of the run is pure
    /// computation.
    pub fn generate_from_store<S: RosterStore>(
        &mut self,
        store: &S,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GeneratedRoster, RosterError> {
        let crew = store.list_crew_members()?;
        let existing = load_history(store, None)?;
        self.generate(start, end, &crew, &existing)
    }

    /// Synthesizes the filler event for one uncovered day and updates the
    /// member's consecutive-working-day counter.
    fn fill_day(
        &mut self,
        member: &CrewMember,
        date: NaiveDate,
        consecutive_working: &mut HashMap<String, u32>,
    ) -> RosterAssignment {
        let worked = consecutive_working.get(&member.id).copied().unwrap_or(0);
        let mandatory_off =
            worked >= MAX_CONSECUTIVE_WORKING_DAYS || date.weekday() == self.rest_day;

        let kind = if mandatory_off {
            FillerKind::Off
        } else {
            self.filler.choose(member, date)
        };

        match kind {
            FillerKind::Off => {
                consecutive_working.insert(member.id.clone(), 0);
                RosterAssignment::off(
                    &member.id,
                    date.and_time(time(0, 0, 0)).and_utc(),
                    date.and_time(time(23, 59, 59)).and_utc(),
                )
            }
            FillerKind::OfficeDuty => {
                *consecutive_working.entry(member.id.clone()).or_insert(0) += 1;
                RosterAssignment::office_duty(
                    &member.id,
                    date.and_time(time(9, 0, 0)).and_utc(),
                    date.and_time(time(17, 0, 0)).and_utc(),
                )
            }
        }
    }
}

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).expect("valid wall-clock time")
}
