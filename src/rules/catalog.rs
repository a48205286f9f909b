//! Built-in compliance rule catalog.
//!
//! # Rules
//!
//! | Rule | Category | Limit |
//! |------|----------|-------|
//! | `MaxFlightHours28Days` | FlightTime | 100h / 28 days |
//! | `MaxFlightHours12Months` | FlightTime | 900h / 12 months |
//! | `DutyHourTiers` | DutyTime | 55h/7d, 95h/14d, 190h/28d |
//! | `MinimumRestBetweenDuties` | Rest | ≥ 12h between duties |
//! | `OffDayCadence` | OffDays | 1-in-7 and 2-consecutive-in-14 |
//! | `MaxConsecutiveDutyDays` | Fatigue | ≤ 6 consecutive flying days |
//!
//! Lookback windows anchor at the validation context's "now". A calendar
//! day with no duty event counts as an off day for cadence purposes: a
//! duty-free day is rest, whether or not an explicit off event was recorded.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{ComplianceRule, RuleCategory, ValidationContext};
use crate::models::{CrewMember, EventType, RosterAssignment};

/// Sums flight-event hours starting at or after `since`.
fn flight_hours_since(assignments: &[RosterAssignment], since: DateTime<Utc>) -> f64 {
    assignments
        .iter()
        .filter(|a| a.event_type == EventType::Flight && a.start >= since)
        .map(|a| a.duration_hours())
        .sum()
}

/// Sums duty hours (flight + office duty) starting at or after `since`.
fn duty_hours_since(assignments: &[RosterAssignment], since: DateTime<Utc>) -> f64 {
    assignments
        .iter()
        .filter(|a| a.event_type.is_duty() && a.start >= since)
        .map(|a| a.duration_hours())
        .sum()
}

/// Whether a calendar day counts as an off day.
///
/// True when an explicit off event starts that day, or when no duty event
/// starts that day.
fn is_off_day(date: NaiveDate, assignments: &[RosterAssignment]) -> bool {
    let mut has_duty = false;
    for a in assignments {
        if !a.starts_on(date) {
            continue;
        }
        match a.event_type {
            EventType::Off => return true,
            t if t.is_duty() => has_duty = true,
            _ => {}
        }
    }
    !has_duty
}

/// Maximum 100 hours of flying in any consecutive 28 days.
#[derive(Debug, Clone, Copy)]
pub struct MaxFlightHours28Days;

impl ComplianceRule for MaxFlightHours28Days {
    fn id(&self) -> &'static str {
        "max_100_hours_28_days"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::FlightTime
    }

    fn description(&self) -> &'static str {
        "Maximum 100 hours of flying in any consecutive 28 days"
    }

    fn check(
        &self,
        _crew: &CrewMember,
        assignments: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> bool {
        flight_hours_since(assignments, ctx.now - Duration::days(28)) <= 100.0
    }
}

/// Maximum 900 hours of flying in the last 12 months.
#[derive(Debug, Clone, Copy)]
pub struct MaxFlightHours12Months;

impl ComplianceRule for MaxFlightHours12Months {
    fn id(&self) -> &'static str {
        "max_900_hours_12_months"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::FlightTime
    }

    fn description(&self) -> &'static str {
        "Maximum 900 hours of flying in last 12 months"
    }

    fn check(
        &self,
        _crew: &CrewMember,
        assignments: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> bool {
        flight_hours_since(assignments, ctx.now - Duration::days(365)) <= 900.0
    }
}

/// Tiered duty-hour ceilings: 55h/7 days, 95h/14 days, 190h/28 days.
///
/// All three tiers must hold.
#[derive(Debug, Clone, Copy)]
pub struct DutyHourTiers;

impl ComplianceRule for DutyHourTiers {
    fn id(&self) -> &'static str {
        "duty_hours_tiers"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::DutyTime
    }

    fn description(&self) -> &'static str {
        "Duty hours: 7 days (55h), 14 days (95h), 28 days (190h)"
    }

    fn check(
        &self,
        _crew: &CrewMember,
        assignments: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> bool {
        duty_hours_since(assignments, ctx.now - Duration::days(7)) <= 55.0
            && duty_hours_since(assignments, ctx.now - Duration::days(14)) <= 95.0
            && duty_hours_since(assignments, ctx.now - Duration::days(28)) <= 190.0
    }
}

/// Minimum 12 hours of rest between consecutive duties.
///
/// A gap of exactly 12 hours complies.
#[derive(Debug, Clone, Copy)]
pub struct MinimumRestBetweenDuties;

impl ComplianceRule for MinimumRestBetweenDuties {
    fn id(&self) -> &'static str {
        "minimum_rest_between_duties"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Rest
    }

    fn description(&self) -> &'static str {
        "Minimum 12 hours rest between duties"
    }

    fn check(
        &self,
        _crew: &CrewMember,
        assignments: &[RosterAssignment],
        _ctx: &ValidationContext,
    ) -> bool {
        let mut duties: Vec<&RosterAssignment> = assignments
            .iter()
            .filter(|a| a.event_type.is_duty())
            .collect();
        duties.sort_by_key(|a| a.start);

        duties
            .windows(2)
            .all(|pair| pair[1].start - pair[0].end >= Duration::hours(12))
    }
}

/// Off-day cadence: at least 1 off day in the last 7 days and at least 2
/// calendar-consecutive off days within the last 14 days.
#[derive(Debug, Clone, Copy)]
pub struct OffDayCadence;

impl ComplianceRule for OffDayCadence {
    fn id(&self) -> &'static str {
        "off_day_cadence"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::OffDays
    }

    fn description(&self) -> &'static str {
        "Off days requirements: 1 in 7 days, 2 consecutive in 14 days"
    }

    fn check(
        &self,
        _crew: &CrewMember,
        assignments: &[RosterAssignment],
        ctx: &ValidationContext,
    ) -> bool {
        let today = ctx.now.date_naive();

        let one_in_seven = (0..7)
            .filter_map(|back| today.checked_sub_days(chrono::Days::new(back)))
            .any(|d| is_off_day(d, assignments));

        let two_consecutive_in_fourteen = (0..13).any(|back| {
            let later = match today.checked_sub_days(chrono::Days::new(back)) {
                Some(d) => d,
                None => return false,
            };
            let earlier = match later.pred_opt() {
                Some(d) => d,
                None => return false,
            };
            is_off_day(earlier, assignments) && is_off_day(later, assignments)
        });

        one_in_seven && two_consecutive_in_fourteen
    }
}

/// Maximum 6 calendar-consecutive days containing a flight.
#[derive(Debug, Clone, Copy)]
pub struct MaxConsecutiveDutyDays;

impl ComplianceRule for MaxConsecutiveDutyDays {
    fn id(&self) -> &'static str {
        "max_consecutive_duty_days"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Fatigue
    }

    fn description(&self) -> &'static str {
        "Maximum 6 consecutive duty days"
    }

    fn check(
        &self,
        _crew: &CrewMember,
        assignments: &[RosterAssignment],
        _ctx: &ValidationContext,
    ) -> bool {
        let mut flight_days: Vec<NaiveDate> = assignments
            .iter()
            .filter(|a| a.event_type == EventType::Flight)
            .map(|a| a.start.date_naive())
            .collect();
        flight_days.sort();
        flight_days.dedup();

        let mut run = 0u32;
        let mut previous: Option<NaiveDate> = None;
        for day in flight_days {
            run = match previous {
                Some(prev) if (day - prev) == Duration::days(1) => run + 1,
                _ => 1,
            };
            if run > 6 {
                return false;
            }
            previous = Some(day);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrewRole, Position};
    use chrono::TimeZone;

    fn crew() -> CrewMember {
        CrewMember::new("C1", "A. Perera", CrewRole::Captain)
    }

    fn ctx() -> ValidationContext {
        ValidationContext::at(Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap())
    }

    fn flight_at(start: DateTime<Utc>, hours: i64) -> RosterAssignment {
        RosterAssignment::flight(
            "C1",
            "BD 821",
            Position::Captain,
            start,
            start + Duration::hours(hours),
        )
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_flight_hours_28_days_boundary() {
        // 99 hours flown in the window: a 2-hour candidate pushes past 100.
        let mut history: Vec<RosterAssignment> = (1..=11).map(|d| flight_at(day(d), 9)).collect();
        assert!(MaxFlightHours28Days.check(&crew(), &history, &ctx()));

        history.push(flight_at(day(12), 2));
        assert!(!MaxFlightHours28Days.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_flight_hours_28_days_ignores_stale_flights() {
        // A flight older than 28 days is outside the window.
        let old = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let history = vec![flight_at(old, 99), flight_at(day(19), 4)];
        assert!(MaxFlightHours28Days.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_flight_hours_12_months() {
        // 100 nine-hour legs spread over the year: exactly 900, compliant.
        let mut history: Vec<RosterAssignment> = (0..100)
            .map(|i| {
                let start = Utc.with_ymd_and_hms(2025, 4, 1, 6, 0, 0).unwrap()
                    + Duration::days(3 * i)
                    + Duration::hours((i % 12) as i64);
                flight_at(start, 9)
            })
            .collect();
        assert!(MaxFlightHours12Months.check(&crew(), &history, &ctx()));

        history.push(flight_at(day(19), 1));
        assert!(!MaxFlightHours12Months.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_duty_tiers_count_office_duty() {
        // Seven 8-hour office days in the last 7 days: 56h > 55h.
        let history: Vec<RosterAssignment> = (14..=20)
            .map(|d| {
                RosterAssignment::office_duty(
                    "C1",
                    Utc.with_ymd_and_hms(2026, 3, d, 9, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2026, 3, d, 17, 0, 0).unwrap(),
                )
            })
            .collect();
        assert!(!DutyHourTiers.check(&crew(), &history, &ctx()));
        assert!(DutyHourTiers.check(&crew(), &history[..6], &ctx()));
    }

    #[test]
    fn test_duty_tiers_ignore_off_and_standby() {
        let history = vec![
            RosterAssignment::off("C1", day(18), day(18) + Duration::hours(23)),
            RosterAssignment::plain(
                "C1",
                EventType::Standby,
                day(19),
                day(19) + Duration::hours(23),
            ),
        ];
        assert!(DutyHourTiers.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_minimum_rest_gap() {
        let first = flight_at(day(10), 4);
        // 11h59m after the first duty ends: violation.
        let close = flight_at(day(10) + Duration::hours(4) + Duration::hours(11) + Duration::minutes(59), 4);
        assert!(!MinimumRestBetweenDuties.check(&crew(), &[first.clone(), close], &ctx()));

        // Exactly 12h after: compliant (inclusive boundary).
        let exact = flight_at(day(10) + Duration::hours(16), 4);
        assert!(MinimumRestBetweenDuties.check(&crew(), &[first, exact], &ctx()));
    }

    #[test]
    fn test_minimum_rest_unsorted_input() {
        let late = flight_at(day(12), 4);
        let early = flight_at(day(10), 4);
        assert!(MinimumRestBetweenDuties.check(&crew(), &[late, early], &ctx()));
    }

    #[test]
    fn test_off_day_cadence_duty_free_days_count() {
        // No events at all: every day is implicit rest.
        assert!(OffDayCadence.check(&crew(), &[], &ctx()));
    }

    #[test]
    fn test_off_day_cadence_fails_on_unbroken_duty() {
        // A flight every one of the last 14 calendar days, no off events.
        let history: Vec<RosterAssignment> = (7..=20).map(|d| flight_at(day(d), 4)).collect();
        assert!(!OffDayCadence.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_off_day_cadence_explicit_off_restores_compliance() {
        // Duty every day except two explicit consecutive off days.
        let mut history: Vec<RosterAssignment> = (7..=20)
            .filter(|d| *d != 15 && *d != 16)
            .map(|d| flight_at(day(d), 4))
            .collect();
        history.push(RosterAssignment::off("C1", day(15), day(15) + Duration::hours(13)));
        history.push(RosterAssignment::off("C1", day(16), day(16) + Duration::hours(13)));
        assert!(OffDayCadence.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_off_day_cadence_needs_consecutive_pair() {
        // Off days on the 14th and 16th only: isolated, never consecutive.
        let history: Vec<RosterAssignment> = (7..=20)
            .filter(|d| *d != 14 && *d != 16)
            .map(|d| flight_at(day(d), 4))
            .collect();
        assert!(!OffDayCadence.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_max_consecutive_duty_days() {
        // Six consecutive flying days: compliant.
        let six: Vec<RosterAssignment> = (10..=15).map(|d| flight_at(day(d), 4)).collect();
        assert!(MaxConsecutiveDutyDays.check(&crew(), &six, &ctx()));

        // Seventh consecutive day breaks the rule.
        let seven: Vec<RosterAssignment> = (10..=16).map(|d| flight_at(day(d), 4)).collect();
        assert!(!MaxConsecutiveDutyDays.check(&crew(), &seven, &ctx()));
    }

    #[test]
    fn test_max_consecutive_duty_days_gap_resets() {
        // Six days, a gap, then six more: two separate compliant runs.
        let mut history: Vec<RosterAssignment> = (1..=6).map(|d| flight_at(day(d), 4)).collect();
        history.extend((8..=13).map(|d| flight_at(day(d), 4)));
        assert!(MaxConsecutiveDutyDays.check(&crew(), &history, &ctx()));
    }

    #[test]
    fn test_max_consecutive_duty_days_same_day_flights() {
        // Two legs on one day count as a single duty day.
        let mut history: Vec<RosterAssignment> = (10..=15).map(|d| flight_at(day(d), 2)).collect();
        history.push(flight_at(day(12) + Duration::hours(14), 2));
        assert!(MaxConsecutiveDutyDays.check(&crew(), &history, &ctx()));
    }
}
