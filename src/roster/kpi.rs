//! Roster quality metrics.
//!
//! Computes summary indicators from a generated roster: event counts,
//! flight-hour totals, and the load-balance spread across crew members.

use std::collections::HashMap;

use crate::models::{CrewMember, EventType, GeneratedRoster};

/// Summary indicators for one generated roster.
#[derive(Debug, Clone)]
pub struct RosterKpi {
    /// Number of flight assignments.
    pub flight_assignments: usize,
    /// Number of off-day filler events.
    pub off_days: usize,
    /// Number of office-duty filler events.
    pub office_duties: usize,
    /// Total flight hours across the roster.
    pub total_flight_hours: f64,
    /// Rostered flight hours per crew member.
    pub flight_hours_by_crew: HashMap<String, f64>,
    /// Fewest rostered flight hours of any crew member.
    pub min_flight_hours: f64,
    /// Most rostered flight hours of any crew member.
    pub max_flight_hours: f64,
    /// Number of violations reported.
    pub violation_count: usize,
}

impl RosterKpi {
    /// Computes KPIs from a roster and the crew pool it was generated for.
    ///
    /// Crew members without flight assignments count as zero hours, so the
    /// spread reflects genuinely idle crew.
    pub fn calculate(roster: &GeneratedRoster, crew: &[CrewMember]) -> Self {
        let mut flight_assignments = 0;
        let mut off_days = 0;
        let mut office_duties = 0;
        let mut total_flight_hours = 0.0;
        let mut flight_hours_by_crew: HashMap<String, f64> =
            crew.iter().map(|c| (c.id.clone(), 0.0)).collect();

        for a in &roster.assignments {
            match a.event_type {
                EventType::Flight => {
                    flight_assignments += 1;
                    let hours = a.duration_hours();
                    total_flight_hours += hours;
                    *flight_hours_by_crew
                        .entry(a.crew_member_id.clone())
                        .or_insert(0.0) += hours;
                }
                EventType::Off => off_days += 1,
                EventType::OfficeDuty => office_duties += 1,
                _ => {}
            }
        }

        let min_flight_hours = flight_hours_by_crew
            .values()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let max_flight_hours = flight_hours_by_crew
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        Self {
            flight_assignments,
            off_days,
            office_duties,
            total_flight_hours,
            flight_hours_by_crew,
            min_flight_hours: if min_flight_hours.is_finite() {
                min_flight_hours
            } else {
                0.0
            },
            max_flight_hours: if max_flight_hours.is_finite() {
                max_flight_hours
            } else {
                0.0
            },
            violation_count: roster.violations.len(),
        }
    }

    /// Load-balance spread: max minus min rostered flight hours.
    pub fn hours_spread(&self) -> f64 {
        self.max_flight_hours - self.min_flight_hours
    }
}
