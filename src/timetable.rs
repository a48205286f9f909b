//! Flight timetable: recurring flight definitions.
//!
//! A timetable entry describes a recurring flight: departure and arrival
//! times of day, an operating frequency, a block duration, and the crew
//! quota each departure needs. The timetable answers "does flight X operate
//! on day D?" and turns an occurrence date into an absolute duty window.
//!
//! # Day Numbering
//!
//! Frequency day lists use ISO weekday numbers: 1 = Monday .. 7 = Sunday.
//! `"Day 1,3,5,7"` operates Monday, Wednesday, Friday, and Sunday.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Position;

/// Errors raised while parsing timetable data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// Frequency expression is neither `"Daily"` nor `"Day d1,d2,..."`.
    #[error("invalid frequency expression '{0}'")]
    InvalidFrequency(String),

    /// A day number outside 1..=7 appeared in a frequency list.
    #[error("invalid weekday number {0} (expected 1-7)")]
    InvalidWeekday(u32),

    /// A time of day could not be parsed from `"HH:MM"` / `"HH:MM+1"`.
    #[error("invalid time of day '{0}'")]
    InvalidTime(String),
}

/// Operating frequency of a timetable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Operates every day.
    Daily,
    /// Operates on the listed ISO weekdays (1 = Monday .. 7 = Sunday).
    Days(Vec<u32>),
}

impl Frequency {
    /// Whether a flight with this frequency operates on the given date.
    pub fn operates_on(&self, date: NaiveDate) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::Days(days) => days.contains(&date.weekday().number_from_monday()),
        }
    }
}

impl FromStr for Frequency {
    type Err = TimetableError;

    /// Parses `"Daily"` or `"Day d1,d2,..."`.
    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let expr = expr.trim();
        if expr == "Daily" {
            return Ok(Frequency::Daily);
        }
        let Some(list) = expr.strip_prefix("Day ") else {
            return Err(TimetableError::InvalidFrequency(expr.to_string()));
        };
        let mut days = Vec::new();
        for part in list.split(',') {
            let day: u32 = part
                .trim()
                .parse()
                .map_err(|_| TimetableError::InvalidFrequency(expr.to_string()))?;
            if !(1..=7).contains(&day) {
                return Err(TimetableError::InvalidWeekday(day));
            }
            days.push(day);
        }
        if days.is_empty() {
            return Err(TimetableError::InvalidFrequency(expr.to_string()));
        }
        Ok(Frequency::Days(days))
    }
}

/// Crew quota per departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewRequirement {
    pub captains: u32,
    pub first_officers: u32,
    pub cabin_crew: u32,
    pub senior_cabin_crew: u32,
}

impl CrewRequirement {
    pub fn new(captains: u32, first_officers: u32, cabin_crew: u32, senior_cabin_crew: u32) -> Self {
        Self {
            captains,
            first_officers,
            cabin_crew,
            senior_cabin_crew,
        }
    }

    /// Total heads required per departure.
    pub fn total(&self) -> u32 {
        self.captains + self.first_officers + self.cabin_crew + self.senior_cabin_crew
    }

    /// Required count for a given position.
    pub fn for_position(&self, position: Position) -> u32 {
        match position {
            Position::Captain => self.captains,
            Position::FirstOfficer => self.first_officers,
            Position::SeniorCabinCrew => self.senior_cabin_crew,
            Position::CabinCrew => self.cabin_crew,
        }
    }
}

/// A recurring flight definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightScheduleEntry {
    /// Flight number (e.g. "BD 821").
    pub flight_number: String,
    /// Route description (e.g. "Colombo - Dubai").
    pub sector: String,
    /// Departure time of day.
    pub departure: NaiveTime,
    /// Published arrival time of day.
    pub arrival: NaiveTime,
    /// Whether the published arrival falls on the next calendar day.
    pub arrival_next_day: bool,
    /// Operating frequency.
    pub frequency: Frequency,
    /// Block duration in fractional hours.
    pub duration_hours: f64,
    /// Crew quota per departure.
    pub crew_requirement: CrewRequirement,
}

impl FlightScheduleEntry {
    /// Creates an entry from timetable strings.
    ///
    /// `departure` and `arrival` accept `"HH:MM"`, with an optional `"+1"`
    /// suffix on the arrival marking a next-day landing.
    pub fn new(
        flight_number: impl Into<String>,
        sector: impl Into<String>,
        departure: &str,
        arrival: &str,
        frequency: &str,
        duration_hours: f64,
        crew_requirement: CrewRequirement,
    ) -> Result<Self, TimetableError> {
        let (departure, dep_next_day) = parse_time_of_day(departure)?;
        if dep_next_day {
            return Err(TimetableError::InvalidTime(format!("{departure}+1")));
        }
        let (arrival, arrival_next_day) = parse_time_of_day(arrival)?;
        Ok(Self {
            flight_number: flight_number.into(),
            sector: sector.into(),
            departure,
            arrival,
            arrival_next_day,
            frequency: frequency.parse()?,
            duration_hours,
            crew_requirement,
        })
    }

    /// Whether this flight operates on the given date.
    pub fn operates_on(&self, date: NaiveDate) -> bool {
        self.frequency.operates_on(date)
    }

    /// Absolute duty window for an occurrence on `date`.
    ///
    /// The end is departure plus the block duration, split into whole hours
    /// and minutes (4.5h is exactly 4h30m); overnight departures land on the
    /// next day without any further adjustment.
    pub fn window(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_time(self.departure).and_utc();
        let whole_hours = self.duration_hours.trunc() as i64;
        let minutes = (self.duration_hours.fract() * 60.0).round() as i64;
        let end = start + Duration::hours(whole_hours) + Duration::minutes(minutes);
        (start, end)
    }

    /// Published arrival instant for an occurrence on `date`.
    ///
    /// Applies the next-day marker; this is the passenger-facing arrival,
    /// not the end of the crew duty window.
    pub fn scheduled_arrival(&self, date: NaiveDate) -> DateTime<Utc> {
        let arrival_date = if self.arrival_next_day {
            date + Duration::days(1)
        } else {
            date
        };
        arrival_date.and_time(self.arrival).and_utc()
    }
}

/// Parses `"HH:MM"` with an optional `"+1"` next-day suffix.
fn parse_time_of_day(s: &str) -> Result<(NaiveTime, bool), TimetableError> {
    let (text, next_day) = match s.trim().strip_suffix("+1") {
        Some(prefix) => (prefix, true),
        None => (s.trim(), false),
    };
    let time = NaiveTime::parse_from_str(text, "%H:%M")
        .map_err(|_| TimetableError::InvalidTime(s.to_string()))?;
    Ok((time, next_day))
}

/// A catalog of recurring flight definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    entries: Vec<FlightScheduleEntry>,
}

impl Timetable {
    /// Creates a timetable from the given entries.
    pub fn new(entries: Vec<FlightScheduleEntry>) -> Self {
        Self { entries }
    }

    /// The standard BD network: Dubai, Malé, Dhaka, and Kuala Lumpur
    /// rotations out of Colombo.
    pub fn standard() -> Self {
        let entry = |number: &str,
                     sector: &str,
                     dep: &str,
                     arr: &str,
                     freq: &str,
                     duration: f64,
                     quota: CrewRequirement| {
            FlightScheduleEntry::new(number, sector, dep, arr, freq, duration, quota)
                .expect("standard timetable entries are well-formed")
        };
        let wide = CrewRequirement::new(1, 1, 3, 1);
        let narrow = CrewRequirement::new(1, 1, 2, 1);
        Self::new(vec![
            entry("BD 821", "Colombo - Dubai", "18:55", "22:15", "Daily", 4.5, wide),
            entry("BD 822", "Dubai - Colombo", "23:15", "05:20+1", "Daily", 4.5, wide),
            entry("BD 921", "Colombo - Malé", "07:05", "08:05", "Day 1,3,5,7", 1.5, narrow),
            entry("BD 922", "Malé - Colombo", "09:05", "11:10", "Day 1,3,5,7", 1.5, narrow),
            entry("BD 931", "Colombo - Dhaka", "21:30", "01:15+1", "Day 2,3,4,6,7", 2.75, wide),
            entry("BD 932", "Dhaka - Colombo", "02:15", "05:15", "Day 2,3,4,6,7", 2.75, wide),
            entry("BD 721", "Colombo - Kuala Lumpur", "09:05", "15:30", "Day 1,5", 3.5, wide),
            entry("BD 722", "Kuala Lumpur - Colombo", "16:30", "17:35", "Day 1,5", 3.5, wide),
        ])
    }

    /// Read-only copy of the catalog.
    ///
    /// Mutating the returned vector does not affect the timetable.
    pub fn entries(&self) -> Vec<FlightScheduleEntry> {
        self.entries.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries operating on the given date.
    pub fn operating_on(&self, date: NaiveDate) -> impl Iterator<Item = &FlightScheduleEntry> {
        self.entries.iter().filter(move |e| e.operates_on(date))
    }

    /// Total required heads per day, by position label, across all entries.
    pub fn crew_requirement_summary(&self) -> HashMap<String, u32> {
        let mut summary: HashMap<String, u32> = [
            Position::Captain,
            Position::FirstOfficer,
            Position::SeniorCabinCrew,
            Position::CabinCrew,
        ]
        .iter()
        .map(|p| (p.label().to_string(), 0))
        .collect();
        for entry in &self.entries {
            for position in [
                Position::Captain,
                Position::FirstOfficer,
                Position::SeniorCabinCrew,
                Position::CabinCrew,
            ] {
                *summary
                    .entry(position.label().to_string())
                    .or_insert(0) += entry.crew_requirement.for_position(position);
            }
        }
        summary
    }
}
