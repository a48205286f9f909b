//! Off-day and office-duty filler policy.
//!
//! Uncovered days are filled with either a full-day off event or an
//! office-duty shift. The choice is an injectable policy so tests can pin
//! deterministic outcomes; mandatory-off overrides in the generator apply
//! before the policy is consulted.

use std::fmt::Debug;

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::CrewMember;

/// Default probability of choosing office duty over an off day.
pub const DEFAULT_OFFICE_DUTY_PROBABILITY: f64 = 0.2;

/// Filler event kind chosen for an uncovered day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillerKind {
    Off,
    OfficeDuty,
}

/// Decides what an uncovered day becomes.
pub trait FillerPolicy: Debug {
    /// Chooses the filler for one crew member on one uncovered day.
    fn choose(&mut self, crew: &CrewMember, date: NaiveDate) -> FillerKind;
}

/// Random policy: office duty with a fixed probability, otherwise off.
#[derive(Debug)]
pub struct RandomFiller {
    rng: SmallRng,
    office_duty_probability: f64,
}

impl RandomFiller {
    /// Creates a policy with the given office-duty probability, seeded from
    /// the OS.
    pub fn new(office_duty_probability: f64) -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            office_duty_probability: office_duty_probability.clamp(0.0, 1.0),
        }
    }

    /// Creates a deterministic policy from an explicit seed.
    pub fn seeded(office_duty_probability: f64, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            office_duty_probability: office_duty_probability.clamp(0.0, 1.0),
        }
    }
}

impl Default for RandomFiller {
    fn default() -> Self {
        Self::new(DEFAULT_OFFICE_DUTY_PROBABILITY)
    }
}

impl FillerPolicy for RandomFiller {
    fn choose(&mut self, _crew: &CrewMember, _date: NaiveDate) -> FillerKind {
        if self.rng.random_bool(self.office_duty_probability) {
            FillerKind::OfficeDuty
        } else {
            FillerKind::Off
        }
    }
}

/// Always chooses an off day.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOff;

impl FillerPolicy for AlwaysOff {
    fn choose(&mut self, _crew: &CrewMember, _date: NaiveDate) -> FillerKind {
        FillerKind::Off
    }
}

/// Always chooses office duty. Mandatory-off overrides still apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOfficeDuty;

impl FillerPolicy for AlwaysOfficeDuty {
    fn choose(&mut self, _crew: &CrewMember, _date: NaiveDate) -> FillerKind {
        FillerKind::OfficeDuty
    }
}
