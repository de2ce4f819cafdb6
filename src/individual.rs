use std::fmt::{self, Display};

use serde::Serialize;

/// Stable identity of an individual: its position in the ring. Assigned at
/// construction and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IndividualId(pub usize);

impl Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-person infection state.
///
/// `sick_day` is only ever non-zero while `infected` is set; every transition that
/// clears `infected` also clears `sick_day`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Individual {
    id: IndividualId,
    infected: bool,
    sick_day: u32,
    times_infected: u64,
    times_cured: u64,
}

impl Individual {
    pub(crate) fn new(id: IndividualId) -> Self {
        Individual {
            id,
            infected: false,
            sick_day: 0,
            times_infected: 0,
            times_cured: 0,
        }
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn is_infected(&self) -> bool {
        self.infected
    }

    pub fn sick_day(&self) -> u32 {
        self.sick_day
    }

    pub fn times_infected(&self) -> u64 {
        self.times_infected
    }

    pub fn times_cured(&self) -> u64 {
        self.times_cured
    }

    /// Infection onset.
    pub(crate) fn infect(&mut self) {
        self.infected = true;
        self.sick_day = 0;
        self.times_infected += 1;
    }

    /// Counts one more day of sustained infection and returns the new count. The count
    /// stops at `u32::MAX`.
    pub(crate) fn progress(&mut self) -> u32 {
        debug_assert!(self.infected, "only infected individuals progress");
        self.sick_day = self.sick_day.saturating_add(1);
        self.sick_day
    }

    pub(crate) fn cure(&mut self) {
        self.infected = false;
        self.sick_day = 0;
        self.times_cured += 1;
    }
}

impl Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ID: {}, Infected: {}, SickDay: {}, TimesInfected: {}, TimesCured: {}",
            self.id, self.infected, self.sick_day, self.times_infected, self.times_cured
        )
    }
}
