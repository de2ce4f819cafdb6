//! Summary statistics over the whole ring.
//!
//! Counters are recomputed from scratch by a full lap rather than maintained as the
//! simulation runs, so a snapshot always reflects the individuals themselves.

use serde::Serialize;

use crate::population::{Population, ENTRY};

/// The counters the aggregation pass fills in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub infected_count: u64,
    pub total_times_infected: u64,
    pub total_times_cured: u64,
}

/// A point-in-time report: the configuration the population runs with plus the most
/// recently aggregated counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub population_size: usize,
    pub infection_rate_percent: u32,
    pub visit_budget: u64,
    pub infected_count: u64,
    pub total_times_infected: u64,
    pub total_times_cured: u64,
}

pub trait PopulationStatsExt {
    /// Zeroes the counters. Call before `aggregate` on every reporting cycle.
    fn reset_stats(&mut self);

    /// Adds one full lap of the ring into the counters. Never touches individuals.
    fn aggregate(&mut self);

    fn snapshot(&self) -> Snapshot;
}

impl PopulationStatsExt for Population {
    fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    fn aggregate(&mut self) {
        let mut stats = self.stats;
        for individual in self.lap(ENTRY) {
            if individual.is_infected() {
                stats.infected_count += 1;
            }
            stats.total_times_infected += individual.times_infected();
            stats.total_times_cured += individual.times_cured();
        }
        self.stats = stats;
    }

    fn snapshot(&self) -> Snapshot {
        let config = self.config();
        Snapshot {
            population_size: config.number_of_people,
            infection_rate_percent: config.infection_rate,
            visit_budget: config.visits_per_iteration,
            infected_count: self.stats.infected_count,
            total_times_infected: self.stats.total_times_infected,
            total_times_cured: self.stats.total_times_cured,
        }
    }
}
