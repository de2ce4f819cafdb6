//! The run loop shared by every front end.
//!
//! A `Simulator` owns one population together with the reporters its snapshots are
//! sent to. It decides how many visits happen between reports; the population itself
//! never loops on its own.

use std::time::{Duration, Instant};

use humantime::format_duration;
use log::{debug, info};

use crate::config::SimulationConfig;
use crate::driver::PopulationVisitExt;
use crate::error::VaccinateError;
use crate::individual::Individual;
use crate::population::{build_population, Population, ENTRY};
use crate::report::Reporter;
use crate::stats::{PopulationStatsExt, Snapshot};

pub struct Simulator {
    population: Population,
    base_seed: u64,
    reporters: Vec<Box<dyn Reporter>>,
    cycle: u64,
}

impl Simulator {
    /// Builds the population described by `config`. The infection is not seeded yet.
    ///
    /// # Errors
    /// Returns `ConstructionError` if `config` describes an empty population.
    pub fn new(config: SimulationConfig, base_seed: u64) -> Result<Self, VaccinateError> {
        Ok(Simulator {
            population: build_population(config, base_seed)?,
            base_seed,
            reporters: Vec::new(),
            cycle: 0,
        })
    }

    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn config(&self) -> &SimulationConfig {
        self.population.config()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of reporting cycles completed since the population was built.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The one-shot console run: seed the infection, visit once and report.
    ///
    /// # Errors
    /// Returns an error if a reporter fails.
    pub fn run_once(&mut self) -> Result<Snapshot, VaccinateError> {
        self.population.infect_seed();
        self.population.visit();
        self.report()
    }

    /// One reporting cycle on the current state: visit, then aggregate and report.
    ///
    /// # Errors
    /// Returns an error if a reporter fails.
    pub fn step(&mut self) -> Result<Snapshot, VaccinateError> {
        self.population.visit();
        self.report()
    }

    /// Seeds the infection and runs reporting cycles. A bounded configuration runs
    /// `max_cycles` cycles (one if not given). An unbounded configuration runs until
    /// `max_cycles` if given and otherwise does not return unless a reporter fails.
    ///
    /// # Errors
    /// Returns an error if a reporter fails.
    pub fn run_cycles(&mut self, max_cycles: Option<u64>) -> Result<Snapshot, VaccinateError> {
        let limit = match (self.config().unbounded, max_cycles) {
            (_, Some(limit)) => Some(limit),
            (false, None) => Some(1),
            (true, None) => None,
        };
        info!(
            "running {} cycles of {} visits",
            limit.map_or_else(|| "unbounded".to_string(), |l| l.to_string()),
            self.config().visits_per_iteration
        );

        let start = Instant::now();
        self.population.infect_seed();
        let mut last = self.aggregate_current();
        let mut completed = 0;
        while limit.is_none_or(|limit| completed < limit) {
            last = self.step()?;
            completed += 1;
        }
        info!(
            "finished {} cycles in {}",
            completed,
            format_duration(round_to_millis(start.elapsed()))
        );
        Ok(last)
    }

    /// Rebuilds the population from the same configuration and seed and seeds the
    /// infection again.
    ///
    /// # Errors
    /// Returns an error if the population cannot be rebuilt.
    pub fn reset(&mut self) -> Result<(), VaccinateError> {
        let config = self.config().clone();
        self.rebuild(config)?;
        self.population.infect_seed();
        Ok(())
    }

    /// Replaces the configuration and rebuilds an unseeded population from it. The
    /// simulator is unchanged if the new configuration is rejected.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<(), VaccinateError> {
        config.validate()?;
        self.rebuild(config)
    }

    /// The individuals in ring order: forward from the entry node, or backward from the
    /// tail (the entry node's predecessor) so the entry node comes last.
    pub fn individuals(&self, reverse: bool) -> Vec<&Individual> {
        if reverse {
            let tail = self.population.predecessor(ENTRY);
            self.population.reverse_lap(tail).collect()
        } else {
            self.population.lap(ENTRY).collect()
        }
    }

    fn rebuild(&mut self, config: SimulationConfig) -> Result<(), VaccinateError> {
        debug!("rebuilding population");
        self.population = build_population(config, self.base_seed)?;
        self.cycle = 0;
        Ok(())
    }

    fn aggregate_current(&mut self) -> Snapshot {
        self.population.reset_stats();
        self.population.aggregate();
        self.population.snapshot()
    }

    /// Aggregates the current state and sends it to every reporter as the next cycle.
    fn report(&mut self) -> Result<Snapshot, VaccinateError> {
        let snapshot = self.aggregate_current();
        for reporter in &mut self.reporters {
            reporter.render(self.cycle, &snapshot)?;
        }
        self.cycle += 1;
        Ok(snapshot)
    }
}

fn round_to_millis(duration: Duration) -> Duration {
    Duration::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
