//! The ring of individuals.
//!
//! Individuals live in a fixed-size arena indexed by `IndividualId`. The ring order is
//! implicit: the predecessor of `i` is `(i - 1 + N) % N` and the successor is
//! `(i + 1) % N`, so the ring is closed by construction and neighbor lookup is O(1).
//! The population also owns the configuration it was built from, the statistics
//! record and the random source, so that nothing about a run is process-wide.

use log::debug;

use crate::config::SimulationConfig;
use crate::error::VaccinateError;
use crate::individual::{Individual, IndividualId};
use crate::random::{ContactRng, PercentSource};
use crate::stats::Stats;

/// The node every traversal starts from. It is also the node `infect_seed` infects.
pub const ENTRY: IndividualId = IndividualId(0);

pub struct Population {
    config: SimulationConfig,
    individuals: Vec<Individual>,
    pub(crate) stats: Stats,
    rng: Box<dyn PercentSource>,
}

/// Builds a population using the default random source seeded with `base_seed`.
///
/// # Errors
/// Returns `ConstructionError` if `number_of_people` is zero.
pub fn build_population(
    config: SimulationConfig,
    base_seed: u64,
) -> Result<Population, VaccinateError> {
    Population::with_source(config, Box::new(ContactRng::new(base_seed)))
}

impl Population {
    /// Builds a population that draws from `rng`.
    ///
    /// # Errors
    /// Returns `ConstructionError` if `number_of_people` is zero.
    pub fn with_source(
        config: SimulationConfig,
        rng: Box<dyn PercentSource>,
    ) -> Result<Population, VaccinateError> {
        if config.number_of_people == 0 {
            return Err(VaccinateError::ConstructionError(
                "a population needs at least one person".to_string(),
            ));
        }
        let individuals = (0..config.number_of_people)
            .map(|id| Individual::new(IndividualId(id)))
            .collect();
        debug!(
            "built ring of {} people (infection rate {}%, max sick days {})",
            config.number_of_people, config.infection_rate, config.max_sick_days
        );
        Ok(Population {
            config,
            individuals,
            stats: Stats::default(),
            rng,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always false: construction rejects empty rings.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Infects the entry node. Call once per run; a second call counts a second
    /// infection on the same person.
    pub fn infect_seed(&mut self) {
        debug!("seeding infection at {}", ENTRY);
        self.individuals[ENTRY.0].infect();
    }

    /// # Panics
    /// Panics if `id` does not belong to this population.
    pub fn get(&self, id: IndividualId) -> &Individual {
        &self.individuals[id.0]
    }

    /// Borrows one individual together with the random source, for the contact model.
    pub(crate) fn individual_and_rng(
        &mut self,
        id: IndividualId,
    ) -> (&mut Individual, &mut dyn PercentSource) {
        (&mut self.individuals[id.0], self.rng.as_mut())
    }

    pub fn predecessor(&self, id: IndividualId) -> IndividualId {
        let n = self.individuals.len();
        IndividualId((id.0 + n - 1) % n)
    }

    pub fn successor(&self, id: IndividualId) -> IndividualId {
        IndividualId((id.0 + 1) % self.individuals.len())
    }

    /// Walks the ring once, forward, starting (and ending just before returning) at
    /// `start`.
    pub fn lap(&self, start: IndividualId) -> Lap<'_> {
        Lap {
            population: self,
            start,
            current: Some(start),
            reverse: false,
        }
    }

    /// Like [`Population::lap`] but following predecessors.
    pub fn reverse_lap(&self, start: IndividualId) -> Lap<'_> {
        Lap {
            population: self,
            start,
            current: Some(start),
            reverse: true,
        }
    }
}

/// One trip around the ring. Stops when the walk returns to its start node, not after a
/// count.
pub struct Lap<'a> {
    population: &'a Population,
    start: IndividualId,
    current: Option<IndividualId>,
    reverse: bool,
}

impl<'a> Iterator for Lap<'a> {
    type Item = &'a Individual;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let next = if self.reverse {
            self.population.predecessor(id)
        } else {
            self.population.successor(id)
        };
        self.current = (next != self.start).then_some(next);
        Some(self.population.get(id))
    }
}
