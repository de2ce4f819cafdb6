//! Advancing the simulation.
//!
//! A visit walks the ring from the entry node for a fixed number of steps, wrapping as
//! often as the budget requires. Every infected node on the way sneezes on its
//! predecessor and then on its successor. The walk is in place: someone infected
//! earlier in the same visit is contagious by the time the walk reaches them.

use log::trace;

use crate::contact::{ContactModel, ContactOutcome};
use crate::individual::IndividualId;
use crate::population::{Population, ENTRY};

pub trait PopulationVisitExt {
    /// Applies the contact model from `id` to both of its neighbors, predecessor first,
    /// if `id` is infected. Does nothing otherwise.
    fn epoch(&mut self, id: IndividualId);

    /// Visits exactly `visits_per_iteration` nodes starting at the entry node. A budget
    /// of zero is a no-op: this never loops on its own, whatever `unbounded` says.
    fn visit(&mut self);
}

impl PopulationVisitExt for Population {
    fn epoch(&mut self, id: IndividualId) {
        if !self.get(id).is_infected() {
            return;
        }
        let model = ContactModel::from(self.config());
        for neighbor in [self.predecessor(id), self.successor(id)] {
            contact(self, &model, id, neighbor);
        }
    }

    fn visit(&mut self) {
        let budget = self.config().visits_per_iteration;
        if budget == 0 {
            trace!("visit budget is zero, skipping");
            return;
        }
        trace!("visiting {} nodes", budget);
        let mut current = ENTRY;
        for _ in 0..budget {
            self.epoch(current);
            current = self.successor(current);
        }
    }
}

fn contact(
    population: &mut Population,
    model: &ContactModel,
    source: IndividualId,
    neighbor: IndividualId,
) -> ContactOutcome {
    let (neighbor, rng) = population.individual_and_rng(neighbor);
    model.apply(source, neighbor, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::individual::Individual;
    use crate::population::build_population;
    use crate::random::test_support::ScriptedSource;

    fn config(
        number_of_people: usize,
        infection_rate: u32,
        max_sick_days: u32,
        visits_per_iteration: u64,
    ) -> SimulationConfig {
        SimulationConfig {
            infection_rate,
            max_sick_days,
            number_of_people,
            visits_per_iteration,
            unbounded: false,
        }
    }

    fn states(population: &Population) -> Vec<Individual> {
        population.lap(ENTRY).cloned().collect()
    }

    #[test]
    fn two_visits_at_full_rate_with_immediate_recovery() {
        let mut population = build_population(config(10, 100, 0, 2), 0).unwrap();
        population.infect_seed();
        population.visit();

        // Node 0 infects 9 and 1. The walk then reaches node 1, which re-exposes node 0
        // (recovering it, since max_sick_days is 0) and infects node 2.
        for id in [9, 1, 2] {
            let individual = population.get(IndividualId(id));
            assert!(individual.is_infected(), "node {id} should be infected");
            assert_eq!(individual.times_infected(), 1);
            assert_eq!(individual.sick_day(), 0);
            assert_eq!(individual.times_cured(), 0);
        }
        let seed = population.get(ENTRY);
        assert!(!seed.is_infected());
        assert_eq!(seed.sick_day(), 0);
        assert_eq!(seed.times_infected(), 1);
        assert_eq!(seed.times_cured(), 1);
        for id in 3..9 {
            assert_eq!(
                population.get(IndividualId(id)),
                &Individual::new(IndividualId(id))
            );
        }
    }

    #[test]
    fn zero_budget_changes_nothing() {
        let mut population = build_population(config(10, 100, 3, 0), 0).unwrap();
        population.infect_seed();
        let before = states(&population);
        population.visit();
        assert_eq!(states(&population), before);
    }

    #[test]
    fn zero_budget_ignores_unbounded() {
        let mut unbounded = config(10, 100, 3, 0);
        unbounded.unbounded = true;
        let mut population = build_population(unbounded, 0).unwrap();
        population.infect_seed();
        let before = states(&population);
        population.visit();
        assert_eq!(states(&population), before);
    }

    #[test]
    fn zero_rate_never_spreads() {
        let mut population = build_population(config(25, 0, 3, 1000), 5).unwrap();
        population.infect_seed();
        for _ in 0..20 {
            population.visit();
        }
        assert!(population
            .lap(ENTRY)
            .skip(1)
            .all(|i| !i.is_infected() && i.times_infected() == 0));
    }

    #[test]
    fn healthy_nodes_do_not_sneeze() {
        let mut population = build_population(config(5, 100, 3, 50), 0).unwrap();
        let before = states(&population);
        population.visit();
        assert_eq!(states(&population), before);
    }

    #[test]
    fn predecessor_is_contacted_first() {
        // Draws: 0 infects the predecessor, 99 spares the successor.
        let source = Box::new(ScriptedSource::new(&[0, 99]));
        let mut population = Population::with_source(config(5, 50, 3, 1), source).unwrap();
        population.infect_seed();
        population.epoch(ENTRY);
        assert!(population.get(IndividualId(4)).is_infected());
        assert!(!population.get(IndividualId(1)).is_infected());
    }

    #[test]
    fn epoch_on_healthy_node_draws_nothing() {
        let source = Box::new(ScriptedSource::new(&[]));
        let mut population = Population::with_source(config(5, 50, 3, 1), source).unwrap();
        population.epoch(IndividualId(3));
        assert!(population.lap(ENTRY).all(|i| !i.is_infected()));
    }

    #[test]
    fn budget_smaller_than_ring_stops_early() {
        let mut population = build_population(config(10, 100, 5, 1), 0).unwrap();
        population.infect_seed();
        population.visit();
        // Only node 0 was visited, so only its two neighbors were touched.
        let infected: Vec<usize> = population
            .lap(ENTRY)
            .filter(|i| i.is_infected())
            .map(|i| i.id().0)
            .collect();
        assert_eq!(infected, vec![0, 1, 9]);
    }

    #[test]
    fn budget_larger_than_ring_wraps() {
        // Three nodes, full rate, nobody ever recovers within the run: after wrapping
        // the ring everyone has been infected exactly once.
        let mut population = build_population(config(3, 100, 1000, 7), 0).unwrap();
        population.infect_seed();
        population.visit();
        assert!(population
            .lap(ENTRY)
            .all(|i| i.is_infected() && i.times_infected() == 1));
        // Node 0 is visited three times (steps 1, 4, 7) and its neighbors are each
        // contacted by it and by each other.
        assert!(population.get(ENTRY).sick_day() > 0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = |seed| {
            let mut population = build_population(config(50, 30, 3, 5000), seed).unwrap();
            population.infect_seed();
            population.visit();
            states(&population)
        };
        assert_eq!(run(11), run(11));
    }
}
