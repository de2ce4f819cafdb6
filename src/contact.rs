//! The contact ("sneeze") transition.
//!
//! One contact is an infected source touching one neighbor. A healthy neighbor catches
//! the infection with probability `infection_rate / 100`, drawn independently for every
//! contact. An infected neighbor instead counts another sick day and recovers once the
//! count passes `max_sick_days`; recovery never draws from the random source.

use log::trace;

use crate::config::SimulationConfig;
use crate::individual::{Individual, IndividualId};
use crate::random::PercentSource;

/// What a single contact did to the neighbor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The neighbor was healthy and caught the infection.
    Infected,
    /// The neighbor was healthy and stayed healthy.
    Spared,
    /// The neighbor was already infected and is now one sick day further along.
    Progressed,
    /// The neighbor was already infected and has now recovered.
    Recovered,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactModel {
    pub infection_rate: u32,
    pub max_sick_days: u32,
}

impl From<&SimulationConfig> for ContactModel {
    fn from(config: &SimulationConfig) -> Self {
        ContactModel {
            infection_rate: config.infection_rate,
            max_sick_days: config.max_sick_days,
        }
    }
}

impl ContactModel {
    /// Applies one contact from `source` to `neighbor`. Consumes one draw when the
    /// neighbor is healthy and none otherwise.
    pub fn apply(
        &self,
        source: IndividualId,
        neighbor: &mut Individual,
        rng: &mut dyn PercentSource,
    ) -> ContactOutcome {
        let outcome = if neighbor.is_infected() {
            if neighbor.progress() > self.max_sick_days {
                neighbor.cure();
                ContactOutcome::Recovered
            } else {
                ContactOutcome::Progressed
            }
        } else if rng.sample_percent() < self.infection_rate {
            neighbor.infect();
            ContactOutcome::Infected
        } else {
            ContactOutcome::Spared
        };
        trace!("contact {} -> {}: {:?}", source, neighbor.id(), outcome);
        outcome
    }
}
