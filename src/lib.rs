//! A stochastic simulation of an infection spreading through a closed population.
//!
//! People stand in a ring and only ever meet their two immediate neighbors. The
//! central object is the [`Population`], which owns the ring, its configuration and
//! its random source. A run consists of a few core services:
//! * [`build_population`] constructs a ring of healthy people from a
//!   [`SimulationConfig`], and [`Population::infect_seed`] starts the epidemic at the
//!   first person.
//! * [`PopulationVisitExt::visit`] walks the ring for a fixed number of steps. Every
//!   infected person it passes sneezes on both neighbors: a healthy neighbor catches
//!   the infection with probability `infection_rate / 100`, an infected one moves a
//!   day closer to recovery.
//! * [`PopulationStatsExt`] recomputes summary counters with a full lap of the ring
//!   and packages them with the configuration as a [`Snapshot`].
//!
//! Everything else presents those snapshots: a [`Simulator`] drives reporting cycles
//! and hands each snapshot to its [`Reporter`]s, the [`runner`] turns command line
//! arguments into a run, and the `repl` module offers an interactive prompt.
//!
//! ```
//! use vaccinate::{build_population, PopulationStatsExt, PopulationVisitExt, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     infection_rate: 100,
//!     max_sick_days: 0,
//!     number_of_people: 10,
//!     visits_per_iteration: 2,
//!     unbounded: false,
//! };
//! let mut population = build_population(config, 42).unwrap();
//! population.infect_seed();
//! population.visit();
//! population.reset_stats();
//! population.aggregate();
//! assert_eq!(population.snapshot().infected_count, 3);
//! ```
pub mod config;
pub mod contact;
pub mod driver;
pub mod error;
pub mod hashing;
pub mod individual;
pub mod log;
pub mod population;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulator;
pub mod stats;

#[cfg(feature = "repl")]
pub mod repl;

pub use config::SimulationConfig;
pub use contact::{ContactModel, ContactOutcome};
pub use driver::PopulationVisitExt;
pub use error::VaccinateError;
pub use individual::{Individual, IndividualId};
pub use population::{build_population, Population};
pub use random::{ContactRng, PercentSource};
pub use report::{CsvReporter, ReportOptions, Reporter, TableReporter};
pub use simulator::Simulator;
pub use stats::{PopulationStatsExt, Snapshot};

// Re-export for use in client code
pub use rand;
pub use serde_json;
