//! The random source consumed by the contact model.
//!
//! Every population owns exactly one source. Draw order is part of the reproducibility
//! contract: two populations built from the same configuration and seed see the same
//! stream and therefore evolve identically.

use log::trace;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::hashing::hash_str;

/// Exclusive upper bound of a percentage draw.
pub const PERCENT_RANGE: u32 = 100;

/// A uniform source of integers in `[0, 100)`.
pub trait PercentSource {
    fn sample_percent(&mut self) -> u32;
}

/// The default source: a `SmallRng` seeded from the run's base seed plus a fixed offset
/// derived from the stream name.
pub struct ContactRng {
    rng: SmallRng,
}

impl ContactRng {
    const NAME: &'static str = "ContactRng";

    pub fn new(base_seed: u64) -> Self {
        let seed_offset = hash_str(Self::NAME);
        trace!(
            "creating new RNG (seed={}) for {}",
            base_seed,
            Self::NAME
        );
        ContactRng {
            rng: SmallRng::seed_from_u64(base_seed.wrapping_add(seed_offset)),
        }
    }
}

impl PercentSource for ContactRng {
    fn sample_percent(&mut self) -> u32 {
        self.rng.random_range(0..PERCENT_RANGE)
    }
}
