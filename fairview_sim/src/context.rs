//! Simulation context implementing EntropySource for replayable runs.

use fairview_env::EntropySource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Entropy source backed by a seeded ChaCha8 RNG.
///
/// Every synthetic decision of a run (balances, bet sizes, auto-cashouts,
/// who is online) is drawn from here, so the whole run replays from `seed`.
#[derive(Debug, Clone)]
pub struct SimContext {
    /// Master seed for this run
    seed: u64,

    /// Deterministic RNG for player behaviour
    rng: ChaCha8Rng,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl EntropySource for SimContext {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}
