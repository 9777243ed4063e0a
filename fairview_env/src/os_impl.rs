//! Production implementation of EntropySource backed by OS entropy.

use crate::EntropySource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Unseeded entropy for ad-hoc simulation runs.
///
/// Draws are not reproducible. Use `SimContext` from `fairview_sim` when a
/// run must be replayable.
pub struct OsEntropy {
    rng: StdRng,
}

impl OsEntropy {
    /// Creates a new OsEntropy seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for OsEntropy {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
