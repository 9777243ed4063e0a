//! Entropy abstraction for simulated player behaviour.

use crate::types::Interval;

/// The source of non-cryptographic randomness used by the simulator.
///
/// Outcome derivation never touches this trait; it only drives the synthetic
/// population (balances, bet sizes, auto-cashout targets, participation).
///
/// # Implementations
///
/// - **Production**: `OsEntropy` - OS-seeded `StdRng`
/// - **Simulation**: `SimContext` - `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// A seeded implementation must return the same sequence of draws for the
/// same seed, so any simulation run can be reproduced from its seed number.
pub trait EntropySource {
    /// Returns a uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Returns the seed this source was created from.
    ///
    /// Unseeded (production) sources return 0.
    fn seed(&self) -> u64;

    /// Returns a uniform draw in `[interval.lower(), interval.upper())`.
    fn uniform(&mut self, interval: Interval) -> f64 {
        interval.lower() + self.next_f64() * interval.width()
    }

    /// Returns a uniform integer in `[0, upper)`.
    ///
    /// `upper` must be non-zero.
    fn index(&mut self, upper: usize) -> usize {
        let idx = (self.next_f64() * upper as f64).floor() as usize;
        // Guards against a draw rounding up to `upper` for huge bounds
        idx.min(upper.saturating_sub(1))
    }
}
