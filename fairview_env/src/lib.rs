//! FairView Environment Layer
//!
//! Shared vocabulary for the FairView outcome engine and the crash-economy
//! simulator:
//! - Seed material and game outcome types
//! - The `FairError` taxonomy shared by every crate
//! - The `EntropySource` seam for the simulator's non-cryptographic randomness
//!
//! # Core Concept: Two Kinds of Randomness
//!
//! Game outcomes are never random: they are derived from caller-supplied seed
//! material and must be bit-identical on every replay. The simulator, however,
//! also draws synthetic player behaviour (bet sizes, auto-cashouts, who is
//! online). That behaviour goes through `EntropySource` so a run can be
//! replayed from a single 64-bit seed.
//!
//! # Example
//!
//! ```ignore
//! use fairview_env::{EntropySource, Interval, OsEntropy};
//!
//! let mut entropy = OsEntropy::new();
//! let cashout = entropy.uniform(Interval::new(1.0, 10.0)?);
//! ```

mod context;
mod types;
mod error;
mod os_impl;

pub use context::EntropySource;
pub use types::{GameOutcome, Interval, RunId, SeedMaterial};
pub use error::FairError;
pub use os_impl::OsEntropy;
