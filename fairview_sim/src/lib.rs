//! FairView Crash-Economy Simulator
//!
//! Plays a synthetic player population against a crash hash chain to study
//! house economics: bank, cumulative bets and wins, RTP and GGR over time.
//!
//! # Core Principle: Two Independent Sources
//!
//! - **Busts** come from the hash chain and never depend on the players
//! - **Player behaviour** comes from an `EntropySource`; a seeded
//!   `SimContext` replays a whole run from one 64-bit seed
//!
//! # Round Flow
//!
//! ```text
//! BustOracle ──► bust_i
//!                  │
//! online table ──► who bets ──► cashout + bet size ──► Ledger
//!                                                        │
//!                                    rtp / ggr / bust series ──► SimulationReport
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use fairview_sim::{run_seeded, SimConfig};
//!
//! let config = SimConfig::default().with_rounds(1000).with_players(10);
//! let report = run_seeded(&config)?;
//! println!("RTP {:.2}%", report.ledger.rtp);
//! ```

mod context;
mod distribution;
mod exporter;
mod oracle;
mod runner;
mod world;
pub mod scenarios;

pub use context::SimContext;
pub use distribution::{build_normal_weights, Distribution, WeightTable};
pub use exporter::{downsample, Charts, ReportSummary, SimulationReport};
pub use oracle::{BustOracle, ChainRound};
pub use runner::{run_seeded, run_simulation, RoundSummary, Simulation};
pub use world::{Ledger, Player, ResolvedConfig, SimConfig, DEFAULT_START_HASH};
