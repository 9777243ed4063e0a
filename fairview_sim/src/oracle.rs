//! Bust oracle for the crash simulation.
//!
//! The oracle walks the hash chain and produces the bust of every round:
//! - Round 0 uses the configured start hash
//! - Round `i` uses `SHA256(hash_{i-1})` over its hex text
//! - Busts use the text-salted derivation of the simulator

use fairview_core::{generate_bust_text, next_chain_hash};
use fairview_env::FairError;
use serde::{Deserialize, Serialize};

/// One round of the hash chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRound {
    /// Zero-based round index
    pub index: usize,

    /// Round hash (hex)
    pub hash: String,

    /// Bust multiplier, never below 1.00
    pub bust: f64,
}

/// Ground truth for crash rounds: a serial hash chain.
#[derive(Debug, Clone)]
pub struct BustOracle {
    salt: Option<String>,
    prev_hash: Option<String>,
    start_hash: String,
    next_index: usize,
}

impl BustOracle {
    /// Creates an oracle positioned before round 0.
    pub fn new(start_hash: impl Into<String>, salt: Option<String>) -> Self {
        Self {
            salt,
            prev_hash: None,
            start_hash: start_hash.into(),
            next_index: 0,
        }
    }

    /// Returns the number of rounds produced so far.
    pub fn rounds_produced(&self) -> usize {
        self.next_index
    }

    /// Produces the next round of the chain.
    pub fn advance(&mut self) -> Result<ChainRound, FairError> {
        let hash = match &self.prev_hash {
            Some(prev) => next_chain_hash(prev),
            None => self.start_hash.clone(),
        };
        let bust = generate_bust_text(&hash, self.salt.as_deref())?;

        let round = ChainRound {
            index: self.next_index,
            hash: hash.clone(),
            bust,
        };
        self.prev_hash = Some(hash);
        self.next_index += 1;
        Ok(round)
    }
}

impl Iterator for BustOracle {
    type Item = Result<ChainRound, FairError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }
}
