//! Common types for the FairView outcome engine and simulator.

use crate::error::FairError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied seed material for one verifiable outcome.
///
/// Identical seed material always yields identical outcomes. Nothing in
/// FairView generates or mutates seeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedMaterial {
    /// HMAC key (revealed by the operator after the round)
    pub server_seed: String,

    /// Player-chosen seed, first part of the HMAC message
    pub client_seed: String,

    /// Per-bet counter, second part of the HMAC message
    pub nonce: u64,

    /// Disambiguator for batched draws; `0` is treated as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<u64>,

    /// Optional salt for the crash bust derivation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl SeedMaterial {
    /// Creates seed material without cursor or salt.
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            cursor: None,
            salt: None,
        }
    }

    /// Returns a copy with the given cursor.
    pub fn with_cursor(&self, cursor: u64) -> Self {
        Self {
            cursor: Some(cursor),
            ..self.clone()
        }
    }

    /// Returns a copy with the given salt.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Returns the HMAC message `client_seed:nonce[:cursor]`.
    ///
    /// A cursor of zero is omitted, so cursor 0 and no cursor address the
    /// same byte stream.
    pub fn message(&self) -> String {
        match self.cursor {
            Some(cursor) if cursor != 0 => {
                format!("{}:{}:{}", self.client_seed, self.nonce, cursor)
            }
            _ => format!("{}:{}", self.client_seed, self.nonce),
        }
    }
}

/// Result of verifying one game round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GameOutcome {
    /// Crash, limbo and dice multipliers/percentages
    Scalar(f64),

    /// Mines and keno cells, in draw order
    CellSet(Vec<usize>),
}

impl GameOutcome {
    /// Returns the scalar value, if this is a scalar outcome.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            GameOutcome::Scalar(v) => Some(*v),
            GameOutcome::CellSet(_) => None,
        }
    }

    /// Returns the drawn cells, if this is a cell outcome.
    pub fn as_cells(&self) -> Option<&[usize]> {
        match self {
            GameOutcome::Scalar(_) => None,
            GameOutcome::CellSet(cells) => Some(cells),
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Scalar(v) => write!(f, "{}", v),
            GameOutcome::CellSet(cells) => {
                let parts: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Half-open numeric interval `[from, to)` with `from < to`.
///
/// Serialized as a two-element array, e.g. `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Interval {
    from: f64,
    to: f64,
}

impl Interval {
    /// Creates an interval, rejecting empty, inverted or non-finite bounds.
    pub fn new(from: f64, to: f64) -> Result<Self, FairError> {
        if !from.is_finite() || !to.is_finite() {
            return Err(FairError::domain(format!(
                "interval bounds must be finite, got [{}, {}]",
                from, to
            )));
        }
        if to <= from {
            return Err(FairError::domain(format!(
                "interval upper bound {} must exceed lower bound {}",
                to, from
            )));
        }
        Ok(Self { from, to })
    }

    /// Creates an interval from literal bounds.
    ///
    /// # Panics
    ///
    /// Panics if `to <= from` or either bound is not finite.
    pub const fn fixed(from: f64, to: f64) -> Self {
        assert!(
            f64::NEG_INFINITY < from && from < to && to < f64::INFINITY,
            "interval bounds must be finite with upper above lower"
        );
        Self { from, to }
    }

    /// Returns the lower bound.
    pub fn lower(&self) -> f64 {
        self.from
    }

    /// Returns the upper bound.
    pub fn upper(&self) -> f64 {
        self.to
    }

    /// Returns the midpoint.
    pub fn midpoint(&self) -> f64 {
        (self.from + self.to) / 2.0
    }

    /// Returns the width `to - from`.
    pub fn width(&self) -> f64 {
        self.to - self.from
    }

    /// Returns true if `value` lies in `[from, to)`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.from && value < self.to
    }
}

impl TryFrom<[f64; 2]> for Interval {
    type Error = FairError;

    fn try_from(bounds: [f64; 2]) -> Result<Self, Self::Error> {
        Interval::new(bounds[0], bounds[1])
    }
}

impl From<Interval> for [f64; 2] {
    fn from(interval: Interval) -> Self {
        [interval.from, interval.to]
    }
}

/// Identifier for one simulation run, used in logs and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a new random RunId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic RunId from a seed (for replayable runs).
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 8 chars are enough to tell runs apart in logs
        write!(f, "{}", &self.0.to_string()[..8])
    }
}
