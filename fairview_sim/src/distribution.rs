//! Discrete weighted distributions for synthetic player behaviour.
//!
//! Bet sizes and the number of players online each round are drawn from a
//! bell-shaped table sampled on a fixed grid over the configured interval.

use fairview_env::{EntropySource, FairError, Interval};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Upper bound on table size; wider intervals need a coarser grid.
pub const MAX_TABLE_ENTRIES: usize = 1_000_000;

/// Ordered `(value, weight)` pairs with a cumulative prefix array.
///
/// Built once per run and never mutated. Weights are non-negative and the
/// total is strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    values: Vec<f64>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl WeightTable {
    /// Builds a table from parallel value and weight lists.
    pub fn from_pairs(values: Vec<f64>, weights: Vec<f64>) -> Result<Self, FairError> {
        if values.is_empty() {
            return Err(FairError::domain("weight table is empty"));
        }
        if values.len() != weights.len() {
            return Err(FairError::domain(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(FairError::domain(format!("invalid weight {}", bad)));
        }

        let cumulative: Vec<f64> = weights
            .iter()
            .scan(0.0, |sum, &w| {
                *sum += w;
                Some(*sum)
            })
            .collect();

        let table = Self { values, weights, cumulative };
        if table.total() <= 0.0 {
            return Err(FairError::domain("weight table has zero total weight"));
        }
        Ok(table)
    }

    /// Draws one value, uniform in `[0, total)` over the cumulative weights.
    pub fn sample<E: EntropySource + ?Sized>(&self, entropy: &mut E) -> f64 {
        self.value_at(entropy.next_f64() * self.total())
    }

    /// Returns the value of the first entry whose cumulative weight strictly
    /// exceeds `draw`, or the last value if none does.
    pub fn value_at(&self, draw: f64) -> f64 {
        let idx = self.cumulative.partition_point(|&c| c <= draw);
        self.values
            .get(idx)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or_default()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterates `(value, weight)` pairs in table order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Gaussian density at `x` with mean `peak` and standard deviation `koef`.
fn normal_density(x: f64, peak: f64, koef: f64) -> f64 {
    (1.0 / (koef * (2.0 * PI).sqrt())) * ((-1.0 / (2.0 * koef.powi(2))) * (x - peak).powi(2)).exp()
}

/// Builds a bell-shaped table peaked at `peak` over `bounds`.
///
/// The grid walk is kept exactly as historical runs produced it:
/// `interval = (to - from) / step`, `end = to * interval`, and a running
/// value starting at `from` advances by `end / interval` while below `end`.
/// Each visited value `v` yields the entry `x = v / interval` weighted by a
/// normal density with deviation `(to - from) / 3`. For `from = 0` this
/// visits `0, step, 2 * step, ...` below `to`.
pub fn build_normal_weights(peak: f64, bounds: Interval, step: f64) -> Result<WeightTable, FairError> {
    let (from, to) = (bounds.lower(), bounds.upper());
    if !step.is_finite() || step <= 0.0 {
        return Err(FairError::domain(format!("grid step must be positive, got {}", step)));
    }
    if to <= 0.0 {
        return Err(FairError::domain(format!(
            "weight table upper bound must be positive, got {}",
            to
        )));
    }
    if !peak.is_finite() {
        return Err(FairError::domain(format!("weight table peak must be finite, got {}", peak)));
    }

    let interval = (to - from) / step;
    let end = to * interval;
    let increment = end / interval;
    let koef = (to - from) / 3.0;

    let mut values = Vec::new();
    let mut weights = Vec::new();
    let mut v = from;
    while v < end {
        if values.len() >= MAX_TABLE_ENTRIES {
            return Err(FairError::domain(format!(
                "interval [{}, {}] needs more than {} table entries",
                from, to, MAX_TABLE_ENTRIES
            )));
        }
        let x = v / interval;
        values.push(x);
        weights.push(normal_density(x, peak, koef));
        v += increment;
    }

    WeightTable::from_pairs(values, weights)
}

/// A weight table flattened for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub values: Vec<f64>,
    pub weights: Vec<f64>,
}

impl From<&WeightTable> for Distribution {
    fn from(table: &WeightTable) -> Self {
        Self {
            values: table.values().to_vec(),
            weights: table.weights().to_vec(),
        }
    }
}
