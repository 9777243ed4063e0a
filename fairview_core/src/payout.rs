//! Keno payout reference tables.
//!
//! Pure data: rows are indexed by picks made (1..=10), columns by matches
//! (0..=picks). Values must stay bit-identical to the published tables.

use fairview_env::FairError;
use serde::{Deserialize, Serialize};

/// Keno risk profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KenoRisk {
    Low,
    Classic,
    Medium,
    High,
}

impl KenoRisk {
    /// Returns all risk profiles.
    pub fn all() -> [KenoRisk; 4] {
        [KenoRisk::Low, KenoRisk::Classic, KenoRisk::Medium, KenoRisk::High]
    }

    /// Returns the profile name.
    pub fn name(&self) -> &'static str {
        match self {
            KenoRisk::Low => "low",
            KenoRisk::Classic => "classic",
            KenoRisk::Medium => "medium",
            KenoRisk::High => "high",
        }
    }

    fn table(&self) -> &'static [&'static [f64]; 10] {
        match self {
            KenoRisk::Low => &LOW_MULTIPLIERS,
            KenoRisk::Classic => &CLASSIC_MULTIPLIERS,
            KenoRisk::Medium => &MEDIUM_MULTIPLIERS,
            KenoRisk::High => &HIGH_MULTIPLIERS,
        }
    }
}

impl std::fmt::Display for KenoRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for KenoRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(KenoRisk::Low),
            "classic" => Ok(KenoRisk::Classic),
            "medium" => Ok(KenoRisk::Medium),
            "high" => Ok(KenoRisk::High),
            _ => Err(format!("Unknown keno risk: {}", s)),
        }
    }
}

static LOW_MULTIPLIERS: [&[f64]; 10] = [
    &[0.7, 1.85],
    &[0.0, 2.0, 3.8],
    &[0.0, 1.1, 1.38, 26.0],
    &[0.0, 0.0, 2.2, 7.9, 90.0],
    &[0.0, 0.0, 1.5, 4.2, 13.0, 300.0],
    &[0.0, 0.0, 1.1, 2.0, 6.2, 100.0, 700.0],
    &[0.0, 0.0, 1.1, 1.6, 3.5, 15.0, 225.0, 700.0],
    &[0.0, 0.0, 1.1, 1.5, 2.0, 5.5, 39.0, 100.0, 800.0],
    &[0.0, 0.0, 1.1, 1.3, 1.7, 2.5, 7.5, 50.0, 250.0, 1000.0],
    &[0.0, 0.0, 1.1, 1.2, 1.3, 1.8, 3.5, 13.0, 50.0, 250.0, 1000.0],
];

static CLASSIC_MULTIPLIERS: [&[f64]; 10] = [
    &[0.0, 3.96],
    &[0.0, 1.9, 4.5],
    &[0.0, 1.0, 3.1, 10.4],
    &[0.0, 0.8, 1.8, 5.0, 22.5],
    &[0.0, 0.25, 1.4, 4.1, 16.5, 36.0],
    &[0.0, 0.0, 1.0, 3.68, 7.0, 16.5, 40.0],
    &[0.0, 0.0, 0.47, 3.0, 4.5, 14.0, 31.0, 60.0],
    &[0.0, 0.0, 0.0, 2.2, 4.0, 13.0, 22.0, 55.0, 70.0],
    &[0.0, 0.0, 0.0, 1.55, 3.0, 8.0, 15.0, 44.0, 60.0, 85.0],
    &[0.0, 0.0, 0.0, 1.4, 2.25, 4.5, 8.0, 17.0, 50.0, 80.0, 100.0],
];

static MEDIUM_MULTIPLIERS: [&[f64]; 10] = [
    &[0.4, 2.75],
    &[0.0, 1.8, 5.1],
    &[0.0, 0.0, 2.8, 50.0],
    &[0.0, 0.0, 1.7, 10.0, 100.0],
    &[0.0, 0.0, 1.4, 4.0, 14.0, 390.0],
    &[0.0, 0.0, 0.0, 3.0, 9.0, 180.0, 710.0],
    &[0.0, 0.0, 0.0, 2.0, 7.0, 30.0, 400.0, 800.0],
    &[0.0, 0.0, 0.0, 2.0, 4.0, 11.0, 67.0, 400.0, 900.0],
    &[0.0, 0.0, 0.0, 2.0, 2.5, 5.0, 15.0, 100.0, 500.0, 1000.0],
    &[0.0, 0.0, 0.0, 1.6, 2.0, 4.0, 7.0, 26.0, 100.0, 500.0, 1000.0],
];

static HIGH_MULTIPLIERS: [&[f64]; 10] = [
    &[0.0, 3.96],
    &[0.0, 0.0, 17.1],
    &[0.0, 0.0, 0.0, 81.5],
    &[0.0, 0.0, 0.0, 10.0, 259.0],
    &[0.0, 0.0, 0.0, 4.5, 48.0, 450.0],
    &[0.0, 0.0, 0.0, 0.0, 11.0, 350.0, 710.0],
    &[0.0, 0.0, 0.0, 0.0, 7.0, 90.0, 400.0, 800.0],
    &[0.0, 0.0, 0.0, 0.0, 5.0, 20.0, 270.0, 600.0, 900.0],
    &[0.0, 0.0, 0.0, 0.0, 4.0, 11.0, 56.0, 500.0, 800.0, 1000.0],
    &[0.0, 0.0, 0.0, 0.0, 3.5, 8.0, 13.0, 63.0, 500.0, 800.0, 1000.0],
];

/// Probability (percent) of each match count, per picks made.
static PROBABILITIES: [&[f64]; 10] = [
    &[75.0, 25.0],
    &[55.76923, 38.46154, 5.769231],
    &[41.093117, 44.02834, 13.663967, 1.2145749],
    &[29.98687, 44.42499, 21.419193, 3.9391618, 0.22978444],
    &[21.657185, 41.64843, 27.76562, 7.933034, 0.9574352, 0.03829741],
    &[15.469417, 37.126602, 32.12879, 12.692855, 2.3799102, 0.1969581, 0.00547106],
    &[
        10.919588, 31.8488, 34.3967, 17.639334, 4.5731606, 0.5879778, 0.03379183, 0.00064365,
    ],
    &[
        7.610622, 26.471727, 34.744144, 22.236254, 7.483354, 1.3303741, 0.1187834, 0.00468112,
        0.00005851,
    ],
    &[
        5.2323027, 21.404875, 33.50328, 26.058107, 10.944406, 2.5256321, 0.31180644, 0.01909019,
        0.00049371, 0.00000366,
    ],
    &[
        3.5444632, 16.878397, 31.07159, 28.820028, 14.710222, 4.236544, 0.6789334, 0.05747584,
        0.0023093, 0.00003539, 1.2e-9,
    ],
];

fn lookup(table: &[&'static [f64]; 10], picks: usize, matches: usize) -> Result<f64, FairError> {
    if !(1..=table.len()).contains(&picks) {
        return Err(FairError::domain(format!("picks must be 1..=10, got {}", picks)));
    }
    table[picks - 1].get(matches).copied().ok_or_else(|| {
        FairError::domain(format!("{} matches impossible with {} picks", matches, picks))
    })
}

/// Payout multiplier for `matches` hits out of `picks` numbers chosen.
pub fn multiplier(risk: KenoRisk, picks: usize, matches: usize) -> Result<f64, FairError> {
    lookup(risk.table(), picks, matches)
}

/// Probability in percent of `matches` hits out of `picks` numbers chosen.
pub fn probability(picks: usize, matches: usize) -> Result<f64, FairError> {
    lookup(&PROBABILITIES, picks, matches)
}
