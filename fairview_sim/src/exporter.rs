//! JSON export of simulation runs for charting.

use crate::distribution::Distribution;
use crate::world::{Ledger, SimConfig};
use fairview_env::RunId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Run identifier
    pub run_id: RunId,

    /// Seed of the entropy source (0 when unseeded)
    pub seed: u64,

    /// Configuration the run was started with
    pub config: SimConfig,

    /// Full-resolution ledger, players included
    pub ledger: Ledger,

    /// Round indices of the down-sampled charts
    pub numbers_axis: Vec<usize>,

    /// Down-sampled RTP, without its first sample
    pub rtp_chart: Vec<f64>,

    /// Down-sampled GGR
    pub ggr_chart: Vec<f64>,

    /// Bet size distribution used by the run
    pub bet_distribution: Distribution,

    /// Online player count distribution used by the run
    pub online_distribution: Distribution,
}

/// Headline numbers of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub run_id: RunId,
    pub seed: u64,
    pub rounds: usize,
    pub players: usize,
    pub bank: f64,
    pub rtp: f64,
    pub ggr: f64,
    pub max_bust: f64,
}

impl SimulationReport {
    /// Returns the headline numbers.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            run_id: self.run_id,
            seed: self.seed,
            rounds: self.ledger.rounds(),
            players: self.ledger.players.len(),
            bank: self.ledger.bank,
            rtp: self.ledger.rtp,
            ggr: self.ledger.ggr,
            max_bust: self.ledger.bust_series.iter().copied().fold(0.0, f64::max),
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Down-sampled chart series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Charts {
    pub numbers_axis: Vec<usize>,
    pub rtp_chart: Vec<f64>,
    pub ggr_chart: Vec<f64>,
}

/// Samples indices `0, step, 2 * step, ...` of the per-round series.
///
/// The numbers axis and GGR chart get one entry per sampled index. The RTP
/// chart drops its first sample, which is always 0 or a single-round value.
pub fn downsample(rtp_series: &[f64], ggr_series: &[f64], step: usize) -> Charts {
    let len = rtp_series.len().min(ggr_series.len());
    let numbers_axis: Vec<usize> = (0..len).step_by(step.max(1)).collect();

    Charts {
        rtp_chart: numbers_axis.iter().skip(1).map(|&i| rtp_series[i]).collect(),
        ggr_chart: numbers_axis.iter().map(|&i| ggr_series[i]).collect(),
        numbers_axis,
    }
}
