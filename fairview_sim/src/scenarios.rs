//! Named economy presets for the simulator.

use crate::world::SimConfig;
use fairview_env::Interval;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// ECO-001: Default population and stakes
    Baseline,

    /// ECO-002: Few players, large bets and balances
    HighRoller,

    /// ECO-003: Large population, mostly online
    Crowded,

    /// ECO-004: Low auto-cashout targets
    Cautious,

    /// ECO-005: High auto-cashout targets
    Reckless,

    /// ECO-006: Long run for RTP convergence
    Marathon,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::HighRoller,
            ScenarioId::Crowded,
            ScenarioId::Cautious,
            ScenarioId::Reckless,
            ScenarioId::Marathon,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::HighRoller => "high_roller",
            ScenarioId::Crowded => "crowded",
            ScenarioId::Cautious => "cautious",
            ScenarioId::Reckless => "reckless",
            ScenarioId::Marathon => "marathon",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "10 players, bets 1-100, cashouts 1x-10x, 1000 rounds",
            ScenarioId::HighRoller => "5 players, bets 100-10000, balances up to 1M",
            ScenarioId::Crowded => "500 players, usually 300-400 online",
            ScenarioId::Cautious => "Cashouts between 1.01x and 2x",
            ScenarioId::Reckless => "Cashouts between 10x and 100x",
            ScenarioId::Marathon => "100000 rounds to watch RTP settle",
        }
    }

    /// Returns the configuration for this scenario.
    pub fn config(&self) -> SimConfig {
        let base = SimConfig::default();
        match self {
            ScenarioId::Baseline => base,
            ScenarioId::HighRoller => SimConfig {
                bet_interval: Interval::fixed(100.0, 10_000.0),
                balance_interval: Interval::fixed(10_000.0, 1_000_000.0),
                bank: 10_000_000.0,
                ..base.with_players(5)
            },
            ScenarioId::Crowded => SimConfig {
                players_online_interval: Some(Interval::fixed(0.0, 500.0)),
                often_players_online: Some(350.0),
                bank: 1_000_000.0,
                ..base.with_players(500)
            },
            ScenarioId::Cautious => SimConfig {
                multiplier_interval: Interval::fixed(1.01, 2.0),
                ..base
            },
            ScenarioId::Reckless => SimConfig {
                multiplier_interval: Interval::fixed(10.0, 100.0),
                ..base
            },
            ScenarioId::Marathon => base.with_rounds(100_000),
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "eco-001" => Ok(ScenarioId::Baseline),
            "high_roller" | "highroller" | "eco-002" => Ok(ScenarioId::HighRoller),
            "crowded" | "eco-003" => Ok(ScenarioId::Crowded),
            "cautious" | "eco-004" => Ok(ScenarioId::Cautious),
            "reckless" | "eco-005" => Ok(ScenarioId::Reckless),
            "marathon" | "eco-006" => Ok(ScenarioId::Marathon),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
