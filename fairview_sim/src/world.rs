//! Simulation world: run configuration, players and the ledger.

use fairview_core::generate_bust_text;
use fairview_env::{FairError, Interval};
use serde::{Deserialize, Serialize};

/// Start hash used when none is configured.
pub const DEFAULT_START_HASH: &str =
    "179a9eee2b2f454e389b1299fea1412d75df2a910b34656b69f6c8207c7a3cdb";

/// Configuration for a simulation run.
///
/// Optional fields fall back to values derived from the others when the run
/// is resolved, see [`SimConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master seed for player behaviour
    pub seed: u64,

    /// Hash of round 0
    pub start_hash: String,

    /// Optional salt for every bust; empty counts as none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    /// Number of rounds to play
    pub rounds: usize,

    /// Size of the player population
    pub players_count: usize,

    /// Range of players online per round (default `[0, players_count]`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players_online_interval: Option<Interval>,

    /// Most common online count (default: midpoint of the online range)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub often_players_online: Option<f64>,

    /// Range of bet sizes
    pub bet_interval: Interval,

    /// Most common bet (default: midpoint of the bet range)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub often_bet: Option<f64>,

    /// Range of starting balances
    pub balance_interval: Interval,

    /// Range of auto-cashout multipliers
    pub multiplier_interval: Interval,

    /// Starting house bank
    pub bank: f64,

    /// Chart down-sampling step (default `rounds / 100`, at least 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_hash: DEFAULT_START_HASH.to_string(),
            salt: None,
            rounds: 1000,
            players_count: 10,
            players_online_interval: None,
            often_players_online: None,
            bet_interval: Interval::fixed(1.0, 100.0),
            often_bet: None,
            balance_interval: Interval::fixed(100.0, 1000.0),
            multiplier_interval: Interval::fixed(1.0, 10.0),
            bank: 100_000.0,
            step: None,
        }
    }
}

impl SimConfig {
    /// Sets the number of rounds.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Sets the player population.
    pub fn with_players(mut self, players_count: usize) -> Self {
        self.players_count = players_count;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the starting bank.
    pub fn with_bank(mut self, bank: f64) -> Self {
        self.bank = bank;
        self
    }

    /// Sets the start hash and salt of the chain.
    pub fn with_chain(mut self, start_hash: impl Into<String>, salt: Option<String>) -> Self {
        self.start_hash = start_hash.into();
        self.salt = salt;
        self
    }

    /// Sets the chart down-sampling step.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = Some(step);
        self
    }

    /// Validates the whole configuration and fills in derived defaults.
    ///
    /// Runs before round 0, so a bad configuration never produces a partial
    /// run.
    pub fn resolve(&self) -> Result<ResolvedConfig, FairError> {
        if self.rounds == 0 {
            return Err(FairError::domain("rounds must be at least 1"));
        }
        if self.players_count == 0 {
            return Err(FairError::domain("players_count must be at least 1"));
        }
        if self.step == Some(0) {
            return Err(FairError::domain("step must be at least 1"));
        }
        if !self.bank.is_finite() {
            return Err(FairError::domain(format!("bank must be finite, got {}", self.bank)));
        }

        // The chain only ever produces hex after round 0, so checking the
        // start hash covers every round.
        generate_bust_text(&self.start_hash, self.salt.as_deref())?;

        let players_online_interval = match self.players_online_interval {
            Some(interval) => interval,
            None => Interval::new(0.0, self.players_count as f64)?,
        };
        let bet_interval = self.bet_interval;

        Ok(ResolvedConfig {
            start_hash: self.start_hash.clone(),
            salt: self.salt.clone().filter(|s| !s.is_empty()),
            rounds: self.rounds,
            players_count: self.players_count,
            players_online_interval,
            often_players_online: finite(
                "often_players_online",
                self.often_players_online.unwrap_or(players_online_interval.midpoint()),
            )?,
            bet_interval,
            often_bet: finite("often_bet", self.often_bet.unwrap_or(bet_interval.midpoint()))?,
            balance_interval: self.balance_interval,
            multiplier_interval: self.multiplier_interval,
            bank: self.bank,
            step: self.step.unwrap_or((self.rounds / 100).max(1)),
        })
    }
}

fn unknown_player(player: usize, count: usize) -> FairError {
    FairError::domain(format!("player {} out of range for {} players", player, count))
}

fn finite(name: &str, value: f64) -> Result<f64, FairError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FairError::domain(format!("{} must be finite, got {}", name, value)))
    }
}

/// A validated configuration with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub start_hash: String,
    pub salt: Option<String>,
    pub rounds: usize,
    pub players_count: usize,
    pub players_online_interval: Interval,
    pub often_players_online: f64,
    pub bet_interval: Interval,
    pub often_bet: f64,
    pub balance_interval: Interval,
    pub multiplier_interval: Interval,
    pub bank: f64,
    pub step: usize,
}

/// Returns `win / bet * 100`, or 0 before anything was wagered.
pub fn return_to_player(total_win: f64, total_bet: f64) -> f64 {
    if total_bet == 0.0 {
        0.0
    } else {
        total_win / total_bet * 100.0
    }
}

/// A synthetic player.
///
/// Every per-round sequence gets exactly one entry per round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Current balance; may go negative
    pub balance: f64,

    /// Auto-cashout target per round (0 when sitting out)
    pub multipliers: Vec<f64>,

    /// Amount wagered per round (0 when sitting out)
    pub bets: Vec<f64>,

    /// Payout per round; a lost bet is recorded as `-bet`
    pub wins: Vec<f64>,

    pub total_bet: f64,
    pub total_win: f64,

    /// Set once after the final round
    pub rtp: f64,
}

impl Player {
    /// Creates a player with the given starting balance.
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            multipliers: Vec::new(),
            bets: Vec::new(),
            wins: Vec::new(),
            total_bet: 0.0,
            total_win: 0.0,
            rtp: 0.0,
        }
    }

    /// Number of rounds this player has recorded.
    pub fn rounds(&self) -> usize {
        self.bets.len()
    }
}

/// Aggregate state of one simulation run.
///
/// The bank moves opposite to the players: at every round boundary the bank
/// delta equals minus the sum of player balance deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub bank: f64,
    pub cumulative_bet: f64,
    pub cumulative_win: f64,

    /// Final RTP in percent, set by `finalize`
    pub rtp: f64,

    /// Final gross gaming revenue, set by `finalize`
    pub ggr: f64,

    /// RTP after each round
    pub rtp_series: Vec<f64>,

    /// GGR after each round
    pub ggr_series: Vec<f64>,

    /// Bust of each round
    pub bust_series: Vec<f64>,

    pub players: Vec<Player>,
}

impl Ledger {
    /// Creates a ledger with a starting bank and player population.
    pub fn new(bank: f64, players: Vec<Player>) -> Self {
        Self {
            bank,
            cumulative_bet: 0.0,
            cumulative_win: 0.0,
            rtp: 0.0,
            ggr: 0.0,
            rtp_series: Vec::new(),
            ggr_series: Vec::new(),
            bust_series: Vec::new(),
            players,
        }
    }

    /// Settles one bet with auto-cashout `multiplier` against `bust`.
    ///
    /// The bet moves from the player to the bank; a win at or below the bust
    /// is paid back from the bank. Returns `true` if the player cashed out.
    pub fn settle_bet(
        &mut self,
        player: usize,
        bet: f64,
        multiplier: f64,
        bust: f64,
    ) -> Result<bool, FairError> {
        let count = self.players.len();
        let p = self
            .players
            .get_mut(player)
            .ok_or_else(|| unknown_player(player, count))?;

        p.bets.push(bet);
        p.balance -= bet;
        self.bank += bet;
        p.total_bet += bet;
        self.cumulative_bet += bet;

        let cashed_out = bust >= multiplier;
        if cashed_out {
            let win = bet * multiplier;
            p.balance += win;
            p.wins.push(win);
            self.bank -= win;
            p.total_win += win;
            self.cumulative_win += win;
        } else {
            p.wins.push(-bet);
        }
        p.multipliers.push(multiplier);
        Ok(cashed_out)
    }

    /// Records a round in which `player` did not bet.
    pub fn sit_out(&mut self, player: usize) -> Result<(), FairError> {
        let count = self.players.len();
        let p = self
            .players
            .get_mut(player)
            .ok_or_else(|| unknown_player(player, count))?;
        p.bets.push(0.0);
        p.wins.push(0.0);
        p.multipliers.push(0.0);
        Ok(())
    }

    /// Appends the per-round series entries after every player has settled.
    pub fn close_round(&mut self, bust: f64) {
        self.rtp_series
            .push(return_to_player(self.cumulative_win, self.cumulative_bet));
        self.ggr_series.push(self.cumulative_bet - self.cumulative_win);
        self.bust_series.push(bust);
    }

    /// Computes final per-player and run RTP and GGR.
    pub fn finalize(&mut self) {
        for player in &mut self.players {
            player.rtp = return_to_player(player.total_win, player.total_bet);
        }
        self.rtp = return_to_player(self.cumulative_win, self.cumulative_bet);
        self.ggr = self.cumulative_bet - self.cumulative_win;
    }

    /// Number of closed rounds.
    pub fn rounds(&self) -> usize {
        self.bust_series.len()
    }

    /// Sum of all player balances.
    pub fn total_balance(&self) -> f64 {
        self.players.iter().map(|p| p.balance).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_defaults() {
        let config = SimConfig::default().with_players(20).with_rounds(5000);
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.players_online_interval, Interval::new(0.0, 20.0).unwrap());
        assert_eq!(resolved.often_players_online, 10.0);
        assert_eq!(resolved.often_bet, 50.5);
        assert_eq!(resolved.step, 50);
    }

    #[test]
    fn test_resolve_small_run_step_is_one() {
        let resolved = SimConfig::default().with_rounds(40).resolve().unwrap();
        assert_eq!(resolved.step, 1);
    }

    #[test]
    fn test_resolve_rejects_bad_config() {
        assert!(SimConfig::default().with_rounds(0).resolve().is_err());
        assert!(SimConfig::default().with_players(0).resolve().is_err());
        assert!(SimConfig::default().with_step(0).resolve().is_err());
        assert!(SimConfig::default().with_bank(f64::NAN).resolve().is_err());

        let unbounded = SimConfig {
            often_bet: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(matches!(unbounded.resolve(), Err(FairError::InvalidDomainConfig(_))));

        let bad_hash = SimConfig::default().with_chain("xyz", None);
        assert!(matches!(bad_hash.resolve(), Err(FairError::MalformedSeed(_))));
    }

    #[test]
    fn test_salted_chain_accepts_any_start_text() {
        let config = SimConfig::default().with_chain("any text", Some("salt".to_string()));
        assert!(config.resolve().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "rounds": 250, "players_count": 4, "bet_interval": [5, 50] }"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.rounds, 250);
        assert_eq!(config.players_count, 4);
        assert_eq!(config.bet_interval, Interval::new(5.0, 50.0).unwrap());
        assert_eq!(config.bank, SimConfig::default().bank);
    }

    #[test]
    fn test_config_json_rejects_inverted_interval() {
        let json = r#"{ "bet_interval": [50, 5] }"#;
        assert!(serde_json::from_str::<SimConfig>(json).is_err());
    }

    #[test]
    fn test_settle_winning_bet() {
        let mut ledger = Ledger::new(1000.0, vec![Player::new(100.0)]);
        assert!(ledger.settle_bet(0, 10.0, 2.0, 3.0).unwrap());

        let p = &ledger.players[0];
        assert_eq!(p.balance, 110.0);
        assert_eq!(p.wins, vec![20.0]);
        assert_eq!(ledger.bank, 990.0);
        assert_eq!(ledger.cumulative_win, 20.0);
    }

    #[test]
    fn test_settle_at_exact_bust_wins() {
        let mut ledger = Ledger::new(1000.0, vec![Player::new(100.0)]);
        assert!(ledger.settle_bet(0, 10.0, 2.5, 2.5).unwrap());
    }

    #[test]
    fn test_settle_losing_bet() {
        let mut ledger = Ledger::new(1000.0, vec![Player::new(100.0)]);
        assert!(!ledger.settle_bet(0, 10.0, 5.0, 1.2).unwrap());

        let p = &ledger.players[0];
        assert_eq!(p.balance, 90.0);
        assert_eq!(p.wins, vec![-10.0]);
        assert_eq!(p.multipliers, vec![5.0]);
        assert_eq!(ledger.bank, 1010.0);
    }

    #[test]
    fn test_close_round_and_finalize() {
        let mut ledger = Ledger::new(1000.0, vec![Player::new(100.0), Player::new(100.0)]);

        ledger.sit_out(0).unwrap();
        ledger.sit_out(1).unwrap();
        ledger.close_round(1.0);
        assert_eq!(ledger.rtp_series, vec![0.0]);

        ledger.settle_bet(0, 10.0, 2.0, 3.0).unwrap();
        ledger.settle_bet(1, 10.0, 4.0, 3.0).unwrap();
        ledger.close_round(3.0);
        ledger.finalize();

        assert_eq!(ledger.rounds(), 2);
        assert_relative_eq!(ledger.rtp, 100.0);
        assert_eq!(ledger.ggr, 0.0);
        assert_eq!(ledger.players[0].rtp, 200.0);
        assert_eq!(ledger.players[1].rtp, 0.0);
        assert_eq!(ledger.players[0].rounds(), 2);
        assert_eq!(ledger.total_balance() + ledger.bank, 1200.0);
    }

    #[test]
    fn test_unknown_player_is_rejected_without_side_effects() {
        let mut ledger = Ledger::new(1000.0, vec![Player::new(100.0)]);

        assert!(matches!(
            ledger.settle_bet(1, 10.0, 2.0, 3.0),
            Err(FairError::InvalidDomainConfig(_))
        ));
        assert!(matches!(ledger.sit_out(5), Err(FairError::InvalidDomainConfig(_))));
        assert_eq!(ledger.bank, 1000.0);
        assert_eq!(ledger.cumulative_bet, 0.0);
        assert!(ledger.players[0].bets.is_empty());
    }
}
