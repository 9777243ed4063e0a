//! Simulation runner - plays the crash economy round by round.

use crate::context::SimContext;
use crate::distribution::{build_normal_weights, Distribution, WeightTable};
use crate::exporter::{downsample, SimulationReport};
use crate::oracle::BustOracle;
use crate::world::{Ledger, Player, ResolvedConfig, SimConfig};

use fairview_env::{EntropySource, FairError, RunId};
use tracing::{debug, info, warn};

/// Grid spacing of both weight tables.
const WEIGHT_GRID_STEP: f64 = 1.0;

/// What happened in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Zero-based round index
    pub index: usize,

    /// Round hash
    pub hash: String,

    /// Bust multiplier
    pub bust: f64,

    /// Online count drawn for this round
    pub players_bet: f64,

    /// Players that placed a bet
    pub participants: usize,

    /// Players that cashed out
    pub winners: usize,

    /// Change of the house bank over the round
    pub bank_delta: f64,

    /// Change of the summed player balances over the round
    pub balance_delta: f64,
}

/// A simulation in progress.
///
/// Built from a `SimConfig` and an entropy source; each call to `step` plays
/// one round. Rounds are strictly serial because every hash depends on the
/// previous one.
pub struct Simulation<'a, E: EntropySource + ?Sized> {
    config: SimConfig,
    resolved: ResolvedConfig,
    entropy: &'a mut E,
    oracle: BustOracle,
    bet_table: WeightTable,
    online_table: WeightTable,
    ledger: Ledger,
    run_id: RunId,
    empty_table_warned: bool,
}

impl<'a, E: EntropySource + ?Sized> Simulation<'a, E> {
    /// Validates the configuration and sets up tables and players.
    ///
    /// Nothing is played yet; any configuration error surfaces here.
    pub fn new(config: &SimConfig, entropy: &'a mut E) -> Result<Self, FairError> {
        let resolved = config.resolve()?;

        let bet_table =
            build_normal_weights(resolved.often_bet, resolved.bet_interval, WEIGHT_GRID_STEP)?;
        let online_table = build_normal_weights(
            resolved.often_players_online,
            resolved.players_online_interval,
            WEIGHT_GRID_STEP,
        )?;

        let players: Vec<Player> = (0..resolved.players_count)
            .map(|_| Player::new(entropy.uniform(resolved.balance_interval).floor()))
            .collect();

        let run_id = match entropy.seed() {
            0 => RunId::new(),
            seed => RunId::from_seed(seed),
        };

        info!(
            "Starting simulation run={} rounds={} players={} seed={}",
            run_id,
            resolved.rounds,
            resolved.players_count,
            entropy.seed()
        );
        debug!(
            "  bet table: {} entries, online table: {} entries",
            bet_table.len(),
            online_table.len()
        );

        Ok(Self {
            config: config.clone(),
            oracle: BustOracle::new(resolved.start_hash.clone(), resolved.salt.clone()),
            ledger: Ledger::new(resolved.bank, players),
            resolved,
            entropy,
            bet_table,
            online_table,
            run_id,
            empty_table_warned: false,
        })
    }

    /// Returns the ledger so far.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns true once every configured round has been played.
    pub fn is_finished(&self) -> bool {
        self.ledger.rounds() >= self.resolved.rounds
    }

    /// Plays one round.
    pub fn step(&mut self) -> Result<RoundSummary, FairError> {
        if self.is_finished() {
            return Err(FairError::domain(format!(
                "all {} rounds already played",
                self.resolved.rounds
            )));
        }

        let round = self.oracle.advance()?;
        let players_bet = self.online_table.sample(&mut *self.entropy);
        let participating = self.pick_participants(players_bet);

        let bank_before = self.ledger.bank;
        let balance_before = self.ledger.total_balance();

        let mut participants = 0;
        let mut winners = 0;
        for (player, &bets) in participating.iter().enumerate() {
            if bets {
                // Auto-cashout first, then the bet size
                let multiplier = self.entropy.uniform(self.resolved.multiplier_interval);
                let bet = self.bet_table.sample(&mut *self.entropy);
                participants += 1;
                if self.ledger.settle_bet(player, bet, multiplier, round.bust)? {
                    winners += 1;
                }
            } else {
                self.ledger.sit_out(player)?;
            }
        }
        self.ledger.close_round(round.bust);

        if (round.index + 1) % self.resolved.step == 0 {
            debug!(
                "  round={} | bust={:.2} | online={} | rtp={:.2}% | ggr={:.2} | bank={:.2}",
                round.index,
                round.bust,
                participants,
                self.ledger.rtp_series.last().copied().unwrap_or_default(),
                self.ledger.ggr_series.last().copied().unwrap_or_default(),
                self.ledger.bank
            );
        }

        Ok(RoundSummary {
            index: round.index,
            hash: round.hash,
            bust: round.bust,
            players_bet,
            participants,
            winners,
            bank_delta: self.ledger.bank - bank_before,
            balance_delta: self.ledger.total_balance() - balance_before,
        })
    }

    /// Chooses who bets this round.
    ///
    /// Draws distinct players uniformly from `[0, players_count)` until
    /// `ceil(players_bet)` are chosen. A draw at or above the population, or
    /// at or below zero, leaves the table empty for the round.
    fn pick_participants(&mut self, players_bet: f64) -> Vec<bool> {
        let count = self.resolved.players_count;
        let mut chosen = vec![false; count];

        if players_bet <= 0.0 {
            return chosen;
        }
        if players_bet >= count as f64 {
            if !self.empty_table_warned {
                warn!(
                    "Online draw {} is not below the population of {}; nobody bets in such rounds",
                    players_bet, count
                );
                self.empty_table_warned = true;
            }
            return chosen;
        }

        let target = players_bet.ceil() as usize;
        let mut picked = 0;
        while picked < target {
            let idx = self.entropy.index(count);
            if !chosen[idx] {
                chosen[idx] = true;
                picked += 1;
            }
        }
        chosen
    }

    /// Plays all remaining rounds and builds the report.
    pub fn run(mut self) -> Result<SimulationReport, FairError> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.finish())
    }

    /// Finalizes the ledger and builds the report from the rounds played.
    pub fn finish(mut self) -> SimulationReport {
        self.ledger.finalize();
        let charts = downsample(
            &self.ledger.rtp_series,
            &self.ledger.ggr_series,
            self.resolved.step,
        );

        info!(
            "Finished run={} after {} rounds | rtp={:.2}% | ggr={:.2} | bank={:.2}",
            self.run_id,
            self.ledger.rounds(),
            self.ledger.rtp,
            self.ledger.ggr,
            self.ledger.bank
        );

        SimulationReport {
            run_id: self.run_id,
            seed: self.entropy.seed(),
            config: self.config,
            numbers_axis: charts.numbers_axis,
            rtp_chart: charts.rtp_chart,
            ggr_chart: charts.ggr_chart,
            bet_distribution: Distribution::from(&self.bet_table),
            online_distribution: Distribution::from(&self.online_table),
            ledger: self.ledger,
        }
    }
}

/// Runs a whole simulation with the given entropy source.
pub fn run_simulation<E: EntropySource + ?Sized>(
    config: &SimConfig,
    entropy: &mut E,
) -> Result<SimulationReport, FairError> {
    Simulation::new(config, entropy)?.run()
}

/// Runs a whole simulation, replayable from `config.seed`.
pub fn run_seeded(config: &SimConfig) -> Result<SimulationReport, FairError> {
    let mut context = SimContext::new(config.seed);
    run_simulation(config, &mut context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig::default().with_rounds(200).with_players(8)
    }

    #[test]
    fn test_run_lengths() {
        let report = run_seeded(&small_config()).unwrap();

        assert_eq!(report.ledger.rounds(), 200);
        assert_eq!(report.ledger.rtp_series.len(), 200);
        assert_eq!(report.ledger.ggr_series.len(), 200);
        assert_eq!(report.ledger.players.len(), 8);
        for player in &report.ledger.players {
            assert_eq!(player.bets.len(), 200);
            assert_eq!(player.wins.len(), 200);
            assert_eq!(player.multipliers.len(), 200);
        }
        // step = 200 / 100 = 2
        assert_eq!(report.numbers_axis.len(), 100);
        assert_eq!(report.rtp_chart.len(), 99);
    }

    #[test]
    fn test_seeded_run_is_deterministic() {
        let a = run_seeded(&small_config()).unwrap();
        let b = run_seeded(&small_config()).unwrap();
        assert_eq!(a, b);

        let c = run_seeded(&small_config().with_seed(7)).unwrap();
        assert_eq!(a.ledger.bust_series, c.ledger.bust_series);
        assert_ne!(a.ledger.players, c.ledger.players);
    }

    #[test]
    fn test_balances_are_floored_draws() {
        let config = small_config();
        let mut ctx = SimContext::new(42);
        let sim = Simulation::new(&config, &mut ctx).unwrap();

        // Balances are the first draws of the run
        let mut replay = SimContext::new(42);
        for player in &sim.ledger().players {
            assert_eq!(player.balance, replay.uniform(config.balance_interval).floor());
            assert!(config.balance_interval.contains(player.balance));
        }
    }

    #[test]
    fn test_step_after_finish_is_error() {
        let mut ctx = SimContext::new(1);
        let config = SimConfig::default().with_rounds(2).with_players(3);
        let mut sim = Simulation::new(&config, &mut ctx).unwrap();

        sim.step().unwrap();
        sim.step().unwrap();
        assert!(sim.is_finished());
        assert!(sim.step().is_err());
    }

    #[test]
    fn test_invalid_config_fails_before_round_zero() {
        let mut ctx = SimContext::new(1);
        let config = SimConfig {
            often_players_online: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(&config, &mut ctx),
            Err(FairError::InvalidDomainConfig(_))
        ));
    }

    #[test]
    fn test_participants_never_exceed_population() {
        let mut ctx = SimContext::new(3);
        let config = SimConfig::default().with_rounds(300).with_players(5);
        let mut sim = Simulation::new(&config, &mut ctx).unwrap();

        while !sim.is_finished() {
            let round = sim.step().unwrap();
            assert!(round.participants <= 5);
            assert!(round.winners <= round.participants);
            assert_eq!(round.participants, round.players_bet.max(0.0).ceil() as usize);
        }
    }
}
