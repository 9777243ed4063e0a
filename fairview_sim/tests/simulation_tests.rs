//! End-to-end properties of the crash-economy simulator.

use approx::assert_abs_diff_eq;
use fairview_core::verify_crash;
use fairview_env::{EntropySource, FairError, Interval};
use fairview_sim::scenarios::ScenarioId;
use fairview_sim::{run_seeded, run_simulation, SimConfig, SimContext, Simulation, SimulationReport};

fn reference_config() -> SimConfig {
    SimConfig::default()
        .with_rounds(1000)
        .with_players(10)
        .with_bank(100_000.0)
}

#[test]
fn test_reference_run_shapes() {
    let report = run_seeded(&reference_config()).unwrap();

    assert_eq!(report.ledger.rtp_series.len(), 1000);
    assert_eq!(report.ledger.ggr_series.len(), 1000);
    assert_eq!(report.ledger.bust_series.len(), 1000);

    assert_eq!(report.numbers_axis.len(), 100);
    assert_eq!(report.ggr_chart.len(), 100);
    assert_eq!(report.rtp_chart.len(), 99);
    assert_eq!(report.numbers_axis[1], 10);
    assert_eq!(report.ggr_chart[1], report.ledger.ggr_series[10]);
    assert_eq!(report.rtp_chart[0], report.ledger.rtp_series[10]);
}

#[test]
fn test_charts_grow_with_round_count() {
    let short = run_seeded(&reference_config().with_rounds(500).with_step(10)).unwrap();
    let long = run_seeded(&reference_config().with_rounds(2000).with_step(10)).unwrap();

    assert!(long.rtp_chart.len() > short.rtp_chart.len());
    assert!(long.ggr_chart.len() > short.ggr_chart.len());
}

#[test]
fn test_bank_conservation_every_round() {
    let config = reference_config();
    let mut ctx = SimContext::new(config.seed);
    let mut sim = Simulation::new(&config, &mut ctx).unwrap();

    let start_total = sim.ledger().bank + sim.ledger().total_balance();
    while !sim.is_finished() {
        let round = sim.step().unwrap();
        assert_abs_diff_eq!(round.bank_delta, -round.balance_delta, epsilon = 1e-6);
    }
    let end_total = sim.ledger().bank + sim.ledger().total_balance();
    assert_abs_diff_eq!(start_total, end_total, epsilon = 1e-4);
}

#[test]
fn test_rtp_recomputed_from_player_arrays() {
    let report = run_seeded(&reference_config()).unwrap();
    let ledger = &report.ledger;

    let total_bet: f64 = ledger.players.iter().flat_map(|p| p.bets.iter()).sum();
    let total_win: f64 = ledger
        .players
        .iter()
        .flat_map(|p| p.wins.iter())
        .filter(|w| **w > 0.0)
        .sum();

    assert!(total_bet > 0.0);
    assert_abs_diff_eq!(total_bet, ledger.cumulative_bet, epsilon = 1e-6);
    assert_abs_diff_eq!(total_win, ledger.cumulative_win, epsilon = 1e-6);
    assert_abs_diff_eq!(ledger.rtp, total_win / total_bet * 100.0, epsilon = 1e-6);
    assert_abs_diff_eq!(ledger.ggr, total_bet - total_win, epsilon = 1e-6);
    assert_eq!(ledger.rtp, *ledger.rtp_series.last().unwrap());

    for player in &ledger.players {
        let bet: f64 = player.bets.iter().sum();
        if bet > 0.0 {
            let win: f64 = player.wins.iter().filter(|w| **w > 0.0).sum();
            assert_abs_diff_eq!(player.rtp, win / bet * 100.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_busts_follow_the_verifiable_chain() {
    let report = run_seeded(&reference_config().with_rounds(50)).unwrap();
    let expected = verify_crash(&report.config.start_hash, None).unwrap();

    assert_eq!(report.ledger.bust_series[0], expected);
    assert!(report.ledger.bust_series.iter().all(|b| *b >= 1.0));
}

#[test]
fn test_same_seed_same_report() {
    let a = run_seeded(&reference_config()).unwrap();
    let b = run_seeded(&reference_config()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_online_draw_at_population_leaves_table_empty() {
    // Grid over [50, 60) yields online counts 5, 11, 17, ... never below 5
    let config = SimConfig {
        players_online_interval: Some(Interval::new(50.0, 60.0).unwrap()),
        ..SimConfig::default().with_rounds(100).with_players(5)
    };
    let report = run_seeded(&config).unwrap();

    assert_eq!(report.ledger.cumulative_bet, 0.0);
    assert_eq!(report.ledger.bank, 100_000.0);
    assert!(report.ledger.rtp_series.iter().all(|r| *r == 0.0));
    assert!(report
        .ledger
        .players
        .iter()
        .all(|p| p.bets.iter().all(|b| *b == 0.0)));
}

#[test]
fn test_invalid_config_rejected_before_any_round() {
    let config = SimConfig::default().with_players(0);
    let mut ctx = SimContext::new(1);
    let before = ctx.clone().next_f64();

    assert!(matches!(
        run_simulation(&config, &mut ctx),
        Err(FairError::InvalidDomainConfig(_))
    ));
    // No entropy consumed
    assert_eq!(ctx.next_f64(), before);
}

#[test]
fn test_report_export_round_trip() {
    let report = run_seeded(&ScenarioId::Cautious.config().with_rounds(100)).unwrap();
    let path = std::env::temp_dir().join(format!("fairview_report_{}.json", report.run_id));

    report.write_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let restored: SimulationReport = serde_json::from_str(&text).unwrap();
    assert_eq!(restored.numbers_axis, report.numbers_axis);
    assert_eq!(restored.ledger.rounds(), 100);
    assert_eq!(restored.bet_distribution.values.len(), report.bet_distribution.values.len());
}
