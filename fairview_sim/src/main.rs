//! FairView CLI
//!
//! Verify provably-fair rounds and run crash-economy simulations.

use clap::{Parser, Subcommand};
use fairview_core::payout::{multiplier, probability};
use fairview_core::{generate_cells, verify, verify_crash, Game, KenoRisk};
use fairview_env::{FairError, GameOutcome, OsEntropy, SeedMaterial};
use fairview_sim::scenarios::ScenarioId;
use fairview_sim::{run_simulation, SimConfig, SimContext, SimulationReport};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Fair(#[from] FairError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seed material of one verifiable bet.
#[derive(clap::Args, Debug)]
struct SeedArgs {
    /// Server seed (revealed after the round)
    #[arg(long)]
    server_seed: String,

    /// Client seed
    #[arg(long)]
    client_seed: String,

    /// Bet nonce
    #[arg(short, long, default_value = "0")]
    nonce: u64,
}

impl SeedArgs {
    fn material(&self) -> SeedMaterial {
        SeedMaterial::new(self.server_seed.clone(), self.client_seed.clone(), self.nonce)
    }
}

/// Simulation options. Flags override the scenario or config file.
#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// Preset to start from (baseline, high_roller, crowded, cautious, reckless, marathon)
    #[arg(short = 'S', long)]
    scenario: Option<ScenarioId>,

    /// JSON config file to start from (takes precedence over --scenario)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Number of players
    #[arg(short, long)]
    players: Option<usize>,

    /// Starting bank
    #[arg(long)]
    bank: Option<f64>,

    /// Hash of round 0
    #[arg(long)]
    start_hash: Option<String>,

    /// Salt applied to every bust
    #[arg(long)]
    salt: Option<String>,

    /// Seed for player behaviour (0 = unseeded OS entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Chart down-sampling step
    #[arg(long)]
    step: Option<usize>,

    /// Write the full report to this JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// List available scenarios and exit
    #[arg(long)]
    list: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify a crash bust from its round hash
    Crash {
        /// Round hash (hex)
        #[arg(long)]
        hash: String,

        /// Optional salt
        #[arg(long)]
        salt: Option<String>,
    },

    /// Verify a limbo multiplier
    Limbo {
        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Verify a dice roll
    Dice {
        #[command(flatten)]
        seed: SeedArgs,

        /// Use the direct-byte derivation (no rounding)
        #[arg(long)]
        direct: bool,
    },

    /// Verify mine positions
    Mines {
        #[command(flatten)]
        seed: SeedArgs,

        /// Number of positions to reveal
        #[arg(long, default_value = "25")]
        reveal: usize,
    },

    /// Verify keno numbers
    Keno {
        #[command(flatten)]
        seed: SeedArgs,

        /// Number of numbers to draw
        #[arg(long, default_value = "10")]
        draws: usize,
    },

    /// Pick cells by hash-rotation order
    Cells {
        /// Round hash
        #[arg(long)]
        hash: String,

        /// Candidate cells, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        candidates: Vec<String>,

        /// Number of cells to pick
        #[arg(long)]
        correct: usize,
    },

    /// Look up a keno payout multiplier and its probability
    Payout {
        /// Risk profile (low, classic, medium, high)
        #[arg(long, default_value = "classic")]
        risk: KenoRisk,

        /// Numbers picked (1-10)
        #[arg(long)]
        picks: usize,

        /// Numbers matched
        #[arg(long)]
        matches: usize,
    },

    /// Run a crash-economy simulation
    Simulate(SimulateArgs),
}

/// FairView provably-fair toolkit
#[derive(Parser, Debug)]
#[command(name = "fairview")]
#[command(about = "Verify provably-fair rounds and simulate crash economies", long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn print_outcome(game: &str, outcome: &GameOutcome, json: bool) -> Result<(), CliError> {
    if json {
        let value = serde_json::json!({ "game": game, "outcome": outcome });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", outcome);
    }
    Ok(())
}

fn build_config(args: &SimulateArgs) -> Result<SimConfig, CliError> {
    let mut config = match (&args.config, args.scenario) {
        (Some(path), _) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        (None, Some(scenario)) => scenario.config(),
        (None, None) => SimConfig::default(),
    };

    if let Some(rounds) = args.rounds {
        config = config.with_rounds(rounds);
    }
    if let Some(players) = args.players {
        config = config.with_players(players);
    }
    if let Some(bank) = args.bank {
        config = config.with_bank(bank);
    }
    if let Some(hash) = &args.start_hash {
        config.start_hash = hash.clone();
    }
    if args.salt.is_some() {
        config.salt = args.salt.clone();
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(step) = args.step {
        config = config.with_step(step);
    }
    Ok(config)
}

fn simulate(args: &SimulateArgs, json: bool) -> Result<(), CliError> {
    if args.list {
        for scenario in ScenarioId::all() {
            println!("{:<12} {}", scenario.name(), scenario.description());
        }
        return Ok(());
    }

    let config = build_config(args)?;
    let report: SimulationReport = if config.seed == 0 {
        run_simulation(&config, &mut OsEntropy::new())?
    } else {
        run_simulation(&config, &mut SimContext::new(config.seed))?
    };

    if let Some(path) = &args.export {
        report.write_to_file(path)?;
        info!("Exported {} rounds to {}", report.ledger.rounds(), path.display());
    }

    let summary = report.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("Run {} (seed={})", summary.run_id, summary.seed);
        info!("  rounds:   {}", summary.rounds);
        info!("  players:  {}", summary.players);
        info!("  bank:     {:.2}", summary.bank);
        info!("  rtp:      {:.2}%", summary.rtp);
        info!("  ggr:      {:.2}", summary.ggr);
        info!("  max bust: {:.2}x", summary.max_bust);
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let json = args.json;
    match args.command {
        Command::Crash { hash, salt } => {
            let bust = verify_crash(&hash, salt.as_deref())?;
            print_outcome("crash", &GameOutcome::Scalar(bust), json)
        }
        Command::Limbo { seed } => {
            print_outcome("limbo", &verify(Game::Limbo, &seed.material())?, json)
        }
        Command::Dice { seed, direct } => {
            let game = if direct { Game::DiceDirect } else { Game::Dice };
            print_outcome("dice", &verify(game, &seed.material())?, json)
        }
        Command::Mines { seed, reveal } => {
            let outcome = verify(Game::Mines { reveal }, &seed.material())?;
            print_outcome("mines", &outcome, json)
        }
        Command::Keno { seed, draws } => {
            let outcome = verify(Game::Keno { draws }, &seed.material())?;
            print_outcome("keno", &outcome, json)
        }
        Command::Cells { hash, candidates, correct } => {
            let cells = generate_cells(&hash, &candidates, correct)?;
            if json {
                let value = serde_json::json!({ "game": "cells", "outcome": cells });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", cells.join(","));
            }
            Ok(())
        }
        Command::Payout { risk, picks, matches } => {
            let payout = multiplier(risk, picks, matches)?;
            let chance = probability(picks, matches)?;
            if json {
                let value = serde_json::json!({
                    "risk": risk,
                    "picks": picks,
                    "matches": matches,
                    "multiplier": payout,
                    "probability": chance,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}x ({}%)", payout, chance);
            }
            Ok(())
        }
        Command::Simulate(sim_args) => simulate(&sim_args, json),
    }
}

fn main() {
    let args = Args::parse();

    // RUST_LOG wins over --verbose when set
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
