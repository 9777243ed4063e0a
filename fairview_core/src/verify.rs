//! Verification entry points, one per game.
//!
//! Each function recomputes a published round from its seed material. They
//! are pure: the same input always returns the same result or the same error.

use crate::outcome::{dice_result, dice_result_direct, generate_bust, limbo_result};
use crate::permutation::{CellGame, DrawInput, HashRotationShuffle};
use fairview_env::{FairError, GameOutcome, SeedMaterial};
use serde::{Deserialize, Serialize};

/// Crash bust for a round hash, optionally salted. Never below 1.00.
pub fn verify_crash(hash: &str, salt: Option<&str>) -> Result<f64, FairError> {
    generate_bust(hash, salt)
}

/// Limbo multiplier. Never below 1.00.
pub fn verify_limbo(seed: &SeedMaterial) -> Result<f64, FairError> {
    limbo_result(seed)
}

/// Dice roll, chunked derivation rounded down to 2 decimals.
pub fn verify_dice(seed: &SeedMaterial) -> Result<f64, FairError> {
    dice_result(seed)
}

/// Dice roll, direct-byte derivation without rounding.
pub fn verify_dice_direct(seed: &SeedMaterial) -> Result<f64, FairError> {
    dice_result_direct(seed)
}

/// First `reveal_count` mine positions on the 25-cell board.
pub fn verify_mines(seed: &SeedMaterial, reveal_count: usize) -> Result<Vec<usize>, FairError> {
    CellGame::Mines.draw(DrawInput::Seed(seed), reveal_count)
}

/// First `draw_count` keno numbers (0-based) on the 40-cell board.
pub fn verify_keno(seed: &SeedMaterial, draw_count: usize) -> Result<Vec<usize>, FairError> {
    CellGame::Keno.draw(DrawInput::Seed(seed), draw_count)
}

/// The first `correct_count` candidates in hash-rotation order.
pub fn generate_cells<T: Clone>(
    hash: &str,
    candidate_cells: &[T],
    correct_count: usize,
) -> Result<Vec<T>, FairError> {
    HashRotationShuffle::new(hash)?.generate(candidate_cells, correct_count)
}

/// A game round to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Game {
    /// Bust from `server_seed` as the round hash and `salt`
    Crash,
    Limbo,
    Dice,
    DiceDirect,
    Mines { reveal: usize },
    Keno { draws: usize },
}

/// Verifies one round of `game` and wraps the result as a `GameOutcome`.
pub fn verify(game: Game, seed: &SeedMaterial) -> Result<GameOutcome, FairError> {
    let outcome = match game {
        Game::Crash => GameOutcome::Scalar(verify_crash(&seed.server_seed, seed.salt.as_deref())?),
        Game::Limbo => GameOutcome::Scalar(verify_limbo(seed)?),
        Game::Dice => GameOutcome::Scalar(verify_dice(seed)?),
        Game::DiceDirect => GameOutcome::Scalar(verify_dice_direct(seed)?),
        Game::Mines { reveal } => GameOutcome::CellSet(verify_mines(seed, reveal)?),
        Game::Keno { draws } => GameOutcome::CellSet(verify_keno(seed, draws)?),
    };
    Ok(outcome)
}
