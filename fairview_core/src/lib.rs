//! FairView Core - Provably Fair Outcome Engine
//!
//! Recomputes casino rounds from their seed material, bit for bit:
//! 1. **Scalar games**: crash busts, limbo multipliers and dice rolls
//! 2. **Grid games**: mines and keno cells via two permutation strategies
//! 3. **Reference data**: keno payout and probability tables
//!
//! Every function here is pure. Nothing generates seeds, keeps history or
//! talks to the network.

pub mod hashing;
pub mod outcome;
pub mod permutation;
pub mod payout;
pub mod precision;
pub mod verify;

// Re-export key types for convenience
pub use hashing::{derive_bust_hash, derive_bytes, hmac_hex, next_chain_hash, ByteStream};
pub use outcome::{byte_chunk_to_fraction, generate_bust, generate_bust_text, scale_to_outcome_count};
pub use permutation::{BatchPlan, ByteIndexedDraw, CellGame, DrawInput, HashRotationShuffle, PermutationStrategy};
pub use payout::KenoRisk;
pub use verify::{
    generate_cells, verify, verify_crash, verify_dice, verify_dice_direct, verify_keno, verify_limbo,
    verify_mines, Game,
};
