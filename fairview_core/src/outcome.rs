//! Outcome mapping: byte chunks to fractions to per-game scalars.
//!
//! Each game keeps its own historical convention. They are not
//! unified; a published round can only be re-verified with the exact
//! convention it was produced under.

use crate::hashing::{derive_bytes, hmac_digest, salted_seed_from_hex, salted_seed_from_text, BYTES_PER_VALUE};
use crate::precision::{from_decimal, round_down, round_significant_fraction, to_decimal};
use fairview_env::{FairError, SeedMaterial};
use rust_decimal::{Decimal, RoundingStrategy};

/// Bits of seed entropy used for a crash bust (13 hex characters).
pub const BUST_BITS: u32 = 52;

/// Significant digits the bust fraction is rounded to before inversion.
pub const BUST_PRECISION: u32 = 9;

/// Player share of every wager (1 - house edge).
pub const RTP_FACTOR: f64 = 0.99;

/// Limbo outcome domain.
pub const LIMBO_OUTCOMES: f64 = 4_294_967_295.0;

/// Dice outcome domain, `100 + (1 - 0.99)`.
pub const DICE_OUTCOMES: f64 = 100.0 + (1.0 - RTP_FACTOR);

/// Maps a byte chunk to a fraction in `[0, 1)`: `Σ byte[i] / 256^(i+1)`.
///
/// Summed left to right so results are bit-identical to every other
/// implementation of the same convention.
pub fn byte_chunk_to_fraction(bytes: &[u8]) -> f64 {
    bytes
        .iter()
        .enumerate()
        .fold(0.0, |acc, (i, &byte)| acc + byte as f64 / 256f64.powi(i as i32 + 1))
}

/// Scales a fraction to an outcome domain of `outcome_count` values.
pub fn scale_to_outcome_count(fraction: f64, outcome_count: f64) -> f64 {
    fraction * outcome_count
}

/// Computes a crash bust multiplier from hex seed text.
///
/// `r` = first 52 bits, `X = r / 2^52` rounded to 9 significant digits,
/// bust = `max(1, floor(99 / (1 - X)) / 100)`.
///
/// # Errors
/// `MalformedSeed` when the seed has fewer than 13 leading hex digits.
pub fn bust_from_hex_seed(seed: &str) -> Result<f64, FairError> {
    let width = (BUST_BITS / 4) as usize;
    let prefix = seed
        .get(..width)
        .ok_or_else(|| FairError::malformed(format!("need {} hex digits, got {:?}", width, seed)))?;
    if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FairError::malformed(format!("non-hex seed prefix {:?}", prefix)));
    }
    let r = u64::from_str_radix(prefix, 16)
        .map_err(|e| FairError::malformed(format!("seed prefix {:?}: {}", prefix, e)))?;

    let x = round_significant_fraction(r, BUST_BITS, BUST_PRECISION);
    let x = 99.0 / (1.0 - x);
    Ok(f64::max(1.0, x.floor() / 100.0))
}

/// Crash bust for verification: a salt is applied to the hex-decoded seed.
///
/// An empty salt counts as no salt.
pub fn generate_bust(seed: &str, salt: Option<&str>) -> Result<f64, FairError> {
    match salt.filter(|s| !s.is_empty()) {
        Some(salt) => bust_from_hex_seed(&salted_seed_from_hex(seed, salt)?),
        None => bust_from_hex_seed(seed),
    }
}

/// Crash bust for the simulator: a salt is applied to the seed text as is.
///
/// An empty salt counts as no salt.
pub fn generate_bust_text(seed: &str, salt: Option<&str>) -> Result<f64, FairError> {
    match salt.filter(|s| !s.is_empty()) {
        Some(salt) => bust_from_hex_seed(&salted_seed_from_text(seed, salt)?),
        None => bust_from_hex_seed(seed),
    }
}

/// Maps a limbo fraction to its multiplier.
///
/// `round_down(0xFFFFFFFF / outcome * 0.99, 2)` in decimal arithmetic, never
/// below 1.00. A zero outcome is an unbounded multiplier.
pub fn limbo_from_fraction(fraction: f64) -> f64 {
    let outcome = scale_to_outcome_count(fraction, LIMBO_OUTCOMES);
    let multiplier = to_decimal(outcome)
        .and_then(|outcome| Decimal::from(4_294_967_295u64).checked_div(outcome))
        .and_then(|ratio| ratio.checked_mul(Decimal::new(99, 2)))
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::ToZero))
        .and_then(from_decimal)
        .unwrap_or(f64::INFINITY);
    f64::max(1.0, multiplier)
}

/// Limbo multiplier for one seed.
pub fn limbo_result(seed: &SeedMaterial) -> Result<f64, FairError> {
    let stream = derive_bytes(seed, 1)?;
    let chunk = stream.chunk(0).unwrap_or_default();
    Ok(limbo_from_fraction(byte_chunk_to_fraction(chunk)))
}

/// Dice roll in `[0, 100.01)`, rounded down to 2 decimals.
pub fn dice_result(seed: &SeedMaterial) -> Result<f64, FairError> {
    let stream = derive_bytes(seed, 1)?;
    let chunk = stream.chunk(0).unwrap_or_default();
    let outcome = scale_to_outcome_count(byte_chunk_to_fraction(chunk), DICE_OUTCOMES);
    Ok(round_down(outcome, 2))
}

/// Dice roll from the first 4 raw digest bytes, without rounding.
///
/// Older verification pages computed dice this way. The missing round-down
/// is part of that convention and must stay.
pub fn dice_result_direct(seed: &SeedMaterial) -> Result<f64, FairError> {
    let digest = hmac_digest(seed)?;
    let fraction = byte_chunk_to_fraction(&digest[..BYTES_PER_VALUE]);
    Ok(fraction * DICE_OUTCOMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn test_fraction_positional_expansion() {
        assert_eq!(byte_chunk_to_fraction(&[0, 0, 0, 0]), 0.0);
        assert_eq!(byte_chunk_to_fraction(&[128, 0, 0, 0]), 0.5);
        assert_eq!(byte_chunk_to_fraction(&[0, 128, 0, 0]), 0.5 / 256.0);
        assert_relative_eq!(
            byte_chunk_to_fraction(&[255, 255, 255, 255]),
            1.0 - 1.0 / 4_294_967_296.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_scale_to_outcome_count() {
        assert_eq!(scale_to_outcome_count(0.5, 40.0), 20.0);
    }

    #[test]
    fn test_bust_zero_hash_is_floor() {
        assert_eq!(generate_bust(ZERO_HASH, None).unwrap(), 1.0);
        assert_eq!(generate_bust(ZERO_HASH, Some("")).unwrap(), 1.0);
    }

    #[test]
    fn test_bust_half_hash() {
        // X = 0.5 -> 99 / 0.5 = 198 -> 1.98
        assert_eq!(bust_from_hex_seed("8000000000000").unwrap(), 1.98);
    }

    #[test]
    fn test_bust_three_quarter_hash() {
        // X = 0.75 -> 99 / 0.25 = 396 -> 3.96
        assert_eq!(bust_from_hex_seed("c000000000000ffff").unwrap(), 3.96);
    }

    #[test]
    fn test_bust_rejects_short_or_non_hex_seed() {
        assert!(matches!(bust_from_hex_seed("abc"), Err(FairError::MalformedSeed(_))));
        assert!(matches!(
            bust_from_hex_seed("zzzzzzzzzzzzzzzz"),
            Err(FairError::MalformedSeed(_))
        ));
    }

    #[test]
    fn test_salted_bust_differs_between_entry_points() {
        let seed = "8000000000000000";
        let unsalted = generate_bust(seed, None).unwrap();
        let hex_entry = generate_bust(seed, Some("salt")).unwrap();
        let text_entry = generate_bust_text(seed, Some("salt")).unwrap();

        assert_eq!(unsalted, 1.98);
        assert!(hex_entry >= 1.0);
        assert!(text_entry >= 1.0);
        assert_eq!(generate_bust(seed, Some("salt")).unwrap(), hex_entry);
    }

    #[test]
    fn test_limbo_floor_and_rounding() {
        // fraction 0.5 -> outcome 2147483647.5 -> 1.98 after edge and truncation
        assert_eq!(limbo_from_fraction(0.5), 1.98);
        // Near-maximal fraction would fall to 0.99 without the floor
        assert_eq!(limbo_from_fraction(0.9999999), 1.0);
        assert_eq!(limbo_from_fraction(0.0), f64::INFINITY);
    }

    #[test]
    fn test_limbo_deterministic() {
        let seed = SeedMaterial::new("server", "client", 1);
        let a = limbo_result(&seed).unwrap();
        let b = limbo_result(&seed).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a >= 1.0);
    }

    #[test]
    fn test_dice_rounding_variants() {
        let seed = SeedMaterial::new("server", "client", 42);
        let rounded = dice_result(&seed).unwrap();
        let direct = dice_result_direct(&seed).unwrap();

        assert!((0.0..100.01).contains(&rounded));
        assert!((0.0..100.01).contains(&direct));
        assert_eq!(rounded, round_down(direct, 2));
        assert!(direct - rounded < 0.01);
    }
}
