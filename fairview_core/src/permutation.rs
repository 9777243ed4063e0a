//! Permutation sampling for grid games (mines, keno).
//!
//! Two strategies select `k` distinct cells from an ordered domain:
//! - **Byte-indexed draw**: HMAC byte chunks index into a shrinking pool
//! - **Hash-rotation shuffle**: cells are tagged with rotations of a SHA-256
//!   digest and sorted, twice
//!
//! They consume seed material differently and produce different orders for
//! the same round. Both remain available because published rounds were
//! produced under one or the other.

use crate::hashing::{derive_bytes, sha256_hex, VALUES_PER_DIGEST};
use crate::outcome::{byte_chunk_to_fraction, scale_to_outcome_count};
use fairview_env::{FairError, SeedMaterial};
use serde::{Deserialize, Serialize};

/// Mines board size (5x5).
pub const MINES_CELLS: usize = 25;

/// Keno board size.
pub const KENO_CELLS: usize = 40;

/// Keno always draws this many numbers.
pub const KENO_DRAWS: usize = 10;

/// How draws are spread over HMAC calls. Batch `b` is derived with cursor `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    sizes: Vec<usize>,
}

impl BatchPlan {
    /// `ceil(total / per_batch)` batches of `per_batch` draws each.
    pub fn uniform(total: usize, per_batch: usize) -> Self {
        let per_batch = per_batch.clamp(1, VALUES_PER_DIGEST);
        let batches = total.div_ceil(per_batch);
        Self {
            sizes: vec![per_batch; batches],
        }
    }

    /// Explicit batch sizes, in cursor order.
    pub fn fixed(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }

    /// Total draws the plan can supply.
    pub fn capacity(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Batch sizes in cursor order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}

/// Draw-without-replacement driven by HMAC byte chunks.
///
/// Draw `i` maps its chunk to `floor(fraction * (n - i))` and removes that
/// position from the remaining pool, preserving the pool's order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteIndexedDraw {
    domain: usize,
}

impl ByteIndexedDraw {
    /// Creates a sampler over `[0, domain)`.
    pub fn new(domain: usize) -> Result<Self, FairError> {
        if domain == 0 {
            return Err(FairError::domain("outcome count must be positive"));
        }
        Ok(Self { domain })
    }

    /// Returns the domain size.
    pub fn domain(&self) -> usize {
        self.domain
    }

    /// Computes the scaled outcome for each of the first `count` draws.
    pub fn outcomes(
        &self,
        seed: &SeedMaterial,
        plan: &BatchPlan,
        count: usize,
    ) -> Result<Vec<f64>, FairError> {
        let mut outcomes = Vec::with_capacity(count);
        for (cursor, &size) in plan.sizes().iter().enumerate() {
            if outcomes.len() >= count {
                break;
            }
            let stream = derive_bytes(&seed.with_cursor(cursor as u64), size)?;
            for chunk in stream.chunks() {
                if outcomes.len() >= count {
                    break;
                }
                let remaining = self.domain - outcomes.len();
                outcomes.push(scale_to_outcome_count(
                    byte_chunk_to_fraction(chunk),
                    remaining as f64,
                ));
            }
        }
        Ok(outcomes)
    }

    /// Draws `count` distinct cells.
    ///
    /// # Errors
    /// `DrawExhaustion` when `count` exceeds the domain or the plan's capacity.
    pub fn draw(
        &self,
        seed: &SeedMaterial,
        plan: &BatchPlan,
        count: usize,
    ) -> Result<Vec<usize>, FairError> {
        if count > self.domain {
            return Err(FairError::exhausted(count, self.domain));
        }
        if count > plan.capacity() {
            return Err(FairError::exhausted(count, plan.capacity()));
        }

        let mut pool: Vec<usize> = (0..self.domain).collect();
        let mut result = Vec::with_capacity(count);
        for outcome in self.outcomes(seed, plan, count)? {
            let index = (outcome.floor() as usize).min(pool.len() - 1);
            result.push(pool.remove(index));
        }
        Ok(result)
    }
}

/// Sort-based shuffle keyed by rotations of a SHA-256 digest.
///
/// Pass one tags cell `i` with `SHA256(hash)` rotated left `i` characters and
/// sorts by tag. Pass two repeats this on the sorted sequence with
/// `SHA256(SHA256(hash))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRotationShuffle {
    hash: String,
}

impl HashRotationShuffle {
    /// Creates a shuffle for one round hash.
    pub fn new(hash: impl Into<String>) -> Result<Self, FairError> {
        let hash = hash.into();
        if hash.is_empty() {
            return Err(FairError::malformed("round hash is empty"));
        }
        Ok(Self { hash })
    }

    /// Returns all candidates in shuffled order.
    pub fn order<T: Clone>(&self, candidates: &[T]) -> Vec<T> {
        let first_tag = sha256_hex(&self.hash);
        let second_tag = sha256_hex(&first_tag);

        let sorted = tag_and_sort(candidates.to_vec(), &first_tag);
        tag_and_sort(sorted, &second_tag)
    }

    /// Returns the first `correct_cells` candidates of the shuffled order.
    pub fn generate<T: Clone>(&self, candidates: &[T], correct_cells: usize) -> Result<Vec<T>, FairError> {
        if correct_cells > candidates.len() {
            return Err(FairError::exhausted(correct_cells, candidates.len()));
        }
        let mut order = self.order(candidates);
        order.truncate(correct_cells);
        Ok(order)
    }
}

fn tag_and_sort<T>(cells: Vec<T>, base_tag: &str) -> Vec<T> {
    let mut tag = base_tag.as_bytes().to_vec();
    let mut tagged = Vec::with_capacity(cells.len());
    for cell in cells {
        tagged.push((tag.clone(), cell));
        tag.rotate_left(1);
    }
    // Stable, so equal tags keep their relative order
    tagged.sort_by(|a, b| a.0.cmp(&b.0));
    tagged.into_iter().map(|(_, cell)| cell).collect()
}

/// Which sampler produced a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermutationStrategy {
    ByteIndexed,
    HashRotation,
}

/// Seed input for a cell draw; the variant selects the strategy.
#[derive(Debug, Clone, Copy)]
pub enum DrawInput<'a> {
    /// Server/client seed and nonce, byte-indexed draw
    Seed(&'a SeedMaterial),

    /// Single round hash, hash-rotation shuffle
    Hash(&'a str),
}

impl DrawInput<'_> {
    /// Returns the strategy this input is consumed by.
    pub fn strategy(&self) -> PermutationStrategy {
        match self {
            DrawInput::Seed(_) => PermutationStrategy::ByteIndexed,
            DrawInput::Hash(_) => PermutationStrategy::HashRotation,
        }
    }
}

/// Grid games with a fixed cell domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellGame {
    Mines,
    Keno,
}

impl CellGame {
    /// Number of cells on the board.
    pub fn domain_size(self) -> usize {
        match self {
            CellGame::Mines => MINES_CELLS,
            CellGame::Keno => KENO_CELLS,
        }
    }

    /// Most cells one round can reveal.
    pub fn max_draws(self) -> usize {
        match self {
            CellGame::Mines => MINES_CELLS,
            CellGame::Keno => KENO_DRAWS,
        }
    }

    /// HMAC batching for a byte-indexed draw of `count` cells.
    ///
    /// Keno always derives its full 10 draws as 6 (cursor 0) + 4 (cursor 1).
    pub fn batch_plan(self, count: usize) -> BatchPlan {
        match self {
            CellGame::Mines => BatchPlan::uniform(count, VALUES_PER_DIGEST),
            CellGame::Keno => BatchPlan::fixed(vec![6, 4]),
        }
    }

    /// Draws `count` cells with the strategy `input` selects.
    pub fn draw(self, input: DrawInput<'_>, count: usize) -> Result<Vec<usize>, FairError> {
        if count > self.max_draws() {
            return Err(FairError::exhausted(count, self.max_draws()));
        }
        match input {
            DrawInput::Seed(seed) => {
                ByteIndexedDraw::new(self.domain_size())?.draw(seed, &self.batch_plan(count), count)
            }
            DrawInput::Hash(hash) => {
                let cells: Vec<usize> = (0..self.domain_size()).collect();
                HashRotationShuffle::new(hash)?.generate(&cells, count)
            }
        }
    }
}

impl std::fmt::Display for CellGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellGame::Mines => write!(f, "mines"),
            CellGame::Keno => write!(f, "keno"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn assert_valid_draw(cells: &[usize], k: usize, n: usize) {
        assert_eq!(cells.len(), k);
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), k, "duplicate cell in {:?}", cells);
        assert!(cells.iter().all(|&c| c < n));
    }

    #[test]
    fn test_batch_plan_uniform() {
        assert_eq!(BatchPlan::uniform(0, 8).sizes(), &[] as &[usize]);
        assert_eq!(BatchPlan::uniform(3, 8).sizes(), &[8]);
        assert_eq!(BatchPlan::uniform(17, 8).sizes(), &[8, 8, 8]);
        assert_eq!(BatchPlan::uniform(17, 8).capacity(), 24);
    }

    #[test]
    fn test_batch_plan_uniform_edges() {
        assert_eq!(BatchPlan::uniform(16, 8).sizes(), &[8, 8]);
        assert_eq!(BatchPlan::uniform(9, 100).sizes(), &[8, 8]);
        assert_eq!(BatchPlan::uniform(2, 0).sizes(), &[1, 1]);
    }

    #[test]
    fn test_byte_indexed_rejects_empty_domain() {
        assert!(matches!(ByteIndexedDraw::new(0), Err(FairError::InvalidDomainConfig(_))));
    }

    #[test]
    fn test_byte_indexed_follows_outcomes() {
        let seed = SeedMaterial::new("server", "client", 5);
        let sampler = ByteIndexedDraw::new(MINES_CELLS).unwrap();
        let plan = BatchPlan::uniform(3, 8);

        let outcomes = sampler.outcomes(&seed, &plan, 3).unwrap();
        let drawn = sampler.draw(&seed, &plan, 3).unwrap();

        // Replay the pool removal by hand
        let mut pool: Vec<usize> = (0..MINES_CELLS).collect();
        let expected: Vec<usize> = outcomes
            .iter()
            .map(|o| pool.remove(o.floor() as usize))
            .collect();
        assert_eq!(drawn, expected);
        assert!(outcomes[0] < 25.0 && outcomes[1] < 24.0 && outcomes[2] < 23.0);
    }

    #[test]
    fn test_mines_full_board_is_permutation() {
        let seed = SeedMaterial::new("server", "client", 1);
        let cells = CellGame::Mines.draw(DrawInput::Seed(&seed), 25).unwrap();
        assert_valid_draw(&cells, 25, 25);
    }

    #[test]
    fn test_mines_prefix_stable_across_counts() {
        let seed = SeedMaterial::new("server", "client", 1);
        let three = CellGame::Mines.draw(DrawInput::Seed(&seed), 3).unwrap();
        let ten = CellGame::Mines.draw(DrawInput::Seed(&seed), 10).unwrap();
        assert_eq!(&ten[..3], &three[..]);
    }

    #[test]
    fn test_keno_uses_two_cursors() {
        let seed = SeedMaterial::new("server", "client", 2);
        let sampler = ByteIndexedDraw::new(KENO_CELLS).unwrap();
        let outcomes = sampler
            .outcomes(&seed, &CellGame::Keno.batch_plan(10), 10)
            .unwrap();

        let first = derive_bytes(&seed, 6).unwrap();
        let second = derive_bytes(&seed.with_cursor(1), 4).unwrap();
        assert_eq!(outcomes[0], byte_chunk_to_fraction(first.chunk(0).unwrap()) * 40.0);
        assert_eq!(outcomes[6], byte_chunk_to_fraction(second.chunk(0).unwrap()) * 34.0);
    }

    #[test]
    fn test_keno_rejects_more_than_ten() {
        let seed = SeedMaterial::new("server", "client", 2);
        assert_eq!(
            CellGame::Keno.draw(DrawInput::Seed(&seed), 11),
            Err(FairError::DrawExhaustion { requested: 11, available: 10 })
        );
    }

    #[test]
    fn test_mines_rejects_more_than_board() {
        let seed = SeedMaterial::new("server", "client", 2);
        assert!(matches!(
            CellGame::Mines.draw(DrawInput::Seed(&seed), 26),
            Err(FairError::DrawExhaustion { .. })
        ));
    }

    #[test]
    fn test_hash_rotation_single_pass_order() {
        // Tags for three cells are the base digest rotated by 0, 1 and 2
        let base = sha256_hex("round");
        let mut tags: Vec<(Vec<u8>, char)> = Vec::new();
        let mut tag = base.as_bytes().to_vec();
        for cell in ['a', 'b', 'c'] {
            tags.push((tag.clone(), cell));
            tag.rotate_left(1);
        }
        tags.sort();
        let expected: Vec<char> = tags.into_iter().map(|(_, c)| c).collect();

        assert_eq!(tag_and_sort(vec!['a', 'b', 'c'], &base), expected);
    }

    #[test]
    fn test_hash_rotation_generic_cells() {
        let shuffle = HashRotationShuffle::new("round-hash").unwrap();
        let names = vec!["ruby", "emerald", "sapphire", "topaz"];
        let picked = shuffle.generate(&names, 2).unwrap();

        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0], picked[1]);
        assert_eq!(picked, shuffle.generate(&names, 2).unwrap());
        assert!(shuffle.generate(&names, 5).is_err());
    }

    #[test]
    fn test_strategies_disagree() {
        let seed = SeedMaterial::new("server", "client", 3);
        let by_bytes = CellGame::Mines.draw(DrawInput::Seed(&seed), 25).unwrap();
        let by_hash = CellGame::Mines.draw(DrawInput::Hash("server"), 25).unwrap();
        assert_ne!(by_bytes, by_hash);
        assert_eq!(DrawInput::Seed(&seed).strategy(), PermutationStrategy::ByteIndexed);
        assert_eq!(DrawInput::Hash("x").strategy(), PermutationStrategy::HashRotation);
    }

    #[test]
    fn test_empty_hash_is_malformed() {
        assert!(matches!(HashRotationShuffle::new(""), Err(FairError::MalformedSeed(_))));
    }

    proptest! {
        #[test]
        fn prop_byte_indexed_valid(server in "[a-f0-9]{8,64}", nonce in 0u64..10_000, k in 0usize..=25) {
            let seed = SeedMaterial::new(server, "client", nonce);
            let cells = CellGame::Mines.draw(DrawInput::Seed(&seed), k).unwrap();
            assert_valid_draw(&cells, k, MINES_CELLS);
        }

        #[test]
        fn prop_keno_valid(client in "[a-z]{1,16}", nonce in 0u64..10_000, k in 0usize..=10) {
            let seed = SeedMaterial::new("server", client, nonce);
            let cells = CellGame::Keno.draw(DrawInput::Seed(&seed), k).unwrap();
            assert_valid_draw(&cells, k, KENO_CELLS);
        }

        #[test]
        fn prop_hash_rotation_valid(hash in "[a-f0-9]{1,64}", n in 1usize..=40, k_frac in 0.0f64..=1.0) {
            let k = ((n as f64) * k_frac).floor() as usize;
            let cells: Vec<usize> = (0..n).collect();
            let picked = HashRotationShuffle::new(hash).unwrap().generate(&cells, k).unwrap();
            assert_valid_draw(&picked, k, n);
        }
    }
}
