//! Hash derivation primitives.
//!
//! Everything the outcome engine knows about randomness comes from here:
//! - HMAC-SHA256 byte streams keyed by the server seed
//! - SHA-256 hash chains for consecutive crash rounds
//! - Salted seed rewriting before bust extraction

use fairview_env::{FairError, SeedMaterial};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Bytes consumed per outcome draw.
pub const BYTES_PER_VALUE: usize = 4;

/// Draws available from one HMAC-SHA256 digest (32 bytes / 4).
pub const VALUES_PER_DIGEST: usize = 8;

/// Bytes produced by one HMAC evaluation, consumed in 4-byte chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteStream {
    bytes: Vec<u8>,
}

impl ByteStream {
    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of 4-byte chunks.
    pub fn chunk_count(&self) -> usize {
        self.bytes.len() / BYTES_PER_VALUE
    }

    /// Iterates the 4-byte chunks in order.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(BYTES_PER_VALUE)
    }

    /// Returns chunk `index`, if present.
    pub fn chunk(&self, index: usize) -> Option<&[u8]> {
        self.chunks().nth(index)
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; 32], FairError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| FairError::malformed(format!("unusable HMAC key: {}", e)))?;
    mac.update(message);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// Computes the HMAC-SHA256 digest of `client_seed:nonce[:cursor]` keyed by the server seed.
pub fn hmac_digest(seed: &SeedMaterial) -> Result<[u8; 32], FairError> {
    hmac_sha256(seed.server_seed.as_bytes(), seed.message().as_bytes())
}

/// Returns the lowercase hex HMAC of `client_seed:nonce`.
///
/// Cursor and salt are ignored; this is the digest players compare against
/// the operator's published value.
pub fn hmac_hex(server_seed: &str, client_seed: &str, nonce: u64) -> Result<String, FairError> {
    let seed = SeedMaterial::new(server_seed, client_seed, nonce);
    Ok(hex::encode(hmac_digest(&seed)?))
}

/// Derives `count` four-byte chunks from one HMAC evaluation.
///
/// # Errors
/// `DrawExhaustion` when `count` exceeds the 8 chunks one digest holds.
pub fn derive_bytes(seed: &SeedMaterial, count: usize) -> Result<ByteStream, FairError> {
    if count > VALUES_PER_DIGEST {
        return Err(FairError::exhausted(count, VALUES_PER_DIGEST));
    }
    let digest = hmac_digest(seed)?;
    Ok(ByteStream {
        bytes: digest[..count * BYTES_PER_VALUE].to_vec(),
    })
}

/// Returns the lowercase hex SHA-256 of `text`'s UTF-8 bytes.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Returns the hash for the next crash round: `SHA256(prev)` over its hex text.
pub fn next_chain_hash(prev: &str) -> String {
    sha256_hex(prev)
}

/// Returns the hash for round `round` of a chain starting at `start_hash`.
///
/// Round 0 is the start hash itself.
pub fn derive_bust_hash(start_hash: &str, round: usize) -> String {
    let mut hash = start_hash.to_string();
    for _ in 0..round {
        hash = next_chain_hash(&hash);
    }
    hash
}

/// Rewrites a hex seed with `HMAC(key = salt, message = hex-decoded seed)`.
///
/// Entry point used by crash verification.
pub fn salted_seed_from_hex(seed: &str, salt: &str) -> Result<String, FairError> {
    let message = hex::decode(seed)
        .map_err(|e| FairError::malformed(format!("seed is not valid hex: {}", e)))?;
    Ok(hex::encode(hmac_sha256(salt.as_bytes(), &message)?))
}

/// Rewrites a seed with `HMAC(key = salt, message = seed text)`.
///
/// Entry point used by the simulator's hash chain.
pub fn salted_seed_from_text(seed: &str, salt: &str) -> Result<String, FairError> {
    Ok(hex::encode(hmac_sha256(salt.as_bytes(), seed.as_bytes())?))
}
