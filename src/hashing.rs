//! Content hashing and deterministic order keys.
//!
//! The dedup key is a 128-bit BLAKE3 digest of the normalized sentence. The
//! order key is a signed 64-bit integer derived from the digest and the run
//! seed, so the emitted order depends only on `(content_hash, seed)` and never
//! on insertion order, batch boundaries or scheduling.

/// Width of the content digest in bytes.
pub const CONTENT_HASH_LEN: usize = 16;

/// 128-bit digest of a normalized sentence.
pub fn content_hash(normalized: &str) -> [u8; CONTENT_HASH_LEN] {
    let digest = blake3::hash(normalized.as_bytes());
    let mut out = [0u8; CONTENT_HASH_LEN];
    out.copy_from_slice(&digest.as_bytes()[..CONTENT_HASH_LEN]);
    out
}

/// Signed 64-bit order key for `(content_hash, seed)`.
///
/// Layout is fixed: BLAKE3 over `hash || seed.to_le_bytes()`, first 8 bytes
/// read as a little-endian `i64`.
pub fn order_key(hash: &[u8; CONTENT_HASH_LEN], seed: i64) -> i64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(hash);
    hasher.update(&seed.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    i64::from_le_bytes(bytes)
}
