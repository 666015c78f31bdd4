//! Short content hashes used as Bedrock identifier suffixes and cache keys.

use sha2::{Digest, Sha256};

/// Length of the hex prefix kept from the SHA-256 digest.
pub const HASH_LENGTH: usize = 7;

/// Hash a string to the first seven lowercase hex characters of its SHA-256 digest.
pub fn string_hash(value: &str) -> String {
    let mut hex = format!("{:x}", Sha256::digest(value.as_bytes()));
    hex.truncate(HASH_LENGTH);
    hex
}
