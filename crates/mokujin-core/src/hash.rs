//! Keyed-hash and seed-chain primitives.
//!
//! Keys, messages and seeds are always hashed as the UTF-8 bytes of the
//! strings given. A seed that looks like hex is still used literally; decoding
//! it first would change every derived digest.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{FairError, FairResult};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of a SHA-256 / HMAC-SHA256 digest.
pub const DIGEST_LEN: usize = 32;

/// HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256(key: &str, message: &str) -> FairResult<[u8; DIGEST_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| FairError::HmacKey)?;
    mac.update(message.as_bytes());
    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// HMAC-SHA256 of `message` under `key`, as lowercase hex.
pub fn hmac_sha256_hex(key: &str, message: &str) -> FairResult<String> {
    Ok(hex::encode(hmac_sha256(key, message)?))
}

/// SHA-256 of `value`, as lowercase hex.
pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Ratchet a server seed forward: `sha256_hex(seed)`.
pub fn advance_seed(seed: &str) -> String {
    sha256_hex(seed)
}

/// The first four bytes of a digest as a big-endian `u32`.
pub fn leading_u32(digest: &[u8; DIGEST_LEN]) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
