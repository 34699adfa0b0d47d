//! Commit-reveal hashing.
//!
//! A commitment is the lowercase hex SHA-256 of `value` immediately followed
//! by `salt`, with no separator. The realm recomputes the same digest when the
//! vote is revealed.

use crate::core::time;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Salt length in bytes used by `vote commit` when none is given.
pub const DEFAULT_SALT_BYTES: usize = 32;

pub fn commit(value: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify(hash: &str, value: &str, salt: &str) -> bool {
    hash.trim().eq_ignore_ascii_case(&commit(value, salt))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt {
    pub value: String,
    /// False when the OS entropy source failed and the salt is time-derived.
    pub strong: bool,
}

/// Hex-encoded `len` random bytes from the OS.
///
/// Never fails: without entropy the salt degrades to the current time in
/// nanoseconds, flagged with `strong == false`.
pub fn generate_salt(len: usize) -> Salt {
    generate_salt_with(&mut OsRng, len)
}

/// [`generate_salt`] over any random source.
pub fn generate_salt_with<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> Salt {
    let mut bytes = vec![0u8; len];
    match rng.try_fill_bytes(&mut bytes) {
        Ok(()) => Salt {
            value: hex::encode(bytes),
            strong: true,
        },
        Err(e) => {
            warn!(error = %e, "OS entropy unavailable, falling back to a time-derived salt");
            Salt {
                value: time::now_unix_nanos().to_string(),
                strong: false,
            }
        }
    }
}
