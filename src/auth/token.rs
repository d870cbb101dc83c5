// src/auth/token.rs
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::errors::ServerError;

/// SHA-256 of a token. Tokens are only ever compared through their hashes.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Compare without an early exit on the first differing byte.
pub fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Guards ledger uploads. With no token configured every upload is refused.
pub fn verify_upload_token(configured: Option<&str>, presented: Option<&str>) -> Result<(), ServerError> {
    let Some(expected) = configured.filter(|t| !t.is_empty()) else {
        warn!("ledger upload refused, no upload token configured");
        return Err(ServerError::Unauthorized("uploads are disabled".into()));
    };
    let Some(given) = presented.map(str::trim).filter(|t| !t.is_empty()) else {
        return Err(ServerError::Unauthorized("missing upload token".into()));
    };
    if hashes_equal(&hash_token(expected), &hash_token(given)) {
        Ok(())
    } else {
        warn!("ledger upload refused, wrong token");
        Err(ServerError::Unauthorized("invalid upload token".into()))
    }
}
