//! Learner bearer tokens.
//!
//! Tokens are random UUIDs handed to the client once; only their SHA-256
//! digest is stored.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a fresh bearer token.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hex-encoded SHA-256 of a token, as stored in `learners.token_hash`.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
