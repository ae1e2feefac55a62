//! Commit-reveal hashing for moves.
//!
//! A commitment is `sha256(tag || move || len(secret) || secret || committer)`. Binding
//! the committer's address means a commitment copied from another player cannot be
//! opened by the copier.

use cosmwasm_std::{Addr, HexBinary};
use sha2::{Digest, Sha256};

use crate::game::Move;

/// Domain separator for move commitments.
const COMMIT_TAG: &[u8] = b"rock-paper-scissors/commit/v1";

/// Length in bytes of a commitment.
pub const COMMITMENT_LEN: usize = 32;

/// Hides `choice` behind `secret` for `committer`.
pub fn encrypt_move(choice: Move, secret: &str, committer: &Addr) -> HexBinary {
    let mut hasher = Sha256::new();
    hasher.update(COMMIT_TAG);
    hasher.update([choice.code()]);
    hasher.update((secret.len() as u64).to_be_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(committer.as_str().as_bytes());
    HexBinary::from(hasher.finalize().to_vec())
}

/// Checks that `choice` and `secret` open `commitment` for `committer`.
pub fn verify(commitment: &HexBinary, choice: Move, secret: &str, committer: &Addr) -> bool {
    *commitment == encrypt_move(choice, secret, committer)
}
