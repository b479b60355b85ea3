//! Puzzle generation, server-side answer storage, and verification.
//!
//! The client only ever sees a [`PuzzleView`](heist_common::PuzzleView) and an
//! opaque token. Expected answers stay in the [`PuzzleVault`].

pub mod generator;
mod vault;
mod verifier;

pub use vault::PuzzleVault;
pub use verifier::{Verdict, normalize_answer, verify};

use heist_common::DefenseSystem;

/// Puzzle data held in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPuzzle {
    /// The expected answer
    pub expected: String,
    /// Defense the puzzle belongs to
    pub system: DefenseSystem,
    /// Creation timestamp
    pub created_at: i64,
    /// Expiry timestamp
    pub expires_at: i64,
}

impl StoredPuzzle {
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}
