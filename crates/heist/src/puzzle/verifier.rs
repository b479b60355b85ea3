//! Answer verification.

use heist_common::DefenseSystem;

use super::PuzzleVault;

/// Result of checking a submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct(DefenseSystem),
    Incorrect(DefenseSystem),
    /// Token unknown or expired
    Missing,
}

/// Trim and lower-case an answer for comparison
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Verify an answer against the vault. The puzzle is consumed either way.
pub async fn verify(vault: &PuzzleVault, token: &str, answer: &str) -> Verdict {
    let Some(stored) = vault.take(token).await else {
        tracing::debug!(token = %token, "Verification against unknown puzzle");
        return Verdict::Missing;
    };

    if normalize_answer(answer) == normalize_answer(&stored.expected) {
        Verdict::Correct(stored.system)
    } else {
        tracing::debug!(system = %stored.system, "Wrong answer");
        Verdict::Incorrect(stored.system)
    }
}
