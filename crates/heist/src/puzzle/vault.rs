//! Token-indexed store for expected answers.
//!
//! Sessions only hold the token. An entry is removed the moment it is
//! verified, rerolled, or cancelled, and expired entries are swept by the
//! background worker.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use heist_common::{Puzzle, PuzzleView};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::StoredPuzzle;

/// A puzzle handed to a session: token plus what the player may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedPuzzle {
    pub token: String,
    pub view: PuzzleView,
}

/// Server-side puzzle store
pub struct PuzzleVault {
    entries: RwLock<HashMap<String, StoredPuzzle>>,
    /// Puzzle TTL in seconds
    ttl: u64,
}

impl PuzzleVault {
    pub fn new(ttl: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a puzzle's answer and return the token the session keeps
    pub async fn issue(&self, puzzle: Puzzle) -> IssuedPuzzle {
        let token = generate_token();
        let now = chrono::Utc::now().timestamp();
        let view = puzzle.view();

        let stored = StoredPuzzle {
            expected: puzzle.expected,
            system: puzzle.system,
            created_at: now,
            expires_at: now.saturating_add(i64::try_from(self.ttl).unwrap_or(i64::MAX)),
        };
        self.entries.write().await.insert(token.clone(), stored);

        tracing::debug!(token = %token, system = %view.system, "Issued puzzle");

        IssuedPuzzle { token, view }
    }

    /// Remove and return a puzzle (single-use). Expired entries read as absent.
    pub async fn take(&self, token: &str) -> Option<StoredPuzzle> {
        let stored = self.entries.write().await.remove(token)?;
        let now = chrono::Utc::now().timestamp();

        if stored.is_expired(now) {
            tracing::debug!(
                token = %token,
                age_secs = now - stored.created_at,
                "Puzzle expired"
            );
            return None;
        }

        Some(stored)
    }

    /// Drop a puzzle without reading it
    pub async fn discard(&self, token: &str) {
        self.entries.write().await.remove(token);
    }

    /// Remove all expired puzzles, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = chrono::Utc::now().timestamp();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| !stored.is_expired(now));
        before - entries.len()
    }

    pub async fn active_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Generate a cryptographically random puzzle token
fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
impl PuzzleVault {
    /// Insert an entry with explicit timestamps
    pub(crate) async fn insert_raw(&self, token: &str, stored: StoredPuzzle) {
        self.entries.write().await.insert(token.to_string(), stored);
    }

    pub(crate) async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
