//! Application state and shared resources.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::game::{GameState, Rules};
use crate::puzzle::PuzzleVault;
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// The process-wide game record
    pub game: Arc<Mutex<GameState>>,

    /// Expected answers, indexed by puzzle token
    pub vault: Arc<PuzzleVault>,

    /// Server-side sessions
    pub sessions: Arc<SessionStore>,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let game = GameState::new(Rules::from(&config));
        let vault = PuzzleVault::new(config.puzzle.ttl_secs);
        let sessions = SessionStore::new(config.session.clone());

        Self {
            config: Arc::new(config),
            game: Arc::new(Mutex::new(game)),
            vault: Arc::new(vault),
            sessions: Arc::new(sessions),
            started_at: Instant::now(),
        }
    }

    /// Sweep expired puzzles and idle sessions
    pub async fn sweep(&self) -> (usize, usize) {
        let puzzles = self.vault.purge_expired().await;
        let sessions = self.sessions.purge_idle().await;
        if puzzles > 0 || sessions > 0 {
            tracing::debug!(puzzles, sessions, "Swept expired entries");
        }
        (puzzles, sessions)
    }
}

/// Background worker that keeps the vault and session store bounded
pub async fn sweeper(state: AppState, mut shutdown: tokio::sync::broadcast::Receiver<()>) {
    let interval = std::time::Duration::from_secs(state.config.sweep_interval_secs.max(1));
    tracing::info!(interval_secs = interval.as_secs(), "Sweeper started");

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                state.sweep().await;
            }
            _ = shutdown.recv() => {
                tracing::info!("Sweeper shutting down");
                break;
            }
        }
    }
}
