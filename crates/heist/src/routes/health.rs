//! Health check and state endpoints.

use axum::{Json, extract::State};
use heist_common::StateSnapshot;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Basic health check (is the server running?)
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    state: StateSnapshot,
    active_puzzles: usize,
    active_sessions: usize,
    uptime_secs: u64,
}

/// Game record and store sizes (for dashboards)
pub async fn game_state(State(state): State<AppState>) -> Json<StateResponse> {
    let snapshot = state.game.lock().await.snapshot();

    Json(StateResponse {
        state: snapshot,
        active_puzzles: state.vault.active_count().await,
        active_sessions: state.sessions.active_count().await,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
