//! Read-only pages and the hacker-side logout.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Redirect, Response},
};

use super::respond;
use crate::state::AppState;
use crate::views;

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let snapshot = state.game.lock().await.snapshot();
    respond(&state, &session, Html(views::index_page(&snapshot)))
}

pub async fn training(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    respond(&state, &session, Html(views::training_page()))
}

/// Game record plus every defense log
pub async fn system(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let snapshot = state.game.lock().await.snapshot();
    respond(&state, &session, Html(views::system_page(&snapshot)))
}

/// Drop any defender scope and go home
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let game = state.game.lock().await;
    let mut session = state.sessions.resolve(&headers).await;
    if let Some(scope) = session.data.admin_scope.take() {
        tracing::info!(session = %session.id, defense = %scope, "Defender signed out");
    }
    state.sessions.save(&session).await;
    drop(game);

    respond(&state, &session, Redirect::to("/"))
}
