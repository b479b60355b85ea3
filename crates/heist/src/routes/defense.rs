//! Defender console: sign in to one defense, read its logs, apply countermeasures.

use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{Html, Redirect, Response},
};
use heist_common::{DefenseLog, DefenseSystem, HeistError, Notice};
use serde::Deserialize;

use super::respond;
use crate::config::DefensePasswords;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    action: String,
    #[serde(default)]
    defense: String,
    #[serde(default)]
    def_pass: String,
}

/// Check a defense name and its static password
pub fn authenticate(
    passwords: &DefensePasswords,
    defense: &str,
    password: &str,
) -> Result<DefenseSystem, HeistError> {
    let system: DefenseSystem = defense.parse().map_err(|_| HeistError::InvalidCredentials)?;
    if passwords.for_system(system) == password {
        Ok(system)
    } else {
        Err(HeistError::InvalidCredentials)
    }
}

pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let snapshot = state.game.lock().await.snapshot();
    let html = views::login_page(&snapshot, session.data.admin_scope, None, None);
    respond(&state, &session, Html(html))
}

pub async fn act(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    // Session reads and writes happen under the game lock
    let mut game = state.game.lock().await;
    let mut session = state.sessions.resolve(&headers).await;

    match form.action.as_str() {
        "choose" => match authenticate(&state.config.defense.passwords, &form.defense, &form.def_pass) {
            Ok(system) => {
                tracing::info!(session = %session.id, defense = %system, "Defender signed in");
                session.data.admin_scope = Some(system);
                state.sessions.save(&session).await;
                return respond(&state, &session, Redirect::to("/login"));
            }
            Err(e) => {
                tracing::warn!(session = %session.id, defense = %form.defense, "Defender sign-in rejected");
                let notice = Notice::bad(e.to_string());
                let html = views::login_page(&game.snapshot(), session.data.admin_scope, None, Some(&notice));
                return respond(&state, &session, Html(html));
            }
        },
        "logout" => {
            session.data.admin_scope = None;
            state.sessions.save(&session).await;
            return respond(&state, &session, Redirect::to("/login"));
        }
        _ => {}
    }

    let mut stats: Option<DefenseLog> = None;

    let notice = match (form.action.as_str(), session.data.admin_scope) {
        ("logs", Some(system)) => {
            stats = Some(game.logs().get(system));
            None
        }
        ("download", Some(system)) => Some(match game.boost_defense() {
            Ok(hacks) => {
                tracing::info!(defense = %system, hacks, "Defense increased");
                Notice::ok(format!(
                    "Defense increased: next {} hacks yield reduced intel.",
                    hacks
                ))
            }
            Err(e) => Notice::bad(e.to_string()),
        }),
        ("logs" | "download", None) => Some(Notice::warn(HeistError::NotSignedIn.to_string())),
        // Open to any session, signed in or not
        ("cancel_detection", scope) => Some(match game.cancel_detection() {
            Ok(penalty) => {
                tracing::info!(defense = ?scope, penalty_gb = penalty, "Detection reset");
                Notice::ok(format!(
                    "Detection cancelled. −{}GB penalty applied to hackers.",
                    game.rules().cancel_detection_penalty_gb
                ))
            }
            Err(e) => Notice::bad(e.to_string()),
        }),
        _ => Some(Notice::warn(HeistError::UnknownAction.to_string())),
    };

    let html = views::login_page(&game.snapshot(), session.data.admin_scope, stats, notice.as_ref());
    drop(game);

    respond(&state, &session, Html(html))
}
