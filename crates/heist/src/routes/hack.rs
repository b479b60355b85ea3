//! Hacker console: start, solve, cancel, and reroll puzzles.

use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{Html, Response},
};
use heist_common::{HeistError, Notice};
use serde::Deserialize;

use super::respond;
use crate::game::{GameState, Haul};
use crate::puzzle::{Verdict, generator, normalize_answer, verify};
use crate::session::{ActivePuzzle, Session};
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct HackForm {
    #[serde(default)]
    action: String,
    #[serde(default)]
    answer: String,
}

/// Show the console with the session's active puzzle
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let game = state.game.lock().await;
    let html = render(&game, &session, None, None);
    drop(game);
    respond(&state, &session, Html(html))
}

/// Apply a console action
pub async fn act(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HackForm>,
) -> Response {
    // Session reads and writes happen under the game lock
    let mut game = state.game.lock().await;
    let mut session = state.sessions.resolve(&headers).await;
    let mut haul = None;

    tracing::debug!(session = %session.id, action = %form.action, "Hack action");

    let notice = match form.action.as_str() {
        "new" => start(&state, &mut session).await,
        "submit" => Some(submit(&state, &mut game, &mut session, &form.answer, &mut haul).await),
        "cancel" => Some(cancel(&state, &mut game, &mut session).await),
        "reroll" => Some(reroll(&state, &mut game, &mut session).await),
        "cooldown" => Some(match game.cool_down() {
            Ok(()) => Notice::ok("System cooled. Detection decreased by 1."),
            Err(e) => Notice::neutral(e.to_string()),
        }),
        _ => Some(Notice::warn(HeistError::UnknownAction.to_string())),
    };

    let html = render(&game, &session, notice.as_ref(), haul.as_ref());
    state.sessions.save(&session).await;
    drop(game);

    respond(&state, &session, Html(html))
}

fn render(game: &GameState, session: &Session, notice: Option<&Notice>, haul: Option<&Haul>) -> String {
    let puzzle = session.data.puzzle.as_ref().map(|p| &p.view);
    views::hack_page(&game.snapshot(), game.rules(), puzzle, notice, haul)
}

async fn start(state: &AppState, session: &mut Session) -> Option<Notice> {
    if session.data.puzzle.is_some() {
        return Some(Notice::warn("A hack is already in progress."));
    }
    assign_puzzle(state, session).await;
    None
}

/// Generate a puzzle, lock its answer in the vault, and hand the session the token
async fn assign_puzzle(state: &AppState, session: &mut Session) {
    let puzzle = generator::generate(&mut rand::rng());
    let issued = state.vault.issue(puzzle).await;

    tracing::info!(session = %session.id, system = %issued.view.system, "Hack started");

    session.data.puzzle = Some(ActivePuzzle {
        token: issued.token,
        view: issued.view,
    });
}

async fn submit(
    state: &AppState,
    game: &mut GameState,
    session: &mut Session,
    answer: &str,
    haul: &mut Option<Haul>,
) -> Notice {
    let Some(active) = session.data.puzzle.clone() else {
        return Notice::warn("Start a hack first.");
    };

    let answer = normalize_answer(answer);
    if answer.is_empty() {
        return Notice::neutral("You must enter an answer to submit.");
    }

    session.data.puzzle = None;

    match verify(&state.vault, &active.token, &answer).await {
        Verdict::Missing => Notice::warn("This hack has expired. Start a new one."),
        Verdict::Correct(system) => {
            let loot = game.record_success(system, &mut rand::rng());
            game.consume_boost_use();

            let notice = Notice::ok(format!(
                "Hack success on {} — +{}GB intel.",
                system.label(),
                loot.total_gb
            ));
            *haul = Some(loot);
            notice
        }
        Verdict::Incorrect(system) => {
            let failure = game.record_failure(system);
            game.consume_boost_use();

            let notice = Notice::bad(format!("Hack failed on {} — detection raised.", system.label()));
            match failure.traced_penalty {
                Some(penalty) => notice.with_detail(format!("Been traced — -{}GB penalty.", penalty)),
                None => notice,
            }
        }
    }
}

async fn cancel(state: &AppState, game: &mut GameState, session: &mut Session) -> Notice {
    let Some(active) = session.data.puzzle.take() else {
        return Notice::warn("No active hack to cancel.");
    };

    state.vault.discard(&active.token).await;
    game.record_cancel();
    game.consume_boost_use();

    Notice::ok("Hack cancelled.").with_detail("Detection +1.")
}

async fn reroll(state: &AppState, game: &mut GameState, session: &mut Session) -> Notice {
    let Some(active) = session.data.puzzle.clone() else {
        return Notice::warn("Start a hack first.");
    };

    if let Err(e) = game.pay_reroll() {
        return Notice::neutral(e.to_string());
    }

    state.vault.discard(&active.token).await;
    assign_puzzle(state, session).await;

    Notice::ok("Puzzle rerolled.")
}
