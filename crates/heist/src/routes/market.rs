//! Black market: sell stolen GB for credits.

use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{Html, Response},
};
use heist_common::Notice;
use serde::Deserialize;

use super::respond;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SellForm {
    #[serde(default)]
    gb: String,
}

pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let game = state.game.lock().await;
    let html = views::black_market_page(&game.snapshot(), game.rules().gb_per_credit, None);
    drop(game);
    respond(&state, &session, Html(html))
}

pub async fn sell(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SellForm>,
) -> Response {
    let session = state.sessions.resolve(&headers).await;

    // Anything unparsable counts as zero
    let quantity = form.gb.trim().parse::<i64>().unwrap_or(0);

    let mut game = state.game.lock().await;
    let notice = match game.sell(quantity) {
        Ok(sale) => Notice::ok(format!(
            "Sold {} GB → +{} credits.",
            sale.sold_gb, sale.gained_credits
        )),
        Err(e) => Notice::neutral(e.to_string()),
    };

    let html = views::black_market_page(&game.snapshot(), game.rules().gb_per_credit, Some(&notice));
    drop(game);

    respond(&state, &session, Html(html))
}
