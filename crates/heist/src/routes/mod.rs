//! HTTP route handlers for the Heist server.

use axum::{
    Router,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::session::Session;
use crate::state::AppState;

mod defense;
mod hack;
mod health;
mod market;
mod pages;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/training", get(pages::training))
        .route("/system", get(pages::system))
        .route("/logout", get(pages::logout))

        // Hacker side
        .route("/hack", get(hack::show).post(hack::act))
        .route("/black-market", get(market::show).post(market::sell))

        // Defender side
        .route("/login", get(defense::show).post(defense::act))

        // Health & Status
        .route("/health", get(health::health_check))
        .route("/api/state", get(health::game_state))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Finish a response, issuing the session cookie when the session is new
pub(crate) fn respond(state: &AppState, session: &Session, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if session.is_new {
        response
            .headers_mut()
            .append(header::SET_COOKIE, state.sessions.cookie_header(&session.id));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use heist_common::{DefenseSystem, PuzzleView};
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::game::reduce_for_boost;
    use crate::puzzle::generator::{firewall_answer, keypad_code};
    use crate::session::ActivePuzzle;

    struct Client {
        app: Router,
        state: AppState,
        cookie: Option<String>,
    }

    impl Client {
        fn new() -> Self {
            let state = AppState::new(AppConfig::default());
            Self {
                app: create_router(state.clone()),
                state,
                cookie: None,
            }
        }

        async fn send(&mut self, request: Request<Body>) -> (StatusCode, Option<String>, String) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();

            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_string());
            }
            let location = response
                .headers()
                .get(header::LOCATION)
                .map(|v| v.to_str().unwrap().to_string());

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = String::from_utf8(bytes.to_vec()).unwrap();

            (status, location, body)
        }

        async fn get(&mut self, uri: &str) -> (StatusCode, Option<String>, String) {
            let mut builder = Request::builder().uri(uri);
            if let Some(cookie) = &self.cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post(&mut self, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
            let request = form_request(uri, self.cookie.as_deref(), form);
            self.send(request).await
        }

        /// The puzzle the server thinks this client is working on
        async fn active(&self) -> Option<ActivePuzzle> {
            let mut headers = axum::http::HeaderMap::new();
            headers.insert(header::COOKIE, self.cookie.as_ref()?.parse().unwrap());
            let session = self.state.sessions.resolve(&headers).await;
            session.data.puzzle
        }

        async fn active_puzzle(&self) -> Option<PuzzleView> {
            self.active().await.map(|p| p.view)
        }

        async fn snapshot(&self) -> heist_common::StateSnapshot {
            self.state.game.lock().await.snapshot()
        }
    }

    fn form_request(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(form.to_string())).unwrap()
    }

    /// File sizes listed under "Exfiltrated" on the hack page
    fn exfiltrated_sizes(body: &str) -> Vec<u64> {
        body.split("<li>")
            .skip(1)
            .filter_map(|item| {
                let item = item.split("</li>").next()?;
                let (_, size) = item.rsplit_once(" (")?;
                size.trim_end_matches(" GB)").parse().ok()
            })
            .collect()
    }

    /// Work out the answer from what the player sees
    fn solve(view: &PuzzleView) -> String {
        match view.system {
            DefenseSystem::Keypad => {
                let n = view
                    .description
                    .trim_start_matches("Indicator number: ")
                    .parse()
                    .unwrap();
                keypad_code(n)
            }
            DefenseSystem::Firewall => {
                firewall_answer(view.description.trim_start_matches("Firewall pattern: "))
            }
            DefenseSystem::Wires => match view.description.as_str() {
                "Indicators: 2 lights | wires: red, blue" => "connect red blue".to_string(),
                "Indicators: 2 lights | wires: green, yellow" => "cut green".to_string(),
                "Indicators: 3 lights | any pair shown" => "disconnect all".to_string(),
                other => format!(
                    "cut {}",
                    other.trim_start_matches("Indicators: 1 light | wires: red, ")
                ),
            },
        }
    }

    fn form_value(value: &str) -> String {
        value.replace(' ', "+")
    }

    #[tokio::test]
    async fn test_health() {
        let mut client = Client::new();
        let (status, _, body) = client.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_pages_issue_session_cookie() {
        let mut client = Client::new();
        for uri in ["/", "/training", "/system", "/hack", "/black-market", "/login"] {
            client.cookie = None;
            let (status, _, _) = client.get(uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(
                client.cookie.as_deref().unwrap().starts_with("heist_session="),
                "{}",
                uri
            );
        }
    }

    #[tokio::test]
    async fn test_solving_a_hack_credits_intel() {
        let mut client = Client::new();
        client.get("/hack").await;

        client.post("/hack", "action=new").await;
        let view = client.active_puzzle().await.unwrap();

        let (_, _, body) = client.post("/hack", "action=new").await;
        assert!(body.contains("A hack is already in progress."));

        let answer = form_value(&solve(&view).to_uppercase());
        let (status, _, body) = client
            .post("/hack", &format!("action=submit&answer={}", answer))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(&format!("Hack success on {}", view.system.label())));
        assert!(client.active_puzzle().await.is_none());

        let snapshot = client.state.game.lock().await.snapshot();
        assert!(snapshot.files >= 5);
        assert_eq!(snapshot.logs.get(view.system).success, 1);
        assert_eq!(client.state.vault.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_and_blank_answers() {
        let mut client = Client::new();
        client.get("/hack").await;

        let (_, _, body) = client.post("/hack", "action=submit&answer=x").await;
        assert!(body.contains("Start a hack first."));

        client.post("/hack", "action=new").await;
        let view = client.active_puzzle().await.unwrap();

        let (_, _, body) = client.post("/hack", "action=submit&answer=+++").await;
        assert!(body.contains("You must enter an answer to submit."));
        assert_eq!(client.active_puzzle().await, Some(view.clone()));

        let (_, _, body) = client
            .post("/hack", "action=submit&answer=definitely+wrong")
            .await;
        assert!(body.contains(&format!("Hack failed on {}", view.system.label())));

        let snapshot = client.state.game.lock().await.snapshot();
        assert_eq!(snapshot.detection, 1);
        assert_eq!(snapshot.logs.get(view.system).fail, 1);
        assert!(client.active_puzzle().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_reroll_and_cooldown() {
        let mut client = Client::new();
        client.get("/hack").await;

        let (_, _, body) = client.post("/hack", "action=cancel").await;
        assert!(body.contains("No active hack to cancel."));

        client.post("/hack", "action=new").await;
        let (_, _, body) = client.post("/hack", "action=reroll").await;
        assert!(body.contains("Not enough credits for Reroll (cost 1)."));

        client.state.game.lock().await.set_balances(0, 6);
        let (_, _, body) = client.post("/hack", "action=reroll").await;
        assert!(body.contains("Puzzle rerolled."));
        assert!(client.active_puzzle().await.is_some());
        assert_eq!(client.state.vault.active_count().await, 1);

        let (_, _, body) = client.post("/hack", "action=cancel").await;
        assert!(body.contains("Hack cancelled."));
        assert!(body.contains("Detection +1."));
        assert_eq!(client.state.vault.active_count().await, 0);
        assert_eq!(client.state.game.lock().await.snapshot().detection, 1);

        let (_, _, body) = client.post("/hack", "action=cooldown").await;
        assert!(body.contains("System cooled. Detection decreased by 1."));
        let snapshot = client.state.game.lock().await.snapshot();
        assert_eq!(snapshot.detection, 0);
        assert_eq!(snapshot.credits, 0);

        let (_, _, body) = client.post("/hack", "action=cooldown").await;
        assert!(body.contains("Not enough credits for Cool Down (cost 5)."));

        let (_, _, body) = client.post("/hack", "action=explode").await;
        assert!(body.contains("Unknown action."));
    }

    #[tokio::test]
    async fn test_expired_puzzle_token() {
        let mut client = Client::new();
        client.get("/hack").await;
        client.post("/hack", "action=new").await;

        // Simulate the answer vanishing server-side
        client.state.vault.clear().await;

        let (_, _, body) = client.post("/hack", "action=submit&answer=cut+green").await;
        assert!(body.contains("This hack has expired. Start a new one."));
        assert!(client.active_puzzle().await.is_none());

        let snapshot = client.state.game.lock().await.snapshot();
        assert_eq!(snapshot.detection, 0);
        assert_eq!(snapshot.logs, Default::default());
    }

    #[tokio::test]
    async fn test_black_market() {
        let mut client = Client::new();
        client.state.game.lock().await.set_balances(10, 0);

        let (_, _, body) = client.post("/black-market", "gb=abc").await;
        assert!(body.contains("Enter a valid amount."));

        let (_, _, body) = client.post("/black-market", "gb=50").await;
        assert!(body.contains("Not enough intel to sell."));

        let (_, _, body) = client.post("/black-market", "gb=2").await;
        assert!(body.contains("You need at least 3 GB to get 1 credit."));

        let (_, _, body) = client.post("/black-market", "gb=8").await;
        assert!(body.contains("Sold 6 GB → +2 credits."));

        let snapshot = client.state.game.lock().await.snapshot();
        assert_eq!(snapshot.files, 4);
        assert_eq!(snapshot.credits, 2);
    }

    #[tokio::test]
    async fn test_defender_console() {
        let mut client = Client::new();
        client.get("/login").await;

        let (_, _, body) = client.post("/login", "action=download").await;
        assert!(body.contains("Choose a defense and sign in first."));

        let (_, _, body) = client
            .post("/login", "action=choose&defense=keypad&def_pass=upgrade")
            .await;
        assert!(body.contains("Invalid defense or password."));

        let (status, location, _) = client
            .post("/login", "action=choose&defense=keypad&def_pass=124578")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));

        let (_, _, body) = client.post("/login", "action=logs").await;
        assert!(body.contains("KEYPAD log: 0 successful breaches, 0 blocked attempts"));

        let (_, _, body) = client.post("/login", "action=download").await;
        assert!(body.contains("Defense increased: next 8 hacks yield reduced intel."));
        let (_, _, body) = client.post("/login", "action=download").await;
        assert!(body.contains("Increase Defense already used this detection."));

        let (_, _, body) = client.post("/login", "action=cancel_detection").await;
        assert!(body.contains("Detection is not full. Nothing to cancel."));

        {
            let mut game = client.state.game.lock().await;
            game.set_balances(130, 0);
            game.fill_detection();
        }
        let (_, _, body) = client.post("/login", "action=cancel_detection").await;
        assert!(body.contains("Detection cancelled. −100GB penalty applied to hackers."));
        let snapshot = client.state.game.lock().await.snapshot();
        assert_eq!(snapshot.files, 30);
        assert_eq!(snapshot.detection, 0);
        assert!(snapshot.boost_available);

        let (status, location, _) = client.post("/login", "action=logout").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));

        let (_, _, body) = client.post("/login", "action=logs").await;
        assert!(body.contains("Choose a defense and sign in first."));
    }

    #[tokio::test]
    async fn test_logout_route_clears_scope() {
        let mut client = Client::new();
        client.get("/").await;
        client
            .post("/login", "action=choose&defense=wires&def_pass=-")
            .await;

        let (status, location, _) = client.get("/logout").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (_, _, body) = client.get("/login").await;
        assert!(body.contains(r#"name="def_pass""#));
    }

    #[tokio::test]
    async fn test_api_state() {
        let mut client = Client::new();
        client.get("/hack").await;
        client.post("/hack", "action=new").await;

        let (status, _, body) = client.get("/api/state").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["detection"], 0);
        assert_eq!(json["max_detection"], 5);
        assert_eq!(json["active_puzzles"], 1);
        assert_eq!(json["active_sessions"], 1);
        assert_eq!(json["logs"]["keypad"]["success"], 0);
    }

    #[tokio::test]
    async fn test_cancel_detection_without_sign_in() {
        let mut client = Client::new();
        client.get("/login").await;
        {
            let mut game = client.state.game.lock().await;
            game.set_balances(130, 0);
            game.fill_detection();
        }

        let (_, _, body) = client.post("/login", "action=cancel_detection").await;
        assert!(body.contains("Detection cancelled. −100GB penalty applied to hackers."));

        let snapshot = client.snapshot().await;
        assert_eq!(snapshot.files, 30);
        assert_eq!(snapshot.detection, 0);
        assert!(snapshot.boost_available);

        // Logs and the boost still need a signed-in defense
        let (_, _, body) = client.post("/login", "action=logs").await;
        assert!(body.contains("Choose a defense and sign in first."));
        let (_, _, body) = client.post("/login", "action=download").await;
        assert!(body.contains("Choose a defense and sign in first."));
        assert_eq!(client.snapshot().await.boost_hacks_left, 0);
    }

    #[tokio::test]
    async fn test_queued_actions_see_latest_session() {
        let mut client = Client::new();
        client.get("/hack").await;
        client.post("/hack", "action=new").await;
        let cookie = client.cookie.clone();

        let guard = client.state.game.lock().await;

        let app = client.app.clone();
        let request = form_request("/hack", cookie.as_deref(), "action=cancel");
        let cancel = tokio::spawn(async move { app.oneshot(request).await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let app = client.app.clone();
        let request = form_request("/hack", cookie.as_deref(), "action=new");
        let start = tokio::spawn(async move { app.oneshot(request).await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        cancel.await.unwrap().unwrap();
        start.await.unwrap().unwrap();

        // The new hack was started after the cancel, with a live token
        let active = client.active().await.unwrap();
        assert_eq!(client.state.vault.active_count().await, 1);
        assert!(client.state.vault.take(&active.token).await.is_some());
        assert_eq!(client.snapshot().await.detection, 1);
    }

    #[tokio::test]
    async fn test_defense_boost_wears_off_per_resolved_hack() {
        let mut client = Client::new();
        client.get("/login").await;
        client
            .post("/login", "action=choose&defense=firewall&def_pass=upgrade")
            .await;
        client.post("/login", "action=download").await;
        assert_eq!(client.snapshot().await.boost_hacks_left, 8);

        // Correct answer: reduced haul
        client.post("/hack", "action=new").await;
        let view = client.active_puzzle().await.unwrap();
        let (_, _, body) = client
            .post("/hack", &format!("action=submit&answer={}", form_value(&solve(&view))))
            .await;

        let sizes = exfiltrated_sizes(&body);
        assert_eq!(sizes.len(), 2);
        let multiplier = client.state.game.lock().await.rules().boost_multiplier;
        let snapshot = client.snapshot().await;
        assert_eq!(snapshot.files, reduce_for_boost(sizes.iter().sum(), multiplier));
        assert!(body.contains(&format!("+{}GB intel.", snapshot.files)));
        assert_eq!(snapshot.boost_hacks_left, 7);

        // Wrong answer
        client.post("/hack", "action=new").await;
        client
            .post("/hack", "action=submit&answer=definitely+wrong")
            .await;
        assert_eq!(client.snapshot().await.boost_hacks_left, 6);

        // Cancel
        client.post("/hack", "action=new").await;
        client.post("/hack", "action=cancel").await;
        assert_eq!(client.snapshot().await.boost_hacks_left, 5);

        // Expired token leaves the boost untouched
        client.post("/hack", "action=new").await;
        client.state.vault.clear().await;
        let (_, _, body) = client.post("/hack", "action=submit&answer=x").await;
        assert!(body.contains("This hack has expired. Start a new one."));
        assert_eq!(client.snapshot().await.boost_hacks_left, 5);
    }

    #[tokio::test]
    async fn test_failure_filling_detection_shows_trace_penalty() {
        let mut client = Client::new();
        client.get("/hack").await;
        {
            let mut game = client.state.game.lock().await;
            game.set_balances(20, 0);
            for _ in 0..4 {
                game.record_failure(DefenseSystem::Wires);
            }
        }

        client.post("/hack", "action=new").await;
        let (_, _, body) = client
            .post("/hack", "action=submit&answer=definitely+wrong")
            .await;

        assert!(body.contains("detection raised."));
        assert!(body.contains("Been traced — -12GB penalty."));
        let snapshot = client.snapshot().await;
        assert_eq!(snapshot.files, 8);
        assert_eq!(snapshot.detection, 5);
    }
}
