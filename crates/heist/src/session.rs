//! Cookie-identified server-side sessions.
//!
//! The cookie carries only a random session id. Everything else (active
//! puzzle token, defender scope) lives in the [`SessionStore`].

use axum::http::{HeaderMap, HeaderValue, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use heist_common::{DefenseSystem, PuzzleView};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::config::SessionConfig;

/// Puzzle currently assigned to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePuzzle {
    /// Vault token for the expected answer
    pub token: String,
    pub view: PuzzleView,
}

/// Per-session data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub puzzle: Option<ActivePuzzle>,
    /// Defense the defender is signed into
    pub admin_scope: Option<DefenseSystem>,
    pub last_seen: i64,
}

/// A resolved session: id, data, and whether the cookie must be (re)issued
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub data: SessionData,
    pub is_new: bool,
}

/// In-memory session store
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Look up the session named by the request cookie, or start a new one
    pub async fn resolve(&self, headers: &HeaderMap) -> Session {
        let now = chrono::Utc::now().timestamp();

        if let Some(id) = extract_cookie(headers, &self.config.cookie_name) {
            let mut sessions = self.sessions.write().await;
            if let Some(data) = sessions.get_mut(&id) {
                if !self.is_idle(data, now) {
                    data.last_seen = now;
                    return Session {
                        id,
                        data: data.clone(),
                        is_new: false,
                    };
                }
                sessions.remove(&id);
            }
        }

        let id = generate_session_id();
        let data = SessionData {
            last_seen: now,
            ..Default::default()
        };
        self.sessions.write().await.insert(id.clone(), data.clone());

        tracing::debug!(session = %id, "New session");

        Session {
            id,
            data,
            is_new: true,
        }
    }

    /// Persist a session's data
    pub async fn save(&self, session: &Session) {
        let mut data = session.data.clone();
        data.last_seen = chrono::Utc::now().timestamp();
        self.sessions.write().await.insert(session.id.clone(), data);
    }

    /// Drop sessions idle longer than the TTL, returning how many were dropped
    pub async fn purge_idle(&self) -> usize {
        let now = chrono::Utc::now().timestamp();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| !self.is_idle(data, now));
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_idle(&self, data: &SessionData, now: i64) -> bool {
        now.saturating_sub(data.last_seen) > i64::try_from(self.config.ttl_secs).unwrap_or(i64::MAX)
    }

    /// `Set-Cookie` value for a session id
    pub fn cookie_header(&self, id: &str) -> HeaderValue {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.config.cookie_name, id, self.config.ttl_secs
        );
        if self.config.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// Generate a cryptographically random session id
fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
