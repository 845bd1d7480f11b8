//! Server-side sessions.
//!
//! A session maps an opaque token to the user it authenticates and the moment it stops
//! being valid. Handlers and the auth middleware only see the [`SessionStore`] trait;
//! the store is injected as `web::Data<dyn SessionStore>`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;

/// Lifetime of a "remember me" session: 7 days.
pub const REMEMBER_ME_SECONDS: i64 = 60 * 60 * 24 * 7;

/// How long a session stays valid after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExpiry {
    /// The client drops the cookie when the browser closes.
    BrowserSession,
    /// Valid for a fixed number of seconds from login.
    Fixed(i64),
}

impl SessionExpiry {
    pub fn from_remember_me(remember_me: bool) -> Self {
        if remember_me {
            SessionExpiry::Fixed(REMEMBER_ME_SECONDS)
        } else {
            SessionExpiry::BrowserSession
        }
    }

    /// Seconds the client should keep its cookie for, if it should persist at all.
    pub fn cookie_max_age(&self) -> Option<i64> {
        match self {
            SessionExpiry::BrowserSession => None,
            SessionExpiry::Fixed(seconds) => Some(*seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i32,
    pub expiry: SessionExpiry,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.expiry, SessionExpiry::Fixed(_))
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session for `user_id` and returns it with its fresh token.
    async fn create(&self, user_id: i32, expiry: SessionExpiry) -> Session;
    /// Returns the live session behind `token`; expired sessions are dropped and read as absent.
    async fn get(&self, token: &str) -> Option<Session>;
    /// Invalidates `token`. Returns whether a session was removed.
    async fn remove(&self, token: &str) -> bool;
}

/// Process-local session store.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    /// Server-side ceiling for browser sessions, whose real end the server never observes.
    browser_session_ttl: Duration,
}

impl MemorySessionStore {
    /// A store whose browser sessions end after `SESSION_IDLE_SECONDS`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session_idle_seconds)
    }

    pub fn new(browser_session_seconds: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            browser_session_ttl: Duration::seconds(browser_session_seconds),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn lifetime(&self, expiry: SessionExpiry) -> Duration {
        match expiry {
            SessionExpiry::BrowserSession => self.browser_session_ttl,
            SessionExpiry::Fixed(seconds) => Duration::seconds(seconds),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i32, expiry: SessionExpiry) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            expiry,
            created_at: now,
            expires_at: now + self.lifetime(expiry),
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired_at(now));
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired_at(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}
