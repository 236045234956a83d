//! Server-side sessions.
//!
//! A session binds a client-held cookie token to exactly one identity: a
//! regular account (by id) or the fixed administrator. Records expire 24
//! hours after creation; expired records are treated as absent and dropped
//! lazily on lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ResultEngine;

/// How long a session stays valid after login, in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Who a session belongs to. Admin sessions carry no user id; the two
/// identities are mutually exclusive by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    User(String),
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionData {
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            expires_at: Utc::now() + TimeDelta::hours(SESSION_TTL_HOURS),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Session repository keyed by the cookie token.
///
/// Every operation may fail with [`EngineError::Session`] when the backing
/// store does; the in-memory backing never fails.
///
/// [`EngineError::Session`]: crate::EngineError::Session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session and returns its token.
    async fn insert(&self, data: SessionData) -> ResultEngine<Uuid>;

    /// Looks up a live session. Expired sessions are reported as `None`.
    async fn get(&self, token: Uuid) -> ResultEngine<Option<SessionData>>;

    /// Removes a session. Removing an absent token is a no-op.
    async fn remove(&self, token: Uuid) -> ResultEngine<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionData>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, data: SessionData) -> ResultEngine<Uuid> {
        let token = Uuid::new_v4();
        self.sessions.write().await.insert(token, data);
        Ok(token)
    }

    async fn get(&self, token: Uuid) -> ResultEngine<Option<SessionData>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&token) {
            Some(data) if data.is_expired() => {
                sessions.remove(&token);
                Ok(None)
            }
            Some(data) => Ok(Some(data.clone())),
            None => Ok(None),
        }
    }

    async fn remove(&self, token: Uuid) -> ResultEngine<()> {
        self.sessions.write().await.remove(&token);
        Ok(())
    }
}
