//! # Sessions
//!
//! The auth provider creates a session on login and hands the browser an opaque
//! token in the `session` cookie. Every request resolves that token back into a
//! [`Session`], or nothing.
//!
//! ## Storage
//! - Redis `session:{token}` -> JSON `{ userId, role }`, TTL from `SESSION_TTL_SECS`
//! - Expiry is Redis' job, a missing key is an expired session
//! - [`MemorySessionStore`] backs tests and local runs without Redis
use std::{collections::HashMap, convert::Infallible, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::AppError,
    permissions::{Permission, Role, authorize},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: u32,
    pub role: Role,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session backend: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("corrupt session: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::InternalError(Box::new(e))
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Returns the new session token.
    async fn create(&self, session: Session) -> Result<String, SessionError>;

    async fn destroy(&self, token: &str) -> Result<(), SessionError>;
}

pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn create(&self, session: Session) -> Result<String, SessionError> {
        let token = new_token();
        self.sessions.write().await.insert(token.clone(), session);

        Ok(token)
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(token);

        Ok(())
    }
}

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|token| !token.is_empty())
}

/// Removal cookie for logout, `Max-Age=0` on the same path the provider sets.
pub fn session_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

pub async fn resolve_session(
    store: &dyn SessionStore,
    headers: &HeaderMap,
) -> Result<Option<Session>, SessionError> {
    let jar = CookieJar::from_headers(headers);

    match session_token(&jar) {
        Some(token) => store.get(token).await,
        None => Ok(None),
    }
}

/// Session of the caller, if any. Backend failures resolve to no session.
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn require(&self, permission: Permission) -> Result<&Session, AppError> {
        authorize(self.0.as_ref(), permission)
    }

    pub fn authenticated(&self) -> Result<&Session, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = resolve_session(state.sessions.as_ref(), &parts.headers)
            .await
            .unwrap_or_else(|e| {
                warn!("Session lookup failed: {e}");
                None
            });

        Ok(CurrentSession(session))
    }
}
