use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    session::{CurrentSession, Session, session_removal, session_token},
    state::AppState,
    ui::sidebar_cookie,
};

pub async fn session_handler(session: CurrentSession) -> Result<Json<Session>, AppError> {
    Ok(Json(session.authenticated()?.clone()))
}

/// Idempotent. The cookie is only cleared when the request carried one.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), AppError> {
    if let Some(token) = session_token(&jar) {
        state.sessions.destroy(token).await?;
        info!("Session destroyed");
    }

    Ok((StatusCode::NO_CONTENT, jar.remove(session_removal())))
}

#[derive(Deserialize)]
pub struct SidebarRequest {
    pub open: bool,
}

pub async fn sidebar_handler(
    jar: CookieJar,
    Json(payload): Json<SidebarRequest>,
) -> (StatusCode, CookieJar) {
    (StatusCode::NO_CONTENT, jar.add(sidebar_cookie(payload.open)))
}
