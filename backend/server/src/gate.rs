//! # Admin Gate
//!
//! Middleware in front of every route. Requests under the admin prefix need an
//! admin session, anything else is redirected to the login page.
//!
//! - Prefix match is segment-wise: `/admin` and `/admin/...` are gated, `/administrator` is not
//! - A session backend failure counts as "not admin" (fail-closed)
//! - Passing requests go through untouched, handlers resolve the session again
//!   for their own permission checks
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

use crate::{permissions::Role, session::resolve_session, state::AppState};

pub fn is_admin_path(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub async fn admin_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if !is_admin_path(&state.config.admin_prefix, &path) {
        return next.run(request).await;
    }

    let resolved = resolve_session(state.sessions.as_ref(), request.headers()).await;

    match resolved {
        Ok(Some(session)) if session.role == Role::Admin => next.run(request).await,
        Ok(session) => {
            info!(
                "Gate denied {path} for {}",
                session.map_or("anonymous", |s| s.role.as_str())
            );

            Redirect::temporary(&state.config.login_path).into_response()
        }
        Err(e) => {
            warn!("Gate could not resolve session for {path}: {e}");

            Redirect::temporary(&state.config.login_path).into_response()
        }
    }
}
