mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{TestApp, body_json, body_text, catalog, get, json};
use redis::{ErrorKind, RedisError};
use server::{
    app,
    config::Config,
    permissions::Role,
    session::{Session, SessionError, SessionStore},
    state::AppState,
};
use tower::ServiceExt;

/// Session backend that is down.
struct UnreachableStore;

fn refused() -> SessionError {
    RedisError::from((ErrorKind::IoError, "connection refused")).into()
}

#[async_trait]
impl SessionStore for UnreachableStore {
    async fn get(&self, _token: &str) -> Result<Option<Session>, SessionError> {
        Err(refused())
    }

    async fn create(&self, _session: Session) -> Result<String, SessionError> {
        Err(refused())
    }

    async fn destroy(&self, _token: &str) -> Result<(), SessionError> {
        Err(refused())
    }
}

const ADMIN_PATHS: [&str; 6] = [
    "/admin",
    "/admin/b2c/products",
    "/admin/b2c/categories",
    "/admin/b2b/companies",
    "/admin/stores",
    "/admin/users",
];

#[tokio::test]
async fn test_anonymous_redirected_to_login() {
    let app = TestApp::new();

    for path in ADMIN_PATHS {
        let response = app.send(get(path, None)).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.headers()["location"], "/prihlasenie", "{path}");
    }
}

#[tokio::test]
async fn test_unknown_admin_path_redirected_before_routing() {
    let app = TestApp::new();

    let response = app.send(get("/admin/does-not-exist", None)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_user_role_redirected() {
    let app = TestApp::new();
    let cookie = app.login(Role::User).await;

    for path in ADMIN_PATHS {
        let response = app.send(get(path, Some(&cookie))).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
    }
}

#[tokio::test]
async fn test_stale_token_redirected() {
    let app = TestApp::new();

    let response = app
        .send(get("/admin/b2c/products", Some("session=0000")))
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_session_backend_down_redirects() {
    let state = AppState::with_parts(Config::default(), catalog(), Arc::new(UnreachableStore));

    for path in ADMIN_PATHS {
        let response = app(state.clone())
            .oneshot(get(path, Some("session=abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.headers()["location"], "/prihlasenie", "{path}");
    }

    let response = app(state.clone())
        .oneshot(get("/api/products", Some("session=abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(state)
        .oneshot(get("/api/auth/session", Some("session=abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_passes_through() {
    let app = TestApp::new();
    let cookie = app.login(Role::Admin).await;

    for path in ADMIN_PATHS {
        let response = app.send(get(path, Some(&cookie))).await;

        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_admin_products_page_renders() {
    let app = TestApp::new();
    let cookie = app.login(Role::Admin).await;

    let response = app
        .send(get("/admin/b2c/products?search=rozok&ignored=1", Some(&cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["slug"], "rozok");
    assert_eq!(body["href"], "/admin/b2c/products?search=rozok");
}

#[tokio::test]
async fn test_non_admin_paths_not_gated() {
    let app = TestApp::new();

    let response = app.send(get("/api/products", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(get("/administrator", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_path_configurable() {
    let app = TestApp::with_config(Config {
        login_path: "/login".to_string(),
        ..Config::default()
    });

    let response = app.send(get("/admin", None)).await;

    assert_eq!(response.headers()["location"], "/login");
}

/// With the gate moved elsewhere, handlers still enforce their own permission.
#[tokio::test]
async fn test_permission_check_without_gate() {
    let app = TestApp::with_config(Config {
        admin_prefix: "/backoffice".to_string(),
        ..Config::default()
    });
    let user = app.login(Role::User).await;

    let response = app.send(get("/admin/b2b/companies", Some(&user))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "Forbidden");

    let response = app.send(get("/admin/users", None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(get("/admin/stores", Some(&user))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_cannot_write_products() {
    let app = TestApp::with_config(Config {
        admin_prefix: "/backoffice".to_string(),
        ..Config::default()
    });
    let user = app.login(Role::User).await;

    let response = app
        .send(json(
            "POST",
            "/admin/b2c/products",
            Some(&user),
            serde_json::json!({ "name": "Bábovka", "priceCents": 900, "categoryId": 0 }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.state.catalog.read().await.product_by_slug("babovka").is_none());
}

#[tokio::test]
async fn test_logout_ends_admin_access() {
    let app = TestApp::new();
    let cookie = app.login(Role::Admin).await;

    let response = app
        .send(json("POST", "/api/auth/logout", Some(&cookie), serde_json::json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(
        response.headers()["set-cookie"]
            .to_str()
            .unwrap()
            .starts_with("session=; Path=/; Max-Age=0")
    );

    let response = app.send(get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}
