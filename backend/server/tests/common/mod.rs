#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::COOKIE},
};
use catalog::{Catalog, Category, Company, Product, Store, User};
use http_body_util::BodyExt;
use server::{
    app,
    config::Config,
    permissions::Role,
    session::{MemorySessionStore, SESSION_COOKIE, Session, SessionStore},
    state::AppState,
};
use tower::ServiceExt;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub sessions: Arc<MemorySessionStore>,
}

pub fn catalog() -> Catalog {
    let mut catalog = Catalog::default();
    let bread = catalog.push_category(Category {
        name: "Chlieb".to_string(),
        slug: "chlieb".to_string(),
        ..Default::default()
    });
    let pastry = catalog.push_category(Category {
        name: "Pečivo".to_string(),
        slug: "pecivo".to_string(),
        ..Default::default()
    });
    catalog.push_store(Store {
        name: "Centrum".to_string(),
        address: "Hlavná 1".to_string(),
        is_active: true,
        ..Default::default()
    });
    catalog.push_company(Company {
        name: "Hotel Tatra".to_string(),
        ico: "12345678".to_string(),
        is_active: true,
        ..Default::default()
    });
    catalog.push_user(User {
        email: "admin@pekaren.sk".to_string(),
        role: catalog::Role::Admin as i32,
        ..Default::default()
    });
    catalog.push_product(Product {
        name: "Kváskový chlieb".to_string(),
        slug: "kvaskovy-chlieb".to_string(),
        price_cents: 450,
        category_id: bread,
        store_ids: vec![0],
        is_active: true,
        ..Default::default()
    });
    catalog.push_product(Product {
        name: "Rožok".to_string(),
        slug: "rozok".to_string(),
        price_cents: 25,
        category_id: pastry,
        store_ids: vec![0],
        is_active: true,
        ..Default::default()
    });
    catalog
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let state = AppState::with_parts(config, catalog(), sessions.clone());

        Self { state, sessions }
    }

    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    pub async fn login(&self, role: Role) -> String {
        let token = self
            .sessions
            .create(Session { user_id: 1, role })
            .await
            .unwrap();

        format!("{SESSION_COOKIE}={token}")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` part of a `Set-Cookie` header.
pub fn set_cookie_pair(response: &Response<Body>) -> String {
    response.headers()["set-cookie"]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}
