//! Backend of a bakery e-shop: public storefront (catalog, cart, checkout) and the
//! internal admin (B2C products and categories, B2B companies, stores, users).
//!
//!
//!
//! # General Infrastructure
//! - Frontend renders pages, this server only answers JSON and redirects
//! - Redis holds sessions, written by the auth provider and read here
//! - Catalog is a protobuf snapshot (`catalog.bin`) loaded into memory at startup
//! - Meilisearch is optional and only used for storefront full-text search
//!
//!
//!
//! # Access Control
//!
//! **Goal**: nothing under `/admin` is reachable without an admin session, and no
//! operation runs without its permission.
//!
//! - Every request passes the admin gate first
//! - Gate only looks at `/admin` and `/admin/...`, anything else passes untouched
//! - Missing, unknown or non-admin session: `307` to `/prihlasenie`
//! - Redis down: same redirect, the gate never fails open
//! - Handlers check their own permission (`b2b.read`, `b2c.write`, ...) and return
//!   `403 Forbidden` before touching any data
//!
//!
//!
//! # Routes
//!
//! Storefront
//! - `GET /api/products?search=&category=&storeId=`
//! - `GET /api/categories/{slug}`
//! - `GET /api/stores`
//! - `GET /api/search?q=`
//! - `GET /api/cart`, `POST /api/cart/items`, `DELETE /api/cart/items/{productId}`
//! - `POST /api/cart/panel`, `POST /api/cart/confirmation`
//! - `POST /api/checkout`
//!
//! Account and UI
//! - `GET /api/auth/session`, `POST /api/auth/logout`
//! - `POST /api/ui/sidebar`
//! - `POST /api/filters/{page}?shallow=&history=`
//!
//! Admin
//! - `GET /admin`
//! - `GET|POST /admin/b2c/products`, `PATCH /admin/b2c/products/{id}`
//! - `GET /admin/b2c/categories?name=`
//! - `GET /admin/b2b/companies?search=&isActive=`
//! - `GET /admin/stores?q=`, `GET /admin/users?q=`
//!
//!
//!
//! # Environment
//!
//! | Variable | Default |
//! |---|---|
//! | `RUST_PORT` | `8080` |
//! | `REDIS_URL` | `redis://redis:6379` |
//! | `MEILI_URL` | unset, search falls back to a catalog scan |
//! | `CATALOG_PATH` | `../catalog.bin`, empty runs without a snapshot |
//! | `CATALOG_URL` | unset |
//! | `SESSION_TTL_SECS` | `604800` |
//! | `CART_IDLE_SECS` | `604800` |
//! | `CART_CAPACITY` | `10000` |
//! | `LOGIN_PATH` | `/prihlasenie` |
//! | `ADMIN_PREFIX` | `/admin` |
//!
//! Secret `MEILI_ADMIN_KEY` is read from `/run/secrets/` when `MEILI_URL` is set.
use std::{sync::Arc, time::Duration};

use anyhow::Error;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod cart;
pub mod config;
pub mod database;
pub mod error;
pub mod gate;
pub mod params;
pub mod permissions;
pub mod queries;
pub mod routes;
pub mod search;
pub mod session;
pub mod state;
pub mod ui;

use gate::admin_gate;
use routes::{
    CATEGORIES_PATH, COMPANIES_PATH, DASHBOARD_PATH, PRODUCTS_PATH, STORES_PATH, USERS_PATH,
    account, admin, filters_handler, storefront,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/products", get(storefront::products_handler))
        .route("/api/categories/{slug}", get(storefront::category_handler))
        .route("/api/stores", get(storefront::stores_handler))
        .route("/api/search", get(storefront::search_handler))
        .route("/api/cart", get(storefront::cart_handler))
        .route("/api/cart/items", post(storefront::add_item_handler))
        .route(
            "/api/cart/items/{product_id}",
            delete(storefront::remove_item_handler),
        )
        .route("/api/cart/panel", post(storefront::panel_handler))
        .route(
            "/api/cart/confirmation",
            post(storefront::confirmation_handler),
        )
        .route("/api/checkout", post(storefront::checkout_handler))
        .route("/api/auth/session", get(account::session_handler))
        .route("/api/auth/logout", post(account::logout_handler))
        .route("/api/ui/sidebar", post(account::sidebar_handler))
        .route("/api/filters/{page}", post(filters_handler))
        .route(DASHBOARD_PATH, get(admin::dashboard_handler))
        .route(
            PRODUCTS_PATH,
            get(admin::products_handler).post(admin::create_product_handler),
        )
        .route(
            "/admin/b2c/products/{id}",
            patch(admin::update_product_handler),
        )
        .route(CATEGORIES_PATH, get(admin::categories_handler))
        .route(COMPANIES_PATH, get(admin::companies_handler))
        .route(STORES_PATH, get(admin::stores_handler))
        .route(USERS_PATH, get(admin::users_handler))
        .layer(from_fn_with_state(state.clone(), admin_gate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
