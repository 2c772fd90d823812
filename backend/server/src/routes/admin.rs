//! Admin API. Every route sits behind the admin gate and additionally checks its
//! own permission, so a route stays protected if it ever moves out of `/admin`.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use catalog::{Category, Company, Product, Store, User};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::{
    CATEGORIES_PATH, COMPANIES_PATH, Listing, PRODUCTS_PATH, STORES_PATH, USERS_PATH,
};
use crate::{
    error::AppError,
    params::{CategoryFilters, CompanyFilters, Params, ProductFilters, QueryFilters},
    permissions::Permission,
    queries::{
        NewProduct, ProductPatch, create_product, list_categories, list_companies, list_products,
        list_stores, list_users, update_product,
    },
    session::CurrentSession,
    state::AppState,
    ui::sidebar_open,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub products: usize,
    pub categories: usize,
    pub companies: usize,
    pub stores: usize,
    pub users: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub sidebar_open: bool,
    pub counts: Counts,
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    jar: CookieJar,
) -> Result<Json<Dashboard>, AppError> {
    session.require(Permission::B2C_READ)?;

    let catalog = state.catalog.read().await;

    Ok(Json(Dashboard {
        sidebar_open: sidebar_open(&jar),
        counts: Counts {
            products: catalog.products.len(),
            categories: catalog.categories.len(),
            companies: catalog.companies.len(),
            stores: catalog.stores.len(),
            users: catalog.users.len(),
        },
    }))
}

pub async fn products_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Params(filters): Params<ProductFilters>,
) -> Result<Json<Listing<Product, ProductFilters>>, AppError> {
    session.require(Permission::B2C_READ)?;

    let items = list_products(&*state.catalog.read().await, &filters);

    Ok(Json(Listing::new(PRODUCTS_PATH, filters, items)))
}

pub async fn create_product_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let session = session.require(Permission::B2C_WRITE)?;

    let product = {
        let mut catalog = state.catalog.write().await;
        create_product(&mut catalog, payload, Utc::now().timestamp())?
    };
    info!("User {} created product {}", session.user_id, product.slug);

    state.catalog_changed().await;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Path(id): Path<u32>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    let session = session.require(Permission::B2C_WRITE)?;

    let product = {
        let mut catalog = state.catalog.write().await;
        update_product(&mut catalog, id, patch)?
    };
    info!("User {} updated product {}", session.user_id, product.slug);

    state.catalog_changed().await;

    Ok(Json(product))
}

pub async fn categories_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Params(filters): Params<CategoryFilters>,
) -> Result<Json<Listing<Category, CategoryFilters>>, AppError> {
    session.require(Permission::B2C_READ)?;

    let items = list_categories(&*state.catalog.read().await, &filters);

    Ok(Json(Listing::new(CATEGORIES_PATH, filters, items)))
}

pub async fn companies_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Params(filters): Params<CompanyFilters>,
) -> Result<Json<Listing<Company, CompanyFilters>>, AppError> {
    session.require(Permission::B2B_READ)?;

    let items = list_companies(&*state.catalog.read().await, &filters);

    Ok(Json(Listing::new(COMPANIES_PATH, filters, items)))
}

pub async fn stores_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Params(filters): Params<QueryFilters>,
) -> Result<Json<Listing<Store, QueryFilters>>, AppError> {
    session.require(Permission::STORES_READ)?;

    let items = list_stores(&*state.catalog.read().await, &filters);

    Ok(Json(Listing::new(STORES_PATH, filters, items)))
}

pub async fn users_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Params(filters): Params<QueryFilters>,
) -> Result<Json<Listing<User, QueryFilters>>, AppError> {
    session.require(Permission::USERS_READ)?;

    let items = list_users(&*state.catalog.read().await, &filters);

    Ok(Json(Listing::new(USERS_PATH, filters, items)))
}
