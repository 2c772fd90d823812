use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::cookie::CookieJar;
use catalog::{Category, Product, Store};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{CATALOG_PATH, Listing};
use crate::{
    cart::{Cart, Order, cart_cookie, cart_id, checkout, complete},
    error::AppError,
    params::{CatalogFilters, Params, QueryFilters},
    permissions::Permission,
    queries::{get_category, get_stores, list_catalog},
    search::search_products,
    session::CurrentSession,
    state::AppState,
    ui::{Toggle, ToggleAction},
};

pub async fn products_handler(
    State(state): State<Arc<AppState>>,
    Params(filters): Params<CatalogFilters>,
) -> Json<Listing<Product, CatalogFilters>> {
    let items = list_catalog(&*state.catalog.read().await, &filters);

    Json(Listing::new(CATALOG_PATH, filters, items))
}

#[derive(Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub products: Vec<Product>,
}

pub async fn category_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryPage>, AppError> {
    let catalog = state.catalog.read().await;
    let category = get_category(&catalog, &slug)?;

    let products = list_catalog(
        &catalog,
        &CatalogFilters {
            category: Some(category.slug.clone()),
            ..Default::default()
        },
    );

    Ok(Json(CategoryPage { category, products }))
}

pub async fn stores_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Store>> {
    Json(get_stores(&*state.catalog.read().await))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Params(query): Params<QueryFilters>,
) -> Json<Vec<Product>> {
    let Some(q) = query.q else {
        return Json(Vec::new());
    };

    if let Some(meili_client) = &state.meili_client {
        match search_products(meili_client, &q).await {
            Ok(ids) => {
                let catalog = state.catalog.read().await;
                let hits: Vec<Product> = ids
                    .into_iter()
                    .filter_map(|id| catalog.product(id))
                    .filter(|product| product.is_active)
                    .cloned()
                    .collect();

                return Json(hits);
            }
            Err(e) => warn!("Search failed, falling back to catalog scan: {e}"),
        }
    }

    let filters = CatalogFilters {
        search: Some(q),
        ..Default::default()
    };

    Json(list_catalog(&*state.catalog.read().await, &filters))
}

/// Existing cart id from the jar, or a fresh one with its cookie added.
fn cart_identity(jar: CookieJar) -> (Uuid, CookieJar) {
    match cart_id(&jar) {
        Some(id) => (id, jar),
        None => {
            let id = Uuid::new_v4();
            (id, jar.add(cart_cookie(id)))
        }
    }
}

/// Unknown or expired carts read as empty, nothing is stored until the first write.
pub async fn cart_handler(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<Cart> {
    let carts = state.carts.read().await;

    let cart = cart_id(&jar)
        .and_then(|id| carts.get(&id))
        .cloned()
        .unwrap_or_default();

    Json(cart)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItem {
    pub product_id: u32,
    pub quantity: u32,
}

pub async fn add_item_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<AddItem>,
) -> Result<(CookieJar, Json<Cart>), AppError> {
    let available = state
        .catalog
        .read()
        .await
        .product(payload.product_id)
        .is_some_and(|product| product.is_active);

    if !available {
        return Err(AppError::NotFound);
    }

    let (id, jar) = cart_identity(jar);

    let cart = {
        let mut carts = state.carts.write().await;
        let cart = carts.entry(id);
        cart.add(payload.product_id, payload.quantity)?;
        cart.clone()
    };

    Ok((jar, Json(cart)))
}

pub async fn remove_item_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(product_id): Path<u32>,
) -> Result<Json<Cart>, AppError> {
    let id = cart_id(&jar).ok_or(AppError::NotFound)?;

    let mut carts = state.carts.write().await;
    let cart = carts.get_mut(&id).ok_or(AppError::NotFound)?;

    if !cart.remove(product_id) {
        return Err(AppError::NotFound);
    }

    Ok(Json(cart.clone()))
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub action: ToggleAction,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub open: bool,
}

fn panel(cart: &mut Cart) -> &mut Toggle {
    &mut cart.panel
}

fn confirmation(cart: &mut Cart) -> &mut Toggle {
    &mut cart.confirmation
}

async fn toggle_cart(
    state: &AppState,
    jar: CookieJar,
    select: fn(&mut Cart) -> &mut Toggle,
    action: ToggleAction,
) -> (CookieJar, Json<ToggleResponse>) {
    let (id, jar) = cart_identity(jar);

    let open = {
        let mut carts = state.carts.write().await;
        select(carts.entry(id)).apply(action)
    };

    (jar, Json(ToggleResponse { open }))
}

pub async fn panel_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<ToggleRequest>,
) -> (CookieJar, Json<ToggleResponse>) {
    toggle_cart(&state, jar, panel, payload.action).await
}

pub async fn confirmation_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<ToggleRequest>,
) -> (CookieJar, Json<ToggleResponse>) {
    toggle_cart(&state, jar, confirmation, payload.action).await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub store_id: u32,
}

pub async fn checkout_handler(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    jar: CookieJar,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<Order>, AppError> {
    let session = session.require(Permission::ORDERS_CREATE)?;
    let id = cart_id(&jar).ok_or(AppError::MalformedPayload)?;

    let order = {
        let catalog = state.catalog.read().await;
        let mut carts = state.carts.write().await;
        let cart = carts.get_mut(&id).ok_or(AppError::MalformedPayload)?;

        let order = checkout(&catalog, cart, session.user_id, payload.store_id)?;
        complete(cart);
        order
    };

    info!(
        "Order {} by user {}: {} cents at store {}",
        order.id, order.user_id, order.total_cents, order.store_id
    );

    Ok(Json(order))
}
