use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::AppError,
    params::{
        CatalogFilters, CategoryFilters, CompanyFilters, NavigateOptions, Navigation,
        ProductFilters, QueryFilters, SearchParams, navigate,
    },
};

pub mod account;
pub mod admin;
pub mod storefront;

pub const DASHBOARD_PATH: &str = "/admin";
pub const PRODUCTS_PATH: &str = "/admin/b2c/products";
pub const CATEGORIES_PATH: &str = "/admin/b2c/categories";
pub const COMPANIES_PATH: &str = "/admin/b2b/companies";
pub const STORES_PATH: &str = "/admin/stores";
pub const USERS_PATH: &str = "/admin/users";
pub const CATALOG_PATH: &str = "/produkty";

/// List response shared by admin pages and the storefront catalog.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T, F> {
    pub items: Vec<T>,
    pub total: usize,
    pub filters: F,
    /// Canonical location of this listing, filters encoded.
    pub href: String,
}

impl<T, F: SearchParams> Listing<T, F> {
    pub fn new(path: &str, filters: F, items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            href: filters.href(path),
            items,
            filters,
        }
    }
}

/// Pages with URL-synchronized filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Products,
    Categories,
    Companies,
    Stores,
    Users,
    Catalog,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Products => PRODUCTS_PATH,
            Page::Categories => CATEGORIES_PATH,
            Page::Companies => COMPANIES_PATH,
            Page::Stores => STORES_PATH,
            Page::Users => USERS_PATH,
            Page::Catalog => CATALOG_PATH,
        }
    }
}

impl FromStr for Page {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(Page::Products),
            "categories" => Ok(Page::Categories),
            "companies" => Ok(Page::Companies),
            "stores" => Ok(Page::Stores),
            "users" => Ok(Page::Users),
            "catalog" => Ok(Page::Catalog),
            _ => Err(AppError::NotFound),
        }
    }
}

fn write_filters<T>(page: Page, body: serde_json::Value, options: NavigateOptions) -> Result<Navigation, AppError>
where
    T: SearchParams + DeserializeOwned,
{
    let filters: T = serde_json::from_value(body).map_err(|_| AppError::MalformedPayload)?;

    Ok(navigate(page.path(), &filters, options))
}

/// Encodes a page's filter state into its URL. Shallow writes answer with the
/// new location as JSON, deep writes redirect to it.
pub async fn filters_handler(
    Path(page): Path<String>,
    Query(options): Query<NavigateOptions>,
    Json(body): Json<serde_json::Value>,
) -> Result<Navigation, AppError> {
    let page: Page = page.parse()?;

    match page {
        Page::Products => write_filters::<ProductFilters>(page, body, options),
        Page::Categories => write_filters::<CategoryFilters>(page, body, options),
        Page::Companies => write_filters::<CompanyFilters>(page, body, options),
        Page::Stores | Page::Users => write_filters::<QueryFilters>(page, body, options),
        Page::Catalog => write_filters::<CatalogFilters>(page, body, options),
    }
}
