//! Catalog reads and admin writes. Everything works on the in-memory snapshot,
//! callers hold the catalog lock.
use catalog::{
    Catalog, Category, Company, Product, Store, User,
    utils::{sanitize, slugify},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    params::{CatalogFilters, CategoryFilters, CompanyFilters, ProductFilters, QueryFilters},
};

/// Accent and case insensitive substring match, "rozok" finds "Rožok".
fn matches_text(text: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => slugify(text).contains(&slugify(needle)),
        None => true,
    }
}

fn matches_id(id: u32, filter: Option<&str>) -> bool {
    filter.is_none_or(|filter| filter.trim() == id.to_string())
}

fn matches_flag(flag: bool, filter: Option<bool>) -> bool {
    filter.is_none_or(|filter| filter == flag)
}

/// Active pickup stores, by name.
pub fn get_stores(catalog: &Catalog) -> Vec<Store> {
    let mut stores: Vec<Store> = catalog
        .stores
        .iter()
        .filter(|store| store.is_active)
        .cloned()
        .collect();

    stores.sort_by(|a, b| a.name.cmp(&b.name));
    stores
}

pub fn get_category(catalog: &Catalog, slug: &str) -> Result<Category, AppError> {
    catalog
        .category_by_slug(slug)
        .cloned()
        .ok_or(AppError::NotFound)
}

pub fn list_products(catalog: &Catalog, filters: &ProductFilters) -> Vec<Product> {
    catalog
        .products
        .iter()
        .filter(|product| {
            matches_text(&product.name, filters.search.as_deref())
                && matches_id(product.category_id, filters.category_id.as_deref())
                && matches_flag(product.is_active, filters.is_active)
        })
        .cloned()
        .collect()
}

/// Storefront listing: only active products, category given by slug.
pub fn list_catalog(catalog: &Catalog, filters: &CatalogFilters) -> Vec<Product> {
    let category_id = match filters.category.as_deref() {
        Some(slug) => match catalog.category_by_slug(slug) {
            Some(category) => Some(category.id),
            None => return Vec::new(),
        },
        None => None,
    };

    catalog
        .products
        .iter()
        .filter(|product| {
            product.is_active
                && matches_text(&product.name, filters.search.as_deref())
                && category_id.is_none_or(|id| id == product.category_id)
                && filters.store_id.as_deref().is_none_or(|store_id| {
                    product
                        .store_ids
                        .iter()
                        .any(|id| matches_id(*id, Some(store_id)))
                })
        })
        .cloned()
        .collect()
}

pub fn list_categories(catalog: &Catalog, filters: &CategoryFilters) -> Vec<Category> {
    catalog
        .categories
        .iter()
        .filter(|category| matches_text(&category.name, filters.name.as_deref()))
        .cloned()
        .collect()
}

pub fn list_companies(catalog: &Catalog, filters: &CompanyFilters) -> Vec<Company> {
    let search = filters.search.as_deref();

    catalog
        .companies
        .iter()
        .filter(|company| {
            (matches_text(&company.name, search)
                || matches_text(&company.ico, search)
                || matches_text(&company.email, search))
                && matches_flag(company.is_active, filters.is_active)
        })
        .cloned()
        .collect()
}

pub fn list_stores(catalog: &Catalog, filters: &QueryFilters) -> Vec<Store> {
    let q = filters.q.as_deref();

    catalog
        .stores
        .iter()
        .filter(|store| matches_text(&store.name, q) || matches_text(&store.address, q))
        .cloned()
        .collect()
}

pub fn list_users(catalog: &Catalog, filters: &QueryFilters) -> Vec<User> {
    let q = filters.q.as_deref();

    catalog
        .users
        .iter()
        .filter(|user| matches_text(&user.email, q) || matches_text(&user.name, q))
        .cloned()
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u32,
    pub category_id: u32,
    #[serde(default)]
    pub store_ids: Vec<u32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub is_active: Option<bool>,
    pub price_cents: Option<u32>,
}

pub fn create_product(
    catalog: &mut Catalog,
    new_product: NewProduct,
    now: i64,
) -> Result<Product, AppError> {
    let name = sanitize(&new_product.name);
    let slug = slugify(&name);

    if slug.is_empty()
        || catalog.category(new_product.category_id).is_none()
        || new_product
            .store_ids
            .iter()
            .any(|id| catalog.store(*id).is_none())
    {
        return Err(AppError::MalformedPayload);
    }

    if catalog.product_by_slug(&slug).is_some() {
        return Err(AppError::Conflict(slug));
    }

    let product = catalog.push_product(Product {
        name,
        slug,
        description: new_product.description,
        price_cents: new_product.price_cents,
        category_id: new_product.category_id,
        store_ids: new_product.store_ids,
        is_active: new_product.is_active,
        created_at: now,
        ..Default::default()
    });

    Ok(product.clone())
}

pub fn update_product(
    catalog: &mut Catalog,
    id: u32,
    patch: ProductPatch,
) -> Result<Product, AppError> {
    let product = catalog.product_mut(id).ok_or(AppError::NotFound)?;

    if let Some(is_active) = patch.is_active {
        product.is_active = is_active;
    }
    if let Some(price_cents) = patch.price_cents {
        product.price_cents = price_cents;
    }

    Ok(product.clone())
}
