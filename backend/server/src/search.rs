//! # Meilisearch
//!
//! Full-text product search for the storefront.
//!
//!
//!
//! ## Schema
//! - Index for all products
//! - Fields: id (**int**), name (**string**), slug (**string**), description (**string**),
//!   price_cents (**int**), category_id (**int**), is_active (**bool**)
//!
//!
//!
//! ## Sync
//! - Full upsert on startup from the catalog snapshot
//! - Full upsert after every admin product write, the index is small (a few hundred items)
//!
//!
//!
//! ## Fallback
//! Meilisearch is optional. Without `MEILI_URL` the search route falls back to the
//! same accent-insensitive substring match the admin lists use. Typo tolerance is
//! lost, results stay correct.
use std::sync::Arc;

use catalog::Product;
use meilisearch_sdk::{
    client::Client,
    settings::{MinWordSizeForTypos, Settings, TypoToleranceSettings},
};
use serde::{Deserialize, Serialize};

pub const PRODUCT_INDEX: &str = "products";
pub const PRODUCT_ID: &str = "id";
pub const PRODUCT_NAME: &str = "name";
pub const PRODUCT_DESCRIPTION: &str = "description";
pub const PRODUCT_CATEGORY: &str = "category_id";
pub const PRODUCT_ACTIVE: &str = "is_active";

pub type SearchError = meilisearch_sdk::errors::Error;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MeiliProduct {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price_cents: u32,
    pub category_id: u32,
    pub is_active: bool,
}

impl From<&Product> for MeiliProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price_cents: product.price_cents,
            category_id: product.category_id,
            is_active: product.is_active,
        }
    }
}

pub async fn init_meilisearch(
    meili_url: &str,
    meili_admin_key: &str,
    products: &[Product],
) -> Result<Arc<Client>, SearchError> {
    let meili_client = Arc::new(Client::new(meili_url, Some(meili_admin_key))?);

    meili_client
        .index(PRODUCT_INDEX)
        .set_settings(&init_settings())
        .await?;

    upsert_products(&meili_client, products).await?;

    Ok(meili_client)
}

pub async fn upsert_products(meili_client: &Client, products: &[Product]) -> Result<(), SearchError> {
    let meili_products: Vec<MeiliProduct> = products.iter().map(MeiliProduct::from).collect();

    let _result = meili_client
        .index(PRODUCT_INDEX)
        .add_or_update(&meili_products, Some(PRODUCT_ID))
        .await?
        .wait_for_completion(meili_client, None, None)
        .await?;

    #[cfg(feature = "verbose")]
    tracing::info!("Meili task result: {:?}", _result);

    Ok(())
}

/// Ids of active products matching `query`, best match first.
pub async fn search_products(meili_client: &Client, query: &str) -> Result<Vec<u32>, SearchError> {
    let filter = format!("{PRODUCT_ACTIVE} = true");

    let results = meili_client
        .index(PRODUCT_INDEX)
        .search()
        .with_query(query)
        .with_filter(&filter)
        .with_limit(50)
        .execute::<MeiliProduct>()
        .await?;

    Ok(results.hits.into_iter().map(|hit| hit.result.id).collect())
}

fn init_settings() -> Settings {
    Settings::new()
        .with_ranking_rules([
            "words",
            "typo",
            "proximity",
            "exactness",
            "attribute",
            "sort",
        ])
        .with_filterable_attributes([PRODUCT_CATEGORY, PRODUCT_ACTIVE])
        .with_searchable_attributes([PRODUCT_NAME, PRODUCT_DESCRIPTION])
        .with_typo_tolerance(TypoToleranceSettings {
            enabled: Some(true),
            disable_on_attributes: None,
            disable_on_words: None,
            min_word_size_for_typos: Some(MinWordSizeForTypos {
                one_typo: Some(5),
                two_typos: Some(9),
            }),
        })
}
