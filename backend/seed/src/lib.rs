//! # Catalog Seeding
//!
//! Imports a JSON export of the shop into the protobuf snapshot the server loads.
//!
//! ## Flow
//! 1. Load the existing snapshot, or start empty when there is none.
//!
//! 2. Fetch the export, from disk or over http(s).
//!
//! 3. Upsert categories, stores, companies and users. Keys are the category slug,
//!    the store name, the company ICO and the user email.
//!
//! 4. Upsert products by slug. A product points at its category and stores by name,
//!    missing categories are created on the fly, unknown stores are skipped.
//!
//! 5. Write the snapshot back.
//!
//! Ids are never reassigned, so carts and sessions referencing them survive a reseed.
use anyhow::{Context, Error};
use catalog::{
    Catalog, Category, Company, Product, Role, Store, User, get_catalog_or_default,
    utils::{sanitize, slugify},
    write_catalog,
};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

pub mod models;

use models::{Export, ExportProduct};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub new_items: usize,
    pub updated_items: usize,
    pub skipped_items: usize,
}

pub async fn seed_catalog(source: &str, out: &str) -> Result<Summary, Error> {
    let mut catalog = get_catalog_or_default(out)?;

    println!("Loaded Products: {}", catalog.products.len());
    println!("Loaded Categories: {}\n", catalog.categories.len());

    let export = load_export(source).await?;
    let summary = import(&mut catalog, export, Utc::now().timestamp());

    if summary.new_items == 0 && summary.updated_items == 0 {
        println!("No new or changed items found.");
    } else {
        println!("Total New Items: {}", summary.new_items);
        println!("Total Updated Items: {}", summary.updated_items);
        println!("Skipped Items: {}\n", summary.skipped_items);

        println!("Product Verification: {}", catalog.products.len());
        println!("Category Verification: {}", catalog.categories.len());
    }

    write_catalog(out, &catalog)?;

    Ok(summary)
}

pub async fn load_export(source: &str) -> Result<Export, Error> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        let res = reqwest::get(source).await?.error_for_status()?;

        #[cfg(feature = "verbose")]
        println!("Status: {}\n", res.status());

        res.text().await?
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };

    Ok(serde_json::from_str(&text)?)
}

pub fn import(catalog: &mut Catalog, export: Export, now: i64) -> Summary {
    let mut summary = Summary::default();

    for category in export.categories {
        ensure_category(catalog, &category.name, &mut summary);
    }

    for store in export.stores {
        let name = sanitize(&store.name);
        if name.is_empty() {
            summary.skipped_items += 1;
            continue;
        }

        match catalog.stores.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                if existing.address != store.address {
                    existing.address = store.address;
                    summary.updated_items += 1;
                }
            }
            None => {
                catalog.push_store(Store {
                    name,
                    address: store.address,
                    is_active: true,
                    ..Default::default()
                });
                summary.new_items += 1;
            }
        }
    }

    for company in export.companies {
        let ico = company.ico.trim().to_string();
        if ico.is_empty() {
            summary.skipped_items += 1;
            continue;
        }

        match catalog.companies.iter_mut().find(|c| c.ico == ico) {
            Some(existing) => {
                existing.name = sanitize(&company.name);
                existing.email = company.email;
                summary.updated_items += 1;
            }
            None => {
                catalog.push_company(Company {
                    name: sanitize(&company.name),
                    ico,
                    email: company.email,
                    is_active: true,
                    ..Default::default()
                });
                summary.new_items += 1;
            }
        }
    }

    for user in export.users {
        let email = user.email.trim().to_lowercase();
        let Some(role) = Role::from_name(&user.role) else {
            #[cfg(feature = "verbose")]
            println!("Unknown role {} for {}", user.role, email);

            summary.skipped_items += 1;
            continue;
        };

        match catalog.users.iter_mut().find(|u| u.email == email) {
            Some(existing) => {
                existing.name = sanitize(&user.name);
                existing.set_role(role);
                summary.updated_items += 1;
            }
            None => {
                let mut new_user = User {
                    email,
                    name: sanitize(&user.name),
                    ..Default::default()
                };
                new_user.set_role(role);
                catalog.push_user(new_user);
                summary.new_items += 1;
            }
        }
    }

    let pb = ProgressBar::new(export.products.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );

    for product in export.products {
        pb.set_message(format!("Importing {}", product.name));
        upsert_product(catalog, product, now, &mut summary);
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    summary
}

fn ensure_category(catalog: &mut Catalog, name: &str, summary: &mut Summary) -> Option<u32> {
    let slug = slugify(name);
    if slug.is_empty() {
        summary.skipped_items += 1;
        return None;
    }

    if let Some(existing) = catalog.category_by_slug(&slug) {
        return Some(existing.id);
    }

    #[cfg(feature = "verbose")]
    println!("New category! {}", slug);

    summary.new_items += 1;
    Some(catalog.push_category(Category {
        name: sanitize(name),
        slug,
        ..Default::default()
    }))
}

fn upsert_product(catalog: &mut Catalog, product: ExportProduct, now: i64, summary: &mut Summary) {
    let slug = slugify(&product.name);
    if slug.is_empty() {
        summary.skipped_items += 1;
        return;
    }

    let Some(category_id) = ensure_category(catalog, &product.category, summary) else {
        summary.skipped_items += 1;
        return;
    };

    let store_ids: Vec<u32> = product
        .stores
        .iter()
        .filter_map(|name| {
            let name = sanitize(name);
            catalog.stores.iter().find(|s| s.name == name).map(|s| s.id)
        })
        .collect();

    match catalog.products.iter_mut().find(|p| p.slug == slug) {
        Some(existing) => {
            existing.name = sanitize(&product.name);
            existing.description = product.description;
            existing.price_cents = product.price_cents;
            existing.category_id = category_id;
            existing.store_ids = store_ids;
            existing.is_active = product.is_active;
            summary.updated_items += 1;
        }
        None => {
            #[cfg(feature = "verbose")]
            println!("New item! {}", slug);

            catalog.push_product(Product {
                name: sanitize(&product.name),
                slug,
                description: product.description,
                price_cents: product.price_cents,
                category_id,
                store_ids,
                is_active: product.is_active,
                created_at: now,
                ..Default::default()
            });
            summary.new_items += 1;
        }
    }
}
