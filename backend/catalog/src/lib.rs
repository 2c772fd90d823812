use std::{fs, path::Path};

use anyhow::{Context, Error};
use prost::Message;
use reqwest::get;

pub mod models;
pub mod utils;

pub use models::{Catalog, Category, Company, Product, Role, Store, User};

pub const CATALOG_PATH: &str = "../catalog.bin";

pub fn get_catalog(path: impl AsRef<Path>) -> Result<Catalog, Error> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    Ok(Catalog::decode(&*data)?)
}

/// Missing snapshot means a fresh, empty catalog.
pub fn get_catalog_or_default(path: impl AsRef<Path>) -> Result<Catalog, Error> {
    if path.as_ref().exists() {
        get_catalog(path)
    } else {
        Ok(Catalog::default())
    }
}

pub async fn get_catalog_remote(url: &str) -> Result<Catalog, Error> {
    let response = get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    Ok(Catalog::decode(&*bytes)?)
}

pub fn write_catalog(path: impl AsRef<Path>, catalog: &Catalog) -> Result<(), Error> {
    let path = path.as_ref();
    fs::write(path, catalog.encode_to_vec()).with_context(|| format!("writing {}", path.display()))
}

impl Catalog {
    pub fn product(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn product_mut(&mut self, id: u32) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.slug == slug)
    }

    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.slug == slug)
    }

    pub fn store(&self, id: u32) -> Option<&Store> {
        self.stores.iter().find(|store| store.id == id)
    }

    /// Assigns the next product id and appends.
    pub fn push_product(&mut self, mut product: Product) -> &Product {
        product.id = self.next_product_id;
        self.next_product_id += 1;

        self.products.push(product);
        &self.products[self.products.len() - 1]
    }

    pub fn push_category(&mut self, mut category: Category) -> u32 {
        category.id = self.next_category_id;
        self.next_category_id += 1;

        let id = category.id;
        self.categories.push(category);
        id
    }

    pub fn push_store(&mut self, mut store: Store) -> u32 {
        store.id = self.next_store_id;
        self.next_store_id += 1;

        let id = store.id;
        self.stores.push(store);
        id
    }

    pub fn push_company(&mut self, mut company: Company) -> u32 {
        company.id = self.next_company_id;
        self.next_company_id += 1;

        let id = company.id;
        self.companies.push(company);
        id
    }

    pub fn push_user(&mut self, mut user: User) -> u32 {
        user.id = self.next_user_id;
        self.next_user_id += 1;

        let id = user.id;
        self.users.push(user);
        id
    }
}
