//! # Catalog Snapshot
//!
//! Protobuf messages making up `catalog.bin`. Schema mirrored in `catalog.proto`
//! at the repository root for non-Rust consumers.
//!
//! ## Notes
//! - Only repeated fields preserve ordering, listings rely on it.
//! - Ids are never reused, `next_*_id` counters only grow.
use prost::{Enumeration, Message};
use serde::{Serialize, Serializer};

#[derive(Clone, PartialEq, Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[prost(message, repeated, tag = "1")]
    pub categories: Vec<Category>,
    #[prost(message, repeated, tag = "2")]
    pub products: Vec<Product>,
    #[prost(message, repeated, tag = "3")]
    pub companies: Vec<Company>,
    #[prost(message, repeated, tag = "4")]
    pub stores: Vec<Store>,
    #[prost(message, repeated, tag = "5")]
    pub users: Vec<User>,
    #[prost(uint32, tag = "6")]
    pub next_category_id: u32,
    #[prost(uint32, tag = "7")]
    pub next_product_id: u32,
    #[prost(uint32, tag = "8")]
    pub next_company_id: u32,
    #[prost(uint32, tag = "9")]
    pub next_store_id: u32,
    #[prost(uint32, tag = "10")]
    pub next_user_id: u32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub slug: String,
}

#[derive(Clone, PartialEq, Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub slug: String,
    #[prost(string, tag = "4")]
    pub description: String,
    /// Price in euro cents.
    #[prost(uint32, tag = "5")]
    pub price_cents: u32,
    #[prost(uint32, tag = "6")]
    pub category_id: u32,
    /// Stores offering the product for pickup.
    #[prost(uint32, repeated, tag = "7")]
    pub store_ids: Vec<u32>,
    #[prost(bool, tag = "8")]
    pub is_active: bool,
    /// Unix seconds.
    #[prost(int64, tag = "9")]
    pub created_at: i64,
}

/// B2B customer.
#[derive(Clone, PartialEq, Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: String,
    /// Company registration number.
    #[prost(string, tag = "3")]
    pub ico: String,
    #[prost(string, tag = "4")]
    pub email: String,
    #[prost(bool, tag = "5")]
    pub is_active: bool,
}

#[derive(Clone, PartialEq, Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub address: String,
    #[prost(bool, tag = "4")]
    pub is_active: bool,
}

#[derive(Clone, PartialEq, Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub email: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(enumeration = "Role", tag = "4")]
    #[serde(serialize_with = "serialize_role")]
    pub role: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum Role {
    User = 0,
    Admin = 1,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

fn serialize_role<S: Serializer>(role: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    let role = Role::try_from(*role).unwrap_or(Role::User);

    serializer.serialize_str(role.as_str())
}
