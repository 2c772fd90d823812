//! # Cart
//!
//! Carts are keyed by the `cart_id` cookie (UUID v4) and live in memory only, a
//! restart empties them. A cart also carries the open/closed state of the cart
//! panel and of the order confirmation modal.
//!
//! ## Checkout
//! 1. Cart must not be empty
//! 2. Pickup store must exist and be active
//! 3. Every line's product must still exist and be active
//! 4. Prices are taken from the catalog at checkout time, never from the client
//! 5. On success the cart is emptied, the panel closes and the confirmation opens
//!
//! ## Bounds
//! Reading never creates a cart, the first write does. Carts idle longer than the
//! configured TTL are dropped, and a full store evicts the least recently used one.
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use catalog::Catalog;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    ui::{CartPanel, Modal},
};

pub const CART_COOKIE: &str = "cart_id";
pub const CART_MAX_AGE: time::Duration = time::Duration::days(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: u32,
    pub quantity: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub panel: CartPanel,
    pub confirmation: Modal,
}

impl Cart {
    pub fn add(&mut self, product_id: u32, quantity: u32) -> Result<CartLine, AppError> {
        if quantity == 0 {
            return Err(AppError::MalformedPayload);
        }

        match self.lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                Ok(*line)
            }
            None => {
                let line = CartLine {
                    product_id,
                    quantity,
                };
                self.lines.push(line);
                Ok(line)
            }
        }
    }

    pub fn remove(&mut self, product_id: u32) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);

        self.lines.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

pub fn cart_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(CART_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn cart_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((CART_COOKIE, id.to_string()))
        .path("/")
        .max_age(CART_MAX_AGE)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

struct CartEntry {
    cart: Cart,
    touched: Instant,
    /// Recency for eviction, `Instant`s can tie.
    seq: u64,
}

fn is_live(entry: &CartEntry, idle_ttl: Duration) -> bool {
    entry.touched.elapsed() < idle_ttl
}

/// In-memory carts by id.
pub struct Carts {
    entries: HashMap<Uuid, CartEntry>,
    idle_ttl: Duration,
    capacity: usize,
    seq: u64,
}

impl Carts {
    pub fn new(idle_ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            idle_ttl,
            capacity: capacity.max(1),
            seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live cart, without refreshing it.
    pub fn get(&self, id: &Uuid) -> Option<&Cart> {
        self.entries
            .get(id)
            .filter(|entry| is_live(entry, self.idle_ttl))
            .map(|entry| &entry.cart)
    }

    /// Live cart for a write. An idle one is dropped instead.
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Cart> {
        let seq = self.next_seq();
        let idle_ttl = self.idle_ttl;

        if self
            .entries
            .get(id)
            .is_some_and(|entry| !is_live(entry, idle_ttl))
        {
            self.entries.remove(id);
        }

        self.entries.get_mut(id).map(|entry| {
            entry.touched = Instant::now();
            entry.seq = seq;
            &mut entry.cart
        })
    }

    /// Cart for a write, created when missing or idle.
    pub fn entry(&mut self, id: Uuid) -> &mut Cart {
        let seq = self.next_seq();
        let idle_ttl = self.idle_ttl;

        if !self
            .entries
            .get(&id)
            .is_some_and(|entry| is_live(entry, idle_ttl))
        {
            self.entries.remove(&id);
            self.make_room();
        }

        let entry = self.entries.entry(id).or_insert_with(|| CartEntry {
            cart: Cart::default(),
            touched: Instant::now(),
            seq,
        });
        entry.touched = Instant::now();
        entry.seq = seq;

        &mut entry.cart
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn make_room(&mut self) {
        let idle_ttl = self.idle_ttl;
        self.entries.retain(|_, entry| is_live(entry, idle_ttl));

        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(id, _)| *id);

            match oldest {
                Some(id) => {
                    self.entries.remove(&id);
                }
                None => break,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: u32,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u32,
    pub line_total_cents: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: u32,
    pub store_id: u32,
    pub lines: Vec<OrderLine>,
    pub total_cents: u64,
}

/// Prices the cart against the catalog. The cart itself is left untouched.
pub fn checkout(
    catalog: &Catalog,
    cart: &Cart,
    user_id: u32,
    store_id: u32,
) -> Result<Order, AppError> {
    if cart.is_empty() {
        return Err(AppError::MalformedPayload);
    }

    match catalog.store(store_id) {
        Some(store) if store.is_active => {}
        _ => return Err(AppError::NotFound),
    }

    let lines = cart
        .lines
        .iter()
        .map(|line| match catalog.product(line.product_id) {
            Some(product) if product.is_active => Ok(OrderLine {
                product_id: product.id,
                name: product.name.clone(),
                quantity: line.quantity,
                unit_price_cents: product.price_cents,
                line_total_cents: u64::from(product.price_cents) * u64::from(line.quantity),
            }),
            _ => Err(AppError::NotFound),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_cents = lines.iter().map(|line| line.line_total_cents).sum();

    Ok(Order {
        id: Uuid::new_v4(),
        user_id,
        store_id,
        lines,
        total_cents,
    })
}

/// Successful checkout: empty the cart, swap the panel for the confirmation.
pub fn complete(cart: &mut Cart) {
    cart.lines.clear();
    cart.panel.close();
    cart.confirmation.open();
}
