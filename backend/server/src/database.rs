//! # Redis
//!
//! RAM database holding sessions.
//!
//! ## Requirements
//!
//! - O(1) lookup on every request, the admin gate hits it before any handler
//! - Expiry without a sweeper
//!
//! ## Implementation
//!
//! - One string key per session: `session:{token}` -> `{"userId":..,"role":..}`
//! - `SET EX` on create, TTL is the session lifetime
//! - Estimated memory usage:
//! (40 bytes (key) + 32 bytes (value) + 50 bytes (overhead)) × 10,000 = roughly 1.2 MB
use std::time::Duration;

use anyhow::Error;
use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::session::{Session, SessionError, SessionStore, new_token};

pub const SESSION_PREFIX: &str = "session:";

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, Error> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

pub struct RedisSessionStore {
    connection: ConnectionManager,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(connection: ConnectionManager, ttl_secs: u64) -> Self {
        Self {
            connection,
            ttl_secs,
        }
    }
}

fn key(token: &str) -> String {
    format!("{SESSION_PREFIX}{token}")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(key(token)).await?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, session: Session) -> Result<String, SessionError> {
        let mut connection = self.connection.clone();
        let token = new_token();

        let _: () = connection
            .set_ex(key(&token), serde_json::to_string(&session)?, self.ttl_secs)
            .await?;

        Ok(token)
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(key(token)).await?;

        Ok(())
    }
}
