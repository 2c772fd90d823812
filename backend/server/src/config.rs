use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Context, Error};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub meili_url: Option<String>,
    pub meili_key: Option<String>,
    /// Snapshot writes are skipped when unset.
    pub catalog_path: Option<String>,
    pub catalog_url: Option<String>,
    pub session_ttl_secs: u64,
    /// Carts untouched this long are dropped.
    pub cart_idle_secs: u64,
    pub cart_capacity: usize,
    pub login_path: String,
    pub admin_prefix: String,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        let meili_url = optional("MEILI_URL");
        let meili_key = match meili_url {
            Some(_) => Some(read_secret("MEILI_ADMIN_KEY")?),
            None => None,
        };

        Ok(Self {
            port: try_load("RUST_PORT", "8080")?,
            redis_url: try_load("REDIS_URL", "redis://redis:6379")?,
            meili_url,
            meili_key,
            catalog_path: snapshot_path(env::var("CATALOG_PATH").ok()),
            catalog_url: optional("CATALOG_URL"),
            session_ttl_secs: try_load("SESSION_TTL_SECS", "604800")?,
            cart_idle_secs: try_load("CART_IDLE_SECS", "604800")?,
            cart_capacity: try_load("CART_CAPACITY", "10000")?,
            login_path: try_load("LOGIN_PATH", "/prihlasenie")?,
            admin_prefix: try_load("ADMIN_PREFIX", "/admin")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            meili_url: None,
            meili_key: None,
            catalog_path: None,
            catalog_url: None,
            session_ttl_secs: 604800,
            cart_idle_secs: 604800,
            cart_capacity: 10_000,
            login_path: "/prihlasenie".to_string(),
            admin_prefix: "/admin".to_string(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

/// Unset falls back to the default snapshot, set but empty runs without one.
fn snapshot_path(value: Option<String>) -> Option<String> {
    match value {
        Some(path) if path.is_empty() => None,
        Some(path) => Some(path),
        None => Some(catalog::CATALOG_PATH.to_string()),
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value: {e}"))
}

fn read_secret(secret_name: &str) -> Result<String, Error> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .with_context(|| format!("Failed to read {secret_name} from file"))
}
