use std::{sync::Arc, time::Duration};

use anyhow::Error;
use catalog::{Catalog, get_catalog_or_default, get_catalog_remote, write_catalog};
use meilisearch_sdk::client::Client;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{
    cart::Carts,
    config::Config,
    database::{RedisSessionStore, init_redis},
    search::{init_meilisearch, upsert_products},
    session::SessionStore,
};

fn carts(config: &Config) -> Carts {
    Carts::new(
        Duration::from_secs(config.cart_idle_secs),
        config.cart_capacity,
    )
}

pub struct AppState {
    pub config: Config,
    pub catalog: RwLock<Catalog>,
    pub carts: RwLock<Carts>,
    pub sessions: Arc<dyn SessionStore>,
    pub meili_client: Option<Arc<Client>>,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, Error> {
        let config = Config::load()?;

        let catalog = match (&config.catalog_url, &config.catalog_path) {
            (Some(url), _) => get_catalog_remote(url).await?,
            (None, Some(path)) => get_catalog_or_default(path)?,
            (None, None) => {
                info!("CATALOG_PATH empty, running without a snapshot");
                Catalog::default()
            }
        };
        info!("Loaded {} products", catalog.products.len());

        let redis_connection = init_redis(&config.redis_url).await?;
        let sessions = Arc::new(RedisSessionStore::new(
            redis_connection,
            config.session_ttl_secs,
        ));

        let meili_client = match (&config.meili_url, &config.meili_key) {
            (Some(url), Some(key)) => Some(init_meilisearch(url, key, &catalog.products).await?),
            _ => {
                info!("MEILI_URL not set, search falls back to in-memory matching");
                None
            }
        };

        Ok(Arc::new(Self {
            carts: RwLock::new(carts(&config)),
            config,
            catalog: RwLock::new(catalog),
            sessions,
            meili_client,
        }))
    }

    /// State without external services, used by tests and local runs.
    pub fn with_parts(config: Config, catalog: Catalog, sessions: Arc<dyn SessionStore>) -> Arc<Self> {
        Arc::new(Self {
            carts: RwLock::new(carts(&config)),
            config,
            catalog: RwLock::new(catalog),
            sessions,
            meili_client: None,
        })
    }

    /// Persists the snapshot and re-syncs the search index after an admin write.
    /// Failures are logged, the in-memory catalog stays authoritative.
    pub async fn catalog_changed(&self) {
        let products = {
            let catalog = self.catalog.read().await;

            if let Some(path) = &self.config.catalog_path {
                if let Err(e) = write_catalog(path, &catalog) {
                    warn!("Failed to write catalog snapshot: {e:#}");
                }
            }

            catalog.products.clone()
        };

        if let Some(meili_client) = &self.meili_client {
            if let Err(e) = upsert_products(meili_client, &products).await {
                warn!("Failed to sync search index: {e}");
            }
        }
    }
}
