//! Frontend Gateway
//!
//! Hosted store when one is configured at build time, otherwise an
//! in-memory store so the dashboard still runs (nothing is persisted).

use async_trait::async_trait;
use roadmap_core::config::{
    ConfigError, StoreConfig, ENV_ROADMAP_TABLE, ENV_STORE_KEY, ENV_STORE_URL, ENV_TIMEOUT_SECS,
};
use roadmap_core::gateway::{GatewayResult, PersistenceGateway, ReadQuery, RecordKey};
use roadmap_core::{MemoryGateway, RestGateway};
use serde_json::Value;

const DEFAULT_TABLE: &str = "roadmap";

pub enum DashboardGateway {
    Remote(RestGateway),
    Local(MemoryGateway),
}

/// Settings baked in by the build (`DASHBOARD_STORE_URL`, ...)
pub fn build_config() -> Result<StoreConfig, ConfigError> {
    StoreConfig::from_lookup(|key| {
        let value = match key {
            ENV_STORE_URL => option_env!("DASHBOARD_STORE_URL"),
            ENV_STORE_KEY => option_env!("DASHBOARD_STORE_KEY"),
            ENV_ROADMAP_TABLE => option_env!("DASHBOARD_ROADMAP_TABLE"),
            ENV_TIMEOUT_SECS => option_env!("DASHBOARD_TIMEOUT_SECS"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

/// Gateway plus the table roadmaps live in
pub fn connect() -> (DashboardGateway, String) {
    let config = match build_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("No hosted store configured ({}); roadmaps will not be saved", e);
            return (
                DashboardGateway::Local(MemoryGateway::default()),
                DEFAULT_TABLE.to_string(),
            );
        }
    };

    match RestGateway::new(&config) {
        Ok(gateway) => {
            log::info!("Using hosted store at {}", config.url);
            (DashboardGateway::Remote(gateway), config.roadmap_table)
        }
        Err(e) => {
            log::error!("Failed to set up hosted store: {}", e);
            (
                DashboardGateway::Local(MemoryGateway::default()),
                config.roadmap_table,
            )
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PersistenceGateway for DashboardGateway {
    async fn create(&self, collection: &str, record: Value) -> GatewayResult<Value> {
        match self {
            DashboardGateway::Remote(gw) => gw.create(collection, record).await,
            DashboardGateway::Local(gw) => gw.create(collection, record).await,
        }
    }

    async fn read(&self, collection: &str, query: &ReadQuery) -> GatewayResult<Vec<Value>> {
        match self {
            DashboardGateway::Remote(gw) => gw.read(collection, query).await,
            DashboardGateway::Local(gw) => gw.read(collection, query).await,
        }
    }

    async fn update(&self, collection: &str, key: &RecordKey, patch: Value) -> GatewayResult<()> {
        match self {
            DashboardGateway::Remote(gw) => gw.update(collection, key, patch).await,
            DashboardGateway::Local(gw) => gw.update(collection, key, patch).await,
        }
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> GatewayResult<()> {
        match self {
            DashboardGateway::Remote(gw) => gw.delete(collection, key).await,
            DashboardGateway::Local(gw) => gw.delete(collection, key).await,
        }
    }
}
