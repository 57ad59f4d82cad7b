//! Dashboard Configuration
//!
//! Where the hosted table store lives and how to reach it. Loaded from a JSON
//! document or from `DASHBOARD_*` environment variables.

use serde::{Deserialize, Serialize};

pub const ENV_STORE_URL: &str = "DASHBOARD_STORE_URL";
pub const ENV_STORE_KEY: &str = "DASHBOARD_STORE_KEY";
pub const ENV_ROADMAP_TABLE: &str = "DASHBOARD_ROADMAP_TABLE";
pub const ENV_TIMEOUT_SECS: &str = "DASHBOARD_TIMEOUT_SECS";

const DEFAULT_ROADMAP_TABLE: &str = "roadmap";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("config parse error: {0}")]
    Parse(String),
}

/// Connection settings for the hosted store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Public API key sent as `apikey` and bearer token
    pub api_key: String,
    #[serde(default = "default_roadmap_table")]
    pub roadmap_table: String,
    /// Client-side request timeout; ignored in the browser
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_roadmap_table() -> String {
    DEFAULT_ROADMAP_TABLE.to_string()
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            roadmap_table: default_roadmap_table(),
            request_timeout_secs: None,
        }
    }

    /// Build from any key lookup (process env, build-time env, tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_STORE_URL).ok_or(ConfigError::Missing(ENV_STORE_URL))?;
        let api_key = lookup(ENV_STORE_KEY).ok_or(ConfigError::Missing(ENV_STORE_KEY))?;

        let mut config = Self::new(url, api_key);
        if let Some(table) = lookup(ENV_ROADMAP_TABLE).filter(|t| !t.is_empty()) {
            config.roadmap_table = table;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                message: e.to_string(),
            })?;
            config.request_timeout_secs = Some(secs);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing(ENV_STORE_URL));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: ENV_STORE_URL,
                message: format!("expected an http(s) URL, got {}", url),
            });
        }
        if self.roadmap_table.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: ENV_ROADMAP_TABLE,
                message: "table name is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub store: StoreConfig,
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.store.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: StoreConfig::from_env()?,
        })
    }
}
