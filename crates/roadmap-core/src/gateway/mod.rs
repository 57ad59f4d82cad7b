//! Gateway Layer - Core Traits
//!
//! Defines the abstract CRUD interface to the hosted table store.
//! Implementations can talk HTTP, hold records in memory, etc.

mod memory;
mod record;
mod rest;

use async_trait::async_trait;
use serde_json::Value;

pub use crate::error::{GatewayError, GatewayResult};
pub use memory::{GatewayCall, GatewayOp, MemoryGateway};
pub use record::{RoadmapRecord, ROADMAP_DATA_FIELD, ROADMAP_KEY_FIELD, ROADMAP_TITLE_FIELD};
pub use rest::RestGateway;

/// Addresses one record by its stable identifier field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub field: String,
    pub value: String,
}

impl RecordKey {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Sort direction for reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Optional equality filters and ordering for `read`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadQuery {
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, Direction)>,
}

impl ReadQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((field.into(), direction));
        self
    }
}

/// CRUD over named collections of JSON records.
///
/// Every call either succeeds or returns a `GatewayError`; nothing retries
/// and nothing times out at this level unless the implementation's transport
/// does so.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PersistenceGateway {
    /// Insert `record`, returning the record as stored (with its key)
    async fn create(&self, collection: &str, record: Value) -> GatewayResult<Value>;

    /// Records matching `query`
    async fn read(&self, collection: &str, query: &ReadQuery) -> GatewayResult<Vec<Value>>;

    /// Merge `patch` into the record addressed by `key`
    async fn update(&self, collection: &str, key: &RecordKey, patch: Value) -> GatewayResult<()>;

    /// Remove the record addressed by `key`
    async fn delete(&self, collection: &str, key: &RecordKey) -> GatewayResult<()>;
}

/// Render a key field value as the string used for addressing.
///
/// Hosted stores hand back uuids as strings but serial keys as numbers.
pub fn key_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
