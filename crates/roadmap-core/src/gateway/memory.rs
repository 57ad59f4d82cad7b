//! In-memory Gateway
//!
//! Holds collections in process. Records every call and can be told to fail
//! the next call of a given kind, which is how the optimistic paths of the
//! store get exercised without a network.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{key_to_string, Direction, GatewayError, GatewayResult, PersistenceGateway, ReadQuery, RecordKey};

/// Kind of gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    Create,
    Read,
    Update,
    Delete,
}

/// One observed call
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCall {
    pub op: GatewayOp,
    pub collection: String,
    pub key: Option<String>,
    pub payload: Option<Value>,
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, Vec<Value>>,
    calls: Vec<GatewayCall>,
    failures: VecDeque<(GatewayOp, GatewayError)>,
}

/// Gateway backed by plain vectors of JSON objects
pub struct MemoryGateway {
    key_field: String,
    state: Mutex<MemoryState>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new(super::ROADMAP_KEY_FIELD)
    }
}

impl MemoryGateway {
    /// Gateway assigning keys into `key_field` on create
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Replace a collection's contents (not recorded as a call)
    pub fn seed(&self, collection: &str, records: Vec<Value>) {
        self.state
            .lock()
            .collections
            .insert(collection.to_string(), records);
    }

    /// Current contents of a collection
    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.state
            .lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next call of kind `op` fail with `error`
    pub fn fail_next(&self, op: GatewayOp, error: GatewayError) {
        self.state.lock().failures.push_back((op, error));
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }

    pub fn calls_of(&self, op: GatewayOp) -> Vec<GatewayCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    /// Record the call, then hand back an injected failure if one is queued
    fn enter(
        &self,
        state: &mut MemoryState,
        op: GatewayOp,
        collection: &str,
        key: Option<&RecordKey>,
        payload: Option<&Value>,
    ) -> GatewayResult<()> {
        state.calls.push(GatewayCall {
            op,
            collection: collection.to_string(),
            key: key.map(|k| k.value.clone()),
            payload: payload.cloned(),
        });
        match state.failures.iter().position(|(queued, _)| *queued == op) {
            Some(index) => match state.failures.remove(index) {
                Some((_, error)) => Err(error),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }
}

fn matches_key(record: &Value, key: &RecordKey) -> bool {
    record.get(&key.field).and_then(key_to_string).as_deref() == Some(key.value.as_str())
}

fn compare_field(a: &Value, b: &Value, field: &str) -> std::cmp::Ordering {
    let a = a.get(field).map(Value::to_string).unwrap_or_default();
    let b = b.get(field).map(Value::to_string).unwrap_or_default();
    a.cmp(&b)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PersistenceGateway for MemoryGateway {
    async fn create(&self, collection: &str, record: Value) -> GatewayResult<Value> {
        let mut state = self.state.lock();
        self.enter(&mut state, GatewayOp::Create, collection, None, Some(&record))?;

        let Value::Object(mut fields) = record else {
            return Err(GatewayError::Http {
                status: 400,
                message: "record must be an object".to_string(),
            });
        };
        if !fields.contains_key(&self.key_field) {
            fields.insert(self.key_field.clone(), Value::String(Uuid::new_v4().to_string()));
        }
        let stored = Value::Object(fields);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn read(&self, collection: &str, query: &ReadQuery) -> GatewayResult<Vec<Value>> {
        let mut state = self.state.lock();
        self.enter(&mut state, GatewayOp::Read, collection, None, None)?;

        let mut rows: Vec<Value> = state
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        query.filters.iter().all(|(field, value)| {
                            r.get(field).and_then(key_to_string).as_deref() == Some(value.as_str())
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, direction)) = &query.order {
            rows.sort_by(|a, b| compare_field(a, b, field));
            if *direction == Direction::Descending {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn update(&self, collection: &str, key: &RecordKey, patch: Value) -> GatewayResult<()> {
        let mut state = self.state.lock();
        self.enter(&mut state, GatewayOp::Update, collection, Some(key), Some(&patch))?;

        let Value::Object(patch) = patch else {
            return Err(GatewayError::Http {
                status: 400,
                message: "patch must be an object".to_string(),
            });
        };
        // A filter matching no rows is not an error for a table API
        if let Some(records) = state.collections.get_mut(collection) {
            for record in records.iter_mut().filter(|r| matches_key(r, key)) {
                if let Value::Object(fields) = record {
                    merge(fields, &patch);
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> GatewayResult<()> {
        let mut state = self.state.lock();
        self.enter(&mut state, GatewayOp::Delete, collection, Some(key), None)?;

        if let Some(records) = state.collections.get_mut(collection) {
            records.retain(|r| !matches_key(r, key));
        }
        Ok(())
    }
}

fn merge(fields: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (k, v) in patch {
        fields.insert(k.clone(), v.clone());
    }
}
