//! Roadmap Records
//!
//! Mapping between `RoadmapItem` and rows of the `roadmap` collection.

use serde_json::{json, Value};

use super::key_to_string;
use crate::domain::{RoadmapData, RoadmapId, RoadmapItem};
use crate::error::GatewayError;

pub const ROADMAP_KEY_FIELD: &str = "uid";
pub const ROADMAP_TITLE_FIELD: &str = "subject_name";
pub const ROADMAP_DATA_FIELD: &str = "roadmap_data";

/// Row shape of the `roadmap` collection
pub struct RoadmapRecord;

impl RoadmapRecord {
    /// Body of a create request; the store assigns the key
    pub fn insert(title: &str, data: &RoadmapData) -> Value {
        json!({
            ROADMAP_TITLE_FIELD: title,
            ROADMAP_DATA_FIELD: data,
        })
    }

    /// Body of an update request; full overwrite of the roadmap body
    pub fn data_patch(data: &RoadmapData) -> Value {
        json!({ ROADMAP_DATA_FIELD: data })
    }

    /// Key assigned by the store in a created row
    pub fn key_of(row: &Value) -> Result<RoadmapId, GatewayError> {
        row.get(ROADMAP_KEY_FIELD)
            .and_then(key_to_string)
            .map(RoadmapId::from)
            .ok_or_else(|| {
                GatewayError::MalformedResponse(format!(
                    "created row has no `{}` field",
                    ROADMAP_KEY_FIELD
                ))
            })
    }

    /// Decode a stored row into an item
    pub fn decode(row: &Value) -> Result<RoadmapItem, String> {
        let id = Self::key_of(row).map_err(|e| e.to_string())?;
        let title = row
            .get(ROADMAP_TITLE_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let data = match row.get(ROADMAP_DATA_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value::<RoadmapData>(raw.clone())
                .map_err(|e| format!("roadmap {}: {}", id, e))?,
        };
        Ok(RoadmapItem::new(id, title, data))
    }
}
