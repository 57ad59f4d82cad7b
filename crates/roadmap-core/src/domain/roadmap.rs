//! Roadmap Entity
//!
//! A roadmap is a titled, ordered list of topics; each topic groups subtopics
//! that can be individually marked completed.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

const TEMPORARY_PREFIX: &str = "local-";

/// Identifier of a roadmap, either server-assigned or a local placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadmapId(String);

impl RoadmapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh client-side id used until the create request is confirmed
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMPORARY_PREFIX, Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoadmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoadmapId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RoadmapId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single learning item.
///
/// Decoding is lenient: stored rows with a missing or `null` field still
/// load (empty name or link, not completed). Edits are held to the strict
/// shape by `validation::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTopic {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtopic_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Fields this model does not know about, kept so documents round-trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SubTopic {
    pub fn new(name: impl Into<String>, resource_url: impl Into<String>) -> Self {
        Self {
            subtopic_name: name.into(),
            resource_url: resource_url.into(),
            completed: false,
            extra: Map::new(),
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A named group of subtopics.
///
/// On the wire a topic is an object with exactly one key, the topic name,
/// mapping to its subtopic list: `{"Basics": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub name: String,
    pub subtopics: Vec<SubTopic>,
}

impl Topic {
    pub fn new(name: impl Into<String>, subtopics: Vec<SubTopic>) -> Self {
        Self {
            name: name.into(),
            subtopics,
        }
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.subtopics)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TopicVisitor;

        impl<'de> Visitor<'de> for TopicVisitor {
            type Value = Topic;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object with exactly one key mapping a topic name to its subtopics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Topic, A::Error> {
                let (name, subtopics) = map
                    .next_entry::<String, Vec<SubTopic>>()?
                    .ok_or_else(|| de::Error::custom("topic object has no name"))?;
                if name.is_empty() {
                    return Err(de::Error::custom("topic name must not be empty"));
                }
                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(format!(
                        "topic \"{}\" must be the only key of its object",
                        name
                    )));
                }
                Ok(Topic { name, subtopics })
            }
        }

        deserializer.deserialize_map(TopicVisitor)
    }
}

/// Ordered topics of one roadmap; order is display order
pub type RoadmapData = Vec<Topic>;

/// A roadmap as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub id: RoadmapId,
    pub title: String,
    pub data: RoadmapData,
}

impl RoadmapItem {
    pub fn new(id: RoadmapId, title: impl Into<String>, data: RoadmapData) -> Self {
        Self {
            id,
            title: title.into(),
            data,
        }
    }
}
