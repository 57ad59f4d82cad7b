//! JSON Edit Validation
//!
//! Gatekeeper between free-text roadmap editing and the store. Nothing is
//! mutated and no request is issued unless validation succeeds.

use serde_json::Value;

use crate::domain::{RoadmapData, SubTopic, Topic};

/// Why raw roadmap JSON was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Parser message, passed through unchanged
    #[error("{0}")]
    Syntax(String),

    #[error("Root must be an array")]
    Shape,

    /// Element of the root array is not a well-formed topic
    #[error("Topic {index}: {message}")]
    Topic { index: usize, message: String },
}

/// Parse and check `raw` as a replacement roadmap body
pub fn validate(raw: &str) -> Result<RoadmapData, ValidationError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::Syntax(e.to_string()))?;

    let Value::Array(elements) = parsed else {
        return Err(ValidationError::Shape);
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            check_subtopic_fields(&element)
                .and_then(|()| serde_json::from_value::<Topic>(element).map_err(|e| e.to_string()))
                .map_err(|message| ValidationError::Topic { index, message })
        })
        .collect()
}

/// Field types stored decoding would let through: `subtopic_name` must be
/// a string, `resource_url` and `completed` may be absent but never `null`.
/// Structural problems are left to the topic decoder.
fn check_subtopic_fields(element: &Value) -> Result<(), String> {
    let Some(topic) = element.as_object() else {
        return Ok(());
    };
    for (name, subtopics) in topic {
        let Some(subtopics) = subtopics.as_array() else {
            continue;
        };
        for (position, subtopic) in subtopics.iter().enumerate() {
            let Some(fields) = subtopic.as_object() else {
                continue;
            };
            let problem = match (
                fields.get("subtopic_name"),
                fields.get("resource_url"),
                fields.get("completed"),
            ) {
                (None, _, _) => Some("missing field `subtopic_name`"),
                (Some(n), _, _) if !n.is_string() => Some("`subtopic_name` must be a string"),
                (_, Some(u), _) if !u.is_string() => Some("`resource_url` must be a string"),
                (_, _, Some(c)) if !c.is_boolean() => Some("`completed` must be true or false"),
                _ => None,
            };
            if let Some(problem) = problem {
                return Err(format!("\"{}\" subtopic {}: {}", name, position, problem));
            }
        }
    }
    Ok(())
}

/// Pretty JSON shown in the edit dialog
pub fn to_editor_json(data: &RoadmapData) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
}

/// Starter document offered by the add dialog
pub fn example_template() -> String {
    let example = vec![Topic::new(
        "Example Topic",
        vec![SubTopic::new("Example Subtopic", "https://example.com")],
    )];
    to_editor_json(&example)
}
