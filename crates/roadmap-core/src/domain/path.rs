//! Path-addressed Updates
//!
//! Nested edits always go through a full copy of the roadmap data; the
//! previous value is never mutated in place.

use serde::{Deserialize, Serialize};

use super::roadmap::{RoadmapData, SubTopic};

/// Position of a subtopic: topic index, then index within that topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubtopicPath {
    pub topic: usize,
    pub sub: usize,
}

impl SubtopicPath {
    pub fn new(topic: usize, sub: usize) -> Self {
        Self { topic, sub }
    }

    pub fn resolve<'a>(&self, data: &'a RoadmapData) -> Option<&'a SubTopic> {
        data.get(self.topic)?.subtopics.get(self.sub)
    }
}

/// Copy `data` and apply `f` to the subtopic at `path` in the copy.
///
/// Returns `None` when the path does not address a subtopic.
pub fn updated_at<F>(data: &RoadmapData, path: SubtopicPath, f: F) -> Option<RoadmapData>
where
    F: FnOnce(&mut SubTopic),
{
    path.resolve(data)?;
    let mut next = data.clone();
    let sub = next
        .get_mut(path.topic)
        .and_then(|topic| topic.subtopics.get_mut(path.sub))?;
    f(sub);
    Some(next)
}

/// Copy of `data` with the completion flag at `path` flipped
pub fn toggled(data: &RoadmapData, path: SubtopicPath) -> Option<RoadmapData> {
    updated_at(data, path, |sub| sub.completed = !sub.completed)
}
