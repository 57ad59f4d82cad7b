//! Roadmap View Model
//!
//! The view-facing side of the store: user intents, how they route through
//! validation into store operations, and view-local expand/collapse state.

use std::collections::BTreeSet;

use crate::domain::{RoadmapId, SubtopicPath};
use crate::error::{StoreError, StoreResult};
use crate::gateway::PersistenceGateway;
use crate::store::RoadmapStore;
use crate::validation::validate;

/// Expanded topic indices; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicExpansion {
    expanded: BTreeSet<usize>,
}

impl Default for TopicExpansion {
    /// First topic open
    fn default() -> Self {
        Self {
            expanded: BTreeSet::from([0]),
        }
    }
}

impl TopicExpansion {
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    /// Whether moving the display from `previous` to `next` starts a fresh
    /// expansion. A confirmed create swaps the placeholder id for the
    /// server id in the same slot; that is still the same roadmap.
    pub fn resets_between(
        previous: Option<&DisplayedRoadmap>,
        next: Option<&DisplayedRoadmap>,
    ) -> bool {
        match (previous, next) {
            (None, None) => false,
            (Some(p), Some(n)) if p.id == n.id => false,
            (Some(p), Some(n)) => {
                !(p.id.is_temporary() && !n.id.is_temporary() && p.index == n.index)
            }
            _ => true,
        }
    }
}

/// The roadmap on display and its position in the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedRoadmap {
    pub id: RoadmapId,
    pub index: usize,
}

impl DisplayedRoadmap {
    pub fn new(id: RoadmapId, index: usize) -> Self {
        Self { id, index }
    }
}

/// Something the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum RoadmapIntent {
    Select(RoadmapId),
    Add { title: String, raw_json: String },
    Edit { id: RoadmapId, raw_json: String },
    Delete(RoadmapId),
    ToggleSubtopic { id: RoadmapId, path: SubtopicPath },
    ToggleTopicExpand(usize),
}

/// What the view should do once an intent has been handled
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Done,
    Created(RoadmapId),
    /// View-local; apply to `TopicExpansion`
    ToggleExpand(usize),
}

/// Route `intent` to the store. Raw JSON is validated first; a rejected
/// document never reaches the store or the network.
pub async fn dispatch<G: PersistenceGateway>(
    store: &RoadmapStore<G>,
    intent: RoadmapIntent,
) -> StoreResult<DispatchOutcome> {
    match intent {
        RoadmapIntent::Select(id) => {
            store.select_active(id);
            Ok(DispatchOutcome::Done)
        }
        RoadmapIntent::Add { title, raw_json } => {
            if title.trim().is_empty() {
                return Err(StoreError::EmptyTitle);
            }
            let data = validate(&raw_json)?;
            store.add(&title, data).await.map(DispatchOutcome::Created)
        }
        RoadmapIntent::Edit { id, raw_json } => {
            let data = validate(&raw_json)?;
            store.edit(&id, data).await?;
            Ok(DispatchOutcome::Done)
        }
        RoadmapIntent::Delete(id) => {
            store.delete(&id).await?;
            Ok(DispatchOutcome::Done)
        }
        RoadmapIntent::ToggleSubtopic { id, path } => {
            store
                .toggle_subtopic_completion(&id, path.topic, path.sub)
                .await?;
            Ok(DispatchOutcome::Done)
        }
        RoadmapIntent::ToggleTopicExpand(index) => Ok(DispatchOutcome::ToggleExpand(index)),
    }
}
