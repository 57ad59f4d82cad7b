//! Store State and Snapshots

use serde::{Deserialize, Serialize};

use crate::domain::{compute_progress, ProgressStats, RoadmapId, RoadmapItem};

/// Mutable state behind the store lock
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StoreState {
    pub(crate) items: Vec<RoadmapItem>,
    pub(crate) active: Option<RoadmapId>,
    pub(crate) in_flight_edits: usize,
}

impl StoreState {
    /// Keep the active id pointing at an existing item whenever there is one
    pub(crate) fn repair_selection(&mut self) {
        let valid = self
            .active
            .as_ref()
            .is_some_and(|id| self.items.iter().any(|item| &item.id == id));
        if !valid {
            self.active = self.items.first().map(|item| item.id.clone());
        }
    }

    pub(crate) fn snapshot(&self) -> RoadmapSnapshot {
        RoadmapSnapshot {
            items: self.items.clone(),
            active: self.active.clone(),
            updating: self.in_flight_edits > 0,
        }
    }
}

/// Read-only copy of the store, handed to observers and the view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapSnapshot {
    pub items: Vec<RoadmapItem>,
    pub active: Option<RoadmapId>,
    /// An edit is in flight
    pub updating: bool,
}

impl RoadmapSnapshot {
    pub fn item(&self, id: &RoadmapId) -> Option<&RoadmapItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Roadmap on display. A dangling selection (set directly, not yet
    /// repaired by a mutation) shows the first roadmap instead.
    pub fn active_item(&self) -> Option<&RoadmapItem> {
        self.active
            .as_ref()
            .and_then(|id| self.item(id))
            .or_else(|| self.items.first())
    }

    pub fn active_progress(&self) -> ProgressStats {
        self.active_item()
            .map(|item| compute_progress(&item.data))
            .unwrap_or_default()
    }
}
