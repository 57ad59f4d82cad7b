//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The roadmap
//! store pushes every snapshot in here; components only read.

use leptos::prelude::*;
use reactive_stores::Store;
use roadmap_core::{RoadmapId, RoadmapItem, RoadmapSnapshot};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// All roadmaps, in display order
    pub roadmaps: Vec<RoadmapItem>,
    /// Roadmap shown in the panel
    pub active_id: Option<RoadmapId>,
    /// An edit is being saved
    pub is_updating: bool,
    /// Initial fetch still running
    pub loading: bool,
    /// Why the initial fetch failed
    pub load_error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Mirror a roadmap store snapshot into the reactive store
pub fn store_apply_snapshot(store: &DashboardStore, snapshot: &RoadmapSnapshot) {
    store.roadmaps().set(snapshot.items.clone());
    store.active_id().set(snapshot.active.clone());
    store.is_updating().set(snapshot.updating);
}

/// Roadmap on display; a dangling selection falls back to the first roadmap
pub fn store_active_roadmap(store: &DashboardStore) -> Option<RoadmapItem> {
    let active_id = store.active_id().get();
    store.roadmaps().with(|roadmaps| {
        active_id
            .as_ref()
            .and_then(|id| roadmaps.iter().find(|r| &r.id == id))
            .or_else(|| roadmaps.first())
            .cloned()
    })
}
