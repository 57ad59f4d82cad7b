//! Application Context
//!
//! Shared state provided via Leptos Context API. Every user action goes
//! through [`AppContext::send`] so the optimistic store sees it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use roadmap_core::error::{StoreError, StoreResult};
use roadmap_core::{dispatch, DispatchOutcome, RoadmapIntent, RoadmapStore, TopicExpansion};

use crate::gateway::DashboardGateway;

const SAVE_FAILED_ALERT: &str = "Failed to save progress. Please check your connection.";

pub type DashboardRoadmaps = RoadmapStore<DashboardGateway>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    roadmaps: StoredValue<DashboardRoadmaps, LocalStorage>,
    /// Expanded topic sections of the roadmap on display
    pub expansion: RwSignal<TopicExpansion>,
}

impl AppContext {
    pub fn new(roadmaps: DashboardRoadmaps) -> Self {
        Self {
            roadmaps: StoredValue::new_local(roadmaps),
            expansion: RwSignal::new(TopicExpansion::default()),
        }
    }

    pub fn roadmaps(&self) -> DashboardRoadmaps {
        self.roadmaps.get_value()
    }

    /// Fire and forget
    pub fn send(&self, intent: RoadmapIntent) {
        self.send_then(intent, |_| {});
    }

    /// Dispatch an intent, then hand the outcome to `on_done`
    pub fn send_then<F>(&self, intent: RoadmapIntent, on_done: F)
    where
        F: FnOnce(StoreResult<DispatchOutcome>) + 'static,
    {
        let roadmaps = self.roadmaps();
        let expansion = self.expansion;
        // Saved edits stay applied locally; the user only gets told
        let alerts = matches!(
            intent,
            RoadmapIntent::Edit { .. } | RoadmapIntent::ToggleSubtopic { .. }
        );
        // No dialog to show a rejection in
        let no_dialog = matches!(
            intent,
            RoadmapIntent::ToggleSubtopic { .. } | RoadmapIntent::Delete(_)
        );

        spawn_local(async move {
            let result = dispatch(&roadmaps, intent).await;
            match &result {
                Ok(DispatchOutcome::ToggleExpand(index)) => {
                    expansion.update(|e| e.toggle(*index));
                }
                Err(e) if alerts && e.is_network() => {
                    log::error!("Failed to save roadmap: {}", e);
                    let _ = window().alert_with_message(SAVE_FAILED_ALERT);
                }
                Err(e @ StoreError::NotYetSaved(_)) if no_dialog => {
                    let _ = window().alert_with_message(&e.to_string());
                }
                Err(e) => log::warn!("Roadmap action rejected: {}", e),
                Ok(_) => {}
            }
            on_done(result);
        });
    }
}
