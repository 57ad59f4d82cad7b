//! Roadmap Tabs Component
//!
//! One tab per roadmap; clicking selects it.

use leptos::prelude::*;
use roadmap_core::RoadmapIntent;

use crate::context::AppContext;
use crate::store::{store_active_roadmap, use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn RoadmapTabs() -> impl IntoView {
    let state = use_dashboard_store();
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <nav class="roadmap-tabs">
            <For
                each=move || state.roadmaps().get()
                key=|roadmap| (roadmap.id.clone(), roadmap.title.clone())
                children=move |roadmap| {
                    let id = roadmap.id.clone();
                    let select_id = id.clone();
                    let is_active = move || {
                        store_active_roadmap(&state).map(|active| active.id == id).unwrap_or(false)
                    };
                    view! {
                        <button
                            class=move || if is_active() { "roadmap-tab active" } else { "roadmap-tab" }
                            on:click=move |_| ctx.send(RoadmapIntent::Select(select_id.clone()))
                        >
                            {roadmap.title}
                        </button>
                    }
                }
            />
        </nav>
    }
}
