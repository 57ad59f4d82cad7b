//! Roadmap Dashboard Frontend App
//!
//! Wires the optimistic roadmap store into the reactive UI store.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use roadmap_core::RoadmapStore;

use crate::components::RoadmapPanel;
use crate::context::AppContext;
use crate::gateway;
use crate::store::{store_apply_snapshot, DashboardState, DashboardStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let state = Store::new(DashboardState::new());
    provide_context(state);

    let (gateway, table) = gateway::connect();
    let roadmaps = RoadmapStore::new(gateway, table);
    roadmaps.on_change(move |snapshot| store_apply_snapshot(&state, snapshot));

    let ctx = AppContext::new(roadmaps.clone());
    provide_context(ctx);

    // Initial fetch; the store logs the outcome
    spawn_local(async move {
        if let Err(e) = roadmaps.load().await {
            state.load_error().set(Some(e.to_string()));
        }
        state.loading().set(false);
    });

    view! {
        <main class="dashboard">
            <Show
                when=move || !state.loading().get()
                fallback=|| view! { <div class="loading">"Loading roadmaps..."</div> }
            >
                <LoadErrorBanner />
                <RoadmapPanel />
            </Show>
        </main>
    }
}

/// Shown when the initial fetch failed, with the latest log lines attached
#[component]
fn LoadErrorBanner() -> impl IntoView {
    let state = expect_context::<Store<DashboardState>>();

    move || {
        state.load_error().get().map(|message| {
            let lines = rolling_logger::recent_lines().join("\n");
            view! {
                <div class="load-error">
                    <p>"Couldn't load your roadmaps: " {message}</p>
                    <details>
                        <summary>"Recent log"</summary>
                        <pre class="log-lines">{lines}</pre>
                    </details>
                </div>
            }
        })
    }
}
