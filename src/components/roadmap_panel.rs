//! Roadmap Panel Component
//!
//! Header (title, progress badge, tabs, actions) over the topic list of
//! the roadmap on display. Shows an empty state when there are none.

use leptos::prelude::*;
use roadmap_core::validation::to_editor_json;
use roadmap_core::{compute_progress, DisplayedRoadmap, RoadmapIntent, RoadmapItem, TopicExpansion};

use super::{DeleteConfirmButton, EditorMode, RoadmapEditor, RoadmapTabs, TopicSection};
use crate::context::AppContext;
use crate::store::{store_active_roadmap, use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn RoadmapPanel() -> impl IntoView {
    let state = use_dashboard_store();
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (editor, set_editor) = signal::<Option<EditorMode>>(None);

    let active = Memo::new(move |_| store_active_roadmap(&state));
    let progress = Memo::new(move |_| {
        active.with(|roadmap| {
            roadmap
                .as_ref()
                .map(|r| compute_progress(&r.data))
                .unwrap_or_default()
        })
    });

    // Topic 0 starts expanded for every newly selected roadmap
    let displayed = Memo::new(move |_| {
        let id = active.with(|r| r.as_ref().map(|r| r.id.clone()))?;
        let index = state.roadmaps().with(|items| items.iter().position(|r| r.id == id))?;
        Some(DisplayedRoadmap::new(id, index))
    });
    Effect::new(move |previous: Option<Option<DisplayedRoadmap>>| {
        let next = displayed.get();
        if let Some(previous) = previous {
            if TopicExpansion::resets_between(previous.as_ref(), next.as_ref()) {
                ctx.expansion.set(TopicExpansion::default());
            }
        }
        next
    });

    let open_add = move |_: web_sys::MouseEvent| set_editor.set(Some(EditorMode::Add));

    let actions = move || {
        active.get().map(|roadmap: RoadmapItem| {
            let edit_id = roadmap.id.clone();
            let delete_id = roadmap.id.clone();
            let json = to_editor_json(&roadmap.data);
            view! {
                <button
                    class="icon-btn"
                    title="Edit JSON"
                    on:click=move |_| {
                        set_editor.set(Some(EditorMode::Edit {
                            id: edit_id.clone(),
                            json: json.clone(),
                        }))
                    }
                >
                    "✎"
                </button>
                <DeleteConfirmButton
                    button_class="icon-btn delete-btn"
                    title="Delete Roadmap"
                    on_confirm=Callback::new(move |_| {
                        ctx.send(RoadmapIntent::Delete(delete_id.clone()))
                    })
                />
            }
        })
    };

    let topics = move || {
        active.get().map(|roadmap| {
            let id = roadmap.id;
            roadmap
                .data
                .into_iter()
                .enumerate()
                .map(|(index, topic)| {
                    view! { <TopicSection roadmap_id=id.clone() index=index topic=topic /> }
                })
                .collect_view()
        })
    };

    view! {
        <Show
            when=move || state.roadmaps().with(|r| !r.is_empty())
            fallback=move || view! {
                <div class="empty-state">
                    <h2>"No roadmaps yet"</h2>
                    <p>"Create one to start tracking your progress."</p>
                    <button class="primary-btn" on:click=open_add>"Create First Roadmap"</button>
                </div>
            }
        >
            <section class="roadmap-panel">
                <header class="roadmap-header">
                    <div class="roadmap-title-row">
                        <h1>
                            {move || {
                                active
                                    .with(|r| r.as_ref().map(|r| r.title.clone()))
                                    .unwrap_or_else(|| "Select Roadmap".to_string())
                            }}
                        </h1>
                        <Show
                            when=move || !state.is_updating().get()
                            fallback=|| view! { <span class="saving-indicator">"Saving..."</span> }
                        >
                            <span class="progress-badge">
                                {move || format!("{}% Done", progress.get().percentage)}
                            </span>
                        </Show>
                    </div>
                    <div class="roadmap-toolbar">
                        <RoadmapTabs />
                        <button class="icon-btn" title="Add Roadmap" on:click=open_add>"+"</button>
                        {actions}
                    </div>
                </header>
                <div class="roadmap-content">{topics}</div>
            </section>
        </Show>
        <RoadmapEditor mode=editor set_mode=set_editor />
    }
}
