//! Subtopic Row Component

use leptos::prelude::*;
use roadmap_core::{RoadmapId, RoadmapIntent, SubTopic, SubtopicPath};

use crate::context::AppContext;

/// One subtopic: completion toggle, name, resource link
#[component]
pub fn SubtopicRow(roadmap_id: RoadmapId, path: SubtopicPath, subtopic: SubTopic) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let completed = subtopic.completed;
    let (row_class, check_title, check_mark) = if completed {
        ("subtopic-row done", "Mark as not done", "●")
    } else {
        ("subtopic-row", "Mark as done", "○")
    };

    let toggle = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        ctx.send(RoadmapIntent::ToggleSubtopic {
            id: roadmap_id.clone(),
            path,
        });
    };

    view! {
        <div class=row_class>
            <button
                class="check-btn"
                title=check_title
                on:click=toggle
            >
                {check_mark}
            </button>
            <span class="subtopic-name">{subtopic.subtopic_name}</span>
            <a
                class="resource-link"
                href=subtopic.resource_url
                target="_blank"
                rel="noopener noreferrer"
                title="Open resource"
            >
                "↗"
            </a>
        </div>
    }
}
