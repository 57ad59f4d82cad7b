//! Topic Section Component
//!
//! Collapsible topic header with its completed/total counter.

use leptos::prelude::*;
use roadmap_core::{RoadmapId, RoadmapIntent, SubtopicPath, Topic, TopicProgress};

use super::SubtopicRow;
use crate::context::AppContext;

#[component]
pub fn TopicSection(roadmap_id: RoadmapId, index: usize, topic: Topic) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let progress = TopicProgress::of(&topic.subtopics);
    let expanded = move || ctx.expansion.with(|e| e.is_expanded(index));
    let title_class = if progress.is_complete() { "topic-title complete" } else { "topic-title" };

    let rows = topic
        .subtopics
        .into_iter()
        .enumerate()
        .map(|(sub, subtopic)| {
            view! {
                <SubtopicRow
                    roadmap_id=roadmap_id.clone()
                    path=SubtopicPath::new(index, sub)
                    subtopic=subtopic
                />
            }
        })
        .collect_view();

    view! {
        <section class="topic">
            <button
                class="topic-header"
                on:click=move |_| ctx.send(RoadmapIntent::ToggleTopicExpand(index))
            >
                <span class=move || if expanded() { "chevron open" } else { "chevron" }>"▸"</span>
                <h3 class=title_class>
                    {topic.name}
                </h3>
                <span class="topic-count">
                    {format!("{}/{}", progress.completed, progress.total)}
                </span>
            </button>
            <div class="subtopics" style:display=move || if expanded() { "grid" } else { "none" }>
                {rows}
            </div>
        </section>
    }
}
