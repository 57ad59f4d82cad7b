//! UI Components
//!
//! Reusable Leptos components.

mod delete_confirm_button;
mod modal;
mod roadmap_editor;
mod roadmap_panel;
mod roadmap_tabs;
mod subtopic_row;
mod topic_section;

pub use delete_confirm_button::DeleteConfirmButton;
pub use modal::Modal;
pub use roadmap_editor::{EditorMode, RoadmapEditor};
pub use roadmap_panel::RoadmapPanel;
pub use roadmap_tabs::RoadmapTabs;
pub use subtopic_row::SubtopicRow;
pub use topic_section::TopicSection;
