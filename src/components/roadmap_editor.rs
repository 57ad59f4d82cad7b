//! Roadmap Editor Component
//!
//! Add and edit dialogs. Both take the roadmap data as raw JSON; the
//! text is only validated on save. Each dialog keeps its own draft so an
//! edited roadmap never leaks into the add form.

use leptos::prelude::*;
use roadmap_core::validation::example_template;
use roadmap_core::{RoadmapId, RoadmapIntent};

use super::Modal;
use crate::context::AppContext;

const EMPTY_DATA: &str = "[]";

/// Which dialog is open
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Add,
    Edit { id: RoadmapId, json: String },
}

/// Unsaved JSON text, one draft per dialog
#[derive(Debug, Clone, PartialEq)]
struct EditorDrafts {
    add: String,
    edit: String,
}

impl Default for EditorDrafts {
    fn default() -> Self {
        Self {
            add: EMPTY_DATA.to_string(),
            edit: String::new(),
        }
    }
}

impl EditorDrafts {
    /// Edit always starts from the roadmap's current data; the add draft
    /// survives until a create succeeds
    fn open(&mut self, mode: &EditorMode) {
        if let EditorMode::Edit { json, .. } = mode {
            self.edit = json.clone();
        }
    }

    fn text(&self, mode: &EditorMode) -> &str {
        match mode {
            EditorMode::Add => &self.add,
            EditorMode::Edit { .. } => &self.edit,
        }
    }

    fn set_text(&mut self, mode: &EditorMode, text: String) {
        match mode {
            EditorMode::Add => self.add = text,
            EditorMode::Edit { .. } => self.edit = text,
        }
    }

    fn created(&mut self) {
        self.add = EMPTY_DATA.to_string();
    }
}

#[component]
pub fn RoadmapEditor(
    mode: ReadSignal<Option<EditorMode>>,
    set_mode: WriteSignal<Option<EditorMode>>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (name, set_name) = signal(String::new());
    let drafts = RwSignal::new(EditorDrafts::default());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    Effect::new(move |_| {
        if let Some(current) = mode.get() {
            drafts.update(|d| d.open(&current));
            set_error.set(None);
        }
    });

    let close = Callback::new(move |_: ()| {
        set_error.set(None);
        set_mode.set(None);
    });

    let save = move || {
        let Some(current) = mode.get_untracked() else { return };
        let is_add = current == EditorMode::Add;
        let raw_json = drafts.with_untracked(|d| d.text(&current).to_string());
        let intent = match current {
            EditorMode::Add => RoadmapIntent::Add {
                title: name.get_untracked(),
                raw_json,
            },
            EditorMode::Edit { id, .. } => RoadmapIntent::Edit { id, raw_json },
        };

        set_saving.set(true);
        ctx.send_then(intent, move |result| {
            set_saving.set(false);
            match result {
                Ok(_) => {
                    if is_add {
                        set_name.set(String::new());
                        drafts.update(EditorDrafts::created);
                    }
                    close.run(());
                }
                // Already applied locally and alerted
                Err(e) if !is_add && e.is_network() => close.run(()),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    let error_view = move || {
        error
            .get()
            .map(|message| view! { <p class="form-error">{message}</p> })
    };

    view! {
        <Modal
            open=Signal::derive(move || mode.get() == Some(EditorMode::Add))
            title="New Roadmap"
            on_close=close
        >
            <label class="field">
                <span>"Name"</span>
                <input
                    type="text"
                    placeholder="e.g. Backend Developer"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </label>
            <label class="field">
                <span class="field-row">
                    "Roadmap JSON"
                    <button
                        type="button"
                        class="link-btn"
                        on:click=move |_| {
                            drafts.update(|d| d.set_text(&EditorMode::Add, example_template()))
                        }
                    >
                        "Load Example Template"
                    </button>
                </span>
                <textarea
                    class="json-input"
                    rows="12"
                    prop:value=move || drafts.with(|d| d.add.clone())
                    on:input=move |ev| {
                        drafts.update(|d| d.set_text(&EditorMode::Add, event_target_value(&ev)))
                    }
                />
            </label>
            {error_view}
            <div class="modal-actions">
                <button class="secondary-btn" on:click=move |_| close.run(())>"Cancel"</button>
                <button
                    class="primary-btn"
                    disabled=move || saving.get() || name.get().trim().is_empty()
                    on:click=move |_| save()
                >
                    {move || if saving.get() { "Creating..." } else { "Create Roadmap" }}
                </button>
            </div>
        </Modal>

        <Modal
            open=Signal::derive(move || matches!(mode.get(), Some(EditorMode::Edit { .. })))
            title="Edit Roadmap Config"
            on_close=close
        >
            <p class="edit-warning">
                "Editing the JSON replaces the whole roadmap, including completion state."
            </p>
            <textarea
                class="json-input"
                rows="16"
                prop:value=move || drafts.with(|d| d.edit.clone())
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    if let Some(current) = mode.get_untracked() {
                        drafts.update(|d| d.set_text(&current, text));
                    }
                }
            />
            {error_view}
            <div class="modal-actions">
                <button class="secondary-btn" on:click=move |_| close.run(())>"Cancel"</button>
                <button class="primary-btn" disabled=move || saving.get() on:click=move |_| save()>
                    "Save Changes"
                </button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_mode(json: &str) -> EditorMode {
        EditorMode::Edit {
            id: RoadmapId::new("r1"),
            json: json.to_string(),
        }
    }

    #[test]
    fn test_edit_draft_does_not_leak_into_add() {
        let mut drafts = EditorDrafts::default();
        let edit = edit_mode(r#"[{"Basics": []}]"#);

        drafts.open(&edit);
        assert_eq!(drafts.text(&edit), r#"[{"Basics": []}]"#);

        // Cancel, then open the add dialog
        drafts.open(&EditorMode::Add);
        assert_eq!(drafts.text(&EditorMode::Add), EMPTY_DATA);
    }

    #[test]
    fn test_add_draft_kept_until_created() {
        let mut drafts = EditorDrafts::default();
        drafts.set_text(&EditorMode::Add, example_template());
        drafts.open(&edit_mode("[]"));
        drafts.open(&EditorMode::Add);
        assert_eq!(drafts.text(&EditorMode::Add), example_template());

        drafts.created();
        assert_eq!(drafts.text(&EditorMode::Add), EMPTY_DATA);
    }

    #[test]
    fn test_reopening_edit_discards_unsaved_text() {
        let mut drafts = EditorDrafts::default();
        let edit = edit_mode("[]");
        drafts.open(&edit);
        drafts.set_text(&edit, "[{".to_string());

        drafts.open(&edit);
        assert_eq!(drafts.text(&edit), "[]");
    }
}
