//! Local Patches
//!
//! Every store mutation is described up front as a patch to apply now and
//! the patch that would undo it. Whether the undo runs on a failed request is
//! decided by the mutation's failure policy.

use crate::domain::{RoadmapData, RoadmapId, RoadmapItem};

use super::snapshot::StoreState;

/// A change to the local collection
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LocalPatch {
    /// Insert `item` at `index` (clamped); optionally make it active
    Insert {
        index: usize,
        item: RoadmapItem,
        select: Option<RoadmapId>,
    },
    /// Drop `id`; if it was active, fall back to `fallback` (then repair)
    Remove {
        id: RoadmapId,
        fallback: Option<RoadmapId>,
    },
    /// Full overwrite of one roadmap's body
    ReplaceData { id: RoadmapId, data: RoadmapData },
    /// Swap a temporary id for the server-assigned one
    Rename { from: RoadmapId, to: RoadmapId },
}

impl LocalPatch {
    pub(crate) fn apply(&self, state: &mut StoreState) {
        match self {
            LocalPatch::Insert { index, item, select } => {
                let at = (*index).min(state.items.len());
                state.items.insert(at, item.clone());
                if let Some(id) = select {
                    state.active = Some(id.clone());
                }
            }
            LocalPatch::Remove { id, fallback } => {
                state.items.retain(|item| &item.id != id);
                if state.active.as_ref() == Some(id) {
                    state.active = fallback.clone();
                }
            }
            LocalPatch::ReplaceData { id, data } => {
                if let Some(item) = state.items.iter_mut().find(|item| &item.id == id) {
                    item.data = data.clone();
                }
            }
            LocalPatch::Rename { from, to } => {
                if let Some(item) = state.items.iter_mut().find(|item| &item.id == from) {
                    item.id = to.clone();
                }
                if state.active.as_ref() == Some(from) {
                    state.active = Some(to.clone());
                }
            }
        }
        state.repair_selection();
    }
}

/// What happens to the local change when the remote write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailurePolicy {
    /// Apply the revert patch
    Rollback,
    /// Keep the optimistic state and report the error
    Surface,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Mutation {
    pub(crate) apply: LocalPatch,
    pub(crate) revert: LocalPatch,
    pub(crate) on_failure: FailurePolicy,
}

impl Mutation {
    /// Append `item` and select it; undone entirely if the create fails
    pub(crate) fn add(state: &StoreState, item: RoadmapItem) -> Self {
        let id = item.id.clone();
        Self {
            apply: LocalPatch::Insert {
                index: state.items.len(),
                item,
                select: Some(id.clone()),
            },
            revert: LocalPatch::Remove {
                id,
                fallback: state.active.clone(),
            },
            on_failure: FailurePolicy::Rollback,
        }
    }

    pub(crate) fn edit(id: RoadmapId, data: RoadmapData, previous: RoadmapData) -> Self {
        Self {
            apply: LocalPatch::ReplaceData {
                id: id.clone(),
                data,
            },
            revert: LocalPatch::ReplaceData { id, data: previous },
            on_failure: FailurePolicy::Surface,
        }
    }

    pub(crate) fn delete(state: &StoreState, index: usize, item: RoadmapItem) -> Self {
        let select = (state.active.as_ref() == Some(&item.id)).then(|| item.id.clone());
        Self {
            apply: LocalPatch::Remove {
                id: item.id.clone(),
                fallback: None,
            },
            revert: LocalPatch::Insert {
                index,
                item,
                select,
            },
            on_failure: FailurePolicy::Surface,
        }
    }
}
