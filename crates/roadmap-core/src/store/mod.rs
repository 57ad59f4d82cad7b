//! Roadmap Store
//!
//! Single source of truth for the roadmap collection and the active
//! selection. Mutations are applied locally first, then written through the
//! gateway:
//! - add: rolled back entirely if the create fails
//! - edit / delete: optimistic state is kept and the error is returned
//! - edit / delete of a roadmap whose create has not landed: rejected up
//!   front, since there is no stored row to address yet
//!
//! The lock is only held while patching local state, never across a
//! gateway call, so the collection stays readable while requests are out.

mod patch;
mod snapshot;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{
    compute_progress, toggled, ProgressStats, RoadmapData, RoadmapId, RoadmapItem, SubtopicPath,
};
use crate::error::{StoreError, StoreResult};
use crate::gateway::{PersistenceGateway, ReadQuery, RecordKey, RoadmapRecord, ROADMAP_KEY_FIELD};

use patch::{FailurePolicy, LocalPatch, Mutation};
use snapshot::StoreState;

pub use snapshot::RoadmapSnapshot;

/// Callback run after every local state change
pub type Observer = Arc<dyn Fn(&RoadmapSnapshot) + Send + Sync>;

pub struct RoadmapStore<G> {
    gateway: Arc<G>,
    collection: String,
    state: Arc<Mutex<StoreState>>,
    observers: Arc<Mutex<Vec<Observer>>>,
}

impl<G> Clone for RoadmapStore<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            collection: self.collection.clone(),
            state: Arc::clone(&self.state),
            observers: Arc::clone(&self.observers),
        }
    }
}

impl<G: PersistenceGateway> RoadmapStore<G> {
    /// Empty store writing roadmaps to `collection`
    pub fn new(gateway: G, collection: impl Into<String>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            collection: collection.into(),
            state: Arc::new(Mutex::new(StoreState::default())),
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Register `observer`; it is called with the current state right away
    pub fn on_change<F>(&self, observer: F)
    where
        F: Fn(&RoadmapSnapshot) + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        let snapshot = self.snapshot();
        self.observers.lock().push(Arc::clone(&observer));
        observer(&snapshot);
    }

    pub fn snapshot(&self) -> RoadmapSnapshot {
        self.state.lock().snapshot()
    }

    pub fn active(&self) -> Option<RoadmapId> {
        self.state.lock().active.clone()
    }

    pub fn is_updating(&self) -> bool {
        self.state.lock().in_flight_edits > 0
    }

    pub fn progress(&self, id: &RoadmapId) -> Option<ProgressStats> {
        let state = self.state.lock();
        state
            .items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| compute_progress(&item.data))
    }

    /// Replace the local collection with everything stored remotely.
    ///
    /// Rows whose body does not decode are skipped with a warning.
    pub async fn load(&self) -> StoreResult<usize> {
        let rows = self
            .gateway
            .read(&self.collection, &ReadQuery::all())
            .await
            .map_err(|e| {
                log::error!("Error fetching roadmaps: {}", e);
                StoreError::from(e)
            })?;

        let items: Vec<RoadmapItem> = rows
            .iter()
            .filter_map(|row| match RoadmapRecord::decode(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("Skipping unreadable roadmap row: {}", e);
                    None
                }
            })
            .collect();
        let count = items.len();

        self.mutate(|state| {
            state.items = items;
            state.repair_selection();
        });
        log::info!("Loaded {} roadmaps", count);
        Ok(count)
    }

    /// Append a roadmap and select it, then create it remotely.
    ///
    /// Returns the server-assigned id. On failure the local entry is removed
    /// and the previous selection restored.
    pub async fn add(&self, title: &str, data: RoadmapData) -> StoreResult<RoadmapId> {
        if title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let temp_id = RoadmapId::temporary();
        let record = RoadmapRecord::insert(title, &data);
        let item = RoadmapItem::new(temp_id.clone(), title, data);
        let mutation = self.mutate(|state| {
            let mutation = Mutation::add(state, item);
            mutation.apply.apply(state);
            mutation
        });

        log::debug!("Creating roadmap {:?} as {}", title, temp_id);
        let created = match self.gateway.create(&self.collection, record).await {
            Ok(row) => RoadmapRecord::key_of(&row),
            Err(e) => Err(e),
        };

        match created {
            Ok(uid) => {
                self.apply(&LocalPatch::Rename {
                    from: temp_id,
                    to: uid.clone(),
                });
                log::info!("Roadmap {:?} stored as {}", title, uid);
                Ok(uid)
            }
            Err(e) => {
                log::error!("Error adding roadmap: {}", e);
                self.fail(&mutation);
                Err(e.into())
            }
        }
    }

    /// Replace a roadmap's body locally, then write it remotely.
    ///
    /// A failed write leaves the local change in place.
    pub async fn edit(&self, id: &RoadmapId, data: RoadmapData) -> StoreResult<()> {
        let patch = RoadmapRecord::data_patch(&data);
        let mutation = self.try_mutate(|state| {
            let previous = state
                .items
                .iter()
                .find(|item| &item.id == id)
                .map(|item| item.data.clone())
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            check_saved(id)?;
            let mutation = Mutation::edit(id.clone(), data, previous);
            mutation.apply.apply(state);
            state.in_flight_edits += 1;
            Ok(mutation)
        })?;

        log::debug!("Updating roadmap: {}", id);
        let result = self
            .gateway
            .update(&self.collection, &self.key(id), patch)
            .await;

        self.mutate(|state| state.in_flight_edits = state.in_flight_edits.saturating_sub(1));
        result.map_err(|e| {
            log::error!("Error updating roadmap {}: {}", id, e);
            self.fail(&mutation);
            e.into()
        })
    }

    /// Remove a roadmap locally (re-selecting if it was active), then
    /// delete it remotely. A failed delete is not undone.
    pub async fn delete(&self, id: &RoadmapId) -> StoreResult<()> {
        let mutation = self.try_mutate(|state| {
            let index = state
                .items
                .iter()
                .position(|item| &item.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            check_saved(id)?;
            let mutation = Mutation::delete(state, index, state.items[index].clone());
            mutation.apply.apply(state);
            Ok(mutation)
        })?;

        log::debug!("Deleting roadmap: {}", id);
        self.gateway
            .delete(&self.collection, &self.key(id))
            .await
            .map_err(|e| {
                log::error!("Error deleting roadmap {}: {}", id, e);
                self.fail(&mutation);
                e.into()
            })
    }

    /// Flip one subtopic's completion flag and save the whole roadmap.
    ///
    /// The copy is built from the latest local data, so a toggle issued while
    /// another save is out includes that save's change.
    pub async fn toggle_subtopic_completion(
        &self,
        id: &RoadmapId,
        topic_index: usize,
        sub_index: usize,
    ) -> StoreResult<()> {
        let path = SubtopicPath::new(topic_index, sub_index);
        let next = {
            let state = self.state.lock();
            let item = state
                .items
                .iter()
                .find(|item| &item.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            toggled(&item.data, path).ok_or_else(|| StoreError::PathOutOfRange {
                id: id.clone(),
                path,
            })?
        };
        self.edit(id, next).await
    }

    /// Point the selection at `id` without checking it exists; the next
    /// mutation repairs a dangling selection.
    pub fn select_active(&self, id: RoadmapId) {
        self.mutate(|state| state.active = Some(id));
    }

    fn key(&self, id: &RoadmapId) -> RecordKey {
        RecordKey::new(ROADMAP_KEY_FIELD, id.as_str())
    }

    fn apply(&self, patch: &LocalPatch) {
        self.mutate(|state| patch.apply(state));
    }

    fn fail(&self, mutation: &Mutation) {
        if mutation.on_failure == FailurePolicy::Rollback {
            self.apply(&mutation.revert);
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.lock();
            let result = f(&mut state);
            (result, state.snapshot())
        };
        self.notify(&snapshot);
        result
    }

    /// Like `mutate`, but observers only hear about successful changes
    fn try_mutate<R>(
        &self,
        f: impl FnOnce(&mut StoreState) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let (result, snapshot) = {
            let mut state = self.state.lock();
            let result = f(&mut state)?;
            (result, state.snapshot())
        };
        self.notify(&snapshot);
        Ok(result)
    }

    fn notify(&self, snapshot: &RoadmapSnapshot) {
        let observers: Vec<Observer> = self.observers.lock().clone();
        for observer in observers {
            observer(snapshot);
        }
    }
}

/// Writes addressed to a placeholder id would match no stored row and
/// succeed without saving anything
fn check_saved(id: &RoadmapId) -> StoreResult<()> {
    if id.is_temporary() {
        log::warn!("Roadmap {} is not stored yet; write rejected", id);
        return Err(StoreError::NotYetSaved(id.clone()));
    }
    Ok(())
}
