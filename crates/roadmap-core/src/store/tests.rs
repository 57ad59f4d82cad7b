//! Store Tests
//!
//! Optimistic add/edit/delete/toggle against the in-memory gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use super::*;
use crate::domain::{SubTopic, Topic};
use crate::error::GatewayError;
use crate::gateway::{GatewayOp, GatewayResult, MemoryGateway};

const COLLECTION: &str = "roadmap";

fn topic_a() -> RoadmapData {
    vec![Topic::new(
        "Topic A",
        vec![SubTopic::new("S1", "http://x"), SubTopic::new("S2", "http://y")],
    )]
}

fn row(uid: &str, title: &str, data: &RoadmapData) -> Value {
    json!({"uid": uid, "subject_name": title, "roadmap_data": data})
}

async fn setup(rows: Vec<Value>) -> RoadmapStore<MemoryGateway> {
    let gateway = MemoryGateway::default();
    gateway.seed(COLLECTION, rows);
    let store = RoadmapStore::new(gateway, COLLECTION);
    store.load().await.expect("Failed to load");
    store
}

fn ids(store: &RoadmapStore<impl PersistenceGateway>) -> Vec<String> {
    store
        .snapshot()
        .items
        .iter()
        .map(|i| i.id.to_string())
        .collect()
}

#[tokio::test]
async fn test_load_selects_first_and_skips_bad_rows() {
    let store = setup(vec![
        row("r1", "X", &topic_a()),
        json!({"uid": "bad", "subject_name": "B", "roadmap_data": {"oops": 1}}),
        row("r2", "Y", &Vec::new()),
    ])
    .await;

    assert_eq!(ids(&store), vec!["r1", "r2"]);
    assert_eq!(store.active(), Some(RoadmapId::new("r1")));
}

#[tokio::test]
async fn test_load_keeps_roadmaps_with_incomplete_subtopics() {
    let store = setup(vec![
        row("r1", "X", &topic_a()),
        json!({
            "uid": "r2",
            "subject_name": "Y",
            "roadmap_data": [{"Basics": [
                {"subtopic_name": "A", "resource_url": "http://a", "completed": true},
                {"subtopic_name": "B", "resource_url": null},
                {"resource_url": "http://c", "completed": null}
            ]}]
        }),
    ])
    .await;

    assert_eq!(ids(&store), vec!["r1", "r2"]);
    let r2 = RoadmapId::new("r2");
    let snapshot = store.snapshot();
    let basics = &snapshot.item(&r2).unwrap().data[0].subtopics;
    assert_eq!(basics[1].resource_url, "");
    assert_eq!(basics[2].subtopic_name, "");
    assert!(!basics[2].completed);
    assert_eq!(store.progress(&r2).unwrap().completed, 1);

    // Still editable and deletable
    store.toggle_subtopic_completion(&r2, 0, 1).await.unwrap();
    assert_eq!(store.progress(&r2).unwrap().completed, 2);
    store.delete(&r2).await.unwrap();
    assert_eq!(ids(&store), vec!["r1"]);
}

#[tokio::test]
async fn test_load_failure_leaves_store_empty() {
    let gateway = MemoryGateway::default();
    gateway.fail_next(GatewayOp::Read, GatewayError::Transport("offline".into()));
    let store = RoadmapStore::new(gateway, COLLECTION);

    let err = store.load().await.unwrap_err();
    assert!(err.is_network());
    assert!(store.snapshot().items.is_empty());
}

#[tokio::test]
async fn test_toggle_scenario() {
    let store = setup(vec![row("r1", "X", &topic_a())]).await;
    let id = RoadmapId::new("r1");

    store.toggle_subtopic_completion(&id, 0, 0).await.unwrap();

    let snapshot = store.snapshot();
    assert!(snapshot.items[0].data[0].subtopics[0].completed);
    assert!(!snapshot.items[0].data[0].subtopics[1].completed);

    let updates = store.gateway().calls_of(GatewayOp::Update);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].key.as_deref(), Some("r1"));
    assert_eq!(
        updates[0].payload.as_ref().unwrap()["roadmap_data"][0]["Topic A"][0]["completed"],
        true
    );
    assert_eq!(store.progress(&id).unwrap().percentage, 50);
}

#[tokio::test]
async fn test_toggle_twice_restores_original() {
    let store = setup(vec![row("r1", "X", &topic_a())]).await;
    let id = RoadmapId::new("r1");

    store.toggle_subtopic_completion(&id, 0, 1).await.unwrap();
    store.toggle_subtopic_completion(&id, 0, 1).await.unwrap();

    assert_eq!(store.snapshot().items[0].data, topic_a());
    assert_eq!(store.gateway().calls_of(GatewayOp::Update).len(), 2);
}

#[tokio::test]
async fn test_toggle_rejects_bad_path_without_request() {
    let store = setup(vec![row("r1", "X", &topic_a())]).await;
    let id = RoadmapId::new("r1");

    let err = store.toggle_subtopic_completion(&id, 0, 5).await.unwrap_err();
    assert!(matches!(err, StoreError::PathOutOfRange { .. }));
    let err = store
        .toggle_subtopic_completion(&RoadmapId::new("nope"), 0, 0)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound(RoadmapId::new("nope")));
    assert!(store.gateway().calls_of(GatewayOp::Update).is_empty());
}

#[tokio::test]
async fn test_add_reconciles_server_id() {
    let store = setup(vec![row("r1", "X", &topic_a())]).await;

    let uid = store.add("New Subject", Vec::new()).await.unwrap();

    assert!(!uid.is_temporary());
    assert_eq!(ids(&store), vec!["r1".to_string(), uid.to_string()]);
    assert_eq!(store.active(), Some(uid.clone()));

    let stored = store.gateway().records(COLLECTION);
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1]["uid"], uid.as_str());
    assert_eq!(stored[1]["subject_name"], "New Subject");
}

#[tokio::test]
async fn test_add_selects_before_confirmation() {
    let store = setup(Vec::new()).await;
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.on_change(move |snap| sink.lock().push(snap.active.clone()));

    let uid = store.add("Rust", topic_a()).await.unwrap();

    let seen = seen.lock();
    // initial call, optimistic insert, rename
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], None);
    assert!(seen[1].as_ref().unwrap().is_temporary());
    assert_eq!(seen[2], Some(uid));
}

#[tokio::test]
async fn test_add_failure_rolls_back() {
    let store = setup(vec![row("r1", "X", &topic_a()), row("r2", "Y", &Vec::new())]).await;
    store.select_active(RoadmapId::new("r2"));
    let before = store.snapshot();
    store
        .gateway()
        .fail_next(GatewayOp::Create, GatewayError::Http { status: 500, message: "boom".into() });

    let err = store.add("New Subject", Vec::new()).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.active(), Some(RoadmapId::new("r2")));
}

#[tokio::test]
async fn test_add_failure_on_empty_store() {
    let store = setup(Vec::new()).await;
    store
        .gateway()
        .fail_next(GatewayOp::Create, GatewayError::Transport("offline".into()));

    assert!(store.add("Solo", Vec::new()).await.is_err());
    assert!(store.snapshot().items.is_empty());
    assert_eq!(store.active(), None);
}

#[tokio::test]
async fn test_add_rejects_blank_title() {
    let store = setup(Vec::new()).await;
    assert_eq!(store.add("   ", Vec::new()).await, Err(StoreError::EmptyTitle));
    assert!(store.gateway().calls_of(GatewayOp::Create).is_empty());
}

#[tokio::test]
async fn test_add_without_key_in_response_rolls_back() {
    struct KeylessGateway(MemoryGateway);

    #[async_trait]
    impl PersistenceGateway for KeylessGateway {
        async fn create(&self, _collection: &str, record: Value) -> GatewayResult<Value> {
            Ok(record)
        }
        async fn read(&self, collection: &str, query: &ReadQuery) -> GatewayResult<Vec<Value>> {
            self.0.read(collection, query).await
        }
        async fn update(&self, collection: &str, key: &RecordKey, patch: Value) -> GatewayResult<()> {
            self.0.update(collection, key, patch).await
        }
        async fn delete(&self, collection: &str, key: &RecordKey) -> GatewayResult<()> {
            self.0.delete(collection, key).await
        }
    }

    let store = RoadmapStore::new(KeylessGateway(MemoryGateway::default()), COLLECTION);
    let err = store.add("Rust", Vec::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::Gateway(GatewayError::MalformedResponse(_))));
    assert!(store.snapshot().items.is_empty());
}

#[tokio::test]
async fn test_edit_failure_keeps_optimistic_data() {
    let store = setup(vec![row("r1", "X", &topic_a())]).await;
    let id = RoadmapId::new("r1");
    store
        .gateway()
        .fail_next(GatewayOp::Update, GatewayError::Transport("offline".into()));

    let replacement = vec![Topic::new("Only", Vec::new())];
    let err = store.edit(&id, replacement.clone()).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(store.snapshot().items[0].data, replacement);
    assert!(!store.is_updating());
    // remote still has the old body
    let stored = store.gateway().records(COLLECTION);
    assert_eq!(stored[0]["roadmap_data"][0]["Topic A"][0]["subtopic_name"], "S1");
}

#[tokio::test]
async fn test_edit_unknown_id() {
    let store = setup(Vec::new()).await;
    let err = store.edit(&RoadmapId::new("ghost"), Vec::new()).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound(RoadmapId::new("ghost")));
    assert!(store.gateway().calls().iter().all(|c| c.op == GatewayOp::Read));
}

#[tokio::test]
async fn test_edit_preserves_topic_order_remotely() {
    let store = setup(vec![row("r1", "X", &Vec::new())]).await;
    let data = vec![
        Topic::new("Zeta", Vec::new()),
        Topic::new("Alpha", Vec::new()),
        Topic::new("Mid", Vec::new()),
    ];

    store.edit(&RoadmapId::new("r1"), data).await.unwrap();

    let stored = store.gateway().records(COLLECTION);
    let names: Vec<_> = stored[0]["roadmap_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_object().unwrap().keys().next().unwrap().clone())
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[tokio::test]
async fn test_delete_only_roadmap_clears_selection() {
    let store = setup(vec![row("r1", "X", &topic_a())]).await;

    store.delete(&RoadmapId::new("r1")).await.unwrap();

    assert!(store.snapshot().items.is_empty());
    assert_eq!(store.active(), None);
    assert!(store.gateway().records(COLLECTION).is_empty());
}

#[tokio::test]
async fn test_delete_active_of_two_selects_other() {
    let store = setup(vec![row("r1", "X", &topic_a()), row("r2", "Y", &Vec::new())]).await;
    store.select_active(RoadmapId::new("r2"));

    store.delete(&RoadmapId::new("r2")).await.unwrap();

    assert_eq!(ids(&store), vec!["r1"]);
    assert_eq!(store.active(), Some(RoadmapId::new("r1")));
}

#[tokio::test]
async fn test_delete_inactive_keeps_selection() {
    let store = setup(vec![
        row("r1", "X", &Vec::new()),
        row("r2", "Y", &Vec::new()),
        row("r3", "Z", &Vec::new()),
    ])
    .await;
    store.select_active(RoadmapId::new("r3"));

    store.delete(&RoadmapId::new("r1")).await.unwrap();
    assert_eq!(store.active(), Some(RoadmapId::new("r3")));
}

#[tokio::test]
async fn test_delete_failure_is_not_undone() {
    let store = setup(vec![row("r1", "X", &topic_a()), row("r2", "Y", &Vec::new())]).await;
    store
        .gateway()
        .fail_next(GatewayOp::Delete, GatewayError::Transport("offline".into()));

    let err = store.delete(&RoadmapId::new("r1")).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(ids(&store), vec!["r2"]);
    assert_eq!(store.gateway().records(COLLECTION).len(), 2);
}

#[tokio::test]
async fn test_dangling_selection_heals_on_next_mutation() {
    let store = setup(vec![row("r1", "X", &topic_a()), row("r2", "Y", &Vec::new())]).await;

    store.select_active(RoadmapId::new("missing"));
    assert_eq!(store.active(), Some(RoadmapId::new("missing")));
    assert_eq!(store.snapshot().active_item().unwrap().id.as_str(), "r1");

    store.edit(&RoadmapId::new("r2"), Vec::new()).await.unwrap();
    assert_eq!(store.active(), Some(RoadmapId::new("r1")));
}

/// Holds every call of one kind until the test releases it
struct GatedGateway {
    inner: MemoryGateway,
    held: GatewayOp,
    gate: Semaphore,
    waiting: AtomicUsize,
}

impl GatedGateway {
    fn holding(held: GatewayOp, rows: Vec<Value>) -> Self {
        let inner = MemoryGateway::default();
        inner.seed(COLLECTION, rows);
        Self {
            inner,
            held,
            gate: Semaphore::new(0),
            waiting: AtomicUsize::new(0),
        }
    }

    async fn pass(&self, op: GatewayOp) -> GatewayResult<()> {
        if op != self.held {
            return Ok(());
        }
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        permit.forget();
        Ok(())
    }

    async fn until_waiting(&self, count: usize) {
        while self.waiting.load(Ordering::SeqCst) < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl PersistenceGateway for GatedGateway {
    async fn create(&self, collection: &str, record: Value) -> GatewayResult<Value> {
        self.pass(GatewayOp::Create).await?;
        self.inner.create(collection, record).await
    }

    async fn read(&self, collection: &str, query: &ReadQuery) -> GatewayResult<Vec<Value>> {
        self.pass(GatewayOp::Read).await?;
        self.inner.read(collection, query).await
    }

    async fn update(&self, collection: &str, key: &RecordKey, patch: Value) -> GatewayResult<()> {
        self.pass(GatewayOp::Update).await?;
        self.inner.update(collection, key, patch).await
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> GatewayResult<()> {
        self.pass(GatewayOp::Delete).await?;
        self.inner.delete(collection, key).await
    }
}

#[tokio::test]
async fn test_overlapping_toggles_build_on_latest_local_data() {
    let store = RoadmapStore::new(
        GatedGateway::holding(GatewayOp::Update, vec![row("r1", "X", &topic_a())]),
        COLLECTION,
    );
    store.load().await.unwrap();
    let id = RoadmapId::new("r1");

    let first = store.toggle_subtopic_completion(&id, 0, 0);
    let second = store.toggle_subtopic_completion(&id, 0, 1);
    let release = async {
        store.gateway().until_waiting(2).await;
        assert!(store.is_updating());
        let local = store.snapshot();
        assert!(local.items[0].data[0].subtopics.iter().all(|s| s.completed));
        store.gateway().gate.add_permits(2);
    };

    let (a, b, ()) = tokio::join!(first, second, release);
    a.unwrap();
    b.unwrap();

    assert!(!store.is_updating());
    let local = store.snapshot();
    assert!(local.items[0].data[0].subtopics.iter().all(|s| s.completed));

    // The second save carries both flags; which save lands last remotely
    // depends on completion order.
    let mut sent: Vec<Vec<bool>> = store
        .gateway()
        .inner
        .calls_of(GatewayOp::Update)
        .iter()
        .map(|call| {
            call.payload.as_ref().unwrap()["roadmap_data"][0]["Topic A"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s["completed"].as_bool().unwrap())
                .collect()
        })
        .collect();
    sent.sort();
    assert_eq!(sent, vec![vec![true, false], vec![true, true]]);
}

#[tokio::test]
async fn test_writes_to_unconfirmed_roadmap_are_rejected() {
    let store = RoadmapStore::new(GatedGateway::holding(GatewayOp::Create, Vec::new()), COLLECTION);

    let create = store.add("New", topic_a());
    let meanwhile = async {
        store.gateway().until_waiting(1).await;
        let temp_id = store.active().unwrap();
        assert!(temp_id.is_temporary());

        let toggle = store.toggle_subtopic_completion(&temp_id, 0, 0).await;
        assert_eq!(toggle, Err(StoreError::NotYetSaved(temp_id.clone())));
        let edit = store.edit(&temp_id, Vec::new()).await;
        assert_eq!(edit, Err(StoreError::NotYetSaved(temp_id.clone())));
        let delete = store.delete(&temp_id).await;
        assert_eq!(delete, Err(StoreError::NotYetSaved(temp_id.clone())));

        // Nothing changed locally either
        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].data, topic_a());
        assert!(!store.is_updating());

        store.gateway().gate.add_permits(1);
    };

    let (created, ()) = tokio::join!(create, meanwhile);
    let uid = created.unwrap();
    assert!(store.gateway().inner.calls_of(GatewayOp::Update).is_empty());
    assert!(store.gateway().inner.calls_of(GatewayOp::Delete).is_empty());

    // Once stored, the same toggle saves under the server id
    store.toggle_subtopic_completion(&uid, 0, 0).await.unwrap();
    let stored = store.gateway().inner.records(COLLECTION);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["roadmap_data"][0]["Topic A"][0]["completed"], true);
}

#[tokio::test]
async fn test_create_landing_keeps_selection_made_meanwhile() {
    let store = RoadmapStore::new(
        GatedGateway::holding(GatewayOp::Create, vec![row("r1", "X", &topic_a())]),
        COLLECTION,
    );
    store.load().await.unwrap();
    let r1 = RoadmapId::new("r1");

    let create = store.add("New", Vec::new());
    let meanwhile = async {
        store.gateway().until_waiting(1).await;
        assert!(store.active().unwrap().is_temporary());
        store.select_active(r1.clone());
        store.gateway().gate.add_permits(1);
    };

    let (created, ()) = tokio::join!(create, meanwhile);
    let uid = created.unwrap();

    assert_eq!(store.active(), Some(r1));
    assert_eq!(ids(&store), vec!["r1".to_string(), uid.to_string()]);
}
