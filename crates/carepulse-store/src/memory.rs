//! In-memory store backend for testing and development.
//!
//! Keeps the primary items in a `BTreeMap` keyed by [`ItemKey`] (which orders
//! by partition, then sort) and mirrors every item's secondary keys into
//! per-index ordered sets, the same way the production backend derives its
//! global secondary indexes from the primary item. Index entries follow the
//! item on every put and delete, so rewriting an item with different index
//! keys physically moves it between index partitions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::condition::Condition;
use crate::error::{StoreError, StoreResult};
use crate::item::{Item, ItemKey, SecondaryIndex};
use crate::metrics::{MetricsSnapshot, OpTimer, StoreMetrics};
use crate::query::{Query, QueryIndex};
use crate::write::{WriteRequest, MAX_BATCH_WRITE_REQUESTS};
use crate::KeyValueStore;

/// Entry in a secondary index: (partition, sort, primary key). The primary
/// key participates in the ordering as a tiebreaker, since index keys are not
/// unique.
type IndexEntry = (String, String, ItemKey);

#[derive(Default)]
struct MemoryInner {
    items: BTreeMap<ItemKey, Item>,
    indexes: [BTreeSet<IndexEntry>; 3],
}

impl MemoryInner {
    fn index_insert(&mut self, item: &Item) {
        for index in SecondaryIndex::ALL {
            if let Some(key) = item.index_keys.get(index) {
                self.indexes[index.position()].insert((
                    key.partition.clone(),
                    key.sort.clone(),
                    item.key.clone(),
                ));
            }
        }
    }

    fn index_remove(&mut self, item: &Item) {
        for index in SecondaryIndex::ALL {
            if let Some(key) = item.index_keys.get(index) {
                self.indexes[index.position()].remove(&(
                    key.partition.clone(),
                    key.sort.clone(),
                    item.key.clone(),
                ));
            }
        }
    }

    fn apply_put(&mut self, item: Item) {
        if let Some(old) = self.items.get(&item.key).cloned() {
            self.index_remove(&old);
        }
        self.index_insert(&item);
        self.items.insert(item.key.clone(), item);
    }

    fn apply_delete(&mut self, key: &ItemKey) {
        if let Some(old) = self.items.remove(key) {
            self.index_remove(&old);
        }
    }
}

/// In-memory [`KeyValueStore`] implementation.
///
/// Cloning is cheap and clones share the same underlying data, mirroring how
/// repositories share one backend.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
    metrics: Arc<StoreMetrics>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryInner::default())),
            metrics: Arc::new(StoreMetrics::new()),
        }
    }

    /// Snapshot of operation metrics recorded by this store.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Number of items currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    /// Returns true if the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.items.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &ItemKey) -> StoreResult<Option<Item>> {
        let timer = OpTimer::new();
        let inner = self.inner.read().await;
        let found = inner.items.get(key).cloned();
        self.metrics.record_read(timer.elapsed(), false);
        Ok(found)
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        let timer = OpTimer::new();
        let mut inner = self.inner.write().await;
        inner.apply_put(item);
        self.metrics.record_write(timer.elapsed(), false);
        Ok(())
    }

    async fn put_conditional(&self, item: Item, condition: Condition) -> StoreResult<()> {
        let timer = OpTimer::new();
        let mut inner = self.inner.write().await;
        if !condition.holds(inner.items.get(&item.key)) {
            self.metrics.record_write(timer.elapsed(), true);
            return Err(StoreError::condition_failed(item.key.to_string()));
        }
        inner.apply_put(item);
        self.metrics.record_write(timer.elapsed(), false);
        Ok(())
    }

    async fn delete(&self, key: &ItemKey) -> StoreResult<()> {
        let timer = OpTimer::new();
        let mut inner = self.inner.write().await;
        inner.apply_delete(key);
        self.metrics.record_delete(timer.elapsed(), false);
        Ok(())
    }

    async fn delete_conditional(&self, key: &ItemKey, condition: Condition) -> StoreResult<()> {
        let timer = OpTimer::new();
        let mut inner = self.inner.write().await;
        if !condition.holds(inner.items.get(key)) {
            self.metrics.record_delete(timer.elapsed(), true);
            return Err(StoreError::condition_failed(key.to_string()));
        }
        inner.apply_delete(key);
        self.metrics.record_delete(timer.elapsed(), false);
        Ok(())
    }

    async fn query(&self, query: Query) -> StoreResult<Vec<Item>> {
        let timer = OpTimer::new();
        let inner = self.inner.read().await;

        let mut results: Vec<Item> = match query.index {
            QueryIndex::Primary => {
                let start = ItemKey::new(query.partition.clone(), "");
                inner
                    .items
                    .range(start..)
                    .take_while(|(key, _)| key.partition == query.partition)
                    .filter(|(key, _)| {
                        query.sort.as_ref().map_or(true, |cond| cond.matches(&key.sort))
                    })
                    .map(|(_, item)| item.clone())
                    .collect()
            },
            QueryIndex::Secondary(index) => {
                let start: IndexEntry =
                    (query.partition.clone(), String::new(), ItemKey::new("", ""));
                inner.indexes[index.position()]
                    .range(start..)
                    .take_while(|(partition, _, _)| *partition == query.partition)
                    .filter(|(_, sort, _)| {
                        query.sort.as_ref().map_or(true, |cond| cond.matches(sort))
                    })
                    .filter_map(|(_, _, primary)| inner.items.get(primary).cloned())
                    .collect()
            },
        };

        if query.descending {
            results.reverse();
        }
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        self.metrics.record_read(timer.elapsed(), false);
        Ok(results)
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> StoreResult<()> {
        if requests.len() > MAX_BATCH_WRITE_REQUESTS {
            return Err(StoreError::BatchTooLarge {
                given: requests.len(),
                limit: MAX_BATCH_WRITE_REQUESTS,
            });
        }
        let timer = OpTimer::new();
        let mut inner = self.inner.write().await;
        for request in requests {
            match request {
                WriteRequest::Put(item) => inner.apply_put(item),
                WriteRequest::Delete(key) => inner.apply_delete(&key),
            }
        }
        self.metrics.record_write(timer.elapsed(), false);
        Ok(())
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        let timer = OpTimer::new();
        let inner = self.inner.read().await;
        let all = inner.items.values().cloned().collect();
        self.metrics.record_read(timer.elapsed(), false);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::IndexKeys;
    use crate::query::SortCondition;

    fn item(partition: &str, sort: &str, payload: &str) -> Item {
        Item::new(ItemKey::new(partition, sort), payload.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        let stored = item("PROJECT#p1", "PATIENT#a", "alice");

        store.put(stored.clone()).await.unwrap();
        let found = store.get(&stored.key).await.unwrap();
        assert_eq!(found, Some(stored));

        let missing = store.get(&ItemKey::new("PROJECT#p1", "PATIENT#b")).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put(item("PROJECT#p1", "PATIENT#a", "v1")).await.unwrap();
        store.put(item("PROJECT#p1", "PATIENT#a", "v2")).await.unwrap();

        let found = store.get(&ItemKey::new("PROJECT#p1", "PATIENT#a")).await.unwrap().unwrap();
        assert_eq!(found.payload, b"v2".to_vec());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let key = ItemKey::new("PROJECT#p1", "PATIENT#a");
        store.put(item("PROJECT#p1", "PATIENT#a", "alice")).await.unwrap();

        store.delete(&key).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
        // Deleting again is a no-op, not an error.
        store.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_primary_prefix_and_order() {
        let store = MemoryStore::new();
        store.put(item("PROJECT#p1", "PATIENT#b", "bob")).await.unwrap();
        store.put(item("PROJECT#p1", "PATIENT#a", "alice")).await.unwrap();
        store.put(item("PROJECT#p1", "SURVEY#s1", "survey")).await.unwrap();
        store.put(item("PROJECT#p2", "PATIENT#c", "carol")).await.unwrap();

        let query = Query::builder()
            .partition("PROJECT#p1")
            .sort(SortCondition::BeginsWith("PATIENT#".to_string()))
            .build();
        let results = store.query(query).await.unwrap();
        let sorts: Vec<&str> = results.iter().map(|i| i.key.sort.as_str()).collect();
        assert_eq!(sorts, vec!["PATIENT#a", "PATIENT#b"]);

        let descending = Query::builder()
            .partition("PROJECT#p1")
            .sort(SortCondition::BeginsWith("PATIENT#".to_string()))
            .descending(true)
            .limit(1)
            .build();
        let results = store.query(descending).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key.sort, "PATIENT#b");
    }

    #[tokio::test]
    async fn test_query_secondary_between() {
        let store = MemoryStore::new();
        for (id, ts) in [("b1", "2024-01-01"), ("b2", "2024-01-05"), ("b3", "2024-01-10")] {
            let stored = item("SURVEY#s1", &format!("ANSWERS#{id}"), id).with_index_keys(
                IndexKeys {
                    gsi1: Some(ItemKey::new("PATIENT#p", format!("{ts}T00:00:00.000Z"))),
                    ..IndexKeys::default()
                },
            );
            store.put(stored).await.unwrap();
        }

        let query = Query::builder()
            .partition("PATIENT#p")
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .sort(SortCondition::Between(
                "2024-01-02T00:00:00.000Z".to_string(),
                "2024-01-08T00:00:00.000Z".to_string(),
            ))
            .build();
        let results = store.query(query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].payload, b"b2".to_vec());
    }

    #[tokio::test]
    async fn test_index_entries_follow_rewrites() {
        let store = MemoryStore::new();
        let with_gsi = |partition: &str| {
            item("SURVEY#s1", "ANSWERS#b1", "batch").with_index_keys(IndexKeys {
                gsi3: Some(ItemKey::new(partition, "2024-01-01T00:00:00.000Z")),
                ..IndexKeys::default()
            })
        };
        store.put(with_gsi("VALIDATED#s1")).await.unwrap();
        // Rewrite under a different index partition: the record moves.
        store.put(with_gsi("CUSTOM#s1")).await.unwrap();

        let old = Query::builder()
            .partition("VALIDATED#s1")
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi3))
            .build();
        assert!(store.query(old).await.unwrap().is_empty());

        let new = Query::builder()
            .partition("CUSTOM#s1")
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi3))
            .build();
        assert_eq!(store.query(new).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_conditional_put() {
        let store = MemoryStore::new();
        let lock = item("LOCK#jobs", "LOCK", "").with_attribute("holder_id", "a");

        store.put_conditional(lock.clone(), Condition::NotExists).await.unwrap();
        let err = store.put_conditional(lock, Condition::NotExists).await.unwrap_err();
        assert!(err.is_condition_failed());
    }

    #[tokio::test]
    async fn test_conditional_delete() {
        let store = MemoryStore::new();
        let key = ItemKey::new("LOCK#jobs", "LOCK");
        store.put(item("LOCK#jobs", "LOCK", "").with_attribute("holder_id", "a")).await.unwrap();

        let wrong_holder = Condition::AttributeEquals {
            name: "holder_id".to_string(),
            value: "b".to_string(),
        };
        assert!(store.delete_conditional(&key, wrong_holder).await.is_err());
        assert!(store.get(&key).await.unwrap().is_some());

        let right_holder = Condition::AttributeEquals {
            name: "holder_id".to_string(),
            value: "a".to_string(),
        };
        store.delete_conditional(&key, right_holder).await.unwrap();
        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_write_limit() {
        let store = MemoryStore::new();
        let requests: Vec<WriteRequest> = (0..MAX_BATCH_WRITE_REQUESTS + 1)
            .map(|i| WriteRequest::Put(item("PROJECT#p1", &format!("PATIENT#{i:03}"), "x")))
            .collect();

        let err = store.batch_write(requests.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::BatchTooLarge { given: 26, limit: 25 }));

        let (within, _) = requests.split_at(MAX_BATCH_WRITE_REQUESTS);
        store.batch_write(within.to_vec()).await.unwrap();
        assert_eq!(store.len().await, MAX_BATCH_WRITE_REQUESTS);
    }

    #[tokio::test]
    async fn test_batch_write_mixed_requests() {
        let store = MemoryStore::new();
        store.put(item("PROJECT#p1", "PATIENT#a", "alice")).await.unwrap();

        store
            .batch_write(vec![
                WriteRequest::Delete(ItemKey::new("PROJECT#p1", "PATIENT#a")),
                WriteRequest::Put(item("PROJECT#p1", "PATIENT#b", "bob")),
            ])
            .await
            .unwrap();

        assert!(store.get(&ItemKey::new("PROJECT#p1", "PATIENT#a")).await.unwrap().is_none());
        assert!(store.get(&ItemKey::new("PROJECT#p1", "PATIENT#b")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_metrics_recorded() {
        let store = MemoryStore::new();
        store.put(item("PROJECT#p1", "PATIENT#a", "alice")).await.unwrap();
        store.get(&ItemKey::new("PROJECT#p1", "PATIENT#a")).await.unwrap();

        let snapshot = store.metrics_snapshot();
        assert_eq!(snapshot.write_count, 1);
        assert_eq!(snapshot.read_count, 1);
    }
}
