//! Failure-injecting store wrapper.
//!
//! Delegates everything to an inner store but fails `batch_write` once a
//! configured number of successful batch calls has been spent. Used to
//! exercise the partial-batch failure window of multi-unit cascades.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use carepulse_store::{
    Condition, Item, ItemKey, KeyValueStore, Query, StoreError, StoreResult, WriteRequest,
};

/// Store wrapper whose `batch_write` starts failing after a budget of
/// successful calls is exhausted. All other operations pass through.
#[derive(Clone)]
pub struct FlakyBatchStore<S> {
    inner: S,
    remaining: Arc<AtomicI64>,
}

impl<S> FlakyBatchStore<S> {
    /// Allow `successful_calls` batch writes, then fail each subsequent one
    /// until [`heal`](Self::heal) is called.
    pub fn new(inner: S, successful_calls: i64) -> Self {
        Self { inner, remaining: Arc::new(AtomicI64::new(successful_calls)) }
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        self.remaining.store(i64::MAX, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for FlakyBatchStore<S> {
    async fn get(&self, key: &ItemKey) -> StoreResult<Option<Item>> {
        self.inner.get(key).await
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        self.inner.put(item).await
    }

    async fn put_conditional(&self, item: Item, condition: Condition) -> StoreResult<()> {
        self.inner.put_conditional(item, condition).await
    }

    async fn delete(&self, key: &ItemKey) -> StoreResult<()> {
        self.inner.delete(key).await
    }

    async fn delete_conditional(&self, key: &ItemKey, condition: Condition) -> StoreResult<()> {
        self.inner.delete_conditional(key, condition).await
    }

    async fn query(&self, query: Query) -> StoreResult<Vec<Item>> {
        self.inner.query(query).await
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> StoreResult<()> {
        if self.remaining.fetch_sub(1, Ordering::SeqCst) <= 0 {
            return Err(StoreError::unavailable("injected batch failure"));
        }
        self.inner.batch_write(requests).await
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        self.inner.scan().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepulse_store::MemoryStore;

    fn put(i: usize) -> WriteRequest {
        WriteRequest::Put(Item::new(ItemKey::new("PROJECT#p1", format!("TAG#{i}")), Vec::new()))
    }

    #[tokio::test]
    async fn test_fails_after_budget_then_heals() {
        let store = FlakyBatchStore::new(MemoryStore::new(), 1);

        store.batch_write(vec![put(0)]).await.unwrap();
        assert!(store.batch_write(vec![put(1)]).await.is_err());
        assert!(store.batch_write(vec![put(2)]).await.is_err());

        store.heal();
        store.batch_write(vec![put(3)]).await.unwrap();
    }
}
