//! # Carepulse Store - Key-Value Store Contract
//!
//! The backing-store contract assumed by the Carepulse persistence layer,
//! plus the backends that implement it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              carepulse-repository                │
//! │   (key composition, repositories, batch, lock)   │
//! ├──────────────────────────────────────────────────┤
//! │               KeyValueStore trait                │
//! │  (get, put, delete, query, conditional writes,   │
//! │   bounded batch_write, scan)                     │
//! ├────────────────────────┬─────────────────────────┤
//! │      MemoryStore       │       DynamoStore       │
//! │ (tests, development)   │  (`dynamodb` feature)   │
//! └────────────────────────┴─────────────────────────┘
//! ```
//!
//! ## Contract
//!
//! - Point read/write/delete by `(partition key, sort key)`.
//! - Partition queries with optional sort-key conditions (`begins_with`,
//!   `between`, `at_most`), against the primary key or one of three named
//!   secondary indexes, optionally descending.
//! - Conditional put/delete referencing item existence or attribute values.
//! - Batch writes bounded at [`MAX_BATCH_WRITE_REQUESTS`] per call. A batch
//!   call is all-or-nothing only within itself.
//! - Secondary index entries are derived from the primary item on every
//!   write; deleting the primary item removes them.
//!
//! This layer adds no retries, timeouts, or caching of its own.

#![deny(unsafe_code)]

use std::sync::Arc;

use async_trait::async_trait;

pub mod condition;
pub mod error;
pub mod factory;
pub mod item;
pub mod memory;
pub mod metrics;
pub mod query;
pub mod write;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use condition::Condition;
pub use error::{StoreError, StoreResult};
pub use factory::{BackendType, StoreConfig, StoreFactory};
pub use item::{IndexKeys, Item, ItemKey, SecondaryIndex};
pub use memory::MemoryStore;
pub use metrics::{MetricsSnapshot, OpTimer, StoreMetrics};
pub use query::{Query, QueryIndex, SortCondition};
pub use write::{WriteRequest, MAX_BATCH_WRITE_REQUESTS};

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoStore;

/// The abstract key-value store interface.
///
/// All operations are async and I/O-bound. Absence is not an error: `get`
/// returns `Ok(None)` and `delete` of a missing key succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Point lookup by primary key.
    async fn get(&self, key: &ItemKey) -> StoreResult<Option<Item>>;

    /// Unconditional full-item write (insert or overwrite).
    async fn put(&self, item: Item) -> StoreResult<()>;

    /// Full-item write guarded by a condition on the current item state.
    async fn put_conditional(&self, item: Item, condition: Condition) -> StoreResult<()>;

    /// Key-only delete. Succeeds when the key is absent.
    async fn delete(&self, key: &ItemKey) -> StoreResult<()>;

    /// Delete guarded by a condition on the current item state.
    async fn delete_conditional(&self, key: &ItemKey, condition: Condition) -> StoreResult<()>;

    /// Partition query against the primary key or a secondary index.
    async fn query(&self, query: Query) -> StoreResult<Vec<Item>>;

    /// Apply up to [`MAX_BATCH_WRITE_REQUESTS`] puts/deletes in one call.
    ///
    /// Atomic only within this single call; no ordering is guaranteed
    /// between the requests of one call.
    async fn batch_write(&self, requests: Vec<WriteRequest>) -> StoreResult<()>;

    /// Full-table scan. Expensive; used only for contains-style filters that
    /// no index covers.
    async fn scan(&self) -> StoreResult<Vec<Item>>;
}

#[async_trait]
impl<'a, T> KeyValueStore for &'a T
where
    T: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &ItemKey) -> StoreResult<Option<Item>> {
        (**self).get(key).await
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        (**self).put(item).await
    }

    async fn put_conditional(&self, item: Item, condition: Condition) -> StoreResult<()> {
        (**self).put_conditional(item, condition).await
    }

    async fn delete(&self, key: &ItemKey) -> StoreResult<()> {
        (**self).delete(key).await
    }

    async fn delete_conditional(&self, key: &ItemKey, condition: Condition) -> StoreResult<()> {
        (**self).delete_conditional(key, condition).await
    }

    async fn query(&self, query: Query) -> StoreResult<Vec<Item>> {
        (**self).query(query).await
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> StoreResult<()> {
        (**self).batch_write(requests).await
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        (**self).scan().await
    }
}

#[async_trait]
impl<T> KeyValueStore for Arc<T>
where
    T: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &ItemKey) -> StoreResult<Option<Item>> {
        (**self).get(key).await
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        (**self).put(item).await
    }

    async fn put_conditional(&self, item: Item, condition: Condition) -> StoreResult<()> {
        (**self).put_conditional(item, condition).await
    }

    async fn delete(&self, key: &ItemKey) -> StoreResult<()> {
        (**self).delete(key).await
    }

    async fn delete_conditional(&self, key: &ItemKey, condition: Condition) -> StoreResult<()> {
        (**self).delete_conditional(key, condition).await
    }

    async fn query(&self, query: Query) -> StoreResult<Vec<Item>> {
        (**self).query(query).await
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> StoreResult<()> {
        (**self).batch_write(requests).await
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        (**self).scan().await
    }
}
