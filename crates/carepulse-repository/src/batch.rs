//! Batch mutation coordinator.
//!
//! Groups independent write units — each a same-type run of puts or deletes,
//! possibly targeting different entity types across units — and submits them
//! to the store as physical batch calls, splitting any unit that exceeds the
//! store's per-call limit.
//!
//! # Atomicity
//!
//! Each physical call is all-or-nothing only for its own requests. There is
//! no cross-call or cross-unit atomicity: when a later call fails, earlier
//! calls have already committed. The resulting
//! [`PartialBatch`](crate::RepositoryError::PartialBatch) error carries the
//! committed count so callers can reconcile; cascade deletes are idempotent,
//! so re-submitting the remaining units is the standard recovery.

use carepulse_store::{KeyValueStore, WriteRequest, MAX_BATCH_WRITE_REQUESTS};

use crate::error::{RepositoryError, RepositoryResult};

/// One same-type group of puts or deletes, submitted together.
#[derive(Debug, Clone, Default)]
pub struct WriteUnit {
    requests: Vec<WriteRequest>,
}

impl WriteUnit {
    pub fn new(requests: Vec<WriteRequest>) -> Self {
        Self { requests }
    }

    pub fn requests(&self) -> &[WriteRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Submits write units to the store in order, chunking below the per-call
/// limit.
pub struct BatchCoordinator<S> {
    store: S,
}

impl<S: KeyValueStore> BatchCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Submit units sequentially, splitting each into physical calls of at
    /// most [`MAX_BATCH_WRITE_REQUESTS`] requests. Returns the number of
    /// requests committed (the total, unless an error is returned).
    ///
    /// # Errors
    ///
    /// On a store failure the returned [`PartialBatch`] error reports how
    /// many requests earlier calls had already committed. Nothing is rolled
    /// back.
    ///
    /// [`PartialBatch`]: crate::RepositoryError::PartialBatch
    pub async fn submit(&self, units: Vec<WriteUnit>) -> RepositoryResult<usize> {
        let total: usize = units.iter().map(WriteUnit::len).sum();
        let mut committed = 0usize;

        for unit in &units {
            for chunk in unit.requests().chunks(MAX_BATCH_WRITE_REQUESTS) {
                self.store.batch_write(chunk.to_vec()).await.map_err(|source| {
                    RepositoryError::PartialBatch { committed, total, source }
                })?;
                committed += chunk.len();
            }
        }

        Ok(committed)
    }
}
