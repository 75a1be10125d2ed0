//! Batch write requests.

use crate::item::{Item, ItemKey};

/// Maximum number of requests a backend accepts in one `batch_write` call.
///
/// Larger batches must be chunked by the caller; the repository layer's batch
/// coordinator does this.
pub const MAX_BATCH_WRITE_REQUESTS: usize = 25;

/// One element of a batch write: a full-item put or a key-only delete.
#[derive(Debug, Clone)]
pub enum WriteRequest {
    Put(Item),
    Delete(ItemKey),
}

impl WriteRequest {
    /// The primary key this request targets.
    pub fn key(&self) -> &ItemKey {
        match self {
            WriteRequest::Put(item) => &item.key,
            WriteRequest::Delete(key) => key,
        }
    }
}
