//! Distributed lease lock.
//!
//! A lock is a regular store item acquired with a conditional write: the put
//! succeeds only if no lock row exists or the existing row's lease has
//! expired. The expiry caps the blast radius of a holder crashing while the
//! lock is held — after the lease passes, the next acquire steals the row.
//!
//! Used to serialize scheduled-job generation across instances. The lease
//! duration must exceed the expected duration of the protected operation,
//! and holders must release in a guaranteed-cleanup path even on error.
//! A rejected acquire means another holder owns the lock; callers abort
//! rather than spinning.

use std::time::Duration;

use carepulse_store::{Condition, Item, KeyValueStore};
use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{RepositoryError, RepositoryResult};
use crate::keys;

/// Attribute naming the current holder, checked on release.
pub const ATTR_HOLDER_ID: &str = "holder_id";

/// Attribute carrying the lease expiry as an encoded timestamp.
pub const ATTR_EXPIRES_AT: &str = "expires_at";

/// Conditional-write based mutual exclusion over lock rows in the store.
pub struct LeaseLock<S> {
    store: S,
}

impl<S: KeyValueStore> LeaseLock<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Try to acquire `lock_id` for `holder_id` for the given lease
    /// duration.
    ///
    /// Returns `Ok(true)` on acquisition, `Ok(false)` when the lock is held
    /// by another holder whose lease has not expired. Store failures other
    /// than the condition rejection propagate.
    pub async fn acquire(
        &self,
        lock_id: &str,
        holder_id: &str,
        duration: Duration,
    ) -> RepositoryResult<bool> {
        let now = Utc::now();
        let lease = chrono::Duration::from_std(duration)
            .map_err(|e| RepositoryError::Validation(format!("lease duration: {}", e)))?;
        let expires_at = now + lease;

        let item = Item::new(keys::lock::primary(lock_id), Vec::new())
            .with_attribute(ATTR_HOLDER_ID, holder_id)
            .with_attribute(ATTR_EXPIRES_AT, keys::timestamp(expires_at));
        let condition = Condition::NotExistsOrLessThan {
            name: ATTR_EXPIRES_AT.to_string(),
            value: keys::timestamp(now),
        };

        match self.store.put_conditional(item, condition).await {
            Ok(()) => {
                debug!(lock_id, holder_id, "lease acquired");
                Ok(true)
            },
            Err(err) if err.is_condition_failed() => {
                debug!(lock_id, holder_id, "lease held by another holder");
                Ok(false)
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Release `lock_id`, but only if `holder_id` still holds it.
    ///
    /// Releasing a lock that expired and was re-acquired by someone else is
    /// a no-op: the conditional delete is rejected and the current holder's
    /// lease is left intact.
    pub async fn release(&self, lock_id: &str, holder_id: &str) -> RepositoryResult<()> {
        let condition = Condition::AttributeEquals {
            name: ATTR_HOLDER_ID.to_string(),
            value: holder_id.to_string(),
        };

        match self.store.delete_conditional(&keys::lock::primary(lock_id), condition).await {
            Ok(()) => {
                debug!(lock_id, holder_id, "lease released");
                Ok(())
            },
            Err(err) if err.is_condition_failed() => {
                warn!(lock_id, holder_id, "release skipped: lease no longer held by caller");
                Ok(())
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Whether `lock_id` is currently held (a row exists with an unexpired
    /// lease).
    pub async fn is_locked(&self, lock_id: &str) -> RepositoryResult<bool> {
        match self.store.get(&keys::lock::primary(lock_id)).await? {
            Some(item) => {
                let now = keys::timestamp(Utc::now());
                Ok(item.attribute(ATTR_EXPIRES_AT).map_or(false, |expires| expires > now.as_str()))
            },
            None => Ok(false),
        }
    }
}
