//! Store error taxonomy.
//!
//! Absence is not an error at this layer: point reads return `Ok(None)` and
//! deletes of missing keys succeed. The variants below cover the failures a
//! backend can actually raise. None of them are retried here; callers decide.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional put or delete was rejected.
    ///
    /// The only caller of conditional writes is the lease lock, which maps
    /// this to "held by another holder".
    #[error("condition failed for key {key}")]
    ConditionFailed { key: String },

    /// A single batch call exceeded the backend's per-call request limit.
    ///
    /// The batch coordinator chunks below the limit; seeing this error means
    /// a caller bypassed the coordinator.
    #[error("batch of {given} requests exceeds the per-call limit of {limit}")]
    BatchTooLarge { given: usize, limit: usize },

    /// The backend is unreachable or rejected the connection.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// The backend throttled the request.
    #[error("request throttled: {message}")]
    Throttled { message: String },

    /// Any other backend failure.
    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Create a `ConditionFailed` error for the given key.
    pub fn condition_failed(key: impl Into<String>) -> Self {
        StoreError::ConditionFailed { key: key.into() }
    }

    /// Create an `Unavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable { message: message.into() }
    }

    /// Create a `Throttled` error.
    pub fn throttled(message: impl Into<String>) -> Self {
        StoreError::Throttled { message: message.into() }
    }

    /// Create an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal { message: message.into() }
    }

    /// Returns true if this error is a conditional-write rejection.
    pub fn is_condition_failed(&self) -> bool {
        matches!(self, StoreError::ConditionFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::condition_failed("LOCK#sendout");
        assert_eq!(err.to_string(), "condition failed for key LOCK#sendout");
        assert!(err.is_condition_failed());

        let err = StoreError::BatchTooLarge { given: 40, limit: 25 };
        assert_eq!(
            err.to_string(),
            "batch of 40 requests exceeds the per-call limit of 25"
        );
        assert!(!err.is_condition_failed());
    }
}
