//! Repository error types.
//!
//! This module provides [`RepositoryError`], which wraps store-level errors
//! and adds the domain-specific failure modes of the repository layer.
//! Absence on the read path is not an error (reads return `Option`);
//! `NotFound` is raised only where an operation requires an existing entity,
//! such as `update_value`.

use carepulse_store::StoreError;

/// Result type alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// An operation required an entity that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Validation of input data failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization or deserialization of an entity payload failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A multi-unit batch failed partway. Requests counted as committed have
    /// already been applied by the store and are not rolled back; the caller
    /// must retry or reconcile the remainder.
    #[error("batch aborted after {committed} of {total} write requests committed")]
    PartialBatch {
        committed: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    /// A store failure, propagated unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// Shorthand for a serialization error from a serde failure.
    pub(crate) fn serialization(err: impl std::fmt::Display) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
