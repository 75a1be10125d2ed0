//! Store factory for creating backend instances.
//!
//! Provides a way to instantiate storage backends from configuration without
//! exposing implementation details to consumers. The memory backend is always
//! available; DynamoDB requires the `dynamodb` cargo feature.

use std::str::FromStr;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;
use crate::KeyValueStore;

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// In-memory storage (for testing and development).
    Memory,
    /// DynamoDB storage (for production).
    #[cfg(feature = "dynamodb")]
    DynamoDb,
}

impl FromStr for BackendType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(BackendType::Memory),
            #[cfg(feature = "dynamodb")]
            "dynamodb" | "dynamo" => Ok(BackendType::DynamoDb),
            _ => Err(StoreError::internal(format!("unknown backend type: {}", s))),
        }
    }
}

impl BackendType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Memory => "memory",
            #[cfg(feature = "dynamodb")]
            BackendType::DynamoDb => "dynamodb",
        }
    }
}

/// Configuration for a storage backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend type to use.
    pub backend: BackendType,
    /// Table name (required for database backends).
    pub table_name: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: BackendType::Memory, table_name: None }
    }
}

impl StoreConfig {
    /// Config for the memory backend.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Config for the DynamoDB backend against the given table.
    #[cfg(feature = "dynamodb")]
    pub fn dynamodb(table_name: impl Into<String>) -> Self {
        Self { backend: BackendType::DynamoDb, table_name: Some(table_name.into()) }
    }
}

/// Factory for creating storage backend instances.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete for the selected
    /// backend (e.g. DynamoDB without a table name).
    pub async fn create(config: StoreConfig) -> StoreResult<Arc<dyn KeyValueStore>> {
        match config.backend {
            BackendType::Memory => Ok(Arc::new(MemoryStore::new())),
            #[cfg(feature = "dynamodb")]
            BackendType::DynamoDb => {
                let table = config.table_name.ok_or_else(|| {
                    StoreError::internal("dynamodb backend requires a table name")
                })?;
                let store = crate::dynamodb::DynamoStore::from_env(table).await;
                Ok(Arc::new(store))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_from_str() {
        assert_eq!("memory".parse::<BackendType>().unwrap(), BackendType::Memory);
        assert_eq!("MEMORY".parse::<BackendType>().unwrap(), BackendType::Memory);
        assert!("paper".parse::<BackendType>().is_err());
    }

    #[test]
    fn test_default_config_is_memory() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, BackendType::Memory);
        assert!(config.table_name.is_none());
    }

    #[tokio::test]
    async fn test_factory_creates_memory_store() {
        let store = StoreFactory::create(StoreConfig::memory()).await.unwrap();
        assert!(store
            .get(&crate::ItemKey::new("PROJECT#p1", "PATIENT#a"))
            .await
            .unwrap()
            .is_none());
    }
}
