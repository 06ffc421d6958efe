use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Durable local key-value storage.
///
/// Writers always replace the whole value; there are no partial updates.
/// Deleting an absent key succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError>;
}
