use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::factory::{StoreConfig, StoreFactory};
use super::repository::{KeyValueStore, StoreError};

/// Process-local [`KeyValueStore`]. Nothing survives a restart; used for
/// tests and for running the form without a database file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Backend(format!("memory store poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// [`StoreFactory`] for the `"memory"` backend.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}
