use async_trait::async_trait;

use order_core::db::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::store::SqliteKeyValueStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`order_core::db::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use order_core::db::StoreRegistry;
/// use order_db_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"order-form.db"`. Created if missing.
    /// * A sqlx URL such as `"sqlite:order-form.db?mode=rwc"`.
    /// * `":memory:"`, an ephemeral database (useful for tests).
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteKeyValueStore::new(&config.connection_string).await?;
        store.run_migrations().await?;
        Ok(Box::new(store))
    }
}
