use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use order_core::db::{KeyValueStore, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

/// [`KeyValueStore`] backed by a single `kv_store` table.
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open the database named by `connection_string`.
    ///
    /// * `":memory:"` opens a private in-memory database on one connection.
    /// * A `sqlite:` URL is handed to sqlx as-is.
    /// * Anything else is a file path; the file is created if missing.
    pub async fn new(connection_string: &str) -> Result<Self, StoreError> {
        let pool = if connection_string == ":memory:" {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
        } else {
            let options = if connection_string.starts_with("sqlite:") {
                SqliteConnectOptions::from_str(connection_string)
                    .map_err(|e| StoreError::Configuration(e.to_string()))?
            } else {
                SqliteConnectOptions::new().filename(connection_string)
            };
            SqlitePoolOptions::new()
                .connect_with(options.create_if_missing(true))
                .await
        }
        .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!(connection_string, "opened sqlite store");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn setup_test_db() -> SqliteKeyValueStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let store = SqliteKeyValueStore::new_with_pool(pool).await;
        store.run_migrations().await.expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = setup_test_db().await;

        assert_eq!(store.get("solarOrderFormData").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = setup_test_db().await;

        store.set("solarOrderFormData", r#"{"companyName":"Surya"}"#).await.unwrap();

        assert_eq!(
            store.get("solarOrderFormData").await.unwrap().as_deref(),
            Some(r#"{"companyName":"Surya"}"#)
        );
    }

    #[tokio::test]
    async fn test_set_replaces_whole_value() {
        let store = setup_test_db().await;

        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = setup_test_db().await;
        store.set("k", "v").await.unwrap();

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "order-db-sqlite-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path_str = path.to_str().unwrap().to_string();

        {
            let store = SqliteKeyValueStore::new(&path_str).await.unwrap();
            store.run_migrations().await.unwrap();
            store.set("k", "kept").await.unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteKeyValueStore::new(&path_str).await.unwrap();
        reopened.run_migrations().await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("kept"));

        reopened.pool().close().await;
        let _ = std::fs::remove_file(&path);
    }
}
