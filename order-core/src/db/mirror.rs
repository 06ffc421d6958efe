//! Best-effort mirroring of the in-progress order to local storage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::repository::{KeyValueStore, StoreError};
use crate::models::{KitCatalog, OrderDraft, PersistedSnapshot};

/// Storage key the snapshot lives under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "solarOrderFormData";

/// Load/save/clear of the persisted draft.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// The saved draft, or `None` when nothing usable is stored.
    async fn load(&self) -> Option<OrderDraft>;

    /// Replaces the saved draft.
    async fn save(
        &self,
        draft: &OrderDraft,
    ) -> Result<(), StoreError>;

    /// Removes the saved draft. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// [`DraftStore`] that keeps a JSON [`PersistedSnapshot`] under a single
/// key of a [`KeyValueStore`].
pub struct PersistenceMirror {
    store: Arc<dyn KeyValueStore>,
    key: String,
    catalog: Arc<KitCatalog>,
}

impl PersistenceMirror {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        catalog: Arc<KitCatalog>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            catalog,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl DraftStore for PersistenceMirror {
    async fn load(&self) -> Option<OrderDraft> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no saved order form");
                return None;
            }
            Err(error) => {
                warn!(key = %self.key, %error, "could not read saved order form");
                return None;
            }
        };

        match serde_json::from_str::<PersistedSnapshot>(&raw) {
            Ok(snapshot) => Some(snapshot.into_draft(&self.catalog)),
            Err(error) => {
                warn!(key = %self.key, %error, "ignoring unreadable saved order form");
                None
            }
        }
    }

    async fn save(
        &self,
        draft: &OrderDraft,
    ) -> Result<(), StoreError> {
        let snapshot = PersistedSnapshot::capture(draft, &self.catalog);
        let json = serde_json::to_string(&snapshot)
            .map_err(|e| StoreError::Backend(format!("cannot encode snapshot: {e}")))?;
        self.store.set(&self.key, &json).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::MemoryStore;
    use crate::form::{FieldName, FieldStore};
    use crate::models::KitId;

    fn mirror() -> (PersistenceMirror, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mirror = PersistenceMirror::new(
            store.clone(),
            DEFAULT_SNAPSHOT_KEY,
            Arc::new(KitCatalog::default()),
        );
        (mirror, store)
    }

    #[tokio::test]
    async fn load_returns_none_when_nothing_saved() {
        let (mirror, _) = mirror();

        assert_eq!(mirror.load().await, None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips_mirrored_fields() {
        let (mirror, _) = mirror();
        let mut draft = OrderDraft::default();
        draft.set(&FieldName::CompanyName, "Surya Traders");
        draft.set(&FieldName::OrderDate, "2025-05-30");
        draft.set(&FieldName::Attachment, "proof.pdf");
        draft.set_quantity(&KitId::from("kit5"), 4);

        mirror.save(&draft).await.unwrap();
        let loaded = mirror.load().await.unwrap();

        assert_eq!(loaded.company_name, "Surya Traders");
        assert_eq!(loaded.order_date, "2025-05-30");
        assert_eq!(loaded.attachment.as_deref(), Some("proof.pdf"));
        assert_eq!(loaded.quantity_of(&KitId::from("kit5")), 4);
        assert_eq!(loaded.quantity_of(&KitId::from("kit3")), 0);
    }

    #[tokio::test]
    async fn save_writes_camel_case_json_under_fixed_key() {
        let (mirror, store) = mirror();
        let mut draft = OrderDraft::default();
        draft.set(&FieldName::TaxId, "27AAPFU0939F1ZV");

        mirror.save(&draft).await.unwrap();
        let raw = store.get(DEFAULT_SNAPSHOT_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["gstNumber"], "27AAPFU0939F1ZV");
        assert_eq!(value["kit3"], 0);
    }

    #[tokio::test]
    async fn load_ignores_unparseable_snapshot() {
        let (mirror, store) = mirror();
        store.set(DEFAULT_SNAPSHOT_KEY, "{not json").await.unwrap();

        assert_eq!(mirror.load().await, None);
    }

    #[tokio::test]
    async fn clear_removes_snapshot_and_is_idempotent() {
        let (mirror, store) = mirror();
        mirror.save(&OrderDraft::default()).await.unwrap();

        mirror.clear().await.unwrap();
        mirror.clear().await.unwrap();

        assert_eq!(store.get(DEFAULT_SNAPSHOT_KEY).await.unwrap(), None);
    }
}
