use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use order_core::db::{MemoryStoreFactory, PersistenceMirror, StoreRegistry};
use order_core::form::{OrderForm, SystemClock};
use order_core::models::{KitCatalog, SubmissionPayload};
use order_core::sink::{Delivery, OrderSink, SinkError};
use order_db_sqlite::SqliteStoreFactory;
use order_sink_http::HttpOrderSink;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::csv_loader;

/// Registry with every storage backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

/// The configured CSV catalog, or the built-in kits.
pub fn load_catalog(config: &AppConfig) -> anyhow::Result<KitCatalog> {
    match &config.catalog.path {
        Some(path) => {
            let catalog = csv_loader::load_from_file(path)
                .with_context(|| format!("loading kit catalog from {}", path.display()))?;
            info!(kits = catalog.kits().len(), path = %path.display(), "loaded kit catalog");
            Ok(catalog)
        }
        None => Ok(KitCatalog::default()),
    }
}

/// Stand-in used when no sink URL is configured. The form still works
/// offline; only submission fails.
struct UnconfiguredSink;

#[async_trait]
impl OrderSink for UnconfiguredSink {
    async fn send(
        &self,
        _payload: &SubmissionPayload,
    ) -> Result<Delivery, SinkError> {
        Err(SinkError::NotConfigured(
            "set [sink] url in the config file or pass --sink-url".to_string(),
        ))
    }
}

pub fn build_sink(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderSink>> {
    match config.sink_config() {
        Some(sink_config) => {
            let sink = HttpOrderSink::new(&sink_config)?;
            debug!(url = %sink.url(), verify_status = sink_config.verify_status, "order sink ready");
            Ok(Arc::new(sink))
        }
        None => {
            warn!("no order sink configured; submissions will fail");
            Ok(Arc::new(UnconfiguredSink))
        }
    }
}

/// Opens the configured store and returns a form with any saved draft
/// restored.
pub async fn open_form(
    config: &AppConfig,
    catalog: Arc<KitCatalog>,
) -> anyhow::Result<OrderForm> {
    let store_config = config.store_config();
    debug!("opening {} store", store_config.backend);
    let store = build_registry()
        .create(&store_config)
        .await
        .with_context(|| format!("opening '{}' store", store_config.backend))?;

    let mirror = PersistenceMirror::new(Arc::from(store), config.store.key.clone(), catalog.clone());
    let mut form = OrderForm::new(
        catalog,
        Arc::new(mirror),
        Arc::new(SystemClock),
        config.currency_format(),
    );
    form.restore().await;
    Ok(form)
}
