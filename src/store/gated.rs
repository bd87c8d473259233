//! Store wrapper that defers missing-configuration failures to first use.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::StoreConfig;

use super::{CollectionStore, Direction, Document, StoreError};

/// Wraps a store built from a [`StoreConfig`]. When required connection
/// parameters were missing, no inner store is built and every operation
/// surfaces [`StoreError::Misconfigured`] naming the absent keys, so an
/// incomplete deployment degrades to per-operation errors instead of a crash.
pub struct ConfigGatedStore<S> {
    inner: Option<S>,
    missing: String,
}

impl<S: CollectionStore> ConfigGatedStore<S> {
    /// Build the inner store from `config` if it is complete.
    pub fn new(config: &StoreConfig, build: impl FnOnce(&StoreConfig) -> S) -> Self {
        let missing = config.missing_keys();
        if missing.is_empty() {
            Self {
                inner: Some(build(config)),
                missing: String::new(),
            }
        } else {
            warn!(missing = %missing.join(", "), "store configuration incomplete");
            Self {
                inner: None,
                missing: missing.join(", "),
            }
        }
    }

    fn ready(&self) -> Result<&S, StoreError> {
        self.inner.as_ref().ok_or_else(|| {
            StoreError::Misconfigured(format!("missing connection parameters: {}", self.missing))
        })
    }
}

#[async_trait]
impl<S: CollectionStore> CollectionStore for ConfigGatedStore<S> {
    async fn add_record(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        self.ready()?.add_record(collection, fields).await
    }

    async fn get_all(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<Vec<Document>, StoreError> {
        self.ready()?.get_all(collection, order_by, direction).await
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), StoreError> {
        self.ready()?.update_record(collection, id, partial).await
    }

    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.ready()?.delete_record(collection, id).await
    }

    async fn subscribe(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<mpsc::Receiver<Vec<Document>>, StoreError> {
        self.ready()?.subscribe(collection, order_by, direction).await
    }
}
