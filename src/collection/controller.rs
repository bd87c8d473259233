use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Error;
use crate::store::{CollectionStore, Document, StoreError, CREATED_AT_FIELD, UPDATED_AT_FIELD};

use super::{Record, Status, Stored};

/// Mediator between the view layer and the remote store for one collection.
///
/// The cache is always a full, order-consistent snapshot of the collection as
/// of the last successful fetch or subscription push — never a partial or
/// stale-merged view. The view layer treats `list()` output as read-only and
/// routes every change through the controller.
///
/// Clones share state, so a controller can be handed to a spawned task or to
/// several parts of the view tree.
pub struct CollectionController<R: Record, S: CollectionStore> {
    store: Arc<S>,
    shared: Arc<Shared<R>>,
}

struct Shared<R> {
    cache: RwLock<Vec<Stored<R>>>,
    status: RwLock<Status>,
    error: RwLock<Option<String>>,
    loaded: AtomicBool,
    watching: AtomicBool,
}

impl<R: Record, S: CollectionStore> Clone for CollectionController<R, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Record, S: CollectionStore> CollectionController<R, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            shared: Arc::new(Shared {
                cache: RwLock::new(Vec::new()),
                status: RwLock::new(Status::Uninitialized),
                error: RwLock::new(None),
                loaded: AtomicBool::new(false),
                watching: AtomicBool::new(false),
            }),
        }
    }

    /// Current cache, in store order.
    pub fn list(&self) -> Vec<Stored<R>> {
        self.shared.read_cache()
    }

    pub fn status(&self) -> Status {
        self.shared.status()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.status() == Status::Loading
    }

    /// Sticky read-path error message, cleared by the next successful refresh.
    pub fn error(&self) -> Option<String> {
        self.shared.error()
    }

    /// Re-run the store query and replace the cache wholesale. Safe to call
    /// concurrently with itself: whichever call completes last wins the cache.
    pub async fn refresh(&self) -> Result<(), Error> {
        self.shared.set_status(Status::Loading);
        match self
            .store
            .get_all(R::COLLECTION, R::ORDER_BY, R::ORDER)
            .await
            .and_then(decode_documents::<R>)
        {
            Ok(records) => {
                debug!(collection = R::COLLECTION, count = records.len(), "refreshed");
                self.shared.install(records);
                Ok(())
            }
            Err(err) => {
                warn!(collection = R::COLLECTION, error = %err, "refresh failed");
                self.shared.latch_error(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validate and persist a new record; the store assigns the id and the
    /// creation timestamp. Returns the new id.
    pub async fn create(&self, mut record: R) -> Result<String, Error> {
        record.normalize();
        record.validate()?;
        let fields = serde_json::to_value(&record)?;

        self.shared.set_status(Status::Loading);
        let id = match self.store.add_record(R::COLLECTION, fields).await {
            Ok(id) => id,
            Err(err) => {
                warn!(collection = R::COLLECTION, error = %err, "create failed");
                self.shared.settle();
                return Err(err.into());
            }
        };
        debug!(collection = R::COLLECTION, id = %id, "created");
        self.after_mutation().await?;
        Ok(id)
    }

    /// Merge a partial update into an existing record; the store stamps the
    /// update timestamp. Fields absent from the patch are untouched.
    pub async fn update(&self, id: &str, mut patch: R::Patch) -> Result<(), Error> {
        R::normalize_patch(&mut patch)?;
        let fields = serde_json::to_value(&patch)?;

        self.shared.set_status(Status::Loading);
        if let Err(err) = self.store.update_record(R::COLLECTION, id, fields).await {
            warn!(collection = R::COLLECTION, id, error = %err, "update failed");
            self.shared.settle();
            return Err(err.into());
        }
        debug!(collection = R::COLLECTION, id, "updated");
        self.after_mutation().await
    }

    /// Remove a record. A second delete of the same id fails with
    /// [`Error::NotFound`]; callers that want idempotency tolerate that.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.shared.set_status(Status::Loading);
        if let Err(err) = self.store.delete_record(R::COLLECTION, id).await {
            warn!(collection = R::COLLECTION, id, error = %err, "delete failed");
            self.shared.settle();
            return Err(err.into());
        }
        debug!(collection = R::COLLECTION, id, "deleted");
        self.after_mutation().await
    }

    /// Attach the store's live snapshot stream. From then on the push is the
    /// sole cache writer and mutations no longer trigger their own refresh.
    /// The stream task runs until the store drops it or the process ends.
    pub async fn watch(&self) -> Result<(), Error> {
        self.shared.set_status(Status::Loading);
        let mut rx = match self
            .store
            .subscribe(R::COLLECTION, R::ORDER_BY, R::ORDER)
            .await
        {
            Ok(rx) => rx,
            Err(err) => {
                warn!(collection = R::COLLECTION, error = %err, "subscribe failed");
                self.shared.latch_error(err.to_string());
                return Err(err.into());
            }
        };
        self.shared.watching.store(true, Ordering::Relaxed);

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            while let Some(docs) = rx.recv().await {
                match decode_documents::<R>(docs) {
                    Ok(records) => {
                        debug!(collection = R::COLLECTION, count = records.len(), "snapshot");
                        shared.install(records);
                    }
                    Err(err) => {
                        warn!(collection = R::COLLECTION, error = %err, "bad snapshot");
                        shared.latch_error(err.to_string());
                    }
                }
            }
            debug!(collection = R::COLLECTION, "snapshot stream closed");
        });
        Ok(())
    }

    async fn after_mutation(&self) -> Result<(), Error> {
        if self.shared.watching.load(Ordering::Relaxed) {
            // The subscription push owns the cache; status settles now and
            // flips to Ready when the snapshot lands.
            self.shared.settle();
            Ok(())
        } else {
            self.refresh().await
        }
    }
}

impl<R: Record> Shared<R> {
    fn read_cache(&self) -> Vec<Stored<R>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn status(&self) -> Status {
        *self.status.read().unwrap_or_else(|e| e.into_inner())
    }

    fn error(&self) -> Option<String> {
        self.error.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_status(&self, status: Status) {
        *self.status.write().unwrap_or_else(|e| e.into_inner()) = status;
    }

    /// Wholesale cache replace; clears the sticky error.
    fn install(&self, records: Vec<Stored<R>>) {
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = records;
        *self.error.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.loaded.store(true, Ordering::Relaxed);
        self.set_status(Status::Ready);
    }

    /// Read-path failure: keep the cache at its last known-good snapshot,
    /// latch the message for the view.
    fn latch_error(&self, message: String) {
        *self.error.write().unwrap_or_else(|e| e.into_inner()) = Some(message);
        self.set_status(Status::Errored);
    }

    /// Leave `Loading` after a failed mutation: the cache is untouched, so
    /// the controller is back at its previous observable state.
    fn settle(&self) {
        let status = if self.error().is_some() {
            Status::Errored
        } else if self.loaded.load(Ordering::Relaxed) {
            Status::Ready
        } else {
            Status::Uninitialized
        };
        self.set_status(status);
    }
}

fn decode_documents<R: Record>(docs: Vec<Document>) -> Result<Vec<Stored<R>>, StoreError> {
    docs.into_iter().map(decode_document::<R>).collect()
}

fn decode_document<R: Record>(doc: Document) -> Result<Stored<R>, StoreError> {
    let created_at = doc
        .fields
        .get(CREATED_AT_FIELD)
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let updated_at = doc.fields.get(UPDATED_AT_FIELD).and_then(Value::as_i64);
    let data: R = serde_json::from_value(doc.fields)
        .map_err(|e| StoreError::Serde(format!("{}:{}: {}", R::COLLECTION, doc.id, e)))?;
    Ok(Stored {
        id: doc.id,
        created_at,
        updated_at,
        data,
    })
}
