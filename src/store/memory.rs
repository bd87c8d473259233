//! In-memory collection store for development and tests.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use super::{
    CollectionStore, Direction, Document, StoreError, CREATED_AT_FIELD, UPDATED_AT_FIELD,
};

/// HashMap-backed collection store. Clone-friendly via `Arc`; clones share
/// storage, so a cloned handle observes the same collections.
///
/// Timestamps are stamped in milliseconds and forced strictly monotonic per
/// store instance, so `updatedAt` strictly increases across writes.
#[derive(Clone)]
pub struct MemoryCollectionStore {
    inner: Arc<Inner>,
}

struct Inner {
    collections: RwLock<HashMap<String, HashMap<String, Map<String, Value>>>>,
    notifiers: RwLock<HashMap<String, broadcast::Sender<()>>>,
    next_id: AtomicU64,
    last_stamp: AtomicI64,
    unavailable: AtomicBool,
}

impl Default for MemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollectionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                notifiers: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                last_stamp: AtomicI64::new(0),
                unavailable: AtomicBool::new(false),
            }),
        }
    }

    /// Make every subsequent operation fail with `StoreError::Backend`.
    /// Lets callers exercise their failure paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.inner.unavailable.load(Ordering::Relaxed) {
            Err(StoreError::Backend("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    /// Millisecond timestamp, strictly greater than any stamp handed out
    /// before by this store instance.
    fn stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.inner.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.inner.last_stamp.compare_exchange(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    fn assign_id(&self) -> String {
        let n = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        format!("rec-{:06}", n)
    }

    fn notify(&self, collection: &str) {
        let notifiers = read_lock(&self.inner.notifiers);
        if let Some(tx) = notifiers.get(collection) {
            // Nobody listening is fine.
            let _ = tx.send(());
        }
    }

    fn snapshot(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Vec<Document> {
        let collections = read_lock(&self.inner.collections);
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: Value::Object(fields.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // Ties on the ordered field fall back to the id, so consecutive
        // snapshots of the same data never swap equal-keyed records.
        docs.sort_by(|a, b| {
            let fa = a.fields.get(order_by);
            let fb = b.fields.get(order_by);
            let ord = match (fa, fb) {
                (Some(x), Some(y)) => {
                    let ord = compare_values(x, y);
                    match direction {
                        Direction::Ascending => ord,
                        Direction::Descending => ord.reverse(),
                    }
                }
                (Some(_), None) => CmpOrdering::Less,
                (None, Some(_)) => CmpOrdering::Greater,
                (None, None) => CmpOrdering::Equal,
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });
        docs
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn compare_values(a: &Value, b: &Value) -> CmpOrdering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Mixed types: stable but arbitrary.
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn as_object(fields: Value) -> Result<Map<String, Value>, StoreError> {
    match fields {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serde(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn add_record(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        self.check_available()?;
        let mut fields = as_object(fields)?;
        fields.insert(CREATED_AT_FIELD.to_string(), Value::from(self.stamp()));

        let id = self.assign_id();
        {
            let mut collections = write_lock(&self.inner.collections);
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), fields);
        }
        debug!(collection, id = %id, "record added");
        self.notify(collection);
        Ok(id)
    }

    async fn get_all(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        Ok(self.snapshot(collection, order_by, direction))
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let partial = as_object(partial)?;
        {
            let mut collections = write_lock(&self.inner.collections);
            let record = collections
                .get_mut(collection)
                .and_then(|records| records.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;

            for (key, value) in partial {
                record.insert(key, value);
            }
            record.insert(UPDATED_AT_FIELD.to_string(), Value::from(self.stamp()));
        }
        debug!(collection, id, "record updated");
        self.notify(collection);
        Ok(())
    }

    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        {
            let mut collections = write_lock(&self.inner.collections);
            let removed = collections
                .get_mut(collection)
                .and_then(|records| records.remove(id));
            if removed.is_none() {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
        }
        debug!(collection, id, "record deleted");
        self.notify(collection);
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<mpsc::Receiver<Vec<Document>>, StoreError> {
        self.check_available()?;

        let mut notify = {
            let mut notifiers = write_lock(&self.inner.notifiers);
            notifiers
                .entry(collection.to_string())
                .or_insert_with(|| broadcast::channel(16).0)
                .subscribe()
        };

        let (tx, rx) = mpsc::channel(8);
        let store = self.clone();
        let collection = collection.to_string();
        let order_by = order_by.to_string();

        tokio::spawn(async move {
            let initial = store.snapshot(&collection, &order_by, direction);
            if tx.send(initial).await.is_err() {
                return;
            }
            loop {
                match notify.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        let snap = store.snapshot(&collection, &order_by, direction);
                        if tx.send(snap).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(rx)
    }
}
