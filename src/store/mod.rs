//! The remote collection store contract.
//!
//! The hosted document database is consumed only through the
//! [`CollectionStore`] trait: named collections of JSON documents with
//! store-assigned ids, server-side partial merges, ordered full-snapshot
//! queries, and (for collections that want it) a live snapshot stream.
//!
//! [`MemoryCollectionStore`] is the backend used by development and tests;
//! [`ConfigGatedStore`] wraps a backend so that missing connection parameters
//! surface as a [`StoreError`] on first operation instead of a crash.

mod gated;
mod memory;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

pub use gated::ConfigGatedStore;
pub use memory::MemoryCollectionStore;

/// Field name stamped by the store when a record is created.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Field name stamped by the store when a record is updated.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Sort direction for ordered queries and subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One record as the store returns it. `fields` is a JSON object that
/// includes the store-stamped `createdAt`/`updatedAt` millisecond timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with this id in the collection.
    NotFound { collection: String, id: String },
    /// The backend rejected the operation or was unreachable.
    Backend(String),
    /// The payload was not a JSON object or failed to round-trip.
    Serde(String),
    /// The store client was built from an incomplete configuration.
    Misconfigured(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { collection, id } => {
                write!(f, "no record {}:{}", collection, id)
            }
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
            StoreError::Serde(msg) => write!(f, "store payload error: {}", msg),
            StoreError::Misconfigured(msg) => write!(f, "store not configured: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Abstract CRUD + subscription access to named collections of documents.
///
/// Every operation is asynchronous and terminal: the store never retries on
/// behalf of the caller.
#[async_trait]
pub trait CollectionStore: Send + Sync + 'static {
    /// Add a record. The store assigns the id and stamps `createdAt`.
    /// `fields` must be a JSON object.
    async fn add_record(&self, collection: &str, fields: Value) -> Result<String, StoreError>;

    /// Full snapshot of a collection, ordered by the named field.
    /// Records missing the field sort last regardless of direction.
    async fn get_all(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<Vec<Document>, StoreError>;

    /// Merge the partial object's keys into an existing record and stamp
    /// `updatedAt`. Fails with `NotFound` if the id is absent.
    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), StoreError>;

    /// Remove a record. Fails with `NotFound` if the id is absent, so a
    /// second delete of the same id is an error the caller can observe.
    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Live snapshot stream for a collection: the current full ordered
    /// snapshot is delivered immediately, then a fresh full snapshot after
    /// every mutation of the collection. Dropping the receiver unsubscribes.
    async fn subscribe(
        &self,
        collection: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<mpsc::Receiver<Vec<Document>>, StoreError>;
}
