//! Remote-backed collections — the generic controller pattern.
//!
//! A [`CollectionController`] mediates between the view layer and the remote
//! store for one collection: it owns an in-memory full-snapshot cache,
//! exposes CRUD operations that round-trip through the store and then
//! refresh the cache wholesale, and tracks a loading/error status. The same
//! pattern backs Events, Gallery, Winners and Messages; the per-collection
//! details live on the [`Record`] implementation.

mod controller;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;
use crate::store::Direction;

pub use controller::CollectionController;

/// Trait for types stored as one collection of records.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name in the remote store (e.g. "events").
    const COLLECTION: &'static str;
    /// Field the store query orders by.
    const ORDER_BY: &'static str;
    /// Sort direction for the store query.
    const ORDER: Direction;

    /// Partial-update shape: every field optional, absent fields untouched.
    type Patch: Serialize + Send + Sync;

    /// Required-field check, run before any store call.
    fn validate(&self) -> Result<(), Error>;

    /// Pre-persist cleanup (trimming, dropping incomplete entries). Runs
    /// before `validate`.
    fn normalize(&mut self) {}

    /// Same cleanup for partial updates. A patch that would persist an
    /// invalid record fails here, before any store call.
    fn normalize_patch(_patch: &mut Self::Patch) -> Result<(), Error> {
        Ok(())
    }
}

/// One cached record: store-assigned identity and timestamps around the
/// domain fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<R> {
    pub id: String,
    /// Milliseconds, stamped by the store at creation.
    pub created_at: i64,
    /// Milliseconds, stamped by the store on every update.
    pub updated_at: Option<i64>,
    pub data: R,
}

/// Controller lifecycle: `Uninitialized -> Loading -> {Ready, Errored}`,
/// back to `Loading` on any mutating call or explicit refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Uninitialized,
    Loading,
    Ready,
    Errored,
}

/// Check that every named field is non-empty after trimming; the error
/// message lists all missing fields at once.
pub(crate) fn require_fields(fields: &[(&str, &str)]) -> Result<(), Error> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}
