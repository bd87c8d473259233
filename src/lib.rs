//! clubdesk — content backend for a student innovation club site.
//!
//! Four remote-backed collections (Events, Gallery, Winners, Messages) share
//! one pattern: a [`CollectionController`] that owns a full-snapshot cache,
//! exposes CRUD against an opaque document store, and refreshes the cache
//! wholesale after every mutation (or lets the store's live snapshot stream
//! drive it, as Gallery does). A [`SessionGate`] guards the admin role behind
//! a persisted opaque marker.
//!
//! The hosted document database is consumed only through the
//! [`CollectionStore`] trait; [`MemoryCollectionStore`] backs development and
//! tests. [`AppContext`] wires one controller per collection plus the gate,
//! built once and passed explicitly.

mod collection;
mod config;
mod content;
mod context;
mod error;
mod session;
mod store;

pub use collection::{CollectionController, Record, Status, Stored};
pub use config::StoreConfig;
pub use content::{
    Event, EventPatch, GalleryCategory, GalleryImage, GalleryItem, GalleryItemPatch, Message,
    MessagePatch, Winner, WinnerEntry, WinnerPatch, GALLERY_CATEGORIES,
};
pub use context::AppContext;
pub use error::Error;
pub use session::{FileMarkerStore, MarkerStore, MemoryMarkerStore, SessionGate, MARKER_KEY};
pub use store::{
    CollectionStore, ConfigGatedStore, Direction, Document, MemoryCollectionStore, StoreError,
};
