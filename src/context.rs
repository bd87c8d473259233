//! Application context — one owned controller per collection, built once.

use std::sync::Arc;

use crate::collection::CollectionController;
use crate::content::{Event, GalleryItem, Message, Winner};
use crate::error::Error;
use crate::session::{MarkerStore, SessionGate};
use crate::store::CollectionStore;

/// The dependency-injection root: exactly one controller per collection plus
/// the session gate, constructed at process start and passed explicitly to
/// whoever renders from it. There is no ambient global lookup.
pub struct AppContext<S: CollectionStore> {
    pub events: CollectionController<Event, S>,
    pub gallery: CollectionController<GalleryItem, S>,
    pub winners: CollectionController<Winner, S>,
    pub messages: CollectionController<Message, S>,
    pub session: SessionGate,
}

impl<S: CollectionStore> AppContext<S> {
    pub fn new(store: Arc<S>, markers: Arc<dyn MarkerStore>) -> Self {
        Self {
            events: CollectionController::new(Arc::clone(&store)),
            gallery: CollectionController::new(Arc::clone(&store)),
            winners: CollectionController::new(Arc::clone(&store)),
            messages: CollectionController::new(store),
            session: SessionGate::new(markers),
        }
    }

    /// Initial loads: fetch the three query-backed collections and attach
    /// the gallery's live snapshot stream.
    pub async fn start(&self) -> Result<(), Error> {
        self.events.refresh().await?;
        self.winners.refresh().await?;
        self.messages.refresh().await?;
        self.gallery.watch().await?;
        Ok(())
    }
}
