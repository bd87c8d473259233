//! The four content record types and their collection-specific rules.

mod event;
mod gallery;
mod message;
mod winner;

pub use event::{Event, EventPatch};
pub use gallery::{
    GalleryCategory, GalleryImage, GalleryItem, GalleryItemPatch, GALLERY_CATEGORIES,
};
pub use message::{Message, MessagePatch};
pub use winner::{Winner, WinnerEntry, WinnerPatch};
