use serde::{Deserialize, Serialize};

use crate::collection::{require_fields, Record};
use crate::error::Error;
use crate::store::Direction;

/// The fixed set of gallery categories the site filters by.
pub const GALLERY_CATEGORIES: [GalleryCategory; 6] = [
    GalleryCategory::Workshop,
    GalleryCategory::Hackathon,
    GalleryCategory::Seminar,
    GalleryCategory::Competition,
    GalleryCategory::Meetup,
    GalleryCategory::Other,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GalleryCategory {
    Workshop,
    Hackathon,
    Seminar,
    Competition,
    Meetup,
    Other,
}

impl std::fmt::Display for GalleryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GalleryCategory::Workshop => "Workshop",
            GalleryCategory::Hackathon => "Hackathon",
            GalleryCategory::Seminar => "Seminar",
            GalleryCategory::Competition => "Competition",
            GalleryCategory::Meetup => "Meetup",
            GalleryCategory::Other => "Other",
        };
        f.write_str(name)
    }
}

/// One image in a gallery item's carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// A gallery entry: one event's photo set. The multi-image `images` list is
/// the canonical shape; a valid item always has at least one image with a
/// non-empty url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: GalleryCategory,
    pub event_date: String,
    pub images: Vec<GalleryImage>,
}

/// Partial update for a [`GalleryItem`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<GalleryCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<GalleryImage>>,
}

fn drop_empty_urls(images: &mut Vec<GalleryImage>) {
    images.retain(|image| !image.url.trim().is_empty());
}

impl Record for GalleryItem {
    const COLLECTION: &'static str = "gallery";
    const ORDER_BY: &'static str = "eventDate";
    const ORDER: Direction = Direction::Descending;

    type Patch = GalleryItemPatch;

    fn validate(&self) -> Result<(), Error> {
        require_fields(&[("title", &self.title), ("eventDate", &self.event_date)])?;
        if self.images.is_empty() {
            return Err(Error::Validation(
                "gallery item needs at least one image with a url".to_string(),
            ));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        drop_empty_urls(&mut self.images);
    }

    fn normalize_patch(patch: &mut Self::Patch) -> Result<(), Error> {
        if let Some(images) = patch.images.as_mut() {
            drop_empty_urls(images);
            if images.is_empty() {
                return Err(Error::Validation(
                    "gallery item needs at least one image with a url".to_string(),
                ));
            }
        }
        Ok(())
    }
}
