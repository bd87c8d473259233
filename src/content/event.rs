use serde::{Deserialize, Serialize};

use crate::collection::{require_fields, Record};
use crate::error::Error;
use crate::store::{Direction, CREATED_AT_FIELD};

/// A club event: hackathon, workshop, talk. Title, date and location are
/// required; everything else is free-form presentation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub attendees: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
}

/// Partial update for an [`Event`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
}

impl Record for Event {
    const COLLECTION: &'static str = "events";
    const ORDER_BY: &'static str = CREATED_AT_FIELD;
    const ORDER: Direction = Direction::Descending;

    type Patch = EventPatch;

    fn validate(&self) -> Result<(), Error> {
        require_fields(&[
            ("title", &self.title),
            ("date", &self.date),
            ("location", &self.location),
        ])
    }
}
