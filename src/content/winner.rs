use serde::{Deserialize, Serialize};

use crate::collection::{require_fields, CollectionController, Record, Stored};
use crate::error::Error;
use crate::store::{CollectionStore, Direction, CREATED_AT_FIELD};

/// One podium entry: "1st — Ada Lovelace, Team Babbage".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerEntry {
    pub position: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl WinnerEntry {
    /// An entry is kept only when both position and name are filled in.
    pub fn is_complete(&self) -> bool {
        !self.position.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// The winners board for one event. `event_id` references an Event record
/// but is not enforced referentially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub event_id: String,
    pub event_name: String,
    pub event_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default)]
    pub winners: Vec<WinnerEntry>,
}

/// Partial update for a [`Winner`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<WinnerEntry>>,
}

impl Record for Winner {
    const COLLECTION: &'static str = "winners";
    const ORDER_BY: &'static str = CREATED_AT_FIELD;
    const ORDER: Direction = Direction::Descending;

    type Patch = WinnerPatch;

    fn validate(&self) -> Result<(), Error> {
        require_fields(&[
            ("eventId", &self.event_id),
            ("eventName", &self.event_name),
            ("eventDate", &self.event_date),
        ])
    }

    fn normalize(&mut self) {
        self.winners.retain(WinnerEntry::is_complete);
    }

    fn normalize_patch(patch: &mut Self::Patch) -> Result<(), Error> {
        if let Some(entries) = patch.winners.as_mut() {
            entries.retain(WinnerEntry::is_complete);
        }
        Ok(())
    }
}

impl<S: CollectionStore> CollectionController<Winner, S> {
    /// The winners board for one event, if any is cached.
    pub fn find_by_event(&self, event_id: &str) -> Option<Stored<Winner>> {
        self.list()
            .into_iter()
            .find(|stored| stored.data.event_id == event_id)
    }
}
