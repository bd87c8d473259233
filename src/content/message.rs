use serde::{Deserialize, Serialize};

use crate::collection::{require_fields, CollectionController, Record};
use crate::error::Error;
use crate::store::{CollectionStore, Direction, CREATED_AT_FIELD};

/// A contact-form message. `read` defaults to false and is only ever flipped
/// through the controller's `mark_as_read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

impl Message {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            read: false,
        }
    }
}

/// Partial update for a [`Message`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl Record for Message {
    const COLLECTION: &'static str = "messages";
    const ORDER_BY: &'static str = CREATED_AT_FIELD;
    const ORDER: Direction = Direction::Descending;

    type Patch = MessagePatch;

    fn validate(&self) -> Result<(), Error> {
        require_fields(&[
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ])
    }

    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.message = self.message.trim().to_string();
    }
}

impl<S: CollectionStore> CollectionController<Message, S> {
    /// Accept a contact-form submission. `read` is forced to false no matter
    /// what the caller passed.
    pub async fn send(&self, mut message: Message) -> Result<String, Error> {
        message.read = false;
        self.create(message).await
    }

    /// Flip a message to read. Updating an already-read message is allowed
    /// and leaves the unread count unchanged.
    pub async fn mark_as_read(&self, id: &str) -> Result<(), Error> {
        self.update(
            id,
            MessagePatch {
                read: Some(true),
                ..MessagePatch::default()
            },
        )
        .await
    }

    /// Count of cached messages with `read == false`. Derived from the cache
    /// on every call, never persisted.
    pub fn unread_count(&self) -> usize {
        self.list().iter().filter(|m| !m.data.read).count()
    }
}
