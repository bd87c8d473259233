use std::fmt;

use crate::store::StoreError;

/// Error type for collection controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Required fields missing or malformed; raised before any store call.
    Validation(String),
    /// The operation referenced a record id absent from the store.
    NotFound { collection: String, id: String },
    /// The remote store rejected the operation or was unreachable.
    Store(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "validation failed: {}", msg),
            Error::NotFound { collection, id } => {
                write!(f, "record not found: {}:{}", collection, id)
            }
            Error::Store(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => Error::NotFound { collection, id },
            other => Error::Store(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(format!("record encoding failed: {}", err))
    }
}
