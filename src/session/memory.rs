use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::MarkerStore;

/// In-memory marker storage. Clones share entries, so two gates over one
/// clone pair behave like two page loads against the same browser storage.
#[derive(Clone, Default)]
pub struct MemoryMarkerStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
