//! SessionGate — boolean authentication for the single admin role.
//!
//! A persisted opaque marker under one well-known key is the whole session:
//! presence implies authenticated, nothing validates the marker's content
//! and nothing expires it. The marker is read once when the gate is built;
//! after that the state lives in memory and changes only through
//! `login`/`logout`.

mod file;
mod memory;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

pub use file::FileMarkerStore;
pub use memory::MemoryMarkerStore;

/// Well-known key the session marker is persisted under.
pub const MARKER_KEY: &str = "admin_session";

const ADMIN_USERNAME: &str = "admin";
// Placeholder credential pair, kept as-is rather than invented into a real
// authentication scheme.
const ADMIN_PASSWORD: &str = "admin123";

/// Client-local persistent key/value storage for the session marker.
pub trait MarkerStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Tracks whether the admin is authenticated.
pub struct SessionGate {
    markers: Arc<dyn MarkerStore>,
    authenticated: AtomicBool,
}

impl SessionGate {
    /// Build the gate, reading the persisted marker once. A present marker
    /// means an earlier login survives the restart.
    pub fn new(markers: Arc<dyn MarkerStore>) -> Self {
        let authenticated = markers.load(MARKER_KEY).is_some();
        Self {
            markers,
            authenticated: AtomicBool::new(authenticated),
        }
    }

    /// Succeeds only for the hardcoded admin pair. On success a freshly
    /// generated opaque marker is persisted and the gate flips to
    /// authenticated; on failure nothing changes.
    pub fn login(&self, username: &str, password: &str) -> bool {
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            debug!("login rejected");
            return false;
        }
        self.markers.save(MARKER_KEY, &issue_marker());
        self.authenticated.store(true, Ordering::Relaxed);
        debug!("admin logged in");
        true
    }

    /// Remove the marker and flip to unauthenticated.
    pub fn logout(&self) {
        self.markers.remove(MARKER_KEY);
        self.authenticated.store(false, Ordering::Relaxed);
        debug!("admin logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }
}

/// An opaque marker value. Random so two logins never share one, but nothing
/// ever decodes it — presence is the whole check.
fn issue_marker() -> String {
    let bytes: [u8; 24] = rand::random();
    STANDARD.encode(bytes)
}
