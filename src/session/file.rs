use std::fs;
use std::path::PathBuf;

use tracing::warn;

use super::MarkerStore;

/// Marker storage as one file per key under a directory. Io failures are
/// logged and swallowed: a marker that failed to persist simply reads back
/// as absent, which the trust-on-presence model already handles.
pub struct FileMarkerStore {
    dir: PathBuf,
}

impl FileMarkerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl MarkerStore for FileMarkerStore {
    fn load(&self, key: &str) -> Option<String> {
        let value = fs::read_to_string(self.path_for(key)).ok()?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %err, "marker dir create failed");
            return;
        }
        if let Err(err) = fs::write(self.path_for(key), value) {
            warn!(key, error = %err, "marker write failed");
        }
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(key, error = %err, "marker remove failed"),
        }
    }
}
