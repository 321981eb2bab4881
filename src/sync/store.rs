//! Snapshot stores

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::content::ContentState;
use crate::core::{SnapshotStore, StoreError};

/// Snapshot kept in a single JSON file.
///
/// Saves write a sibling temp file, sync it and rename it over the target,
/// so readers never see a partially written snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<ContentState>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let content = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), "loaded snapshot");
        Ok(Some(content))
    }

    fn save(&mut self, content: &ContentState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let bytes = serde_json::to_vec(content)?;
        let written = fs::File::create(&temp_path)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            // the temp file may not exist if create failed
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved snapshot");
        Ok(())
    }
}

/// In-process snapshot store.
///
/// Clones share the same slot, so a test can keep one handle while the
/// engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    snapshot: Option<ContentState>,
    saves: usize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `content`.
    pub fn with_snapshot(content: ContentState) -> Self {
        let store = Self::new();
        store.lock().snapshot = Some(content);
        store
    }

    /// The stored snapshot, if any.
    pub fn snapshot(&self) -> Option<ContentState> {
        self.lock().snapshot.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<ContentState>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&mut self, content: &ContentState) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.snapshot = Some(content.clone());
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Label;
    use chrono::{TimeZone, Utc};

    fn sample() -> ContentState {
        ContentState {
            sync_cursor: "cursor-1".into(),
            labels: vec![Label {
                name: "Work".into(),
                order: 1,
            }],
            tasks: vec![],
            updated_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("snapshot.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");
        let mut store = JsonFileStore::new(&path);
        let content = sample();

        store.save(&content).unwrap();
        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("snapshot.json"));

        store.save(&sample()).unwrap();
        store.save(&ContentState::default()).unwrap();

        assert_eq!(store.load().unwrap(), Some(ContentState::default()));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        // a non-empty directory at the target makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), b"x").unwrap();
        let mut store = JsonFileStore::new(&path);

        let err = store.save(&sample()).unwrap_err();

        assert!(matches!(err, StoreError::Io(_)));
        assert!(!store.temp_path().exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let store = JsonFileStore::new("/var/lib/todosync/state.json");
        assert_eq!(
            store.temp_path(),
            PathBuf::from("/var/lib/todosync/state.json.tmp")
        );
    }

    #[test]
    fn test_memory_store_shares_slot() {
        let handle = MemoryStore::new();
        let mut owned = handle.clone();
        assert!(owned.load().unwrap().is_none());

        owned.save(&sample()).unwrap();
        assert_eq!(handle.snapshot(), Some(sample()));
        assert_eq!(handle.save_count(), 1);
    }
}
