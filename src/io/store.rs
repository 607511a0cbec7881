// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saved project storage.
//!
//! `ProjectStore` keeps serialized projects in a keyed object store. A
//! project without an id gets a fresh UUID on its first save; every save
//! stamps `updatedAt` and overwrites the record with the same id. Listing
//! returns the most recently modified projects first.

use crate::models::project::{now_millis, Project, ProjectSummary};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the project store or its backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored project {id} is corrupt: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode project: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Invalid project id: {0:?}")]
    InvalidKey(String),
    #[error("Project store lock was poisoned")]
    Poisoned,
}

/// A keyed store of opaque records.
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    /// Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for Box<S> {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

/// One JSON file per record in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ObjectStore for DirectoryStore {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write next to the target and rename, so readers never see half a record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_valid_key(stem) => keys.push(stem.to_string()),
                // Not one of ours, e.g. an exported project copied here
                _ => log::debug!("Ignoring {} in project store", path.display()),
            }
        }
        Ok(keys)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.keys().cloned().collect())
    }
}

/// Project persistence on top of an [`ObjectStore`].
pub struct ProjectStore<S: ObjectStore> {
    backend: S,
    clock: fn() -> i64,
}

impl<S: ObjectStore> ProjectStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            clock: now_millis,
        }
    }

    /// Use `clock` (Unix milliseconds) instead of the system time.
    #[cfg(test)]
    pub fn with_clock(backend: S, clock: fn() -> i64) -> Self {
        Self { backend, clock }
    }

    /// Insert or overwrite a project.
    ///
    /// Mints an id when the project has none and stamps `updatedAt`.
    /// Returns the project as stored.
    pub fn save(&self, project: &Project) -> Result<Project, StoreError> {
        let mut stored = project.clone();
        let id = stored
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        stored.updated_at = Some((self.clock)());

        let bytes = serde_json::to_vec(&stored).map_err(StoreError::Encode)?;
        self.backend.put(&id, &bytes)?;
        log::info!("Saved project \"{}\" ({})", stored.name, id);
        Ok(stored)
    }

    /// All saved projects, most recently modified first.
    ///
    /// Records that cannot be parsed are skipped with a warning.
    pub fn list(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let mut summaries = Vec::new();
        for key in self.backend.keys()? {
            match self.get(&key) {
                Ok(Some(project)) => summaries.extend(project.summary()),
                Ok(None) => {}
                Err(StoreError::Corrupt { id, source }) => {
                    log::warn!("Skipping corrupt project {}: {}", id, source);
                }
                Err(StoreError::InvalidKey(key)) => {
                    log::warn!("Skipping record with invalid id {:?}", key);
                }
                Err(e) => return Err(e),
            }
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    pub fn get(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let Some(bytes) = self.backend.get(id)? else {
            return Ok(None);
        };
        let mut project: Project =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                id: id.to_string(),
                source,
            })?;
        // The key is authoritative for the record's identity
        project.id = Some(id.to_string());
        Ok(Some(project))
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.backend.delete(id)?;
        log::info!("Deleted project {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    static TICKS: AtomicI64 = AtomicI64::new(1_000);

    /// Strictly increasing clock so ordering never depends on wall time.
    fn ticking_clock() -> i64 {
        TICKS.fetch_add(10, Ordering::SeqCst)
    }

    fn memory_store() -> ProjectStore<MemoryStore> {
        ProjectStore::with_clock(MemoryStore::new(), ticking_clock)
    }

    fn project(name: &str) -> Project {
        Project::new(name.to_string(), 1)
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("wallmock-store-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_save_mints_id_and_stamps_time() {
        let store = memory_store();
        let saved = store.save(&project("Bedroom")).unwrap();
        assert!(saved.id.is_some());
        assert!(saved.updated_at.is_some());
        assert_eq!(store.get(saved.id.as_deref().unwrap()).unwrap(), Some(saved));
    }

    #[test]
    fn test_saving_twice_keeps_one_record() {
        let store = memory_store();
        let first = store.save(&project("Office")).unwrap();
        let second = store.save(&first).unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.updated_at > first.updated_at);

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(Some(list[0].id.clone()), first.id);
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let store = memory_store();
        let a = store.save(&project("A")).unwrap();
        let b = store.save(&project("B")).unwrap();
        let c = store.save(&project("C")).unwrap();
        store.save(&a).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
        assert!(b.id != c.id);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = memory_store();
        let saved = store.save(&project("Gone")).unwrap();
        let id = saved.id.unwrap();

        store.delete(&id).unwrap();
        store.delete(&id).unwrap();
        assert_eq!(store.get(&id).unwrap(), None);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_missing_project() {
        assert_eq!(memory_store().get("nope").unwrap(), None);
    }

    #[test]
    fn test_directory_store_persists_between_handles() {
        let dir = temp_dir();
        let saved = {
            let store = ProjectStore::with_clock(DirectoryStore::open(&dir).unwrap(), ticking_clock);
            store.save(&project("Studio")).unwrap()
        };

        let reopened = ProjectStore::new(DirectoryStore::open(&dir).unwrap());
        let id = saved.id.clone().unwrap();
        assert_eq!(reopened.get(&id).unwrap(), Some(saved));
        assert_eq!(reopened.list().unwrap().len(), 1);

        reopened.delete(&id).unwrap();
        reopened.delete(&id).unwrap();
        assert!(reopened.list().unwrap().is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_store_skips_corrupt_records() {
        let dir = temp_dir();
        let backend = DirectoryStore::open(&dir).unwrap();
        backend.put("broken", b"{ not json").unwrap();

        let store = ProjectStore::with_clock(backend, ticking_clock);
        store.save(&project("Fine")).unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Fine");
        assert!(matches!(store.get("broken"), Err(StoreError::Corrupt { .. })));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_store_rejects_path_like_keys() {
        let dir = temp_dir();
        let backend = DirectoryStore::open(&dir).unwrap();
        assert!(matches!(backend.put("../escape", b"{}"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(backend.get(""), Err(StoreError::InvalidKey(_))));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_store_ignores_foreign_json_files() {
        let dir = temp_dir();
        let store = ProjectStore::with_clock(DirectoryStore::open(&dir).unwrap(), ticking_clock);
        store.save(&project("Good")).unwrap();
        fs::write(dir.join("My Room.wallmockup.json"), b"{}").unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Good");
        fs::remove_dir_all(&dir).ok();
    }
}
